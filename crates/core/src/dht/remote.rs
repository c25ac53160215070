//! Typed outbound calls of the ring protocol.
use crate::dht::ContactInfo;
use crate::dht::NodeId;
use crate::dht::PeerRing;
use crate::error::Error;
use crate::error::Result;
use crate::message::ClosestPrecedingNodeSend;
use crate::message::FindSuccessorSend;
use crate::message::Message;
use crate::message::MessagePayload;
use crate::message::NotifyPredecessorSend;
use crate::message::PingSend;
use crate::message::QueryPredecessorSend;
use crate::message::QuerySuccessorSend;
use crate::message::Report;

impl PeerRing {
    /// Send one request, bounded by the configured call timeout.
    /// A [Report::Failure] answer is turned into [Error::RemoteFailure].
    async fn call(
        &self,
        address: &str,
        receiver: Option<NodeId>,
        message: Message,
    ) -> Result<Report> {
        tracing::trace!("{} -> {}", message.name(), address);
        let payload = MessagePayload::new(message, self.local.clone(), receiver);
        let fut = self.transport.send(address, payload);
        let report = match self.call_timeout {
            Some(timeout) => tokio::time::timeout(timeout, fut)
                .await
                .map_err(|_| Error::CallTimeout {
                    address: address.to_string(),
                    timeout,
                })??,
            None => fut.await?,
        };
        match report {
            Report::Failure(reason) => Err(Error::RemoteFailure {
                address: address.to_string(),
                reason,
            }),
            report => Ok(report),
        }
    }

    async fn call_for_contact(
        &self,
        address: &str,
        receiver: Option<NodeId>,
        message: Message,
    ) -> Result<ContactInfo> {
        match self.call(address, receiver, message).await? {
            Report::Contact(contact) => Ok(contact),
            _ => Err(Error::UnexpectedReport {
                address: address.to_string(),
                expected: "contact",
            }),
        }
    }

    /// Ask a raw address for its identity.
    pub async fn remote_ping(&self, address: &str) -> Result<ContactInfo> {
        self.call_for_contact(address, None, Message::PingSend(PingSend))
            .await
    }

    /// Ask `target` for the successor of `id`.
    pub async fn remote_find_successor(
        &self,
        target: &ContactInfo,
        id: NodeId,
    ) -> Result<ContactInfo> {
        let msg = Message::FindSuccessorSend(FindSuccessorSend { id: Some(id) });
        self.call_for_contact(&target.address, Some(target.id), msg)
            .await
    }

    /// Ask `target` for its closest preceding node of `id`.
    pub async fn remote_closest_preceding_node(
        &self,
        target: &ContactInfo,
        id: NodeId,
    ) -> Result<ContactInfo> {
        let msg = Message::ClosestPrecedingNodeSend(ClosestPrecedingNodeSend { id: Some(id) });
        self.call_for_contact(&target.address, Some(target.id), msg)
            .await
    }

    /// Ask `target` for its predecessor.
    pub async fn remote_predecessor(&self, target: &ContactInfo) -> Result<Option<ContactInfo>> {
        let msg = Message::QueryPredecessorSend(QueryPredecessorSend);
        match self.call(&target.address, Some(target.id), msg).await? {
            Report::MaybeContact(contact) => Ok(contact),
            _ => Err(Error::UnexpectedReport {
                address: target.address.clone(),
                expected: "nullable contact",
            }),
        }
    }

    /// Ask `target` for its immediate successor.
    pub async fn remote_successor(&self, target: &ContactInfo) -> Result<ContactInfo> {
        let msg = Message::QuerySuccessorSend(QuerySuccessorSend);
        self.call_for_contact(&target.address, Some(target.id), msg)
            .await
    }

    /// Tell `target` that the local node may be its predecessor.
    pub async fn remote_notify(&self, target: &ContactInfo) -> Result<()> {
        let msg = Message::NotifyPredecessorSend(NotifyPredecessorSend);
        match self.call(&target.address, Some(target.id), msg).await? {
            Report::Ack => Ok(()),
            _ => Err(Error::UnexpectedReport {
                address: target.address.clone(),
                expected: "ack",
            }),
        }
    }
}
