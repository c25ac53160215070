use async_trait::async_trait;

use crate::dht::ContactInfo;
use crate::dht::NodeId;
use crate::error::Result;
use crate::message::RingService;
use crate::peer::Peer;

#[async_trait]
impl RingService for Peer {
    fn identity(&self) -> ContactInfo {
        self.dht.local.clone()
    }

    async fn find_successor(&self, id: NodeId) -> Result<ContactInfo> {
        self.dht.find_successor(id).await
    }

    fn closest_preceding_node(&self, id: NodeId) -> Result<ContactInfo> {
        self.dht.closest_preceding_node(id)
    }

    fn predecessor(&self) -> Result<Option<ContactInfo>> {
        self.dht.predecessor()
    }

    fn successor(&self) -> Result<ContactInfo> {
        self.dht.successor()
    }

    fn notify(&self, sender: ContactInfo) -> Result<bool> {
        let adopted = self.dht.notify(sender)?;
        if adopted {
            self.poke();
        }
        Ok(adopted)
    }

    fn span(&self) -> tracing::Span {
        self.span.clone()
    }
}
