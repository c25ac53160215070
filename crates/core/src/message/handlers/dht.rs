use async_trait::async_trait;

use crate::error::Error;
use crate::error::Result;
use crate::message::ClosestPrecedingNodeSend;
use crate::message::FindSuccessorSend;
use crate::message::HandleMsg;
use crate::message::MessageHandler;
use crate::message::MessagePayload;
use crate::message::Report;

#[async_trait]
impl HandleMsg<FindSuccessorSend> for MessageHandler {
    async fn handle(&self, _ctx: &MessagePayload, msg: &FindSuccessorSend) -> Result<Report> {
        let id = msg.id.ok_or(Error::MissingArgument("id"))?;
        let successor = self.service.find_successor(id).await?;
        Ok(Report::Contact(successor))
    }
}

#[async_trait]
impl HandleMsg<ClosestPrecedingNodeSend> for MessageHandler {
    async fn handle(&self, _ctx: &MessagePayload, msg: &ClosestPrecedingNodeSend) -> Result<Report> {
        let id = msg.id.ok_or(Error::MissingArgument("id"))?;
        Ok(Report::Contact(self.service.closest_preceding_node(id)?))
    }
}
