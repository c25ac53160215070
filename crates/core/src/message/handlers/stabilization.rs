use async_trait::async_trait;

use crate::error::Result;
use crate::message::HandleMsg;
use crate::message::MessageHandler;
use crate::message::MessagePayload;
use crate::message::NotifyPredecessorSend;
use crate::message::PingSend;
use crate::message::QueryPredecessorSend;
use crate::message::QuerySuccessorSend;
use crate::message::Report;

#[async_trait]
impl HandleMsg<PingSend> for MessageHandler {
    async fn handle(&self, _ctx: &MessagePayload, _msg: &PingSend) -> Result<Report> {
        Ok(Report::Contact(self.service.identity()))
    }
}

#[async_trait]
impl HandleMsg<QueryPredecessorSend> for MessageHandler {
    async fn handle(&self, _ctx: &MessagePayload, _msg: &QueryPredecessorSend) -> Result<Report> {
        Ok(Report::MaybeContact(self.service.predecessor()?))
    }
}

#[async_trait]
impl HandleMsg<QuerySuccessorSend> for MessageHandler {
    async fn handle(&self, _ctx: &MessagePayload, _msg: &QuerySuccessorSend) -> Result<Report> {
        Ok(Report::Contact(self.service.successor()?))
    }
}

#[async_trait]
impl HandleMsg<NotifyPredecessorSend> for MessageHandler {
    async fn handle(&self, ctx: &MessagePayload, _msg: &NotifyPredecessorSend) -> Result<Report> {
        if self.service.notify(ctx.sender.clone())? {
            tracing::info!("adopted predecessor {}", ctx.sender);
        }
        Ok(Report::Ack)
    }
}
