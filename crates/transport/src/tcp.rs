//! Outbound side: one TCP connection per request.

use async_trait::async_trait;
use ringlet_core::error::Error as RingError;
use ringlet_core::message::MessagePayload;
use ringlet_core::message::Report;
use ringlet_core::transport::Transport;
use tokio::net::TcpStream;

use crate::codec::framed;
use crate::codec::read_message;
use crate::codec::write_message;
use crate::error::Error;
use crate::error::Result;

/// [Transport] that dials `host:port` addresses over TCP.
///
/// A connection lives for exactly one request and its report.
#[derive(Debug, Clone, Default)]
pub struct TcpTransport;

impl TcpTransport {
    /// Dialing is bounded by the ring's call timeout.
    pub fn new() -> Self {
        Self
    }

    async fn connect(&self, address: &str) -> Result<TcpStream> {
        let stream = TcpStream::connect(address).await?;
        stream.set_nodelay(true)?;
        Ok(stream)
    }

    async fn request(&self, address: &str, payload: &MessagePayload) -> Result<Report> {
        let stream = self.connect(address).await?;
        let mut framed = framed(stream);
        write_message(&mut framed, payload).await?;
        read_message(&mut framed)
            .await?
            .ok_or(Error::ConnectionClosed)
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn send(&self, address: &str, payload: MessagePayload) -> ringlet_core::error::Result<Report> {
        tracing::trace!("sending {} to {}", payload.message.name(), address);
        self.request(address, &payload)
            .await
            .map_err(|e| RingError::Transport {
                address: address.to_string(),
                reason: e.to_string(),
            })
    }
}
