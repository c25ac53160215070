//! Inbound side: accept connections and answer every frame through a [MessageHandler].

use std::net::SocketAddr;

use ringlet_core::message::MessageHandler;
use ringlet_core::message::MessagePayload;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::net::ToSocketAddrs;
use tokio_util::sync::CancellationToken;

use crate::codec::framed;
use crate::codec::read_message;
use crate::codec::write_message;
use crate::error::Result;

/// A bound listener, not accepting until [TcpServer::serve].
pub struct TcpServer {
    listener: TcpListener,
}

impl TcpServer {
    /// Bind the listening socket. Port `0` picks a free one, see [TcpServer::local_addr].
    pub async fn bind(address: impl ToSocketAddrs) -> Result<Self> {
        let listener = TcpListener::bind(address).await?;
        Ok(Self { listener })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until `token` is cancelled.
    ///
    /// Each connection runs in its own task and may carry any number of requests.
    /// Open connections are closed when `token` is cancelled.
    pub async fn serve(self, handler: MessageHandler, token: CancellationToken) {
        tracing::info!("listening on {:?}", self.listener.local_addr());
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, remote)) => {
                        let handler = handler.clone();
                        let token = token.clone();
                        tokio::spawn(async move {
                            if let Err(e) = serve_connection(stream, handler, token).await {
                                tracing::debug!("connection from {} dropped: {}", remote, e);
                            }
                        });
                    }
                    Err(e) => tracing::warn!("failed to accept connection: {}", e),
                },
            }
        }
        tracing::info!("listener closed");
    }
}

async fn serve_connection(
    stream: TcpStream,
    handler: MessageHandler,
    token: CancellationToken,
) -> Result<()> {
    stream.set_nodelay(true)?;
    let mut framed = framed(stream);
    loop {
        let payload = tokio::select! {
            _ = token.cancelled() => return Ok(()),
            payload = read_message::<_, MessagePayload>(&mut framed) => payload?,
        };
        let Some(payload) = payload else {
            return Ok(());
        };
        let report = handler.handle_payload(&payload).await;
        write_message(&mut framed, &report).await?;
    }
}
