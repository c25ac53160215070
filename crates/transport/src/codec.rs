//! Framing of requests and reports on a byte stream.
//!
//! Every message is one length-delimited frame holding its bincode encoding.

use bytes::Bytes;
use futures::SinkExt;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::AsyncRead;
use tokio::io::AsyncWrite;
use tokio_util::codec::Framed;
use tokio_util::codec::LengthDelimitedCodec;

use crate::error::Result;

/// Frames larger than this are refused by the reading side.
pub const MAX_FRAME_LENGTH: usize = 1024 * 1024;

/// Wrap a stream into the frame codec.
pub fn framed<S>(stream: S) -> Framed<S, LengthDelimitedCodec>
where S: AsyncRead + AsyncWrite {
    let codec = LengthDelimitedCodec::builder()
        .max_frame_length(MAX_FRAME_LENGTH)
        .new_codec();
    Framed::new(stream, codec)
}

/// Encode and flush one message.
pub async fn write_message<S, T>(framed: &mut Framed<S, LengthDelimitedCodec>, msg: &T) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
    T: Serialize,
{
    let data = bincode::serialize(msg).map(Bytes::from)?;
    framed.send(data).await?;
    Ok(())
}

/// Read the next message, `None` when the peer closed the stream between frames.
pub async fn read_message<S, T>(framed: &mut Framed<S, LengthDelimitedCodec>) -> Result<Option<T>>
where
    S: AsyncRead + AsyncWrite + Unpin,
    T: DeserializeOwned,
{
    match framed.next().await {
        Some(frame) => Ok(Some(bincode::deserialize(&frame?)?)),
        None => Ok(None),
    }
}
