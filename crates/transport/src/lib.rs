#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
pub mod codec;
pub mod error;
pub mod server;
pub mod tcp;

pub use server::TcpServer;
pub use tcp::TcpTransport;

#[cfg(test)]
mod tests;
