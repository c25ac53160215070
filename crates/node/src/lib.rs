#![doc = include_str!("../README.md")]
pub mod config;
pub mod error;
pub mod logging;
pub mod node;
pub mod util;
