//! Multiplexed GraphQL query/subscription client core.
//!
//! One shared transport carries interleaved messages for any number of
//! concurrent operations, each tagged with an opaque id. This crate owns the
//! hard part: the connection handshake, the concurrent id → handler registry,
//! the background reader loop that dispatches inbound messages, and the
//! public start/stop/request surface built on top.
//!
//! The transport itself is a collaborator: anything implementing the
//! `graphsub-transport` traits can sit underneath.

pub mod conn;
pub mod error;
pub mod handshake;
pub mod id;
pub mod registry;

mod reader;

pub use conn::{connect, connect_with_config, ConnectConfig, Connection};
pub use error::{ClientError, Result};
pub use id::{IdGenerator, RandomTokenIds};
pub use registry::{Handler, Registry};
