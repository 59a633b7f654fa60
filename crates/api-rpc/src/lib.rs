//! JSON-RPC API Layer
//!
//! Exposes the auth, event and tasks use cases over JSON-RPC 2.0 on
//! localhost TCP. Session tokens are passed as a request field; each
//! authenticated method resolves the caller before touching the store.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use handler::RpcHandler;
pub use server::{RpcServer, RpcServerConfig};
