//! Invocation Module
//!
//! The execution substrate the coordinator dispatches hot-key tasks through. A
//! dispatch targets exactly one member and eventually reports exactly one
//! `InvocationEvent` for it: completed with a ranking, failed with an error, or
//! departed when the member left before answering.
//!
//! ## Submodules
//! - **`types`**: `NodeOutcome`, `InvocationEvent` and the `InvocationService` trait.
//! - **`local`**: runs tasks against stores hosted in this process.
//! - **`remote`**: runs tasks on other processes over HTTP.
//! - **`protocol`**: DTOs for the internal hot-keys endpoint.
//! - **`handlers`**: the axum handler serving that endpoint on a storage member.

pub mod handlers;
pub mod local;
pub mod protocol;
pub mod remote;
pub mod types;

pub use local::LocalInvocationService;
pub use remote::HttpInvocationService;
pub use types::{EventSender, InvocationEvent, InvocationService, NodeOutcome};
