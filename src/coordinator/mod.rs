//! Scatter-Gather Coordinator Module
//!
//! Drives one hot-keys fetch from start to finish:
//!
//! 1. **Init**: read the storage-owning members from the membership directory. An
//!    empty set fails the fetch before anything is dispatched.
//! 2. **Dispatch**: hand one `HotKeyTask` per member to the invocation service.
//! 3. **Await**: receive outcome events until every member has reported exactly once.
//!    This is the only suspension point; it can be cut short by a cancellation token
//!    or a deadline.
//! 4. **Done**: the collected outcomes are merged into a `GlobalReport`.
//!
//! ## Submodules
//! - **`outcomes`**: `OutcomeTable`, the once-per-member completion accounting.
//! - **`service`**: `HotKeysCoordinator`.

pub mod outcomes;
pub mod service;

pub use outcomes::{MemberOutcome, OutcomeTable};
pub use service::HotKeysCoordinator;
