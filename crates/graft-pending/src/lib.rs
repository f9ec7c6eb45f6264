//! Staged-change lifecycle: preview, accept, reject, expire.
//!
//! [`PendingChangeStore`] owns every not-yet-committed edit. Staging computes
//! the full proposed document text, hands it to the host for presentation
//! (diff tab or inline ghost text), and keeps the change addressable by id
//! until exactly one of accept, reject, or the expiry sweep consumes it.
//!
//! This is the only component of the pipeline with concurrently reachable
//! state. The id map sits behind a `parking_lot` mutex held for map
//! operations only, never across an await; accepting claims the entry under
//! that lock, so two racing accepts for one id resolve to a single winner.

mod store;

pub use store::{PendingChange, PendingChangeStore, PendingError, StoreSettings};
