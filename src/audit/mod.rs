//! Audit logging
//!
//! Every create, update and delete performed by the services is appended to
//! `audit.log` with the record's before and after state.
//!
//! - `AuditEntry`: one logged operation
//! - `AuditLogger`: JSONL writer and reader
//! - `generate_diff`: field-level change summary used for updates

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
