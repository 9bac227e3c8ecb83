//! State synchronization between the in-memory stores and both persistence
//! channels.
//!
//! # Responsibility
//! - Own the roster and ledger and expose their mutation entry points.
//! - React to every commit by writing the changed collection to durable
//!   storage and the shareable link.
//! - Resolve the initial state once, preferring the link over storage.
//!
//! # Invariants
//! - No channel is written while `SyncPhase::Bootstrapping`.
//! - An empty collection is never written through the commit path; only
//!   `clear_data` shrinks persisted state.
//! - Persistence failures never reach the caller.

mod controller;

pub use controller::{
    BootstrapReport, CollectionLoad, CommitEvent, SnapshotSource, SyncController, SyncPhase,
    WriteOutcome,
};
