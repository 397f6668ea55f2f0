//! Event handling module.
//!
//! This module contains the query synchronization engine:
//! - Network events: backend queries and record mutations
//! - Debounce: the cancellable timer behind free-text search

pub mod debounce;
pub mod network;
