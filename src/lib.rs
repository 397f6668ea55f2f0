//! Core state management and query orchestration for the Leadline CRM front end.
//!
//! This crate is the headless half of the Leadline client: everything a
//! presentation layer needs to drive the prospect and client list views
//! without owning any rendering itself. It provides:
//! - Filter coordination: status/action filters, free-text search, and the
//!   rules that keep them consistent with each other
//! - Date-range selection: the two-phase picker state machine and calendar
//!   cell classification
//! - Sorting and pagination: tri-state column sort and the ellipsis-compressed
//!   page window
//! - Query synchronization: debounced, race-guarded fetches against the
//!   Leadline REST backend
//!
//! A front end constructs an [`app::App`], drives the list states through
//! their mutation methods, and renders from their read accessors.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod logger;
pub mod pagination;
pub mod state;
