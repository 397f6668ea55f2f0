//! List-view state management module.
//!
//! This module contains the state behind the prospect and client list views:
//! - Filter coordination: status/action filters, search, and the chip list
//! - Date-range selection: the two-phase picker and calendar classification
//! - Sorting: tri-state per-column cycling
//! - The list orchestrators that tie those inputs to fetched pages

mod client_list;
mod date_range;
mod filters;
mod prospect_list;
mod sort;

pub use client_list::ClientList;
pub use date_range::{classify_day, DateRange, DateRangeSelection, DayMark, RangePhase};
pub use filters::{
    ActionStateFilter, ActiveFilter, FilterCategory, FilterSet, FilterSnapshot, StatusFilter,
};
pub use prospect_list::ProspectList;
pub use sort::{ColumnSort, SortColumn, SortDirection, SortState};
