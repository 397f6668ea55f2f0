//! Filter state coordination for the prospect list.
//!
//! The browse filters (status, action state, date range) and free-text search
//! interact: they express different user intents, and combining them produces
//! result sets nobody asked for. [`FilterSet`] owns those dimensions and the
//! rules that keep them consistent, and derives the removable chip list shown
//! above the table.

use crate::api::{ActionStatus, ProspectQuery, ProspectStatus};
use crate::state::date_range::DateRange;
use crate::state::sort::{ColumnSort, SortDirection};

/// Specifying the prospect status filter options.
///
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    /// Chip label for this filter value.
    ///
    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Active => "Active",
            StatusFilter::Inactive => "Inactive",
        }
    }

    /// The query restriction this filter expresses, if any.
    ///
    pub fn as_query(self) -> Option<ProspectStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Active => Some(ProspectStatus::Active),
            StatusFilter::Inactive => Some(ProspectStatus::Inactive),
        }
    }
}

/// Specifying the action state filter options.
///
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum ActionStateFilter {
    #[default]
    All,
    Open,
    Overdue,
    Closed,
}

impl ActionStateFilter {
    /// Chip label for this filter value.
    ///
    pub fn label(self) -> &'static str {
        match self {
            ActionStateFilter::All => "All",
            ActionStateFilter::Open => "Open",
            ActionStateFilter::Overdue => "Overdue",
            ActionStateFilter::Closed => "Closed",
        }
    }

    /// The query restriction this filter expresses, if any.
    ///
    pub fn as_query(self) -> Option<ActionStatus> {
        match self {
            ActionStateFilter::All => None,
            ActionStateFilter::Open => Some(ActionStatus::Open),
            ActionStateFilter::Overdue => Some(ActionStatus::Overdue),
            ActionStateFilter::Closed => Some(ActionStatus::Closed),
        }
    }
}

/// Specifying which filter dimension a chip removes.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FilterCategory {
    Status,
    ActionState,
    DateRange,
    Search,
}

/// A removable chip describing one active filter dimension.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ActiveFilter {
    pub id: &'static str,
    pub category: FilterCategory,
    pub label: String,
}

/// The complete set of query inputs driving one fetch. Derived fresh on
/// every user-initiated change; the previous snapshot is discarded.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct FilterSnapshot {
    pub status: StatusFilter,
    pub action_state: ActionStateFilter,
    pub date_range: DateRange,
    pub search_term: String,
    pub sort: Option<ColumnSort>,
    pub page: usize,
}

impl Default for FilterSnapshot {
    fn default() -> FilterSnapshot {
        FilterSnapshot {
            status: StatusFilter::All,
            action_state: ActionStateFilter::All,
            date_range: DateRange::default(),
            search_term: String::new(),
            sort: None,
            page: 1,
        }
    }
}

impl FilterSnapshot {
    /// Builds the backend query mirroring this snapshot.
    ///
    pub fn to_query(&self) -> ProspectQuery {
        ProspectQuery {
            page: self.page,
            status: self.status.as_query(),
            action_state: self.action_state.as_query(),
            date_from: self.date_range.start,
            date_to: self.date_range.end,
            search: if self.search_term.is_empty() {
                None
            } else {
                Some(self.search_term.clone())
            },
            sort_field: self.sort.map(|sort| sort.column.field_name()),
            sort_descending: matches!(
                self.sort,
                Some(ColumnSort {
                    direction: SortDirection::Descending,
                    ..
                })
            ),
        }
    }
}

/// Owns the mutually-interacting filter dimensions and resolves their
/// conflicts. Every mutator reports whether anything changed so callers can
/// skip redundant fetches.
///
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct FilterSet {
    status: StatusFilter,
    action_state: ActionStateFilter,
    date_range: DateRange,
    search_term: String,
}

impl FilterSet {
    /// Returns the status filter.
    ///
    pub fn status(&self) -> StatusFilter {
        self.status
    }

    /// Returns the action state filter.
    ///
    pub fn action_state(&self) -> ActionStateFilter {
        self.action_state
    }

    /// Returns the applied date range.
    ///
    pub fn date_range(&self) -> DateRange {
        self.date_range
    }

    /// Returns the normalized search term; empty means no search.
    ///
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// True when any categorical or date filter narrows the browse set.
    ///
    pub fn has_browse_filter(&self) -> bool {
        self.status != StatusFilter::All
            || self.action_state != ActionStateFilter::All
            || !self.date_range.is_empty()
    }

    /// True when a search term is applied.
    ///
    pub fn has_search(&self) -> bool {
        !self.search_term.is_empty()
    }

    /// Sets the status filter.
    ///
    pub fn set_status(&mut self, status: StatusFilter) -> bool {
        if self.status == status {
            return false;
        }
        self.status = status;
        true
    }

    /// Sets the action state filter.
    ///
    pub fn set_action_state(&mut self, action_state: ActionStateFilter) -> bool {
        if self.action_state == action_state {
            return false;
        }
        self.action_state = action_state;
        true
    }

    /// Sets the date range, swapping misordered bounds.
    ///
    pub fn set_date_range(&mut self, range: DateRange) -> bool {
        let range = range.normalized();
        if self.date_range == range {
            return false;
        }
        self.date_range = range;
        true
    }

    /// Sets the search term, trimmed; comparison against the current term is
    /// case-insensitive.
    ///
    /// Search and browsing are mutually exclusive intents: a non-empty term
    /// atomically resets the status, action state, and date range filters.
    /// The reverse direction is deliberately one-way, matching the shipped
    /// behavior: applying a browse filter leaves an existing term alone.
    ///
    pub fn set_search_term(&mut self, term: &str) -> bool {
        let term = term.trim();
        if term.to_lowercase() == self.search_term.to_lowercase() {
            return false;
        }
        if !term.is_empty() && self.has_browse_filter() {
            self.status = StatusFilter::All;
            self.action_state = ActionStateFilter::All;
            self.date_range = DateRange::default();
        }
        self.search_term = term.to_string();
        true
    }

    /// Resets exactly the dimension owned by the given category.
    ///
    pub fn clear(&mut self, category: FilterCategory) -> bool {
        match category {
            FilterCategory::Status => self.set_status(StatusFilter::All),
            FilterCategory::ActionState => self.set_action_state(ActionStateFilter::All),
            FilterCategory::DateRange => self.set_date_range(DateRange::default()),
            FilterCategory::Search => {
                if self.search_term.is_empty() {
                    false
                } else {
                    self.search_term.clear();
                    true
                }
            }
        }
    }

    /// Resets every dimension to its default.
    ///
    pub fn clear_all(&mut self) -> bool {
        if *self == FilterSet::default() {
            return false;
        }
        *self = FilterSet::default();
        true
    }

    /// Derives the chip list in fixed display order: status, action state,
    /// date range, then search.
    ///
    pub fn active_filters(&self) -> Vec<ActiveFilter> {
        let mut chips = Vec::new();
        if self.status != StatusFilter::All {
            chips.push(ActiveFilter {
                id: "status",
                category: FilterCategory::Status,
                label: format!("Status: {}", self.status.label()),
            });
        }
        if self.action_state != ActionStateFilter::All {
            chips.push(ActiveFilter {
                id: "action-state",
                category: FilterCategory::ActionState,
                label: format!("Actions: {}", self.action_state.label()),
            });
        }
        if !self.date_range.is_empty() {
            chips.push(ActiveFilter {
                id: "date-range",
                category: FilterCategory::DateRange,
                label: range_label(self.date_range),
            });
        }
        if self.has_search() {
            chips.push(ActiveFilter {
                id: "search",
                category: FilterCategory::Search,
                label: format!("Search: {}", self.search_term),
            });
        }
        chips
    }
}

/// Chip label for a partially or fully bounded date range.
///
fn range_label(range: DateRange) -> String {
    match (range.start, range.end) {
        (Some(start), Some(end)) => format!(
            "{} to {}",
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        ),
        (Some(start), None) => format!("From {}", start.format("%Y-%m-%d")),
        (None, Some(end)) => format!("Until {}", end.format("%Y-%m-%d")),
        (None, None) => String::new(),
    }
}
