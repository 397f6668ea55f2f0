use chrono::{DateTime, NaiveDate, Utc};
use fake::Dummy;

/// Lifecycle status of a prospect record.
///
#[derive(Clone, Copy, Debug, Dummy, PartialEq, Eq)]
pub enum ProspectStatus {
    Active,
    Inactive,
}

impl ProspectStatus {
    /// Wire value used in query parameters and request bodies.
    ///
    pub fn as_param(self) -> &'static str {
        match self {
            ProspectStatus::Active => "active",
            ProspectStatus::Inactive => "inactive",
        }
    }
}

/// Status of a single follow-up action on a prospect.
///
#[derive(Clone, Copy, Debug, Dummy, PartialEq, Eq)]
pub enum ActionStatus {
    Open,
    Overdue,
    Closed,
}

impl ActionStatus {
    /// Wire value used in query parameters.
    ///
    pub fn as_param(self) -> &'static str {
        match self {
            ActionStatus::Open => "open",
            ActionStatus::Overdue => "overdue",
            ActionStatus::Closed => "closed",
        }
    }
}

/// Defines follow-up action data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq)]
pub struct ActionRecord {
    pub id: i64,
    pub status: ActionStatus,
    pub next_contact: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Defines prospect data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq)]
pub struct Prospect {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: ProspectStatus,
    pub actions: Vec<ActionRecord>,
    pub created_at: DateTime<Utc>,
}

/// Defines client data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq)]
pub struct ClientRecord {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Single display status derived from a prospect's actions.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayStatus {
    Open,
    Overdue,
    Closed,
    NoAction,
}

impl DisplayStatus {
    /// Human-readable label for the status column.
    ///
    pub fn label(self) -> &'static str {
        match self {
            DisplayStatus::Open => "Open",
            DisplayStatus::Overdue => "Overdue",
            DisplayStatus::Closed => "Closed",
            DisplayStatus::NoAction => "No Action",
        }
    }
}

impl From<ActionStatus> for DisplayStatus {
    fn from(status: ActionStatus) -> Self {
        match status {
            ActionStatus::Open => DisplayStatus::Open,
            ActionStatus::Overdue => DisplayStatus::Overdue,
            ActionStatus::Closed => DisplayStatus::Closed,
        }
    }
}

impl Prospect {
    /// Returns the action that determines this row's display status.
    ///
    /// Overdue actions always win, and among them the one with the earliest
    /// next-contact date surfaces first (a dateless overdue sorts after any
    /// dated one; remaining ties keep input order). Without any overdue
    /// action the most recently created action stands in.
    ///
    pub fn display_action(&self) -> Option<&ActionRecord> {
        let earliest_overdue = self
            .actions
            .iter()
            .filter(|action| action.status == ActionStatus::Overdue)
            .min_by_key(|action| (action.next_contact.is_none(), action.next_contact));
        if earliest_overdue.is_some() {
            return earliest_overdue;
        }
        self.actions.iter().max_by_key(|action| action.created_at)
    }

    /// Returns the display status for this row.
    ///
    pub fn display_status(&self) -> DisplayStatus {
        match self.display_action() {
            Some(action) => action.status.into(),
            None => DisplayStatus::NoAction,
        }
    }
}

/// Pagination metadata reported by the backend alongside each page.
///
#[derive(Clone, Copy, Debug, Dummy, PartialEq, Eq)]
pub struct PageMeta {
    pub current_page: usize,
    pub last_page: usize,
    pub total_items: usize,
}

impl Default for PageMeta {
    fn default() -> PageMeta {
        PageMeta {
            current_page: 1,
            last_page: 1,
            total_items: 0,
        }
    }
}

/// One page of records together with its metadata.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn action(id: i64, status: ActionStatus, next_contact: Option<NaiveDate>, day: u32) -> ActionRecord {
        ActionRecord {
            id,
            status,
            next_contact,
            created_at: Utc.with_ymd_and_hms(2026, 1, day, 12, 0, 0).unwrap(),
        }
    }

    fn prospect_with_actions(actions: Vec<ActionRecord>) -> Prospect {
        Prospect {
            id: 1,
            name: "Acme Holdings".to_string(),
            email: None,
            phone: None,
            company: None,
            status: ProspectStatus::Active,
            actions,
            created_at: Utc.with_ymd_and_hms(2025, 12, 1, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn earliest_overdue_action_wins() {
        let prospect = prospect_with_actions(vec![
            action(1, ActionStatus::Closed, None, 1),
            action(2, ActionStatus::Overdue, NaiveDate::from_ymd_opt(2026, 1, 20), 2),
            action(3, ActionStatus::Overdue, NaiveDate::from_ymd_opt(2026, 1, 5), 3),
        ]);
        assert_eq!(prospect.display_status(), DisplayStatus::Overdue);
        assert_eq!(prospect.display_action().unwrap().id, 3);
    }

    #[test]
    fn dateless_overdue_sorts_after_dated() {
        let prospect = prospect_with_actions(vec![
            action(1, ActionStatus::Overdue, None, 5),
            action(2, ActionStatus::Overdue, NaiveDate::from_ymd_opt(2026, 2, 1), 1),
        ]);
        assert_eq!(prospect.display_action().unwrap().id, 2);
    }

    #[test]
    fn most_recent_action_without_overdue() {
        let prospect = prospect_with_actions(vec![
            action(1, ActionStatus::Closed, None, 3),
            action(2, ActionStatus::Open, None, 8),
            action(3, ActionStatus::Closed, None, 5),
        ]);
        assert_eq!(prospect.display_status(), DisplayStatus::Open);
        assert_eq!(prospect.display_action().unwrap().id, 2);
    }

    #[test]
    fn no_actions_means_no_action_status() {
        let prospect = prospect_with_actions(vec![]);
        assert_eq!(prospect.display_status(), DisplayStatus::NoAction);
        assert!(prospect.display_action().is_none());
        assert_eq!(DisplayStatus::NoAction.label(), "No Action");
    }

    #[test]
    fn page_meta_defaults_to_single_empty_page() {
        let meta = PageMeta::default();
        assert_eq!(meta.current_page, 1);
        assert_eq!(meta.last_page, 1);
        assert_eq!(meta.total_items, 0);
    }
}
