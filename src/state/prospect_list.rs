//! Prospect list orchestration.
//!
//! [`ProspectList`] is the authoritative state behind the prospect table:
//! it owns the filter set, sort state, date-range picker, pagination
//! metadata, and the fetched rows, and it dispatches query events to the
//! network engine whenever its inputs change. Results are applied through a
//! sequence guard so only the newest request can update visible state.

use crate::api::{Page, PageMeta, Prospect, ProspectUpdate};
use crate::app::NetworkEventSender;
use crate::events::network::Event as NetworkEvent;
use crate::pagination;
use crate::state::date_range::{DateRange, DateRangeSelection, DayMark};
use crate::state::filters::{
    ActionStateFilter, ActiveFilter, FilterCategory, FilterSet, FilterSnapshot, StatusFilter,
};
use crate::state::sort::{SortColumn, SortState};
use chrono::NaiveDate;
use log::*;

/// Houses the state of the prospect list view.
///
pub struct ProspectList {
    net_sender: Option<NetworkEventSender>,
    filters: FilterSet,
    sort: SortState,
    range_selection: DateRangeSelection,
    page: usize,
    rows: Vec<Prospect>,
    meta: PageMeta,
    detail: Option<Prospect>,
    is_loading: bool,
    error_message: Option<String>,
    search_input: String,
    query_seq: u64,
}

impl Default for ProspectList {
    fn default() -> ProspectList {
        ProspectList {
            net_sender: None,
            filters: FilterSet::default(),
            sort: SortState::default(),
            range_selection: DateRangeSelection::default(),
            page: 1,
            rows: vec![],
            meta: PageMeta::default(),
            detail: None,
            is_loading: false,
            error_message: None,
            search_input: String::new(),
            query_seq: 0,
        }
    }
}

impl ProspectList {
    /// Return a new instance wired to the network engine.
    ///
    pub fn new(net_sender: NetworkEventSender) -> ProspectList {
        ProspectList {
            net_sender: Some(net_sender),
            ..ProspectList::default()
        }
    }

    /// Assembles the authoritative snapshot for the current inputs.
    ///
    pub fn snapshot(&self) -> FilterSnapshot {
        FilterSnapshot {
            status: self.filters.status(),
            action_state: self.filters.action_state(),
            date_range: self.filters.date_range(),
            search_term: self.filters.search_term().to_string(),
            sort: self.sort.active(),
            page: self.page,
        }
    }

    /// Returns the rows of the current page.
    ///
    pub fn rows(&self) -> &[Prospect] {
        &self.rows
    }

    /// Returns the pagination metadata of the current page.
    ///
    pub fn meta(&self) -> PageMeta {
        self.meta
    }

    /// Returns the abbreviated page sequence for the pagination controls.
    ///
    pub fn page_window(&self) -> Vec<Option<usize>> {
        pagination::window(self.meta.current_page, self.meta.last_page)
    }

    /// True while a fetch for the current snapshot is outstanding.
    ///
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Returns the last fetch failure, cleared by the next applied result.
    ///
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Returns the raw search box contents (pre-debounce).
    ///
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    /// Returns the chip list for the active filters.
    ///
    pub fn active_filters(&self) -> Vec<ActiveFilter> {
        self.filters.active_filters()
    }

    /// Returns the filter set.
    ///
    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// Returns the date-range picker state.
    ///
    pub fn range_selection(&self) -> &DateRangeSelection {
        &self.range_selection
    }

    /// Returns the prospect open in the detail view, if any.
    ///
    pub fn detail(&self) -> Option<&Prospect> {
        self.detail.as_ref()
    }

    /// Dispatches an asynchronous network event.
    ///
    fn dispatch(&self, event: NetworkEvent) {
        if let Some(net_sender) = &self.net_sender {
            if let Err(err) = net_sender.send(event) {
                error!("Received error from network dispatch: {}", err);
            }
        }
    }

    /// Bumps the sequence and dispatches a fetch for the current snapshot.
    ///
    pub(crate) fn refresh(&mut self) {
        self.query_seq += 1;
        self.is_loading = true;
        self.dispatch(NetworkEvent::FetchProspects {
            snapshot: self.snapshot(),
            seq: self.query_seq,
        });
    }

    /// Any change to the query inputs restarts from the first page.
    ///
    fn refresh_from_first_page(&mut self) {
        self.page = 1;
        self.refresh();
    }

    /// Triggers the initial (or a manual) fetch of the current snapshot.
    ///
    pub fn reload(&mut self) {
        self.refresh();
    }

    /// Sets the status filter and refetches when it changed.
    ///
    pub fn set_status_filter(&mut self, status: StatusFilter) {
        if self.filters.set_status(status) {
            self.refresh_from_first_page();
        }
    }

    /// Sets the action state filter and refetches when it changed.
    ///
    pub fn set_action_state_filter(&mut self, action_state: ActionStateFilter) {
        if self.filters.set_action_state(action_state) {
            self.refresh_from_first_page();
        }
    }

    /// Applies a date range directly, bypassing the picker.
    ///
    pub fn set_date_range(&mut self, range: DateRange) {
        if self.filters.set_date_range(range) {
            self.range_selection.set_committed(self.filters.date_range());
            self.refresh_from_first_page();
        }
    }

    /// Records raw search box input and hands it to the engine's debounce.
    /// The filters only change once the quiet period elapses.
    ///
    pub fn set_search_input(&mut self, text: &str) {
        self.search_input = text.to_string();
        self.dispatch(NetworkEvent::SearchInput {
            value: text.to_string(),
        });
    }

    /// Commits a debounced search term. The search exclusivity rule may wipe
    /// the applied date range, so the picker is resynchronized. Returns false
    /// when the term matches the current one and no fetch is needed.
    ///
    pub(crate) fn commit_search_term(&mut self, value: &str) -> bool {
        if !self.filters.set_search_term(value) {
            return false;
        }
        self.range_selection.set_committed(self.filters.date_range());
        self.refresh_from_first_page();
        true
    }

    /// Resets one filter dimension from its chip and refetches.
    ///
    pub fn clear_filter(&mut self, category: FilterCategory) {
        if category == FilterCategory::Search {
            self.search_input.clear();
            self.dispatch(NetworkEvent::CancelSearch);
        }
        if self.filters.clear(category) {
            if category == FilterCategory::DateRange {
                self.range_selection.set_committed(DateRange::default());
            }
            self.refresh_from_first_page();
        }
    }

    /// Resets every filter dimension and refetches.
    ///
    pub fn clear_all_filters(&mut self) {
        self.search_input.clear();
        self.dispatch(NetworkEvent::CancelSearch);
        if self.filters.clear_all() {
            self.range_selection.set_committed(DateRange::default());
            self.refresh_from_first_page();
        }
    }

    /// Opens the date-range picker.
    ///
    pub fn open_range_picker(&mut self) {
        self.range_selection.open();
    }

    /// Forwards one tapped calendar day to the picker.
    ///
    pub fn select_range_day(&mut self, day: NaiveDate) {
        self.range_selection.select(day);
    }

    /// Commits the picker's pending range into the filters and refetches.
    ///
    pub fn apply_range(&mut self) {
        let range = self.range_selection.apply();
        if self.filters.set_date_range(range) {
            self.refresh_from_first_page();
        }
    }

    /// Closes the picker without touching the applied range.
    ///
    pub fn cancel_range_picker(&mut self) {
        self.range_selection.cancel();
    }

    /// The explicit clear affordance: empties the range and applies it
    /// immediately.
    ///
    pub fn clear_range(&mut self) {
        let range = self.range_selection.clear();
        if self.filters.set_date_range(range) {
            self.refresh_from_first_page();
        }
    }

    /// Classification of one calendar cell for rendering.
    ///
    pub fn day_mark(&self, day: NaiveDate) -> DayMark {
        self.range_selection.day_mark(day)
    }

    /// Returns the sort state.
    ///
    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    /// Advances the sort cycle for a column header click and refetches.
    ///
    pub fn toggle_sort(&mut self, column: SortColumn) {
        self.sort.toggle(column);
        self.refresh_from_first_page();
    }

    /// Requests the given page. Out-of-range and redundant requests are
    /// silent no-ops.
    ///
    pub fn go_to_page(&mut self, page: usize) {
        if page < 1 || page > self.meta.last_page || page == self.page {
            return;
        }
        self.page = page;
        self.refresh();
    }

    /// Requests the next page, stopping at the last.
    ///
    pub fn next_page(&mut self) {
        self.go_to_page(self.page + 1);
    }

    /// Requests the previous page, stopping at the first.
    ///
    pub fn previous_page(&mut self) {
        if self.page > 1 {
            self.go_to_page(self.page - 1);
        }
    }

    /// True when a previous page exists.
    ///
    pub fn can_go_previous(&self) -> bool {
        self.page > 1
    }

    /// True when a next page exists.
    ///
    pub fn can_go_next(&self) -> bool {
        self.page < self.meta.last_page
    }

    /// Requests full details for one prospect.
    ///
    pub fn open_detail(&mut self, id: i64) {
        self.dispatch(NetworkEvent::GetProspectDetail { id });
    }

    /// Closes the detail view.
    ///
    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    /// Submits field updates for a prospect.
    ///
    pub fn update_prospect(&mut self, id: i64, update: ProspectUpdate) {
        self.dispatch(NetworkEvent::UpdateProspect { id, update });
    }

    /// Requests deletion of a prospect; the list refetches on success.
    ///
    pub fn delete_prospect(&mut self, id: i64) {
        self.dispatch(NetworkEvent::DeleteProspect { id });
    }

    /// Invalidates pending work when the view unmounts: any in-flight fetch
    /// becomes stale and the pending debounce is cancelled.
    ///
    pub fn leave(&mut self) {
        self.query_seq += 1;
        self.is_loading = false;
        self.dispatch(NetworkEvent::CancelSearch);
    }

    /// Drops the connection to the network engine. Dispatches after this
    /// point are ignored.
    ///
    pub(crate) fn detach(&mut self) {
        self.net_sender = None;
    }

    /// Stores a fetched detail record.
    ///
    pub(crate) fn set_detail(&mut self, prospect: Prospect) {
        self.detail = Some(prospect);
    }

    /// Applies a completed fetch if it is still the newest one. The server's
    /// page number is authoritative. Returns false for stale results.
    ///
    pub(crate) fn apply_page(&mut self, seq: u64, page: Page<Prospect>) -> bool {
        if seq != self.query_seq {
            debug!(
                "Discarding stale prospect page (seq {} superseded by {})",
                seq, self.query_seq
            );
            return false;
        }
        self.rows = page.items;
        self.meta = page.meta;
        self.page = self.meta.current_page.max(1);
        self.is_loading = false;
        self.error_message = None;
        true
    }

    /// Records a failed fetch without disturbing the last good rows or page
    /// position. Returns false for stale failures.
    ///
    pub(crate) fn apply_error(&mut self, seq: u64, message: String) -> bool {
        if seq != self.query_seq {
            debug!(
                "Discarding stale prospect fetch error (seq {} superseded by {})",
                seq, self.query_seq
            );
            return false;
        }
        self.is_loading = false;
        self.error_message = Some(message);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::sort::SortDirection;
    use fake::{Fake, Faker};

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, month, day).unwrap()
    }

    fn loaded_list(last_page: usize) -> ProspectList {
        let mut list = ProspectList::default();
        list.refresh();
        let page = Page {
            items: vec![Faker.fake(), Faker.fake()],
            meta: PageMeta {
                current_page: 1,
                last_page,
                total_items: last_page * 2,
            },
        };
        assert!(list.apply_page(list.query_seq, page));
        list
    }

    #[test]
    fn filter_changes_reset_to_the_first_page() {
        let mut list = loaded_list(5);
        list.go_to_page(3);
        assert_eq!(list.snapshot().page, 3);
        list.set_status_filter(StatusFilter::Active);
        assert_eq!(list.snapshot().page, 1);

        list.go_to_page(3);
        list.toggle_sort(SortColumn::Name);
        assert_eq!(list.snapshot().page, 1);
    }

    #[test]
    fn redundant_filter_set_does_not_refetch() {
        let mut list = loaded_list(5);
        let seq = list.query_seq;
        list.set_status_filter(StatusFilter::All);
        assert_eq!(list.query_seq, seq);
        list.set_status_filter(StatusFilter::Active);
        assert_eq!(list.query_seq, seq + 1);
    }

    #[test]
    fn out_of_range_page_requests_are_ignored() {
        let mut list = loaded_list(4);
        let seq = list.query_seq;
        list.go_to_page(0);
        list.go_to_page(5);
        list.go_to_page(1);
        assert_eq!(list.snapshot().page, 1);
        assert_eq!(list.query_seq, seq);
        list.go_to_page(4);
        assert_eq!(list.snapshot().page, 4);
        assert_eq!(list.query_seq, seq + 1);
    }

    #[test]
    fn previous_and_next_stop_at_the_edges() {
        let mut list = loaded_list(3);
        assert!(!list.can_go_previous());
        list.previous_page();
        assert_eq!(list.snapshot().page, 1);
        list.next_page();
        list.next_page();
        assert_eq!(list.snapshot().page, 3);
        assert!(!list.can_go_next());
        list.next_page();
        assert_eq!(list.snapshot().page, 3);
    }

    #[test]
    fn stale_results_are_discarded() {
        let mut list = loaded_list(5);
        let before = list.rows().to_vec();
        let stale_seq = list.query_seq;
        list.set_action_state_filter(ActionStateFilter::Overdue);

        let stale_page = Page {
            items: vec![Faker.fake()],
            meta: PageMeta::default(),
        };
        assert!(!list.apply_page(stale_seq, stale_page));
        assert_eq!(list.rows(), before.as_slice());
        assert!(list.is_loading());
    }

    #[test]
    fn fetch_failure_keeps_last_good_rows_and_page() {
        let mut list = loaded_list(5);
        let rows_before = list.rows().to_vec();
        let window_before = list.page_window();
        list.go_to_page(2);

        assert!(list.apply_error(list.query_seq, "Could not load prospects".to_string()));
        assert_eq!(list.rows(), rows_before.as_slice());
        assert_eq!(list.page_window(), window_before);
        assert!(!list.is_loading());
        assert_eq!(list.error_message(), Some("Could not load prospects"));
    }

    #[test]
    fn applied_page_clears_a_previous_error() {
        let mut list = loaded_list(5);
        list.go_to_page(2);
        list.apply_error(list.query_seq, "boom".to_string());
        list.go_to_page(3);
        let page = Page {
            items: vec![],
            meta: PageMeta {
                current_page: 3,
                last_page: 5,
                total_items: 10,
            },
        };
        assert!(list.apply_page(list.query_seq, page));
        assert!(list.error_message().is_none());
    }

    #[test]
    fn server_page_number_is_authoritative() {
        let mut list = loaded_list(10);
        list.go_to_page(9);
        let page = Page {
            items: vec![],
            meta: PageMeta {
                current_page: 7,
                last_page: 7,
                total_items: 70,
            },
        };
        list.apply_page(list.query_seq, page);
        assert_eq!(list.snapshot().page, 7);
        assert_eq!(list.meta().last_page, 7);
    }

    #[test]
    fn committed_search_resets_browse_filters_and_picker() {
        let mut list = loaded_list(5);
        list.set_status_filter(StatusFilter::Active);
        list.set_date_range(DateRange::new(Some(date(1, 5)), Some(date(1, 10))));
        assert_eq!(list.day_mark(date(1, 5)), DayMark::First);

        assert!(list.commit_search_term("acme"));
        let snapshot = list.snapshot();
        assert_eq!(snapshot.status, StatusFilter::All);
        assert!(snapshot.date_range.is_empty());
        assert_eq!(snapshot.search_term, "acme");
        assert_eq!(snapshot.page, 1);
        assert_eq!(list.day_mark(date(1, 5)), DayMark::Unmarked);
    }

    #[test]
    fn unchanged_search_term_commits_without_a_fetch() {
        let mut list = loaded_list(5);
        assert!(list.commit_search_term("acme"));
        let seq = list.query_seq;
        assert!(!list.commit_search_term(" ACME "));
        assert_eq!(list.query_seq, seq);
    }

    #[test]
    fn triple_sort_toggle_returns_to_unsorted() {
        let mut list = loaded_list(5);
        list.toggle_sort(SortColumn::Name);
        assert_eq!(
            list.snapshot().sort.map(|sort| sort.direction),
            Some(SortDirection::Ascending)
        );
        list.toggle_sort(SortColumn::Name);
        list.toggle_sort(SortColumn::Name);
        assert_eq!(list.snapshot().sort, None);
    }

    #[test]
    fn applying_the_picker_range_updates_the_query() {
        let mut list = loaded_list(5);
        list.open_range_picker();
        list.select_range_day(date(1, 10));
        list.select_range_day(date(1, 5));
        list.apply_range();
        let snapshot = list.snapshot();
        assert_eq!(
            snapshot.date_range,
            DateRange::new(Some(date(1, 5)), Some(date(1, 10)))
        );
        assert_eq!(snapshot.page, 1);
    }

    #[test]
    fn cancelling_the_picker_leaves_the_query_untouched() {
        let mut list = loaded_list(5);
        let seq = list.query_seq;
        list.open_range_picker();
        list.select_range_day(date(1, 10));
        list.cancel_range_picker();
        assert!(list.snapshot().date_range.is_empty());
        assert_eq!(list.query_seq, seq);
    }

    #[test]
    fn clearing_the_date_chip_resets_the_picker_highlight() {
        let mut list = loaded_list(5);
        list.set_date_range(DateRange::new(Some(date(1, 5)), Some(date(1, 10))));
        list.clear_filter(FilterCategory::DateRange);
        assert!(list.snapshot().date_range.is_empty());
        assert_eq!(list.day_mark(date(1, 7)), DayMark::Unmarked);
    }

    #[test]
    fn leave_orphans_the_inflight_fetch() {
        let mut list = loaded_list(5);
        list.go_to_page(2);
        let inflight = list.query_seq;
        list.leave();
        assert!(!list.is_loading());
        let page = Page {
            items: vec![Faker.fake()],
            meta: PageMeta::default(),
        };
        assert!(!list.apply_page(inflight, page));
    }
}
