//! Two-phase date-range selection for the list filters.
//!
//! The picker edits a pending range without touching the applied filters;
//! nothing reaches the query until the user confirms. Misordered input is
//! self-corrected by swapping the bounds instead of being rejected.

use chrono::NaiveDate;

/// An optionally-bounded inclusive date range.
///
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Returns a range over the given bounds.
    ///
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> DateRange {
        DateRange { start, end }
    }

    /// True when neither bound is set.
    ///
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Returns the range with its bounds swapped into order when both are
    /// present and misordered.
    ///
    pub fn normalized(self) -> DateRange {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start > end => DateRange {
                start: Some(end),
                end: Some(start),
            },
            _ => self,
        }
    }
}

/// How a calendar cell relates to the highlighted range.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DayMark {
    First,
    Last,
    InRange,
    Unmarked,
}

/// Classifies a candidate day against a possibly partial, possibly unordered
/// range. The bound checks match the raw bounds; the interior check uses the
/// min/max-normalized pair so a transiently reversed range still highlights
/// correctly. With a single bound only exact matches mark.
///
pub fn classify_day(day: NaiveDate, range: DateRange) -> DayMark {
    if range.start == Some(day) {
        return DayMark::First;
    }
    if range.end == Some(day) {
        return DayMark::Last;
    }
    if let (Some(start), Some(end)) = (range.start, range.end) {
        let (low, high) = if start <= end { (start, end) } else { (end, start) };
        if low < day && day < high {
            return DayMark::InRange;
        }
    }
    DayMark::Unmarked
}

/// Specifying the picker phases.
///
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum RangePhase {
    #[default]
    Idle,
    PickingStart,
    PickingEnd,
}

/// Transient picker state for editing the list's date-range filter.
///
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct DateRangeSelection {
    committed: DateRange,
    pending: DateRange,
    phase: RangePhase,
}

impl DateRangeSelection {
    /// Returns the current picker phase.
    ///
    pub fn phase(&self) -> RangePhase {
        self.phase
    }

    /// Returns the range being edited.
    ///
    pub fn pending(&self) -> DateRange {
        self.pending
    }

    /// Returns the last applied range.
    ///
    pub fn committed(&self) -> DateRange {
        self.committed
    }

    /// True while the picker is open.
    ///
    pub fn is_open(&self) -> bool {
        self.phase != RangePhase::Idle
    }

    /// Opens the picker, seeding the pending range from the last applied one.
    /// Picking resumes at the end bound when a start already exists.
    ///
    pub fn open(&mut self) {
        self.pending = self.committed;
        self.phase = if self.committed.start.is_none() {
            RangePhase::PickingStart
        } else {
            RangePhase::PickingEnd
        };
    }

    /// Applies one tapped day according to the current phase.
    ///
    pub fn select(&mut self, day: NaiveDate) {
        match self.phase {
            RangePhase::Idle => {}
            RangePhase::PickingStart => {
                self.pending.start = Some(day);
                if self.pending.end.map_or(false, |end| end < day) {
                    self.pending.end = None;
                }
                self.phase = RangePhase::PickingEnd;
            }
            RangePhase::PickingEnd => match self.pending.start {
                Some(start) if day > start => {
                    self.pending.end = Some(day);
                    self.phase = RangePhase::PickingStart;
                }
                Some(start) => {
                    // On-or-before the start: swap instead of rejecting.
                    self.pending.start = Some(day);
                    self.pending.end = Some(start);
                    self.phase = RangePhase::PickingStart;
                }
                None => {
                    self.pending.start = Some(day);
                }
            },
        }
    }

    /// Commits the pending range, swapping misordered bounds first, and
    /// returns the applied range.
    ///
    pub fn apply(&mut self) -> DateRange {
        self.committed = self.pending.normalized();
        self.pending = self.committed;
        self.phase = RangePhase::Idle;
        self.committed
    }

    /// Abandons the pending edits and reverts to the last applied range.
    ///
    pub fn cancel(&mut self) {
        self.pending = self.committed;
        self.phase = RangePhase::Idle;
    }

    /// Clears both bounds and applies immediately, bypassing the two-phase
    /// flow. Returns the (empty) applied range.
    ///
    pub fn clear(&mut self) -> DateRange {
        self.committed = DateRange::default();
        self.pending = self.committed;
        self.phase = RangePhase::Idle;
        self.committed
    }

    /// Resynchronizes the applied range when the filters change it from
    /// outside the picker (chip removal, the search exclusivity rule).
    ///
    pub(crate) fn set_committed(&mut self, range: DateRange) {
        self.committed = range.normalized();
        if !self.is_open() {
            self.pending = self.committed;
        }
    }

    /// Classification of one calendar cell against whichever range is
    /// currently visible: the pending edit while open, else the applied one.
    ///
    pub fn day_mark(&self, day: NaiveDate) -> DayMark {
        let range = if self.is_open() {
            self.pending
        } else {
            self.committed
        };
        classify_day(day, range)
    }
}
