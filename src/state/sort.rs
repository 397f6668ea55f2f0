//! Column sort state for the prospect list.

/// Specifying the sortable columns of the prospect table.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SortColumn {
    Name,
    Company,
    Status,
    NextContact,
    CreatedAt,
}

impl SortColumn {
    /// Wire name of the column in sort query parameters.
    ///
    pub fn field_name(self) -> &'static str {
        match self {
            SortColumn::Name => "name",
            SortColumn::Company => "company",
            SortColumn::Status => "status",
            SortColumn::NextContact => "nextContact",
            SortColumn::CreatedAt => "createdAt",
        }
    }
}

/// Specifying the sort directions.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// An active sort: a column together with its direction.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ColumnSort {
    pub column: SortColumn,
    pub direction: SortDirection,
}

/// Tri-state sort cycling over the table columns. At most one column is
/// active at a time; the unsorted state is the absence of an active column.
///
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct SortState {
    active: Option<ColumnSort>,
}

impl SortState {
    /// Returns the active sort, if any.
    ///
    pub fn active(&self) -> Option<ColumnSort> {
        self.active
    }

    /// Advances the cycle for the given column and returns the new state.
    ///
    /// A different column starts ascending; repeating the same column moves
    /// ascending to descending, then back to unsorted.
    ///
    pub fn toggle(&mut self, column: SortColumn) -> Option<ColumnSort> {
        self.active = match self.active {
            Some(active) if active.column == column => match active.direction {
                SortDirection::Ascending => Some(ColumnSort {
                    column,
                    direction: SortDirection::Descending,
                }),
                SortDirection::Descending => None,
            },
            _ => Some(ColumnSort {
                column,
                direction: SortDirection::Ascending,
            }),
        };
        self.active
    }

    /// Returns to the unsorted state.
    ///
    pub fn clear(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_column_starts_ascending() {
        let mut sort = SortState::default();
        let active = sort.toggle(SortColumn::Name).unwrap();
        assert_eq!(active.column, SortColumn::Name);
        assert_eq!(active.direction, SortDirection::Ascending);
    }

    #[test]
    fn same_column_cycles_to_descending_then_off() {
        let mut sort = SortState::default();
        sort.toggle(SortColumn::Company);
        let active = sort.toggle(SortColumn::Company).unwrap();
        assert_eq!(active.direction, SortDirection::Descending);
        assert_eq!(sort.toggle(SortColumn::Company), None);
        assert_eq!(sort.active(), None);
    }

    #[test]
    fn switching_column_restarts_ascending() {
        let mut sort = SortState::default();
        sort.toggle(SortColumn::Name);
        sort.toggle(SortColumn::Name);
        let active = sort.toggle(SortColumn::CreatedAt).unwrap();
        assert_eq!(active.column, SortColumn::CreatedAt);
        assert_eq!(active.direction, SortDirection::Ascending);
    }

    #[test]
    fn clear_drops_the_active_column() {
        let mut sort = SortState::default();
        sort.toggle(SortColumn::Status);
        sort.clear();
        assert_eq!(sort.active(), None);
    }
}
