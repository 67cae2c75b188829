//! Filter, sort and paginate a [`RecordTable`] for display

use std::cmp::Ordering;

use crate::dashboards::{Cell, RecordTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

/// View settings for one table. Kept per section so switching tabs does
/// not lose the filter or page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingState {
    pub filter: String,
    pub sort_column: Option<usize>,
    pub direction: SortDirection,
    pub page: usize,
    pub page_size: usize,
}

/// Result of applying a [`ListingState`] to a table
#[derive(Debug, Clone, PartialEq)]
pub struct ListingView<'a> {
    pub rows: Vec<&'a [Cell]>,
    /// Rows matching the filter across all pages
    pub matches: usize,
    /// Zero-based page actually shown after clamping
    pub page: usize,
    pub page_count: usize,
}

impl Default for ListingState {
    fn default() -> Self {
        Self::new(8)
    }
}

impl ListingState {
    pub fn new(page_size: usize) -> Self {
        Self {
            filter: String::new(),
            sort_column: None,
            direction: SortDirection::default(),
            page: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
        self.page = 0;
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter.push(c);
        self.page = 0;
    }

    pub fn pop_filter_char(&mut self) {
        self.filter.pop();
        self.page = 0;
    }

    /// Step the sort column: unsorted, then each column in turn, then unsorted again
    pub fn cycle_sort(&mut self, columns: usize) {
        self.sort_column = match self.sort_column {
            _ if columns == 0 => None,
            None => Some(0),
            Some(column) if column + 1 < columns => Some(column + 1),
            Some(_) => None,
        };
        self.direction = SortDirection::Ascending;
    }

    pub fn toggle_direction(&mut self) {
        self.direction = self.direction.toggled();
    }

    pub fn next_page(&mut self, table: &RecordTable) {
        let last = self.page_count(self.matching(table).len()) - 1;
        self.page = (self.page + 1).min(last);
    }

    pub fn previous_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    fn page_count(&self, matches: usize) -> usize {
        matches.div_ceil(self.page_size).max(1)
    }

    fn matching<'a>(&self, table: &'a RecordTable) -> Vec<&'a [Cell]> {
        let needle = self.filter.trim().to_lowercase();
        table
            .rows
            .iter()
            .map(Vec::as_slice)
            .filter(|row| {
                needle.is_empty()
                    || row
                        .iter()
                        .any(|cell| cell.display().to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub fn apply<'a>(&self, table: &'a RecordTable) -> ListingView<'a> {
        let mut rows = self.matching(table);

        if let Some(column) = self.sort_column.filter(|column| *column < table.columns.len()) {
            rows.sort_by(|a, b| {
                let ordering = match (a.get(column), b.get(column)) {
                    (Some(a), Some(b)) => a.compare(b),
                    _ => Ordering::Equal,
                };
                match self.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        let matches = rows.len();
        let page_count = self.page_count(matches);
        let page = self.page.min(page_count - 1);
        let rows = rows
            .into_iter()
            .skip(page * self.page_size)
            .take(self.page_size)
            .collect();

        ListingView {
            rows,
            matches,
            page,
            page_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RecordTable {
        RecordTable::new(["Vendor", "Amount"])
            .row(vec![Cell::text("Contoso"), Cell::money(900)])
            .row(vec![Cell::text("northwind"), Cell::money(10_000)])
            .row(vec![Cell::text("Fabrikam"), Cell::Currency(None)])
            .row(vec![Cell::text("Contoso Cloud"), Cell::money(-50)])
            .row(vec![Cell::text("Litware"), Cell::money(200)])
    }

    fn vendors(view: &ListingView<'_>) -> Vec<String> {
        view.rows.iter().map(|row| row[0].display()).collect()
    }

    #[test]
    fn filter_is_case_insensitive_and_resets_page() {
        let table = table();
        let mut state = ListingState::new(2);
        state.page = 2;
        state.set_filter("CONTOSO");

        let view = state.apply(&table);
        assert_eq!(state.page, 0);
        assert_eq!(view.matches, 2);
        assert_eq!(vendors(&view), ["Contoso", "Contoso Cloud"]);
    }

    #[test]
    fn filter_matches_formatted_values() {
        let table = table();
        let mut state = ListingState::new(10);
        state.set_filter("$100.00");
        assert_eq!(vendors(&state.apply(&table)), ["northwind"]);
    }

    #[test]
    fn amounts_sort_numerically_with_missing_last() {
        let table = table();
        let mut state = ListingState::new(10);
        state.cycle_sort(2);
        state.cycle_sort(2);
        assert_eq!(state.sort_column, Some(1));

        let view = state.apply(&table);
        assert_eq!(
            vendors(&view),
            ["Contoso Cloud", "Litware", "Contoso", "northwind", "Fabrikam"]
        );

        state.toggle_direction();
        assert_eq!(vendors(&state.apply(&table))[0], "Fabrikam");
    }

    #[test]
    fn sort_cycle_returns_to_unsorted() {
        let mut state = ListingState::new(10);
        state.cycle_sort(2);
        state.toggle_direction();
        state.cycle_sort(2);
        assert_eq!(state.direction, SortDirection::Ascending);
        state.cycle_sort(2);
        assert_eq!(state.sort_column, None);
        state.cycle_sort(0);
        assert_eq!(state.sort_column, None);
    }

    #[test]
    fn pages_are_clamped() {
        let table = table();
        let mut state = ListingState::new(2);

        let view = state.apply(&table);
        assert_eq!((view.page, view.page_count, view.rows.len()), (0, 3, 2));

        state.next_page(&table);
        state.next_page(&table);
        state.next_page(&table);
        assert_eq!(state.page, 2);
        assert_eq!(state.apply(&table).rows.len(), 1);

        state.set_filter("litware");
        state.page = 7;
        let view = state.apply(&table);
        assert_eq!((view.page, view.page_count), (0, 1));

        state.set_filter("no such vendor");
        let view = state.apply(&table);
        assert_eq!((view.matches, view.page_count), (0, 1));
        assert!(view.rows.is_empty());

        state.previous_page();
        assert_eq!(state.page, 0);
    }

    #[test]
    fn zero_page_size_is_raised_to_one() {
        assert_eq!(ListingState::new(0).page_size, 1);
    }
}
