//! Page window construction for pagination controls.
//!
//! An arbitrary page count is compressed into a bounded sequence of page
//! numbers with elided gaps, so the controls stay the same width no matter
//! how many pages the backend reports.

/// Page counts up to this render in full, without elision.
const FULL_WINDOW_MAX: usize = 10;

/// Pages kept on each side of the current page inside the middle block.
const BLOCK_RADIUS: usize = 2;

/// Builds the abbreviated page sequence for pagination controls.
///
/// Entries are page numbers; `None` marks an elided gap. When the page count
/// exceeds [`FULL_WINDOW_MAX`], the first and last pages always appear and a
/// contiguous block of radius [`BLOCK_RADIUS`] surrounds the current page,
/// clamped to the interior pages. An out-of-range current page is clamped
/// rather than rejected.
///
pub fn window(current_page: usize, last_page: usize) -> Vec<Option<usize>> {
    if last_page == 0 {
        return vec![];
    }
    let current_page = current_page.clamp(1, last_page);

    if last_page <= FULL_WINDOW_MAX {
        return (1..=last_page).map(Some).collect();
    }

    let block_start = current_page.saturating_sub(BLOCK_RADIUS).max(2);
    let block_end = (current_page + BLOCK_RADIUS).min(last_page - 1);

    let mut pages = Vec::with_capacity(block_end - block_start + 5);
    pages.push(Some(1));
    if block_start > 2 {
        pages.push(None);
    }
    pages.extend((block_start..=block_end).map(Some));
    if block_end < last_page - 1 {
        pages.push(None);
    }
    pages.push(Some(last_page));
    pages
}
