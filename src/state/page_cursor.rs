//! Pagination math and the next-tile selection algorithm.

use serde::{Deserialize, Serialize};

use crate::model::TileKey;

/// Paging state reported by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageInfo {
    /// Tiles per page
    pub page_size: usize,
    /// Number of pages for the currently shown tiles
    pub page_count: usize,
    /// Number of currently shown tiles
    pub record_count: usize,
}

impl PageInfo {
    /// Paging for `record_count` tiles split into pages of `page_size`.
    pub fn for_records(page_size: usize, record_count: usize) -> Self {
        let page_count = if page_size == 0 {
            0
        } else {
            record_count.div_ceil(page_size)
        };
        Self {
            page_size,
            page_count,
            record_count,
        }
    }

    /// Page and in-page offset of an eligible position.
    ///
    /// A page past the last one wraps to page 0. Returns `None` when the
    /// position does not fit on the wrapped page either.
    pub fn locate(&self, position: usize) -> Option<CellAddress> {
        if self.page_size == 0 {
            return None;
        }
        let mut page = position / self.page_size;
        if page >= self.page_count {
            page = 0;
        }
        let offset = position - page * self.page_size;
        (offset < self.page_size).then_some(CellAddress {
            position,
            page,
            offset,
        })
    }
}

/// Where a tile sits in the paged grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellAddress {
    /// Position in the eligible sequence
    pub position: usize,
    /// Page number
    pub page: usize,
    /// Offset within the page
    pub offset: usize,
}

/// Flags that change how the next position is picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdvanceMode {
    /// The view was just opened and nothing was labeled in this call
    pub initializing: bool,
    /// The unlabeled-only filter is active
    pub unlabeled_only: bool,
}

/// Pick the eligible position to select after labeling.
///
/// Batch labeling continues past the furthest labeled tile. The last
/// position wraps to the first, and with the unlabeled-only filter active
/// the first remaining tile is always next, since labeled tiles drop out.
pub fn next_position(last_positions: &[usize], eligible_len: usize, mode: AdvanceMode) -> Option<usize> {
    if eligible_len == 0 {
        return None;
    }
    if mode.unlabeled_only || mode.initializing {
        return Some(0);
    }
    let next = match last_positions.iter().max() {
        Some(&p) if p + 1 < eligible_len => p + 1,
        _ => 0,
    };
    Some(next)
}

/// A selection that waits for its page to be drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSelection {
    /// Key that was selected
    pub key: TileKey,
    /// Cell to click once the page is shown
    pub address: CellAddress,
}

/// What the engine has to do to show a selected cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorStep {
    /// The cell is on the shown page; click it now
    SelectNow(CellAddress),
    /// Navigate first; the click is deferred until the page is drawn
    Navigate(usize),
}

/// Tracks the saved page and a deferred cell selection.
#[derive(Debug, Clone, Default)]
pub struct PageCursor {
    current_page: usize,
    pending: Option<PendingSelection>,
}

impl PageCursor {
    /// Create a cursor on `page`.
    pub fn new(page: usize) -> Self {
        Self {
            current_page: page,
            pending: None,
        }
    }

    /// The page the session is on.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Record the page the renderer is on.
    pub fn set_current_page(&mut self, page: usize) {
        self.current_page = page;
    }

    /// Decide how to reach `address`, deferring the click when a page
    /// change is needed. A new plan replaces any older pending selection.
    pub fn plan(&mut self, key: &str, address: CellAddress, shown_page: usize) -> CursorStep {
        self.pending = None;
        if address.page == shown_page {
            return CursorStep::SelectNow(address);
        }
        self.pending = Some(PendingSelection {
            key: key.to_string(),
            address,
        });
        self.current_page = address.page;
        CursorStep::Navigate(address.page)
    }

    /// Check if a selection is waiting for a page draw.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending selection if its page is the one now shown.
    pub fn take_pending_for(&mut self, shown_page: usize) -> Option<PendingSelection> {
        if self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.address.page == shown_page)
        {
            self.pending.take()
        } else {
            None
        }
    }

    /// Drop the pending selection.
    pub fn cancel_pending(&mut self) -> Option<PendingSelection> {
        self.pending.take()
    }

    /// Page before the current one, staying on the first page.
    pub fn previous_page(&self) -> usize {
        self.current_page.saturating_sub(1)
    }

    /// Page after the current one, staying on the last page.
    pub fn next_page(&self, info: &PageInfo) -> usize {
        let last = info.page_count.saturating_sub(1);
        (self.current_page + 1).min(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_after_furthest() {
        let mode = AdvanceMode::default();
        assert_eq!(next_position(&[0, 3, 1], 10, mode), Some(4));
    }

    #[test]
    fn test_wraps_after_last() {
        let mode = AdvanceMode::default();
        assert_eq!(next_position(&[4], 5, mode), Some(0));
    }

    #[test]
    fn test_initializing_and_unlabeled_only_start_at_zero() {
        let init = AdvanceMode {
            initializing: true,
            ..Default::default()
        };
        assert_eq!(next_position(&[2], 10, init), Some(0));
        let unlabeled = AdvanceMode {
            unlabeled_only: true,
            ..Default::default()
        };
        assert_eq!(next_position(&[2], 10, unlabeled), Some(0));
    }

    #[test]
    fn test_empty_sequence() {
        assert_eq!(next_position(&[0], 0, AdvanceMode::default()), None);
    }

    #[test]
    fn test_locate() {
        let info = PageInfo::for_records(3, 7);
        assert_eq!(info.page_count, 3);
        let address = info.locate(4).unwrap();
        assert_eq!((address.page, address.offset), (1, 1));
        let address = info.locate(6).unwrap();
        assert_eq!((address.page, address.offset), (2, 0));
        assert!(PageInfo::for_records(0, 7).locate(1).is_none());
    }

    #[test]
    fn test_locate_never_leaves_the_page() {
        let info = PageInfo {
            page_size: 2,
            page_count: 1,
            record_count: 2,
        };
        assert!(info.locate(3).is_none());

        // Nothing drawn yet: the first page still takes the first cells.
        let empty = PageInfo::for_records(4, 0);
        let address = empty.locate(2).unwrap();
        assert_eq!((address.page, address.offset), (0, 2));
        assert!(empty.locate(5).is_none());
    }

    #[test]
    fn test_plan_defers_across_pages() {
        let mut cursor = PageCursor::new(0);
        let info = PageInfo::for_records(2, 6);
        let address = info.locate(3).unwrap();
        assert_eq!(cursor.plan("d", address, 0), CursorStep::Navigate(1));
        assert!(cursor.has_pending());
        assert_eq!(cursor.current_page(), 1);
        assert!(cursor.take_pending_for(0).is_none());
        let pending = cursor.take_pending_for(1).unwrap();
        assert_eq!(pending.key, "d");
        assert!(!cursor.has_pending());
    }

    #[test]
    fn test_plan_same_page() {
        let mut cursor = PageCursor::new(1);
        let info = PageInfo::for_records(2, 6);
        let address = info.locate(2).unwrap();
        assert_eq!(cursor.plan("c", address, 1), CursorStep::SelectNow(address));
        assert!(!cursor.has_pending());
    }

    #[test]
    fn test_page_steps_are_clamped() {
        let info = PageInfo::for_records(1, 3);
        let cursor = PageCursor::new(0);
        assert_eq!(cursor.previous_page(), 0);
        assert_eq!(cursor.next_page(&info), 1);
        let cursor = PageCursor::new(2);
        assert_eq!(cursor.next_page(&info), 2);
    }
}
