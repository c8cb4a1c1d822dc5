//! Page selector layout.

/// Pages shown around the current page.
pub const PAGE_RANGE_DISPLAYED: u32 = 5;

/// Pages always shown at each end.
pub const MARGIN_PAGES_DISPLAYED: u32 = 1;

/// One slot in the page selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    /// A selectable page number.
    Page(u32),
    /// Elided run of pages.
    Gap,
}

/// Lays out the page selector for `current` of `total` pages.
///
/// Shows a window of `range` pages around `current`, plus `margin` pages at
/// each end, with a gap wherever pages are skipped.
#[must_use]
pub fn page_items(current: u32, total: u32, range: u32, margin: u32) -> Vec<PageItem> {
    if total == 0 {
        return Vec::new();
    }
    if total <= range.saturating_add(margin.saturating_mul(2)) {
        return (1..=total).map(PageItem::Page).collect();
    }

    let current = current.clamp(1, total);
    let mut start = current.saturating_sub(range / 2).max(1);
    let mut end = start.saturating_add(range.saturating_sub(1));
    if end > total {
        end = total;
        start = total.saturating_sub(range.saturating_sub(1)).max(1);
    }

    let head_end = margin;
    let tail_start = total.saturating_sub(margin).saturating_add(1);

    let mut items = Vec::new();
    let mut last_shown = 0u32;
    let mut push = |page: u32, items: &mut Vec<PageItem>| {
        if page <= last_shown {
            return;
        }
        if last_shown != 0 && page > last_shown.saturating_add(1) {
            items.push(PageItem::Gap);
        }
        items.push(PageItem::Page(page));
        last_shown = page;
    };

    for page in 1..=head_end {
        push(page, &mut items);
    }
    for page in start..=end {
        push(page, &mut items);
    }
    for page in tail_start..=total {
        push(page, &mut items);
    }
    items
}
