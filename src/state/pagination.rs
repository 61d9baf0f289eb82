//! Pagination - Page Slicing over the Current Row Set
//!
//! Pure and total: any page number is accepted, out-of-range pages are empty.

use std::ops::Range;

/// One page of rows plus the numbers needed to draw page controls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page<'a, T> {
    /// Rows visible on this page
    pub items: &'a [T],
    /// Requested page, 1-based, as given
    pub page: usize,
    /// `ceil(total / page_size)`, zero for an empty row set
    pub page_count: usize,
    /// Rows in the whole row set
    pub total_items: usize,
}

impl<T> Page<'_, T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1 && self.page <= self.page_count
    }

    pub fn has_next(&self) -> bool {
        self.page >= 1 && self.page < self.page_count
    }
}

/// Number of pages needed for `total` rows
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Index range of `page` inside a row set of `total` rows, empty when out of range
pub fn page_range(total: usize, page_size: usize, page: usize) -> Range<usize> {
    if page == 0 || page > page_count(total, page_size) {
        return 0..0;
    }
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total);
    start..end
}

/// Slice `rows` into the requested page
pub fn paginate<T>(rows: &[T], page_size: usize, page: usize) -> Page<'_, T> {
    let range = page_range(rows.len(), page_size, page);
    Page {
        items: &rows[range],
        page,
        page_count: page_count(rows.len(), page_size),
        total_items: rows.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: usize = 10;

    #[test]
    fn twenty_five_rows_make_three_pages() {
        let rows: Vec<usize> = (0..25).collect();

        let last = paginate(&rows, SIZE, 3);
        assert_eq!(last.page_count, 3);
        assert_eq!(last.items, &[20, 21, 22, 23, 24]);
        assert!(last.has_previous());
        assert!(!last.has_next());

        let first = paginate(&rows, SIZE, 1);
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.items[0], 0);
        assert!(!first.has_previous());
        assert!(first.has_next());
    }

    #[test]
    fn page_lengths_sum_to_total_for_any_size() {
        for n in 0..=53 {
            let rows: Vec<usize> = (0..n).collect();
            let count = page_count(n, SIZE);
            assert_eq!(count, n.div_ceil(SIZE));

            let mut seen = 0;
            for page in 1..=count {
                let slice = paginate(&rows, SIZE, page);
                if page < count {
                    assert_eq!(slice.items.len(), SIZE);
                } else {
                    assert_eq!(slice.items.len(), n - SIZE * (count - 1));
                }
                seen += slice.items.len();
            }
            assert_eq!(seen, n);
        }
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        let rows: Vec<usize> = (0..12).collect();
        assert!(paginate(&rows, SIZE, 0).is_empty());
        assert!(paginate(&rows, SIZE, 3).is_empty());
        assert!(paginate(&rows, SIZE, usize::MAX).is_empty());
        assert_eq!(paginate(&rows, SIZE, 3).page_count, 2);
    }

    #[test]
    fn empty_row_set_has_zero_pages() {
        let rows: Vec<usize> = Vec::new();
        let page = paginate(&rows, SIZE, 1);
        assert_eq!(page.page_count, 0);
        assert!(page.is_empty());
        assert!(!page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn zero_page_size_is_tolerated() {
        let rows = [1, 2, 3];
        let page = paginate(&rows, 0, 1);
        assert_eq!(page.page_count, 0);
        assert!(page.is_empty());
    }
}
