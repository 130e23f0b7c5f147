//! Page slicing.

/// Number of pages needed for `total` items; zero when there are none.
pub fn total_pages(total: usize, page_size: u32) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size as usize)
}

/// `[start, end)` indices of `page` (1-indexed), clamped to `len`.
///
/// A start beyond the end yields an empty range rather than an error.
pub fn page_bounds(len: usize, page: u32, page_size: u32) -> (usize, usize) {
    let start = (page.saturating_sub(1) as usize)
        .saturating_mul(page_size as usize)
        .min(len);
    let end = start.saturating_add(page_size as usize).min(len);
    (start, end)
}

/// Clone out the items of one page.
pub fn paginate<T: Clone>(items: &[T], page: u32, page_size: u32) -> Vec<T> {
    let (start, end) = page_bounds(items.len(), page, page_size);
    items.get(start..end).map(<[T]>::to_vec).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(3, 2), 2);
    }

    #[test]
    fn test_second_page_of_three() {
        assert_eq!(paginate(&[1, 2, 3], 2, 2), vec![3]);
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        assert!(paginate(&[1, 2, 3], 5, 2).is_empty());
        assert_eq!(page_bounds(3, 5, 2), (3, 3));
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        assert!(paginate(&[1, 2, 3], u32::MAX, u32::MAX).is_empty());
    }
}
