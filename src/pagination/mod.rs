//! Fixed-size pagination over ordered results.

/// Page size for the question listing.
pub const QUESTIONS_PER_PAGE: usize = 10;

/// Return page `page` (1-based) of `items`, `per_page` items at a time.
///
/// Pages past the end, and page 0, are empty rather than an error.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> &[T] {
    if page == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(per_page).min(items.len());
    let end = start.saturating_add(per_page).min(items.len());
    &items[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_and_last_page() {
        let items: Vec<u32> = (1..=23).collect();
        assert_eq!(paginate(&items, 1, 10), &items[0..10]);
        assert_eq!(paginate(&items, 3, 10), &[21, 22, 23]);
        assert!(paginate(&items, 4, 10).is_empty());
    }

    #[test]
    fn test_page_zero_and_huge_page_are_empty() {
        let items = [1, 2, 3];
        assert!(paginate(&items, 0, 10).is_empty());
        assert!(paginate(&items, usize::MAX, 10).is_empty());
    }

    proptest! {
        #[test]
        fn prop_page_is_the_mathematical_slice(
            items in prop::collection::vec(any::<i32>(), 0..60),
            page in 1usize..10,
        ) {
            let got = paginate(&items, page, QUESTIONS_PER_PAGE);
            prop_assert!(got.len() <= QUESTIONS_PER_PAGE);

            let expected: Vec<i32> = items
                .iter()
                .skip((page - 1) * QUESTIONS_PER_PAGE)
                .take(QUESTIONS_PER_PAGE)
                .copied()
                .collect();
            prop_assert_eq!(got, expected.as_slice());
        }
    }
}
