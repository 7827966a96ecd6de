//! Quiz question selection.
//!
//! The service keeps no quiz state: the client sends back every id it has
//! already been served and gets one random unseen question, or none.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::Question;

/// Category id meaning "no category filter".
pub const ALL_CATEGORIES: i64 = 0;

/// Questions eligible for the next round.
pub fn candidates<'a>(
    questions: &'a [Question],
    category_id: i64,
    previous_ids: &HashSet<i64>,
) -> Vec<&'a Question> {
    questions
        .iter()
        .filter(|q| category_id == ALL_CATEGORIES || q.category == category_id)
        .filter(|q| !previous_ids.contains(&q.id))
        .collect()
}

/// Pick one unseen question uniformly at random, or `None` once the candidate set is exhausted.
pub fn next_question<'a, R: Rng + ?Sized>(
    questions: &'a [Question],
    category_id: i64,
    previous_ids: &HashSet<i64>,
    rng: &mut R,
) -> Option<&'a Question> {
    candidates(questions, category_id, previous_ids)
        .choose(rng)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn question(id: i64, category: i64) -> Question {
        Question {
            id,
            question: format!("Question {}", id),
            answer: format!("Answer {}", id),
            category,
            difficulty: 1,
        }
    }

    fn fixture() -> Vec<Question> {
        vec![
            question(16, 2),
            question(17, 2),
            question(18, 2),
            question(19, 2),
            question(20, 1),
            question(21, 1),
        ]
    }

    #[test]
    fn test_category_filter() {
        let questions = fixture();
        let mut rng = StdRng::seed_from_u64(7);
        let previous: HashSet<i64> = [16, 17].into_iter().collect();

        for _ in 0..50 {
            let q = next_question(&questions, 2, &previous, &mut rng).unwrap();
            assert_eq!(q.category, 2);
            assert!(q.id == 18 || q.id == 19);
        }
    }

    #[test]
    fn test_all_categories_sentinel() {
        let questions = fixture();
        let previous = HashSet::new();
        assert_eq!(
            candidates(&questions, ALL_CATEGORIES, &previous).len(),
            questions.len()
        );
    }

    #[test]
    fn test_exhausted_category() {
        let questions = fixture();
        let mut rng = StdRng::seed_from_u64(1);
        let previous: HashSet<i64> = [16, 17, 18, 19].into_iter().collect();
        assert!(next_question(&questions, 2, &previous, &mut rng).is_none());
        assert!(next_question(&questions, ALL_CATEGORIES, &previous, &mut rng).is_some());
    }

    #[test]
    fn test_unknown_category_is_exhausted() {
        let questions = fixture();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(next_question(&questions, 99, &HashSet::new(), &mut rng).is_none());
    }

    #[test]
    fn test_every_candidate_is_reachable() {
        let questions = fixture();
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = HashSet::new();
        for _ in 0..500 {
            if let Some(q) = next_question(&questions, ALL_CATEGORIES, &HashSet::new(), &mut rng) {
                seen.insert(q.id);
            }
        }
        assert_eq!(seen.len(), questions.len());
    }

    proptest! {
        #[test]
        fn prop_never_repeats_and_none_iff_exhausted(
            categories in prop::collection::vec(1i64..4, 0..30),
            previous in prop::collection::hash_set(0i64..30, 0..30),
            category_id in 0i64..4,
            seed in any::<u64>(),
        ) {
            let questions: Vec<Question> = categories
                .iter()
                .enumerate()
                .map(|(i, c)| question(i as i64, *c))
                .collect();
            let mut rng = StdRng::seed_from_u64(seed);

            let picked = next_question(&questions, category_id, &previous, &mut rng);
            let pool = candidates(&questions, category_id, &previous);

            match picked {
                Some(q) => {
                    prop_assert!(!previous.contains(&q.id));
                    prop_assert!(category_id == ALL_CATEGORIES || q.category == category_id);
                }
                None => prop_assert!(pool.is_empty()),
            }
            prop_assert_eq!(picked.is_none(), pool.is_empty());
        }
    }
}
