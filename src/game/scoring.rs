use std::collections::HashMap;

use crate::protocol::{Category, CategoryScore, PlayerId};

use super::constants::{DUPLICATE_ANSWER_POINTS, UNIQUE_ANSWER_POINTS};

/// Normalization applied to answers before comparison: trim, then lowercase.
pub fn normalize_answer(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Deterministic scoring pass over every player's submitted answers.
///
/// Per (player, category): an empty answer or one that does not start with
/// the round's letter scores 0 and is invalid; a valid answer scores 20,
/// reduced to 10 when any other player gave the identical normalized
/// answer. Three or more identical answers still score 10 each.
pub fn score_round(
    submissions: &[(PlayerId, HashMap<String, String>)],
    categories: &[Category],
    letter: char,
) -> HashMap<PlayerId, HashMap<String, CategoryScore>> {
    let letter_lc: String = letter.to_lowercase().collect();

    let mut scores: HashMap<PlayerId, HashMap<String, CategoryScore>> = submissions
        .iter()
        .map(|(player_id, _)| (*player_id, HashMap::new()))
        .collect();

    for category in categories {
        // How many players gave each normalized answer in this category.
        let mut counts: HashMap<String, usize> = HashMap::new();
        for (_, answers) in submissions {
            let normalized = normalize_answer(answers.get(&category.key).map_or("", String::as_str));
            if !normalized.is_empty() {
                *counts.entry(normalized).or_insert(0) += 1;
            }
        }

        for (player_id, answers) in submissions {
            let raw = answers.get(&category.key).cloned().unwrap_or_default();
            let normalized = normalize_answer(&raw);

            let (points, is_valid) = if normalized.is_empty() || !normalized.starts_with(&letter_lc)
            {
                (0, false)
            } else if counts.get(&normalized).copied().unwrap_or(0) >= 2 {
                (DUPLICATE_ANSWER_POINTS, true)
            } else {
                (UNIQUE_ANSWER_POINTS, true)
            };

            if let Some(player_scores) = scores.get_mut(player_id) {
                player_scores.insert(
                    category.key.clone(),
                    CategoryScore {
                        points,
                        is_valid,
                        answer: raw,
                        invalidated_by: None,
                    },
                );
            }
        }
    }

    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn categories(keys: &[&str]) -> Vec<Category> {
        keys.iter()
            .map(|k| Category {
                key: (*k).to_string(),
                name: (*k).to_string(),
            })
            .collect()
    }

    fn submission(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn unique_valid_answers_score_twenty() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let submissions = vec![
            (a, submission(&[("cat_0", "ამერიკა")])),
            (b, submission(&[("cat_0", "ამსტერდამი")])),
        ];
        let scores = score_round(&submissions, &categories(&["cat_0"]), 'ა');

        assert_eq!(scores[&a]["cat_0"].points, 20);
        assert!(scores[&a]["cat_0"].is_valid);
        assert_eq!(scores[&b]["cat_0"].points, 20);
    }

    #[test]
    fn three_identical_answers_score_ten_each() {
        let players: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        let submissions: Vec<_> = players
            .iter()
            .map(|p| (*p, submission(&[("cat_0", "ბაქო")])))
            .collect();
        let scores = score_round(&submissions, &categories(&["cat_0"]), 'ბ');

        for player in &players {
            assert_eq!(scores[player]["cat_0"].points, 10);
            assert!(scores[player]["cat_0"].is_valid);
        }
    }

    #[test]
    fn wrong_first_letter_scores_zero_and_invalid() {
        let a = Uuid::new_v4();
        let submissions = vec![(a, submission(&[("cat_0", "თბილისი")]))];
        let scores = score_round(&submissions, &categories(&["cat_0"]), 'ა');

        assert_eq!(scores[&a]["cat_0"].points, 0);
        assert!(!scores[&a]["cat_0"].is_valid);
        assert_eq!(scores[&a]["cat_0"].answer, "თბილისი");
    }

    #[test]
    fn missing_and_empty_answers_are_invalid() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let submissions = vec![
            (a, submission(&[("cat_0", "   ")])),
            (b, HashMap::new()),
        ];
        let scores = score_round(&submissions, &categories(&["cat_0"]), 'ა');

        assert_eq!(scores[&a]["cat_0"].points, 0);
        assert_eq!(scores[&b]["cat_0"].points, 0);
        assert_eq!(scores[&b]["cat_0"].answer, "");
    }

    #[test]
    fn duplicate_detection_uses_normalized_answers() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let submissions = vec![
            (a, submission(&[("cat_0", "  Paris ")])),
            (b, submission(&[("cat_0", "paris")])),
        ];
        let scores = score_round(&submissions, &categories(&["cat_0"]), 'p');

        assert_eq!(scores[&a]["cat_0"].points, 10);
        assert_eq!(scores[&b]["cat_0"].points, 10);
        assert_eq!(scores[&a]["cat_0"].answer, "  Paris ", "raw answer is preserved");
    }

    #[test]
    fn categories_are_scored_independently() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let submissions = vec![
            (a, submission(&[("cat_0", "ბაქო"), ("cat_1", "ბათუმი")])),
            (b, submission(&[("cat_0", "ბაქო"), ("cat_1", "ბერლინი")])),
        ];
        let scores = score_round(&submissions, &categories(&["cat_0", "cat_1"]), 'ბ');

        assert_eq!(scores[&a]["cat_0"].points, 10);
        assert_eq!(scores[&a]["cat_1"].points, 20);
        assert_eq!(scores[&b]["cat_1"].points, 20);
    }
}
