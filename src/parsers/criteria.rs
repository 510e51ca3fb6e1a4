// Heuristic classification of list-shaped acceptance criteria

use crate::models::AcceptanceCriteria;

/// Sort free-text clauses into Given/When/Then slots.
///
/// Some model outputs return acceptance criteria as a flat list of clauses
/// instead of a keyed object. This classifies each clause by a
/// case-insensitive substring match on "given"/"when"/"then"; the first
/// match wins per category and unmatched categories stay empty. Best
/// effort only: clauses that name none of the keywords are dropped.
pub fn classify_criteria_clauses(clauses: &[String]) -> AcceptanceCriteria {
    let mut criteria = AcceptanceCriteria::default();

    for clause in clauses {
        let lowered = clause.to_lowercase();
        if criteria.given.is_empty() && lowered.contains("given") {
            criteria.given = clause.trim().to_string();
        } else if criteria.when.is_empty() && lowered.contains("when") {
            criteria.when = clause.trim().to_string();
        } else if criteria.then.is_empty() && lowered.contains("then") {
            criteria.then = clause.trim().to_string();
        }
    }

    criteria
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_all_three_categories() {
        let clauses = vec![
            "Given the user has items in the cart".to_string(),
            "When the user opens the checkout page".to_string(),
            "Then the totals are displayed".to_string(),
        ];

        let criteria = classify_criteria_clauses(&clauses);
        assert_eq!(criteria.given, "Given the user has items in the cart");
        assert_eq!(criteria.when, "When the user opens the checkout page");
        assert_eq!(criteria.then, "Then the totals are displayed");
    }

    #[test]
    fn test_classification_is_case_insensitive() {
        let clauses = vec![
            "GIVEN a valid account".to_string(),
            "WHEN credentials are entered".to_string(),
        ];

        let criteria = classify_criteria_clauses(&clauses);
        assert_eq!(criteria.given, "GIVEN a valid account");
        assert_eq!(criteria.when, "WHEN credentials are entered");
        assert_eq!(criteria.then, "");
    }

    #[test]
    fn test_first_match_wins_per_category() {
        let clauses = vec![
            "Given state A".to_string(),
            "Given state B".to_string(),
            "Then outcome".to_string(),
        ];

        let criteria = classify_criteria_clauses(&clauses);
        assert_eq!(criteria.given, "Given state A");
        assert_eq!(criteria.then, "Then outcome");
    }

    #[test]
    fn test_unmatched_clauses_are_dropped() {
        let clauses = vec!["The page loads quickly".to_string()];
        let criteria = classify_criteria_clauses(&clauses);
        assert_eq!(criteria, AcceptanceCriteria::default());
    }

    #[test]
    fn test_empty_input_yields_empty_criteria() {
        let criteria = classify_criteria_clauses(&[]);
        assert_eq!(criteria.given, "");
        assert_eq!(criteria.when, "");
        assert_eq!(criteria.then, "");
    }
}
