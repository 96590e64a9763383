//! Spelling suggestions
//!
//! Ranks valid options by case-sensitive Levenshtein distance to the given
//! value. Options at distance [`MAX_DISTANCE`] or more are dropped; ties keep
//! the order of `variants`.

use serde_json::Value;

/// Variants this far from the input (or further) are never suggested
pub const MAX_DISTANCE: usize = 4;

/// Suggest close matches for `given` among `variants`
///
/// Non-string input yields no suggestions.
pub fn get_suggest<S: AsRef<str>>(given: &Value, variants: &[S]) -> Vec<String> {
    match given.as_str() {
        Some(s) => suggest_str(s, variants),
        None => Vec::new(),
    }
}

/// String form of [`get_suggest`]
pub fn suggest_str<S: AsRef<str>>(given: &str, variants: &[S]) -> Vec<String> {
    let mut ranked: Vec<(usize, &str)> = variants
        .iter()
        .map(|v| v.as_ref())
        .map(|v| (strsim::levenshtein(given, v), v))
        .filter(|(distance, _)| *distance < MAX_DISTANCE)
        .collect();

    // stable: equal distances keep declaration order
    ranked.sort_by_key(|(distance, _)| *distance);
    ranked.into_iter().map(|(_, v)| v.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_case_sensitive_nearest() {
        let suggestions = get_suggest(&json!("GET"), &["get", "post"]);
        assert_eq!(suggestions, vec!["get"]);
    }

    #[test]
    fn test_ranked_by_distance() {
        let suggestions = suggest_str("tittle", &["summary", "title", "titles"]);
        assert_eq!(suggestions, vec!["title", "titles"]);
    }

    #[test]
    fn test_non_string_has_no_suggestions() {
        assert!(get_suggest(&json!(42), &["42"]).is_empty());
        assert!(suggest_str("anything", &[] as &[&str]).is_empty());
    }
}
