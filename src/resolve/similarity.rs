use similar::TextDiff;

/// Sequence-similarity ratio `2*M/T` over characters, in `0.0..=1.0`.
pub fn ratio(a: &str, b: &str) -> f32 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    TextDiff::from_chars(a, b).ratio()
}

/// Best-scoring candidate, or `None` when nothing scores above `threshold`.
/// On equal scores the earlier candidate wins.
pub fn best_match<'a, I>(queries: &[String], candidates: I, threshold: f32) -> Option<(&'a str, f32)>
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    let mut best: Option<(&'a str, f32)> = None;
    for (name, key) in candidates {
        let score = queries
            .iter()
            .map(|q| ratio(q, &key))
            .fold(0.0_f32, f32::max);
        tracing::trace!(candidate = name, score, "fuzzy score");
        if score > threshold && best.is_none_or(|(_, s)| score > s) {
            best = Some((name, score));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool<'a>(names: &[&'a str]) -> Vec<(&'a str, String)> {
        names.iter().map(|n| (*n, n.to_string())).collect()
    }

    #[test]
    fn ratio_bounds() {
        assert_eq!(ratio("mortgage", "mortgage"), 1.0);
        assert_eq!(ratio("abc", "xyz"), 0.0);
        assert_eq!(ratio("", "abc"), 0.0);
        let r = ratio("mortgag", "mortgage");
        assert!(r > 0.9 && r < 1.0, "ratio was {}", r);
    }

    #[test]
    fn best_match_respects_threshold() {
        let queries = vec!["ghost".to_string()];
        assert_eq!(best_match(&queries, pool(&["bmi", "mortgage"]), 0.6), None);

        let queries = vec!["mortgag".to_string()];
        let (name, score) = best_match(&queries, pool(&["bmi", "mortgage"]), 0.6).unwrap();
        assert_eq!(name, "mortgage");
        assert!(score > 0.6);
    }

    #[test]
    fn best_match_score_equal_to_threshold_is_rejected() {
        // "ab" vs "ac": one of two characters matches on each side -> 0.5
        let queries = vec!["ab".to_string()];
        assert_eq!(best_match(&queries, pool(&["ac"]), 0.5), None);
        assert!(best_match(&queries, pool(&["ac"]), 0.49).is_some());
    }

    #[test]
    fn ties_go_to_first_candidate() {
        let queries = vec!["roi".to_string()];
        let (name, _) = best_match(&queries, pool(&["rox", "roz"]), 0.5).unwrap();
        assert_eq!(name, "rox");
    }
}
