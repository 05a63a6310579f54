use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

pub fn format_magnitude(value: f32) -> String {
    if value.fract().abs() < 1e-4 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_owned()
    }
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Best fuzzy candidate for a token the caller failed to recognise.
///
/// Only used to build "did you mean" hints; callers never substitute the
/// suggestion for the original token.
pub fn closest_token(candidates: &[&'static str], query: &str) -> Option<&'static str> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }

    let matcher = SkimMatcherV2::default();
    let fuzzy = candidates
        .iter()
        .filter_map(|candidate| {
            fuzzy_match_score(&matcher, candidate, query).map(|score| (score, *candidate))
        })
        .max_by_key(|(score, _)| *score)
        .map(|(_, candidate)| candidate);

    fuzzy.or_else(|| {
        let first = query.chars().next()?.to_ascii_lowercase();
        candidates
            .iter()
            .find(|candidate| {
                candidate
                    .chars()
                    .next()
                    .is_some_and(|c| c.to_ascii_lowercase() == first)
            })
            .copied()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitudes_drop_redundant_decimals() {
        assert_eq!(format_magnitude(30.0), "30");
        assert_eq!(format_magnitude(12.5), "12.5");
        assert_eq!(format_magnitude(1.0 / 3.0), "0.33");
    }

    #[test]
    fn suggests_close_candidates() {
        let candidates = ["Up", "Down", "Left", "Right"];
        assert_eq!(closest_token(&candidates, "rght"), Some("Right"));
        assert_eq!(closest_token(&candidates, "lft"), Some("Left"));
        assert_eq!(closest_token(&candidates, ""), None);
    }
}
