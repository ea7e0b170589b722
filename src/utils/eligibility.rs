//! Batch-range eligibility gate.
//!
//! Postings carry free-text batch tokens like `"2023-2027"`, typed by admins
//! and occasionally pasted with en/em dashes. A student's own range is derived
//! from the profile's batch years and compared after normalization.

/// Dash variants seen in pasted eligibility tokens.
const DASHES: [char; 7] = [
    '\u{2010}', '\u{2011}', '\u{2012}', '\u{2013}', '\u{2014}', '\u{2015}', '\u{2212}',
];

pub fn normalize_token(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| if DASHES.contains(&c) { '-' } else { c })
        .collect()
}

/// Canonical batch string for a student. A 3-year span is a lateral entry
/// (joined in second year), so the advertised range starts one year earlier.
pub fn derived_batch(batch_start: i32, batch_end: i32) -> String {
    if batch_end - batch_start == 3 {
        format!("{}-{}", batch_start - 1, batch_end)
    } else {
        format!("{}-{}", batch_start, batch_end)
    }
}

/// An empty token set means the posting carries no batch restriction and
/// everyone is eligible. With restrictions present, a profile without batch
/// years cannot prove membership and is rejected.
pub fn is_eligible(
    batch_start: Option<i32>,
    batch_end: Option<i32>,
    eligibility_tokens: &[String],
) -> bool {
    let tokens: Vec<String> = eligibility_tokens
        .iter()
        .map(|t| normalize_token(t))
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.is_empty() {
        return true;
    }

    let (Some(start), Some(end)) = (batch_start, batch_end) else {
        return false;
    };

    let own = derived_batch(start, end);
    tokens.iter().any(|t| *t == own)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_span() {
        assert!(is_eligible(Some(2022), Some(2026), &["2022-2026".into()]));
    }

    #[test]
    fn non_matching_span() {
        assert!(!is_eligible(Some(2022), Some(2025), &["2022-2026".into()]));
    }

    #[test]
    fn lateral_entry_shifts_start_back() {
        assert_eq!(derived_batch(2023, 2026), "2022-2026");
        assert!(is_eligible(Some(2023), Some(2026), &["2022-2026".into()]));
    }

    #[test]
    fn four_year_span_unchanged() {
        assert_eq!(derived_batch(2023, 2027), "2023-2027");
    }

    #[test]
    fn en_dash_and_whitespace_in_tokens() {
        assert!(is_eligible(
            Some(2022),
            Some(2026),
            &["  2022\u{2013}2026 ".into()]
        ));
    }

    #[test]
    fn no_tokens_means_no_restriction() {
        assert!(is_eligible(Some(2022), Some(2026), &[]));
        assert!(is_eligible(None, None, &[]));
    }

    #[test]
    fn blank_tokens_are_ignored() {
        assert!(is_eligible(Some(2022), Some(2026), &["   ".into()]));
    }

    #[test]
    fn missing_batch_years_with_restriction() {
        assert!(!is_eligible(None, Some(2026), &["2022-2026".into()]));
    }
}
