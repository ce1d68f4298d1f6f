// Salary-aware likelihood scoring. The band deliberately stops short of both
// extremes: this is a heuristic blend, never a certainty.
use crate::classifier::patterns::{MAYBE, POSITIVE};
use crate::model::Label;
use regex::Regex;
use std::sync::LazyLock;

static SALARY_NUM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:£|\$|€)?\s*(\d{1,3}(?:,\d{3})+|\d+(?:\.\d+)?)\s*([kK])?").unwrap()
});
static HOURLY_OR_DAILY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(per\s*(hour|hr|day|diem)|/h|/hr|/day)\b").unwrap());
static ANNUAL_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(per\s*(annum|year)|pa|p\.a\.|annual|annum|year)\b").unwrap()
});

const SCORE_FLOOR: i64 = 50;
const SCORE_CEILING: i64 = 90;
const LOW_SALARY_THRESHOLD: f64 = 42_000.0;

/// Parses an annual figure out of a free-text salary string. Hourly or daily
/// rates without an explicit annual qualifier are rejected rather than
/// mis-scaled. A range yields its higher figure; "k" suffixes scale ×1000.
pub fn parse_salary_annual(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }
    if HOURLY_OR_DAILY.is_match(s) && !ANNUAL_HINT.is_match(s) {
        return None;
    }
    let mut best: Option<f64> = None;
    for caps in SALARY_NUM.captures_iter(s) {
        let raw = caps[1].replace(',', "");
        if let Ok(mut val) = raw.parse::<f64>() {
            if caps.get(2).is_some() {
                val *= 1000.0;
            }
            best = Some(best.map_or(val, |b| b.max(val)));
        }
    }
    best
}

/// Likelihood score in [50, 90]. `None` for No-labeled records: base 80 (YES)
/// or 65 (Maybe), +5 on a positive cue, −5 on a caveat cue, −10 when the
/// parsed annual salary sits below the sponsorship threshold.
pub fn likely_to_sponsor(label: Label, combined_text: &str, salary_formatted: &str) -> Option<i64> {
    let mut score: i64 = match label {
        Label::No => return None,
        Label::Yes => 80,
        Label::Maybe => 65,
    };

    if POSITIVE.matches(combined_text) {
        score += 5;
    }
    if MAYBE.matches(combined_text) {
        score -= 5;
    }
    if let Some(annual) = parse_salary_annual(salary_formatted) {
        if annual < LOW_SALARY_THRESHOLD {
            score -= 10;
        }
    }

    Some(score.clamp(SCORE_FLOOR, SCORE_CEILING))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annual_range_takes_higher_figure() {
        assert_eq!(
            parse_salary_annual("£45,000 - £50,000 per annum"),
            Some(50000.0)
        );
    }

    #[test]
    fn hourly_without_annual_hint_is_rejected() {
        assert_eq!(parse_salary_annual("£15/hr"), None);
        assert_eq!(parse_salary_annual("£120 per day"), None);
    }

    #[test]
    fn k_suffix_scales() {
        assert_eq!(parse_salary_annual("£38k"), Some(38000.0));
    }

    #[test]
    fn empty_or_numberless_strings_parse_to_none() {
        assert_eq!(parse_salary_annual(""), None);
        assert_eq!(parse_salary_annual("competitive"), None);
    }

    #[test]
    fn no_label_has_no_score() {
        assert_eq!(likely_to_sponsor(Label::No, "anything", "£80,000"), None);
    }

    #[test]
    fn low_salary_penalty_applies() {
        // YES base 80, no cue adjustments, salary below threshold: 70.
        let score = likely_to_sponsor(Label::Yes, "Friendly team.", "£38k");
        assert_eq!(score, Some(70));
    }

    #[test]
    fn cue_adjustments_shift_the_base() {
        // Maybe base 65 with a positive cue: 70.
        let score = likely_to_sponsor(Label::Maybe, "Visa sponsorship is available.", "");
        assert_eq!(score, Some(70));
        // Maybe base 65 with a caveat cue: 60.
        let score = likely_to_sponsor(Label::Maybe, "Sponsorship subject to visa checks.", "");
        assert_eq!(score, Some(60));
    }

    #[test]
    fn score_stays_in_band() {
        // Maybe 65, −5 caveat, −10 salary = 50; the floor holds below that.
        let score = likely_to_sponsor(
            Label::Maybe,
            "Sponsorship subject to visa checks.",
            "£20,000 per annum",
        );
        assert_eq!(score, Some(50));
    }
}
