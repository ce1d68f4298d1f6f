// Declarative pattern groups for sponsorship labeling. Three ordered sets,
// most conservative first; new rules are added to the lists, not the control
// flow.
use crate::model::Label;
use regex::Regex;
use std::sync::LazyLock;

const NEG_PATTERNS: &[&str] = &[
    r"\bno\b[^\.!\?]*\bvisa\s+sponsorship\b",
    r"\bvisa\s+sponsorship\s+(is\s+)?(not\s+available|unavailable)\b",
    r"\bnot\b[^\.!\?]*\boffer\b[^\.!\?]*\b(sponsorship|visa)\b",
    r"\bdo(?:es)?\s+not\b[^\.!\?]*\b(sponsor|provide|offer)\b",
    r"\bcannot\b[^\.!\?]*\b(sponsor|provide|offer)\b",
    r"\bunable\b[^\.!\?]*\b(sponsor|provide|offer)\b",
    r"\bno\s+sponsorship\b",
    r"\bnot\s+able\s+to\s+sponsor\b",
    r"\bwon'?t\s+(provide|offer)\b[^\.!\?]*\b(sponsorship|visa)\b",
    r"\bright\s+to\s+work\b[^\.!\?]*\bwithout\b[^\.!\?]*\b(sponsorship|visa)\b",
    r"\bvisa\s+sponsorship\b[^\.!\?]*\bnot\b[^\.!\?]*\bavailable\b",
    r"\bvisa\s+sponsorship\b[^\.!\?]*\bnot\b[^\.!\?]*\bprovided\b",
    r"\bwe\s+cannot\s+consider\s+candidates\s+requiring\s+sponsorship\b",
    r"\bvisa\s+sponsorship\s+not\s+available\b",
    r"\bdo\s+not\s+provid\w*\s+(visa\s+)?sponsorship\b",
];

// Positive phrasing only counts unqualified; qualifying caveats in the rest
// of the sentence suppress the match (see `PatternGroup::matches`).
const POS_PATTERNS: &[&str] = &[
    r"\bvisa\s+sponsorship\s+(is\s+)?(available|provided|offered)\b",
    r"\bwe\s+can\s+(provide|offer)\b[^\.!\?]*\b(visa\s+sponsorship|sponsorship)\b",
    r"\bwill\s+(provide|offer)\b[^\.!\?]*\b(visa\s+sponsorship|sponsorship)\b",
    r"\bcan\s+sponsor\b[^\.!\?]*(skilled\s*worker|tier\s*2|work\s+visa)\b",
    r"\bcertificate\s+of\s+sponsorship\b[^\.!\?]*(provided|available|offered)\b",
    r"\bsponsorship\b[^\.!\?]*\bavailable\b",
];

const MAYBE_PATTERNS: &[&str] = &[
    r"\bmay\s+(consider|offer|provide)\b[^\.!\?]*\b(visa\s+sponsorship|sponsorship)\b",
    r"\bpossible\b[^\.!\?]*\b(visa\s+sponsorship|sponsorship)\b",
    r"\bdepending\s+on\b[^\.!\?]*(eligibility|experience|role|criteria)\b[^\.!\?]*\b(sponsorship|visa)\b",
    r"\bcase\s+by\s+case\b[^\.!\?]*\b(sponsorship|visa)\b",
    r"\bsubject\s+to\b[^\.!\?]*\b(visa|sponsorship)\b",
    r"\bexceptional\s+cases\b[^\.!\?]*\b(sponsorship|visa)\b",
    r"\bfor\s+the\s+right\s+candidate\b[^\.!\?]*\b(sponsorship|visa)\b",
    r"\bT&Cs\s+apply\b[^\.!\?]*\b(sponsorship|visa)\b",
    r"\b(already\s+residing|already\s+in)\s+the\s+UK\b[^\.!\?]*\b(visa|sponsorship)\b",
    r"\bUK\s+only\b[^\.!\?]*\b(sponsorship|visa)\b",
];

static CAVEAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)subject\s+to|T&Cs|depending|already\s+residing|already\s+in\s+the\s+UK")
        .unwrap()
});

/// One ordered set of case-insensitive matchers sharing a verdict and the
/// reason strings reported at each classification pass.
pub struct PatternGroup {
    pub label: Label,
    pub local_reason: &'static str,
    pub global_reason: &'static str,
    patterns: Vec<Regex>,
    guarded: bool,
}

impl PatternGroup {
    fn new(
        label: Label,
        local_reason: &'static str,
        global_reason: &'static str,
        patterns: &[&str],
        guarded: bool,
    ) -> Self {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(&format!("(?i){p}")).unwrap())
            .collect();
        Self {
            label,
            local_reason,
            global_reason,
            patterns,
            guarded,
        }
    }

    /// True when any pattern matches. A guarded group additionally requires
    /// that no caveat phrase follows the match before the sentence ends.
    pub fn matches(&self, text: &str) -> bool {
        for re in &self.patterns {
            for m in re.find_iter(text) {
                if !self.guarded {
                    return true;
                }
                let rest = &text[m.end()..];
                let clause_end = rest.find(['.', '!', '?']).unwrap_or(rest.len());
                if !CAVEAT_RE.is_match(&rest[..clause_end]) {
                    return true;
                }
            }
        }
        false
    }
}

pub static NEGATIVE: LazyLock<PatternGroup> = LazyLock::new(|| {
    PatternGroup::new(
        Label::No,
        "Negative near 'sponsorship'",
        "Global negatives",
        NEG_PATTERNS,
        false,
    )
});

pub static MAYBE: LazyLock<PatternGroup> = LazyLock::new(|| {
    PatternGroup::new(
        Label::Maybe,
        "Caveats near 'sponsorship'",
        "Global caveats",
        MAYBE_PATTERNS,
        false,
    )
});

pub static POSITIVE: LazyLock<PatternGroup> = LazyLock::new(|| {
    PatternGroup::new(
        Label::Yes,
        "Positive near 'sponsorship'",
        "Global positives",
        POS_PATTERNS,
        true,
    )
});

/// Evaluation order doubles as verdict priority: No > Maybe > YES.
pub fn groups_in_priority() -> [&'static PatternGroup; 3] {
    [&NEGATIVE, &MAYBE, &POSITIVE]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_group_matches_refusals() {
        assert!(NEGATIVE.matches("We do not offer visa sponsorship for this role."));
        assert!(NEGATIVE.matches("Unfortunately we cannot sponsor applicants."));
        assert!(NEGATIVE.matches("candidates must have the right to work without sponsorship or visa support"));
    }

    #[test]
    fn positive_group_matches_unqualified_offers() {
        assert!(POSITIVE.matches("Visa sponsorship is available for this position."));
        assert!(POSITIVE.matches("We can sponsor Skilled Worker visas."));
    }

    #[test]
    fn positive_group_is_suppressed_by_caveats() {
        assert!(!POSITIVE.matches("Visa sponsorship available subject to eligibility."));
        assert!(!POSITIVE.matches(
            "Sponsorship available for candidates already in the UK."
        ));
        // A caveat in the next sentence does not suppress.
        assert!(POSITIVE.matches(
            "Visa sponsorship is available. Relocation depending on budget."
        ));
    }

    #[test]
    fn maybe_group_matches_conditionals() {
        assert!(MAYBE.matches("We may consider visa sponsorship for exceptional candidates."));
        assert!(MAYBE.matches("Sponsorship is decided case by case depending on the visa type."));
    }
}
