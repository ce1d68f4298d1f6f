// Rule-based fallback classifier. Two passes: sentence-local windows around
// every "sponsorship" mention first, the whole joined text only when no
// sentence mentions the keyword. Nearby qualifying language outranks distant
// mentions, and negative verdicts outrank everything.
use crate::classifier::patterns::groups_in_priority;
use crate::model::Label;
use crate::window::{keyword_re, split_sentences};

pub fn classify(text: &str) -> (Label, String) {
    if text.trim().is_empty() {
        return (Label::Maybe, "Empty description/title".to_string());
    }

    let sentences = split_sentences(text);
    let joined = if sentences.is_empty() {
        text.to_string()
    } else {
        sentences.join(" ")
    };

    let mut verdicts: Vec<Label> = Vec::new();
    for (i, s) in sentences.iter().enumerate() {
        if !keyword_re().is_match(s) {
            continue;
        }
        let start = i.saturating_sub(1);
        let end = (i + 2).min(sentences.len());
        let window = sentences[start..end].join(" ");
        if let Some(group) = groups_in_priority().iter().find(|g| g.matches(&window)) {
            verdicts.push(group.label);
        }
    }

    if !verdicts.is_empty() {
        // No > Maybe > YES across all collected local verdicts.
        for group in groups_in_priority() {
            if verdicts.contains(&group.label) {
                return (group.label, group.local_reason.to_string());
            }
        }
    }

    for group in groups_in_priority() {
        if group.matches(&joined) {
            return (group.label, group.global_reason.to_string());
        }
    }

    (Label::Maybe, "Inconclusive".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_refusal_is_no() {
        let (label, reason) = classify("We do not offer visa sponsorship for this role.");
        assert_eq!(label, Label::No);
        assert_eq!(reason, "Negative near 'sponsorship'");
    }

    #[test]
    fn conditional_offer_is_maybe() {
        let (label, reason) = classify("Sponsorship is subject to visa eligibility.");
        assert_eq!(label, Label::Maybe);
        assert_eq!(reason, "Caveats near 'sponsorship'");

        // No pattern group fires here, so the inconclusive default applies.
        let (label, _) = classify("Visa sponsorship may be considered for the right candidate.");
        assert_eq!(label, Label::Maybe);
    }

    #[test]
    fn unqualified_offer_is_yes() {
        let (label, reason) = classify("Great team. Visa sponsorship is available. Apply now.");
        assert_eq!(label, Label::Yes);
        assert_eq!(reason, "Positive near 'sponsorship'");
    }

    #[test]
    fn negative_verdict_outranks_positive() {
        let text = "Visa sponsorship is available for some roles. \
                    However this position does not offer sponsorship.";
        let (label, _) = classify(text);
        assert_eq!(label, Label::No);
    }

    #[test]
    fn global_pass_runs_without_keyword_sentences() {
        // The keyword only matches as "sponsor", so no local window fires,
        // but the negative group still hits the joined text.
        let (label, reason) = classify("We cannot sponsor applicants at this time");
        assert_eq!(label, Label::No);
        assert_eq!(reason, "Global negatives");
    }

    #[test]
    fn empty_and_inconclusive_default_to_maybe() {
        let (label, reason) = classify("   ");
        assert_eq!(label, Label::Maybe);
        assert_eq!(reason, "Empty description/title");

        let (label, reason) = classify("A great role in a friendly team.");
        assert_eq!(label, Label::Maybe);
        assert_eq!(reason, "Inconclusive");
    }

    #[test]
    fn classification_is_deterministic() {
        let text = "Visa sponsorship available subject to eligibility. Apply today.";
        let first = classify(text);
        for _ in 0..10 {
            assert_eq!(classify(text), first);
        }
    }
}
