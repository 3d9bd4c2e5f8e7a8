//! Canonical explanation sentences.

use var_core::incident::{Classification, IncidentType};

/// Sentence used when no canonical explanation exists for a label.
pub const NO_EXPLANATION: &str = "No specific explanation available";

pub fn canonical_sentence(incident_type: IncidentType) -> &'static str {
    match incident_type {
        IncidentType::Foul => "Player made contact with opponent's legs from behind",
        IncidentType::Offside => {
            "Attacking player was ahead of the last defender when the ball was played"
        }
        IncidentType::Handball => {
            "Player's arm was in an unnatural position when the ball made contact"
        }
        IncidentType::Goal => "Ball completely crossed the goal line between the posts",
        IncidentType::Corner => {
            "Defending player was the last to touch the ball before it went out"
        }
        IncidentType::ThrowIn => "Ball went out of play over the touchline",
        IncidentType::Unknown => NO_EXPLANATION,
    }
}

/// Append the two-decimal confidence to an explanation body.
///
/// Trailing whitespace and periods on `body` are dropped so the result
/// reads `"<body>. Confidence level: 0.85"`.
pub fn with_confidence(body: &str, classification: &Classification) -> String {
    let body = body.trim().trim_end_matches('.').trim_end();
    let body = if body.is_empty() { NO_EXPLANATION } else { body };
    format!(
        "{body}. Confidence level: {}",
        classification.formatted_confidence()
    )
}

/// The full templated explanation for a classification.
pub fn render(classification: &Classification) -> String {
    with_confidence(canonical_sentence(classification.incident_type), classification)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offside_reads_as_documented() {
        let text = render(&Classification::new(IncidentType::Offside, 0.85));
        assert_eq!(
            text,
            "Attacking player was ahead of the last defender when the ball was played. \
             Confidence level: 0.85"
        );
    }

    #[test]
    fn every_label_has_a_distinct_sentence() {
        let sentences: std::collections::HashSet<_> = IncidentType::LABELED
            .into_iter()
            .map(canonical_sentence)
            .collect();
        assert_eq!(sentences.len(), 6);
        assert!(!sentences.contains(NO_EXPLANATION));
    }

    #[test]
    fn unknown_uses_the_sentinel() {
        let text = render(&Classification::unknown());
        assert_eq!(text, "No specific explanation available. Confidence level: 0.00");
    }

    #[test]
    fn empty_body_falls_back_to_sentinel() {
        let c = Classification::new(IncidentType::Goal, 0.9);
        assert_eq!(
            with_confidence(" . ", &c),
            "No specific explanation available. Confidence level: 0.90"
        );
    }

    #[test]
    fn trailing_punctuation_is_not_doubled() {
        let c = Classification::new(IncidentType::Goal, 0.9);
        assert_eq!(
            with_confidence("The ball crossed the line.  ", &c),
            "The ball crossed the line. Confidence level: 0.90"
        );
    }
}
