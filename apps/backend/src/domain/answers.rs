//! Reveal-sequence ordering for the answers stage.

use std::time::Duration;

use crate::domain::rules::SECONDS_FOR_ONE_SELECT;

/// One variant as it appears during the reveal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealVariant {
    pub variant_id: i64,
    pub text: String,
    pub author_id: Option<i64>,
    pub selected_by: Vec<i64>,
    pub correct: bool,
}

/// Orders a round's variants for display: wrong guesses first (input order),
/// the painter's true answer last. Variants nobody picked are skipped unless
/// they are the true answer; decoys therefore only show up when somebody
/// fell for them.
pub fn reveal_order(
    variants: Vec<(i64, String, Option<i64>, Vec<i64>)>,
    painter_id: i64,
) -> Vec<RevealVariant> {
    let mut wrong = Vec::new();
    let mut correct = None;

    for (variant_id, text, author_id, selected_by) in variants {
        let is_correct = author_id == Some(painter_id);
        if !is_correct && selected_by.is_empty() {
            continue;
        }
        let entry = RevealVariant {
            variant_id,
            text,
            author_id,
            selected_by,
            correct: is_correct,
        };
        if is_correct {
            correct = Some(entry);
        } else {
            wrong.push(entry);
        }
    }

    wrong.extend(correct);
    wrong
}

/// How long one reveal entry stays on screen.
pub fn display_delay(selected_count: usize) -> Duration {
    Duration::from_secs(SECONDS_FOR_ONE_SELECT * (1 + selected_count as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_answer_is_revealed_last() {
        let ordered = reveal_order(
            vec![
                (1, "прометей".into(), Some(10), vec![21]),
                (2, "огонь".into(), Some(20), vec![22, 23]),
                (3, "факел".into(), Some(30), vec![20]),
            ],
            10,
        );
        assert_eq!(ordered.len(), 3);
        assert!(ordered[..2].iter().all(|v| !v.correct));
        assert!(ordered[2].correct);
        assert_eq!(ordered[2].variant_id, 1);
    }

    #[test]
    fn unpicked_decoys_are_skipped() {
        let ordered = reveal_order(
            vec![
                (1, "ответ".into(), Some(10), vec![]),
                (2, "приманка".into(), None, vec![]),
                (3, "догадка".into(), Some(20), vec![10]),
            ],
            10,
        );
        // The decoy nobody picked disappears; the unpicked true answer stays.
        assert_eq!(
            ordered.iter().map(|v| v.variant_id).collect::<Vec<_>>(),
            vec![3, 1]
        );
    }

    #[test]
    fn picked_decoys_are_shown() {
        let ordered = reveal_order(vec![(2, "приманка".into(), None, vec![21])], 10);
        assert_eq!(ordered.len(), 1);
        assert!(!ordered[0].correct);
    }

    #[test]
    fn delay_grows_with_selections() {
        assert_eq!(display_delay(0), Duration::from_secs(3));
        assert_eq!(display_delay(2), Duration::from_secs(9));
    }
}
