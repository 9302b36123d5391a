use crate::transcript::domain::utterance::Utterance;

use super::turn::Turn;

/// Recoverable conditions found while deriving turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionWarning {
    /// The transcript contained no utterances.
    NoUtterances,
}

impl std::fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionWarning::NoUtterances => write!(f, "no utterances found"),
        }
    }
}

/// Result of turn extraction for one file.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnExtraction {
    pub turns: Vec<Turn>,
    pub warning: Option<ExtractionWarning>,
}

/// Derives ordered turns from one file's utterances.
///
/// Each utterance becomes exactly one turn. Same-speaker neighbours are not
/// merged and overlaps are not clamped: the raw signed gap is reported.
pub fn extract_turns(file_id: &str, utterances: &[Utterance]) -> TurnExtraction {
    if utterances.is_empty() {
        log::warn!("{file_id}: no utterances found");
        return TurnExtraction {
            turns: Vec::new(),
            warning: Some(ExtractionWarning::NoUtterances),
        };
    }

    // Stable sort keeps input order for equal start times.
    let mut sorted: Vec<&Utterance> = utterances.iter().collect();
    sorted.sort_by_key(|u| u.start_ms);

    let malformed = sorted.iter().filter(|u| u.end_ms < u.start_ms).count();
    if malformed > 0 {
        log::debug!("{file_id}: clamped {malformed} utterance(s) with end before start");
    }

    let turns = sorted
        .iter()
        .enumerate()
        .map(|(idx, current)| {
            let next = sorted.get(idx + 1);
            Turn {
                turn_index: idx + 1,
                speaker: current.speaker.clone(),
                start_ms: current.start_ms,
                end_ms: current.end_ms,
                duration_ms: current.duration_ms(),
                text: current.text.clone(),
                next_speaker: next.map(|n| n.speaker.clone()),
                next_start_ms: next.map(|n| n.start_ms),
                gap_to_next_ms: next.map(|n| n.start_ms.saturating_sub(current.end_ms)),
                speaker_change: next.is_some_and(|n| n.speaker != current.speaker),
            }
        })
        .collect();

    TurnExtraction {
        turns,
        warning: None,
    }
}
