use crate::transcript::domain::utterance::SpeakerLabel;

/// An utterance enriched with its relationship to the following utterance.
///
/// The successor fields (`next_speaker`, `next_start_ms`, `gap_to_next_ms`)
/// are `None` only for the last turn of a file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    /// 1-based position after sorting by start time.
    pub turn_index: usize,
    pub speaker: SpeakerLabel,
    pub start_ms: i64,
    pub end_ms: i64,
    pub duration_ms: i64,
    pub text: String,
    pub next_speaker: Option<SpeakerLabel>,
    pub next_start_ms: Option<i64>,
    /// Signed: negative means the next speaker started before this turn ended.
    pub gap_to_next_ms: Option<i64>,
    pub speaker_change: bool,
}

impl Turn {
    pub fn is_last(&self) -> bool {
        self.next_start_ms.is_none()
    }

    /// The gap at this boundary if the next turn belongs to another speaker.
    pub fn change_gap_ms(&self) -> Option<i64> {
        if self.speaker_change {
            self.gap_to_next_ms
        } else {
            None
        }
    }

    pub fn is_overlap(&self) -> bool {
        self.gap_to_next_ms.is_some_and(|gap| gap < 0)
    }
}
