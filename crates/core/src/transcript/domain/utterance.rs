/// Opaque speaker identifier assigned by diarization (e.g. "A", "B").
///
/// Labels are compared exactly: no case folding or trimming.
pub type SpeakerLabel = String;

/// One contiguous speech segment attributed to a single speaker.
///
/// Timestamps are milliseconds from the start of the audio. They come from an
/// upstream provider and are not trusted to be well-ordered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Utterance {
    pub speaker: SpeakerLabel,
    pub start_ms: i64,
    pub end_ms: i64,
    pub text: String,
}

impl Utterance {
    pub fn new(
        speaker: impl Into<SpeakerLabel>,
        start_ms: i64,
        end_ms: i64,
        text: impl Into<String>,
    ) -> Self {
        Self {
            speaker: speaker.into(),
            start_ms,
            end_ms,
            text: text.into(),
        }
    }

    /// Length of the segment, clamped to zero for inverted timestamps.
    pub fn duration_ms(&self) -> i64 {
        self.end_ms.saturating_sub(self.start_ms).max(0)
    }
}
