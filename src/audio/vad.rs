//! Energy-based voice activity detection and utterance endpointing.
//!
//! Audio is cut into 30 ms frames (480 samples at 16 kHz).  A frame counts as
//! voice when its RMS exceeds the configured threshold.
//!
//! [`VadDetector::trim_silence`] strips leading and trailing silence from a
//! finished clip.  [`UtteranceEndpoint`] decides *when* a live recording is
//! finished: after speech was heard, a run of trailing silence ends it; a
//! hard cap ends it regardless.
//!
//! ```text
//!  Waiting ──voice frame──▶ Speaking ──silence ≥ hangover──▶ Finished
//!     │                        │
//!     └──── total ≥ max ───────┴──────────────────────────▶ Finished
//! ```

use std::time::Duration;

/// 30 ms at 16 kHz.
pub const FRAME_SAMPLES: usize = 480;

// ---------------------------------------------------------------------------
// VadDetector
// ---------------------------------------------------------------------------

/// RMS-threshold voice detector.
///
/// ```rust
/// use voice_translator::audio::VadDetector;
///
/// let vad = VadDetector::new(0.01);
/// let mut clip = vec![0.0_f32; 480];
/// clip.extend(vec![0.4_f32; 960]);
/// clip.extend(vec![0.0_f32; 480]);
/// assert_eq!(vad.trim_silence(&clip).len(), 960);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct VadDetector {
    threshold: f32,
}

impl VadDetector {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// `true` if `frame` is loud enough to be speech.
    pub fn is_voice(&self, frame: &[f32]) -> bool {
        !frame.is_empty() && rms(frame) > self.threshold
    }

    /// Sub-slice from the first to the last voiced frame; empty when the
    /// whole clip is silent.
    pub fn trim_silence<'a>(&self, clip: &'a [f32]) -> &'a [f32] {
        let voiced: Vec<bool> = clip
            .chunks(FRAME_SAMPLES)
            .map(|frame| self.is_voice(frame))
            .collect();

        let Some(first) = voiced.iter().position(|&v| v) else {
            return &clip[..0];
        };
        let last = voiced.iter().rposition(|&v| v).unwrap_or(first);

        let start = first * FRAME_SAMPLES;
        let end = ((last + 1) * FRAME_SAMPLES).min(clip.len());
        &clip[start..end]
    }
}

fn rms(frame: &[f32]) -> f32 {
    (frame.iter().map(|s| s * s).sum::<f32>() / frame.len() as f32).sqrt()
}

// ---------------------------------------------------------------------------
// UtteranceEndpoint
// ---------------------------------------------------------------------------

/// Where a live recording stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Nothing but silence so far.
    Waiting,
    /// Speech has been heard; still listening.
    Speaking,
    /// The utterance is over; stop capturing.
    Finished,
}

/// Incremental endpoint detector fed with 16 kHz mono samples.
#[derive(Debug)]
pub struct UtteranceEndpoint {
    vad: VadDetector,
    hangover_frames: usize,
    max_frames: usize,
    pending: Vec<f32>,
    frames_seen: usize,
    silent_run: usize,
    heard_voice: bool,
    state: Endpoint,
}

impl UtteranceEndpoint {
    /// `silence` is the trailing quiet that ends an utterance; `max` caps the
    /// whole recording.
    pub fn new(vad: VadDetector, silence: Duration, max: Duration) -> Self {
        Self {
            vad,
            hangover_frames: frames_in(silence).max(1),
            max_frames: frames_in(max).max(1),
            pending: Vec::with_capacity(FRAME_SAMPLES),
            frames_seen: 0,
            silent_run: 0,
            heard_voice: false,
            state: Endpoint::Waiting,
        }
    }

    pub fn state(&self) -> Endpoint {
        self.state
    }

    /// Whether any frame so far was voiced.
    pub fn heard_voice(&self) -> bool {
        self.heard_voice
    }

    /// Feed more audio and return the updated state.  Once `Finished`, further
    /// input is ignored.
    pub fn push(&mut self, samples: &[f32]) -> Endpoint {
        if self.state == Endpoint::Finished {
            return self.state;
        }
        self.pending.extend_from_slice(samples);

        let mut consumed = 0;
        while self.pending.len() - consumed >= FRAME_SAMPLES {
            let frame = &self.pending[consumed..consumed + FRAME_SAMPLES];
            consumed += FRAME_SAMPLES;
            self.frames_seen += 1;

            if self.vad.is_voice(frame) {
                self.heard_voice = true;
                self.silent_run = 0;
                self.state = Endpoint::Speaking;
            } else if self.heard_voice {
                self.silent_run += 1;
                if self.silent_run >= self.hangover_frames {
                    self.state = Endpoint::Finished;
                }
            }
            if self.frames_seen >= self.max_frames {
                self.state = Endpoint::Finished;
            }
            if self.state == Endpoint::Finished {
                break;
            }
        }
        self.pending.drain(..consumed);
        self.state
    }
}

fn frames_in(d: Duration) -> usize {
    let samples = d.as_micros() * 16 / 1_000;
    samples.div_ceil(FRAME_SAMPLES as u128) as usize
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn silence(frames: usize) -> Vec<f32> {
        vec![0.0; frames * FRAME_SAMPLES]
    }

    fn voice(frames: usize) -> Vec<f32> {
        vec![0.3; frames * FRAME_SAMPLES]
    }

    #[test]
    fn is_voice_respects_threshold() {
        let vad = VadDetector::new(0.1);
        assert!(vad.is_voice(&[0.5; 10]));
        assert!(!vad.is_voice(&[0.05; 10]));
        assert!(!vad.is_voice(&[]));
    }

    #[test]
    fn trim_keeps_voiced_middle() {
        let mut clip = silence(2);
        clip.extend(voice(3));
        clip.extend(silence(1));
        assert_eq!(VadDetector::new(0.01).trim_silence(&clip).len(), 3 * FRAME_SAMPLES);
    }

    #[test]
    fn trim_all_silent_is_empty() {
        assert!(VadDetector::new(0.01).trim_silence(&silence(4)).is_empty());
        assert!(VadDetector::new(0.01).trim_silence(&[]).is_empty());
    }

    #[test]
    fn trim_handles_partial_last_frame() {
        let mut clip = silence(1);
        clip.extend(vec![0.3; 100]);
        let trimmed = VadDetector::new(0.01).trim_silence(&clip);
        assert_eq!(trimmed.len(), 100);
    }

    #[test]
    fn endpoint_waits_through_leading_silence() {
        let mut ep = UtteranceEndpoint::new(
            VadDetector::new(0.01),
            Duration::from_millis(90),
            Duration::from_secs(10),
        );
        assert_eq!(ep.push(&silence(20)), Endpoint::Waiting);
        assert!(!ep.heard_voice());
    }

    #[test]
    fn endpoint_finishes_after_trailing_silence() {
        // 90 ms hangover = 3 frames.
        let mut ep = UtteranceEndpoint::new(
            VadDetector::new(0.01),
            Duration::from_millis(90),
            Duration::from_secs(10),
        );
        assert_eq!(ep.push(&voice(5)), Endpoint::Speaking);
        assert_eq!(ep.push(&silence(2)), Endpoint::Speaking);
        assert_eq!(ep.push(&silence(1)), Endpoint::Finished);
        assert_eq!(ep.push(&voice(1)), Endpoint::Finished);
    }

    #[test]
    fn voice_resets_the_silence_run() {
        let mut ep = UtteranceEndpoint::new(
            VadDetector::new(0.01),
            Duration::from_millis(90),
            Duration::from_secs(10),
        );
        ep.push(&voice(1));
        ep.push(&silence(2));
        ep.push(&voice(1));
        assert_eq!(ep.push(&silence(2)), Endpoint::Speaking);
    }

    #[test]
    fn endpoint_caps_total_length() {
        let mut ep = UtteranceEndpoint::new(
            VadDetector::new(0.01),
            Duration::from_secs(1),
            Duration::from_millis(300),
        );
        assert_eq!(ep.push(&voice(9)), Endpoint::Speaking);
        assert_eq!(ep.push(&voice(1)), Endpoint::Finished);
    }

    #[test]
    fn endpoint_buffers_partial_frames() {
        let mut ep = UtteranceEndpoint::new(
            VadDetector::new(0.01),
            Duration::from_millis(30),
            Duration::from_secs(10),
        );
        assert_eq!(ep.push(&vec![0.3; FRAME_SAMPLES - 1]), Endpoint::Waiting);
        assert_eq!(ep.push(&[0.3]), Endpoint::Speaking);
    }
}
