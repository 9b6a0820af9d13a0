//! Native speech recognition: microphone capture plus local Whisper inference.
//!
//! One [`recognize`](SpeechRecognizer::recognize) call runs on a blocking
//! worker:
//!
//! 1. open the default microphone and stream chunks,
//! 2. downmix + resample each chunk to 16 kHz mono,
//! 3. feed an [`UtteranceEndpoint`] until trailing silence or the length cap,
//! 4. trim silence and transcribe with the requested language.
//!
//! The model is loaded once and shared; a fresh `WhisperState` is created per
//! call.

use std::path::Path;
use std::sync::mpsc::RecvTimeoutError;
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use super::input::{SpeechError, SpeechRecognizer};
use super::primary_subtag;
use crate::audio::{
    downmix, to_recognizer_rate, Endpoint, Microphone, UtteranceEndpoint, VadDetector,
    RECOGNIZER_RATE,
};
use crate::config::RecognitionConfig;

/// Whisper misbehaves on very short inputs; pad to one second.
const MIN_SAMPLES: usize = RECOGNIZER_RATE as usize;

/// Loaded GGML model.
struct Model(WhisperContext);

// SAFETY: whisper-rs declares WhisperContext Send + Sync; the weights are
// read-only after loading and every call creates its own state.
unsafe impl Send for Model {}
unsafe impl Sync for Model {}

/// Microphone + Whisper recognizer.
pub struct WhisperRecognizer {
    model: Arc<Model>,
    config: RecognitionConfig,
}

impl std::fmt::Debug for WhisperRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperRecognizer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl WhisperRecognizer {
    /// Load the GGML model at `model_path`.
    pub fn load(model_path: &Path, config: RecognitionConfig) -> Result<Self, SpeechError> {
        if !model_path.exists() {
            return Err(SpeechError::Failed(format!(
                "model not found: {}",
                model_path.display()
            )));
        }
        let path = model_path.to_str().ok_or_else(|| {
            SpeechError::Failed(format!(
                "model path is not valid UTF-8: {}",
                model_path.display()
            ))
        })?;
        let ctx = WhisperContext::new_with_params(path, WhisperContextParameters::default())
            .map_err(|e| SpeechError::Failed(format!("whisper init: {e}")))?;

        log::info!("speech: whisper model loaded from {}", model_path.display());
        Ok(Self {
            model: Arc::new(Model(ctx)),
            config,
        })
    }
}

#[async_trait]
impl SpeechRecognizer for WhisperRecognizer {
    fn is_available(&self) -> bool {
        Microphone::present()
    }

    async fn recognize(&self, language: &str) -> Result<String, SpeechError> {
        let model = Arc::clone(&self.model);
        let config = self.config.clone();
        let language = primary_subtag(language);

        tokio::task::spawn_blocking(move || {
            let clip = record_utterance(&config)?;
            transcribe(&model, &clip, &language)
        })
        .await
        .map_err(|e| SpeechError::Failed(format!("recognizer task: {e}")))?
    }
}

/// Capture from the default microphone until the utterance ends.
fn record_utterance(config: &RecognitionConfig) -> Result<Vec<f32>, SpeechError> {
    let mic = Microphone::open().map_err(|e| SpeechError::Failed(e.to_string()))?;
    let (tx, rx) = mpsc::channel();
    let stream = mic
        .start(tx)
        .map_err(|e| SpeechError::Failed(e.to_string()))?;

    let vad = VadDetector::new(config.vad_threshold);
    let max = secs_or(config.max_utterance_secs, Duration::from_secs(15));
    let silence = secs_or(config.silence_secs, Duration::from_millis(1200));
    let mut endpoint = UtteranceEndpoint::new(vad, silence, max);
    // Hard stop in case the device stops delivering.
    let deadline = Instant::now() + max + Duration::from_secs(2);
    let mut clip = Vec::new();

    loop {
        match rx.recv_timeout(Duration::from_millis(200)) {
            Ok(chunk) => {
                let mono = to_recognizer_rate(
                    &downmix(&chunk.samples, chunk.channels),
                    chunk.sample_rate,
                );
                clip.extend_from_slice(&mono);
                if endpoint.push(&mono) == Endpoint::Finished {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) if Instant::now() < deadline => {}
            Err(_) => break,
        }
    }
    drop(stream);

    if !endpoint.heard_voice() {
        return Err(SpeechError::Failed("no speech detected".into()));
    }
    log::debug!(
        "speech: captured {:.1}s of audio",
        clip.len() as f32 / RECOGNIZER_RATE as f32
    );
    Ok(vad.trim_silence(&clip).to_vec())
}

fn transcribe(model: &Model, clip: &[f32], language: &str) -> Result<String, SpeechError> {
    let mut audio = clip.to_vec();
    if audio.len() < MIN_SAMPLES {
        audio.resize(MIN_SAMPLES, 0.0);
    }

    let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
    params.set_language(Some(language));
    params.set_n_threads(inference_threads());
    params.set_print_progress(false);
    params.set_print_realtime(false);

    let mut state = model
        .0
        .create_state()
        .map_err(|e| SpeechError::Failed(format!("whisper state: {e}")))?;
    state
        .full(params, &audio)
        .map_err(|e| SpeechError::Failed(format!("whisper: {e}")))?;

    let segments = state
        .full_n_segments()
        .map_err(|e| SpeechError::Failed(format!("whisper: {e}")))?;
    let mut text = String::new();
    for i in 0..segments {
        let segment = state
            .full_get_segment_text(i)
            .map_err(|e| SpeechError::Failed(format!("segment {i}: {e}")))?;
        text.push_str(&segment);
    }
    Ok(text.trim().to_string())
}

fn inference_threads() -> i32 {
    std::thread::available_parallelism()
        .map(|n| n.get().min(8) as i32)
        .unwrap_or(4)
}

/// Seconds from config, falling back on negative or non-finite values.
fn secs_or(value: f32, fallback: Duration) -> Duration {
    Duration::try_from_secs_f32(value).unwrap_or(fallback)
}
