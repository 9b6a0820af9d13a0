//! Channel mixing and sample-rate conversion for recognition input.
//!
//! Whisper expects 16 kHz mono `f32`.  Microphones typically deliver 44.1 or
//! 48 kHz, often stereo, so every captured chunk goes through [`downmix`]
//! then [`resample`].

/// Sample rate expected by the recognizer.
pub const RECOGNIZER_RATE: u32 = 16_000;

/// Average interleaved frames down to a single channel.
///
/// ```rust
/// use voice_translator::audio::downmix;
///
/// let mono = downmix(&[0.2_f32, 0.4, -1.0, 1.0], 2);
/// assert_eq!(mono.len(), 2);
/// assert!((mono[0] - 0.3).abs() < 1e-6);
/// assert!(mono[1].abs() < 1e-6);
/// ```
pub fn downmix(interleaved: &[f32], channels: u16) -> Vec<f32> {
    let width = usize::from(channels);
    match width {
        0 => Vec::new(),
        1 => interleaved.to_vec(),
        _ => interleaved
            .chunks_exact(width)
            .map(|frame| frame.iter().sum::<f32>() / width as f32)
            .collect(),
    }
}

/// Convert `samples` from `from_rate` to `to_rate` by linear interpolation.
///
/// Output length is `ceil(len * to_rate / from_rate)`.  Equal rates return a
/// copy; a zero rate on either side yields an empty buffer.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == 0 || to_rate == 0 || samples.is_empty() {
        return Vec::new();
    }
    if from_rate == to_rate {
        return samples.to_vec();
    }

    let step = f64::from(from_rate) / f64::from(to_rate);
    let out_len = (samples.len() as f64 / step).ceil() as usize;
    let last = samples.len() - 1;

    (0..out_len)
        .map(|i| {
            let pos = i as f64 * step;
            let left = (pos as usize).min(last);
            let right = (left + 1).min(last);
            let t = (pos - left as f64) as f32;
            samples[left] + (samples[right] - samples[left]) * t
        })
        .collect()
}

/// Shorthand for [`resample`] to [`RECOGNIZER_RATE`].
pub fn to_recognizer_rate(samples: &[f32], from_rate: u32) -> Vec<f32> {
    resample(samples, from_rate, RECOGNIZER_RATE)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downmix_mono_is_copy() {
        let input = [0.1_f32, -0.2, 0.3];
        assert_eq!(downmix(&input, 1), input);
    }

    #[test]
    fn downmix_zero_channels_is_empty() {
        assert!(downmix(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn downmix_drops_incomplete_trailing_frame() {
        let out = downmix(&[0.5, 0.5, 0.5, 0.5, 0.9], 2);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn resample_same_rate_is_copy() {
        let input: Vec<f32> = (0..32).map(|i| i as f32).collect();
        assert_eq!(resample(&input, 16_000, 16_000), input);
    }

    #[test]
    fn resample_lengths() {
        assert_eq!(to_recognizer_rate(&[0.0; 480], 48_000).len(), 160);
        assert_eq!(to_recognizer_rate(&[0.0; 80], 8_000).len(), 160);
        let n = to_recognizer_rate(&vec![0.0; 44_100], 44_100).len();
        assert!(n.abs_diff(16_000) <= 1, "got {n}");
    }

    #[test]
    fn resample_keeps_dc_level() {
        for s in to_recognizer_rate(&[0.25; 441], 44_100) {
            assert!((s - 0.25).abs() < 1e-6);
        }
    }

    #[test]
    fn upsampling_interpolates_between_neighbours() {
        let out = resample(&[0.0, 1.0], 8_000, 16_000);
        assert_eq!(out.len(), 4);
        assert!((out[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn degenerate_rates_are_empty() {
        assert!(resample(&[1.0], 0, 16_000).is_empty());
        assert!(resample(&[1.0], 16_000, 0).is_empty());
        assert!(resample(&[], 48_000, 16_000).is_empty());
    }
}
