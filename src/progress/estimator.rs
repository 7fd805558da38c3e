//! Duration prediction for opaque external tasks.
//!
//! The wrapped commands (image builds, container runs) emit no structured
//! progress, so the display is driven by a predicted total duration computed
//! here from the input size and the Whisper model tier.

/// Fallback estimate when the audio duration could not be probed.
pub const TRANSCRIBE_FALLBACK_SECS: f64 = 300.0;

/// Fixed estimate for the one-time image build.
pub const BUILD_ESTIMATE_SECS: f64 = 120.0;

/// Fixed startup cost added to every size-based estimate: container start,
/// model load, audio decode.
pub const STARTUP_OVERHEAD_SECS: f64 = 30.0;

/// Multiplier for model names not in the lookup table.
const DEFAULT_MULTIPLIER: f64 = 0.2;

/// A predicted total duration for a supervised task.
///
/// Immutable once computed; `total_seconds` is
/// `base_seconds * multiplier + overhead_seconds`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationEstimate {
    pub base_seconds: f64,
    pub overhead_seconds: f64,
    pub multiplier: f64,
}

impl DurationEstimate {
    fn fixed(seconds: f64) -> Self {
        Self {
            base_seconds: seconds,
            overhead_seconds: 0.0,
            multiplier: 1.0,
        }
    }

    pub fn total_seconds(&self) -> f64 {
        self.base_seconds * self.multiplier + self.overhead_seconds
    }
}

/// Processing-speed multiplier per Whisper model tier, relative to audio
/// length. Whisper typically runs at 0.1x to 0.6x real time on CPU.
pub fn model_multiplier(model: &str) -> f64 {
    match model {
        "tiny" => 0.1,
        "base" => 0.15,
        "small" => 0.25,
        "medium" => 0.4,
        "large" | "large-v2" | "large-v3" => 0.6,
        _ => DEFAULT_MULTIPLIER,
    }
}

/// Predicts the total transcription duration.
///
/// Unknown audio length falls back to a fixed constant. Negative or zero
/// lengths are treated as zero, leaving only the startup overhead.
pub fn transcription_estimate(audio_seconds: Option<f64>, model: &str) -> DurationEstimate {
    match audio_seconds {
        Some(seconds) => DurationEstimate {
            base_seconds: seconds.max(0.0),
            overhead_seconds: STARTUP_OVERHEAD_SECS,
            multiplier: model_multiplier(model),
        },
        None => DurationEstimate::fixed(TRANSCRIBE_FALLBACK_SECS),
    }
}

/// Predicts the image build duration. The build has no meaningful size input,
/// so this is a fixed constant.
pub fn build_estimate() -> DurationEstimate {
    DurationEstimate::fixed(BUILD_ESTIMATE_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_magnitude_uses_fallback() {
        assert_eq!(
            transcription_estimate(None, "small").total_seconds(),
            TRANSCRIBE_FALLBACK_SECS
        );
        assert_eq!(
            transcription_estimate(None, "no-such-model").total_seconds(),
            TRANSCRIBE_FALLBACK_SECS
        );
    }

    #[test]
    fn test_known_magnitude() {
        // 600s of audio on the small model: 600 * 0.25 + 30
        assert_eq!(
            transcription_estimate(Some(600.0), "small").total_seconds(),
            180.0
        );
        // 1200s on the medium model: 1200 * 0.4 + 30
        let medium = transcription_estimate(Some(1200.0), "medium").total_seconds();
        assert!((medium - 510.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_and_negative_magnitude_yield_overhead_only() {
        assert_eq!(
            transcription_estimate(Some(0.0), "tiny").total_seconds(),
            STARTUP_OVERHEAD_SECS
        );
        assert_eq!(
            transcription_estimate(Some(-12.0), "large").total_seconds(),
            STARTUP_OVERHEAD_SECS
        );
    }

    #[test]
    fn test_unknown_model_gets_default_multiplier() {
        assert_eq!(
            transcription_estimate(Some(100.0), "enormous").total_seconds(),
            100.0 * 0.2 + STARTUP_OVERHEAD_SECS
        );
    }

    #[test]
    fn test_large_variants_share_multiplier() {
        for model in ["large", "large-v2", "large-v3"] {
            assert_eq!(model_multiplier(model), 0.6);
        }
    }

    #[test]
    fn test_build_estimate_is_fixed() {
        assert_eq!(build_estimate().total_seconds(), BUILD_ESTIMATE_SECS);
    }
}
