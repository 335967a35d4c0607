use crate::conversion::{FULL_SCALE, magnitude, round_to_sample};

/// A mapping applied independently to every sample of a waveform.
///
/// Implemented by the built-in [`Filter`] variants and by any
/// `Fn(i16) -> i16`, so new effects need no changes to [`Waveform`](crate::Waveform):
///
/// ```
/// use wavfx::{Header, Waveform};
///
/// let mut wav = Waveform::from_samples(Header::mono(44_100), vec![1, -2, 3]);
/// wav.apply(|s: i16| s.saturating_neg());
///
/// assert_eq!(wav.samples(), &[-1, 2, -3]);
/// ```
pub trait Transform {
    /// Map one sample
    fn apply(&self, sample: i16) -> i16;
}

impl<F> Transform for F
where
    F: Fn(i16) -> i16,
{
    fn apply(&self, sample: i16) -> i16 {
        self(sample)
    }
}

/// Built-in single sample filters.
///
/// Samples are an alternating signal: `-32768` is the lower rail and `32767`
/// the upper one, so magnitudes are compared in `i32`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Filter {
    /// Linear scaling that leaves samples untouched when the result would not fit
    Gain {
        /// scaling ratio
        factor: f32,
    },
    /// Hard limit on the sample magnitude, in the native sample domain
    Clip {
        /// largest magnitude let through; the sign is ignored
        threshold: i16,
    },
    /// Snap samples whose amplitude reaches `threshold` to the matching rail
    Pulsify {
        /// amplitude in `[0, 1]`; the sign is ignored
        threshold: f32,
    },
    /// Plain multiplication, used once the factor is known to keep samples in range
    Normalize {
        /// scaling ratio
        factor: f32,
    },
}

impl Filter {
    /// Gain filter with the given ratio
    pub fn gain(factor: f32) -> Self {
        Filter::Gain { factor }
    }

    /// Clip filter; negative thresholds are taken by magnitude
    pub fn clip(threshold: i16) -> Self {
        Filter::Clip {
            threshold: threshold.saturating_abs(),
        }
    }

    /// Pulsify filter; the threshold is taken by magnitude
    pub fn pulsify(threshold: f32) -> Self {
        let threshold = if threshold < 0.0 { -threshold } else { threshold };
        Filter::Pulsify { threshold }
    }

    /// Normalize filter with a precomputed factor
    pub fn normalize(factor: f32) -> Self {
        Filter::Normalize { factor }
    }
}

impl Transform for Filter {
    fn apply(&self, sample: i16) -> i16 {
        match *self {
            Filter::Gain { factor } => {
                let mag = magnitude(sample);

                // Leave unrepresentable results alone instead of wrapping
                if mag >= FULL_SCALE as i32 - 1 || (FULL_SCALE as f32 / factor) < mag as f32 {
                    return sample;
                }

                (sample as f32 * factor) as i16
            }
            Filter::Clip { threshold } => {
                let threshold = threshold.saturating_abs();

                if magnitude(sample) > threshold as i32 {
                    if sample < 0 { threshold.saturating_neg() } else { threshold }
                } else {
                    sample
                }
            }
            Filter::Pulsify { threshold } => {
                let threshold = if threshold < 0.0 { -threshold } else { threshold };
                let amplitude = magnitude(sample) as f32 / FULL_SCALE as f32;

                if amplitude < threshold {
                    sample
                } else if sample < 0 {
                    i16::MIN
                } else {
                    i16::MAX
                }
            }
            Filter::Normalize { factor } => round_to_sample(sample as f64 * factor as f64),
        }
    }
}
