/// Largest representable sample magnitude on the positive rail
pub const FULL_SCALE: i16 = i16::MAX;

/// Conversion between 16-bit samples and another numeric representation.
///
/// Floating point types are normalized against [`FULL_SCALE`], so `32767`
/// maps to `1.0` and `-32768` to slightly below `-1.0`.
pub trait Amplitude: Sized + Copy {
    /// Convert a sample to the target type
    fn from_sample(sample: i16) -> Self;
    /// Convert back to a sample, rounding to nearest and saturating at the rails
    fn to_sample(self) -> i16;
}

impl Amplitude for f32 {
    fn from_sample(sample: i16) -> Self {
        sample as f32 / FULL_SCALE as f32
    }
    fn to_sample(self) -> i16 {
        round_to_sample((self * FULL_SCALE as f32) as f64)
    }
}

impl Amplitude for f64 {
    fn from_sample(sample: i16) -> Self {
        sample as f64 / FULL_SCALE as f64
    }
    fn to_sample(self) -> i16 {
        round_to_sample(self * FULL_SCALE as f64)
    }
}

impl Amplitude for i16 {
    fn from_sample(sample: i16) -> Self {
        sample
    }
    fn to_sample(self) -> i16 {
        self
    }
}

impl Amplitude for i32 {
    fn from_sample(sample: i16) -> Self {
        sample as i32
    }
    fn to_sample(self) -> i16 {
        self.clamp(i16::MIN as i32, i16::MAX as i32) as i16
    }
}

/// Round half away from zero, then saturate into the sample range
pub(crate) fn round_to_sample(value: f64) -> i16 {
    // `as` truncates toward zero and saturates, NaN becomes 0
    if value >= 0.0 {
        (value + 0.5) as i16
    } else {
        (value - 0.5) as i16
    }
}

/// Magnitude of a sample widened so that `-32768` does not overflow
pub(crate) fn magnitude(sample: i16) -> i32 {
    (sample as i32).abs()
}
