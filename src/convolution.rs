//! Direct-sum FIR convolution.
//!
//! The input is zero padded at both ends, so every partial overlap of the
//! kernel contributes an output sample:
//!
//! ```text
//! output[i] = sum over k of kernel[k] * samples[i - k],  0 <= i - k < n
//! ```

use crate::conversion::{FULL_SCALE, round_to_sample};
use alloc::vec;
use alloc::vec::Vec;

/// Output length of a full convolution of `samples` values with `taps` coefficients.
///
/// ```
/// use wavfx::convolution::convolved_len;
///
/// assert_eq!(convolved_len(4, 3), 6);
/// assert_eq!(convolved_len(4, 0), 0);
/// assert_eq!(convolved_len(0, 3), 0);
/// ```
pub fn convolved_len(samples: usize, taps: usize) -> usize {
    if samples == 0 || taps == 0 {
        0
    } else {
        samples + taps - 1
    }
}

/// Full convolution, accumulated in `f64` and left unscaled.
///
/// Values may exceed the sample range; nothing is clamped here.
pub fn convolve_raw(samples: &[i16], kernel: &[f32]) -> Vec<f64> {
    let mut output = vec![0.0; convolved_len(samples.len(), kernel.len())];

    for (i, &sample) in samples.iter().enumerate() {
        let sample = sample as f64;

        for (k, &coefficient) in kernel.iter().enumerate() {
            output[i + k] += coefficient as f64 * sample;
        }
    }

    output
}

/// Full convolution rounded back into the sample domain.
///
/// Each sum is rounded half away from zero; sums beyond the rails end up on
/// the rail through the saturating float cast, so follow up with a
/// normalization or clip when the kernel has gain above one.
pub fn convolve(samples: &[i16], kernel: &[f32]) -> Vec<i16> {
    convolve_raw(samples, kernel)
        .into_iter()
        .map(round_to_sample)
        .collect()
}

/// Full convolution scaled so that the largest sum lands on full scale.
///
/// The scaling works on the unclamped `f64` sums, so a kernel with gain above
/// one keeps the relative shape of the signal instead of flattening on the
/// rails. An all-zero result is returned as is.
///
/// ```
/// use wavfx::convolution::convolve_normalized;
///
/// let out = convolve_normalized(&[20_000, 30_000, 10_000], &[1.0, 1.0]);
/// assert_eq!(out, vec![13_107, 32_767, 26_214, 6_553]);
/// ```
pub fn convolve_normalized(samples: &[i16], kernel: &[f32]) -> Vec<i16> {
    let raw = convolve_raw(samples, kernel);
    let peak = raw
        .iter()
        .map(|&value| if value < 0.0 { -value } else { value })
        .fold(0.0, f64::max);

    if peak == 0.0 {
        return raw.into_iter().map(round_to_sample).collect();
    }

    raw.into_iter()
        .map(|value| round_to_sample(value * FULL_SCALE as f64 / peak))
        .collect()
}
