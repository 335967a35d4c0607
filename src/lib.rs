//! Read, filter and write 16-bit PCM WAVE files.
//!
//! A file is the canonical 44 byte header followed by little-endian samples.
//! [`Waveform`] owns both and runs per-sample [`Filter`]s, closures and FIR
//! convolution over the samples.
//!
//! Loading a file and saving filtered variants:
//! ```no_run
//! use wavfx::{Filter, Waveform};
//!
//! fn main() -> Result<(), wavfx::FileError> {
//!     let original = Waveform::load("sine.wav")?;
//!
//!     let mut clip = original.clone();
//!     clip.apply(Filter::clip(i16::MAX / 4));
//!     clip.save("clip.wav")?;
//!
//!     let mut gain = original.clone();
//!     gain.apply(Filter::gain(0.4));
//!     gain.save("gain.wav")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! Convolving with a kernel, then bringing the peak back to full scale:
//! ```
//! use wavfx::{Header, Waveform};
//!
//! let mut wav = Waveform::from_samples(Header::mono(44_100), vec![1000, -2000, 500]);
//! wav.convolve(&[0.5, 0.0, -0.25]).normalize();
//!
//! assert_eq!(wav.len(), 5);
//! assert_eq!(wav.header().subchunk2_size, 10);
//! assert_eq!(wav.maximum_intensity(), Ok(-32767));
//! ```
//!
//! Working with the raw codec:
//! ```
//! use wavfx::{Header, codec};
//!
//! let mut header = Header::mono(48_000);
//! header.sync_data_len(4);
//!
//! let bytes = codec::encode(&header, &[1, 2, 3, -1]);
//! assert_eq!(bytes.len(), 52);
//!
//! let (decoded, samples) = codec::decode(&bytes).unwrap();
//! assert_eq!(decoded, header);
//! assert_eq!(samples, vec![1, 2, 3, -1]);
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod codec;
mod conversion;
pub mod convolution;
mod error;
mod header;
mod transform;
mod waveform;

pub use codec::DecodeMode;
pub use conversion::{Amplitude, FULL_SCALE};
pub use error::Error;
pub use header::{BITS_PER_SAMPLE, ChunkId, DATA, FMT, HEADER_LEN, Header, PCM, RIFF, WAVE};
pub use transform::{Filter, Transform};
pub use waveform::{AmplitudeIter, Waveform};

#[cfg(feature = "io")]
pub use error::ReadError;
#[cfg(feature = "std")]
pub use error::FileError;
