use crate::codec::{self, DecodeMode};
use crate::conversion::{Amplitude, FULL_SCALE, magnitude};
use crate::convolution;
use crate::error::Error;
use crate::header::Header;
use crate::transform::{Filter, Transform};
use alloc::vec::Vec;

#[cfg(feature = "io")]
use crate::error::ReadError;
#[cfg(feature = "std")]
use crate::error::FileError;
#[cfg(feature = "std")]
use std::io::Write;
#[cfg(feature = "std")]
use std::path::Path;
#[cfg(feature = "std")]
use tempfile::NamedTempFile;

/// A decoded WAVE file: one header and its interleaved 16-bit samples.
///
/// Cloning produces an independent copy, so an original and a processed
/// variant can live side by side:
///
/// ```
/// use wavfx::{Filter, Header, Waveform};
///
/// let original = Waveform::from_samples(Header::mono(44_100), vec![100, -200, 300, -400]);
///
/// let mut clipped = original.clone();
/// clipped.apply(Filter::clip(250));
///
/// assert_eq!(clipped.samples(), &[100, -200, 250, -250]);
/// assert_eq!(original.samples(), &[100, -200, 300, -400]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    header: Header,
    samples: Vec<i16>,
}

impl Waveform {
    /// Create a [`Waveform`] from a header and samples, updating the header size fields to match
    pub fn from_samples(mut header: Header, samples: Vec<i16>) -> Self {
        header.sync_data_len(samples.len());
        Waveform { header, samples }
    }

    /// Create a mono [`Waveform`] from normalized amplitudes.
    ///
    /// ```
    /// use wavfx::Waveform;
    ///
    /// let wav = Waveform::from_amplitudes(8_000, [0.0f32, 0.5, -1.0]);
    ///
    /// assert_eq!(wav.samples(), &[0, 16384, -32767]);
    /// assert_eq!(wav.header().subchunk2_size, 6);
    /// ```
    pub fn from_amplitudes<T, I>(sample_rate: u32, amplitudes: I) -> Self
    where
        T: Amplitude,
        I: IntoIterator<Item = T>,
    {
        let samples = amplitudes.into_iter().map(Amplitude::to_sample).collect();
        Self::from_samples(Header::mono(sample_rate), samples)
    }

    /// Decode a complete file held in memory, failing on truncated data
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Self::from_bytes_with(bytes, DecodeMode::Strict)
    }

    /// Decode a complete file held in memory.
    ///
    /// The header is kept exactly as read, even when a lenient decode found
    /// fewer samples than it declares.
    pub fn from_bytes_with(bytes: &[u8], mode: DecodeMode) -> Result<Self, Error> {
        let (header, samples) = codec::decode_with(bytes, mode)?;
        Ok(Waveform { header, samples })
    }

    /// Decode from a reader
    #[cfg(feature = "io")]
    pub fn from_reader<R: embedded_io::Read>(
        reader: &mut R,
        mode: DecodeMode,
    ) -> Result<Self, ReadError<R::Error>> {
        let (header, samples) = codec::decode_from(reader, mode)?;
        Ok(Waveform { header, samples })
    }

    /// Encode to bytes, with size fields recomputed from the current samples
    pub fn to_bytes(&self) -> Vec<u8> {
        codec::encode(&self.synced_header(), &self.samples)
    }

    /// Encode to a writer, with size fields recomputed from the current samples
    #[cfg(feature = "io")]
    pub fn write_to<W: embedded_io::Write>(&self, writer: &mut W) -> Result<(), W::Error> {
        codec::encode_to(writer, &self.synced_header(), &self.samples)
    }

    fn synced_header(&self) -> Header {
        let mut header = self.header;
        header.sync_data_len(self.samples.len());
        header
    }

    /// Header fields as read or last synchronized
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Interleaved samples
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Mutable access to the samples; the length cannot change through this
    pub fn samples_mut(&mut self) -> &mut [i16] {
        &mut self.samples
    }

    /// Replace the samples and resynchronize the header
    pub fn set_samples(&mut self, samples: Vec<i16>) -> &mut Self {
        self.header.sync_data_len(samples.len());
        self.samples = samples;
        self
    }

    /// Split into header and samples
    pub fn into_parts(self) -> (Header, Vec<i16>) {
        (self.header, self.samples)
    }

    /// Number of samples across all channels
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// `true` when there are no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterate over the samples converted to another numeric type.
    ///
    /// ```
    /// use wavfx::{Header, Waveform};
    ///
    /// let wav = Waveform::from_samples(Header::mono(48_000), vec![32767, 0, -32767]);
    ///
    /// let amplitudes: Vec<f32> = wav.iter_as::<f32>().collect();
    /// assert_eq!(amplitudes, vec![1.0, 0.0, -1.0]);
    /// ```
    pub fn iter_as<T: Amplitude>(&self) -> AmplitudeIter<'_, T> {
        AmplitudeIter {
            samples: self.samples.iter(),
            _phantom: core::marker::PhantomData,
        }
    }

    /// Map every sample through `transform` in place
    pub fn apply<T: Transform>(&mut self, transform: T) -> &mut Self {
        for sample in self.samples.iter_mut() {
            *sample = transform.apply(*sample);
        }
        self
    }

    /// Replace the samples with their full convolution with `kernel`.
    ///
    /// The result has `len + kernel.len() - 1` samples (none if either side is
    /// empty) and the header size fields are updated accordingly. Sums past
    /// the rails saturate; use [`convolve_normalized`](Self::convolve_normalized)
    /// when the kernel has gain above one.
    pub fn convolve(&mut self, kernel: &[f32]) -> &mut Self {
        log::debug!(
            "convolving {} samples with {} taps",
            self.samples.len(),
            kernel.len()
        );

        let samples = convolution::convolve(&self.samples, kernel);
        self.set_samples(samples)
    }

    /// Convolve with `kernel`, then scale so that the peak lands on full scale.
    ///
    /// Equivalent to [`convolve`](Self::convolve) followed by
    /// [`normalize`](Self::normalize), except that the scaling is computed from
    /// the unclamped sums, so nothing is flattened on the rails first.
    ///
    /// ```
    /// use wavfx::{Header, Waveform};
    ///
    /// let mut wav = Waveform::from_samples(Header::mono(44_100), vec![20_000, 30_000, 10_000]);
    /// wav.convolve_normalized(&[1.0, 1.0]);
    ///
    /// assert_eq!(wav.samples(), &[13_107, 32_767, 26_214, 6_553]);
    /// ```
    pub fn convolve_normalized(&mut self, kernel: &[f32]) -> &mut Self {
        log::debug!(
            "convolving {} samples with {} taps, normalized",
            self.samples.len(),
            kernel.len()
        );

        let samples = convolution::convolve_normalized(&self.samples, kernel);
        self.set_samples(samples)
    }

    /// Scale the signal so that its peak lands on full scale.
    ///
    /// Empty and silent signals are left untouched.
    pub fn normalize(&mut self) -> &mut Self {
        let peak = match self.maximum_intensity() {
            Ok(peak) if peak != 0 => peak,
            _ => return self,
        };

        let factor = 1.0 / (magnitude(peak) as f32 / FULL_SCALE as f32);
        log::debug!("normalizing with factor {}", factor);

        self.apply(Filter::normalize(factor))
    }

    /// The sample with the largest magnitude, sign included; the first one wins a tie
    pub fn maximum_intensity(&self) -> Result<i16, Error> {
        let (&first, rest) = self.samples.split_first().ok_or(Error::EmptySignal)?;

        Ok(rest.iter().fold(first, |max, &sample| {
            if magnitude(sample) > magnitude(max) {
                sample
            } else {
                max
            }
        }))
    }

    /// [`maximum_intensity`](Self::maximum_intensity) as a normalized amplitude
    pub fn maximum_amplitude(&self) -> Result<f32, Error> {
        self.maximum_intensity().map(f32::from_sample)
    }
}

//-----------------------------------
// MARK: Files

#[cfg(feature = "std")]
impl Waveform {
    /// Load a file, failing on truncated data.
    ///
    /// ```no_run
    /// use wavfx::{Filter, Waveform};
    ///
    /// let mut wav = Waveform::load("sine.wav")?;
    /// wav.apply(Filter::gain(0.4));
    /// wav.save("gain.wav")?;
    /// # Ok::<(), wavfx::FileError>(())
    /// ```
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FileError> {
        Self::load_with(path, DecodeMode::Strict)
    }

    /// Load a file with an explicit truncation policy
    pub fn load_with(path: impl AsRef<Path>, mode: DecodeMode) -> Result<Self, FileError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| FileError::io(path, e))?;

        Self::from_bytes_with(&bytes, mode).map_err(|e| FileError::decode(path, e))
    }

    /// Write the file, replacing `path`.
    ///
    /// Size fields are recomputed from the samples. The bytes go to a fresh
    /// temporary file next to `path` that is renamed over it once complete;
    /// on failure the temporary file is removed and the error is returned, so
    /// callers writing many variants can carry on.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), FileError> {
        let path = path.as_ref();

        let written = staging_file(path).and_then(|mut staged| {
            staged.write_all(&self.to_bytes())?;
            staged.persist(path)?;
            Ok(())
        });

        self.saved(path, written)
    }

    /// Async version of [`load`](Self::load)
    pub async fn load_async(path: impl AsRef<Path>) -> Result<Self, FileError> {
        Self::load_async_with(path, DecodeMode::Strict).await
    }

    /// Async version of [`load_with`](Self::load_with)
    pub async fn load_async_with(
        path: impl AsRef<Path>,
        mode: DecodeMode,
    ) -> Result<Self, FileError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| FileError::io(path, e))?;

        Self::from_bytes_with(&bytes, mode).map_err(|e| FileError::decode(path, e))
    }

    /// Async version of [`save`](Self::save)
    pub async fn save_async(&self, path: impl AsRef<Path>) -> Result<(), FileError> {
        let path = path.as_ref();

        let written = match staging_file(path) {
            Ok(staged) => match tokio::fs::write(staged.path(), self.to_bytes()).await {
                Ok(()) => staged.persist(path).map(drop).map_err(std::io::Error::from),
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };

        self.saved(path, written)
    }

    fn saved(&self, path: &Path, written: std::io::Result<()>) -> Result<(), FileError> {
        if let Err(e) = written {
            log::warn!("saving {} failed: {}", path.display(), e);
            return Err(FileError::io(path, e));
        }

        log::info!("saved {} samples to {}", self.samples.len(), path.display());
        Ok(())
    }
}

/// Uniquely named temporary file in the directory that will hold `path`
#[cfg(feature = "std")]
fn staging_file(path: &Path) -> std::io::Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    tempfile::Builder::new()
        .prefix(".wavfx-")
        .suffix(".part")
        .tempfile_in(dir)
}

/// Iterator that converts samples to a generic numeric type
pub struct AmplitudeIter<'a, T> {
    samples: core::slice::Iter<'a, i16>,
    _phantom: core::marker::PhantomData<T>,
}

impl<T: Amplitude> Iterator for AmplitudeIter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.samples.next().map(|&sample| T::from_sample(sample))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.samples.size_hint()
    }
}

impl<T: Amplitude> ExactSizeIterator for AmplitudeIter<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn mono(samples: Vec<i16>) -> Waveform {
        Waveform::from_samples(Header::mono(44_100), samples)
    }

    fn sine(len: usize, amplitude: f64) -> Vec<i16> {
        (0..len)
            .map(|i| {
                let t = i as f64 / 44_100.0;
                (amplitude * (2.0 * core::f64::consts::PI * 240.0 * t).sin() * 32767.0) as i16
            })
            .collect()
    }

    #[test]
    fn from_samples_syncs_header() {
        let wav = mono(vec![100, -200, 300, -400]);

        assert_eq!(wav.header().subchunk2_size, 8);
        assert_eq!(wav.header().chunk_size, 44);
        assert_eq!(wav.header().num_samples(), wav.len());
    }

    #[test]
    fn clip_scenario() {
        let mut wav = mono(vec![100, -200, 300, -400]);
        wav.apply(Filter::clip(250));

        assert_eq!(wav.samples(), &[100, -200, 250, -250]);
    }

    #[test]
    fn gain_scenario_hits_guard() {
        let mut wav = mono(vec![16384, -16384, 1000]);
        wav.apply(Filter::gain(2.0));

        assert_eq!(wav.samples(), &[16384, -16384, 2000]);
    }

    #[test]
    fn filters_chain_in_order() {
        let mut gain_then_clip = mono(vec![10_000, -12_000]);
        gain_then_clip
            .apply(Filter::gain(2.0))
            .apply(Filter::clip(i16::MAX / 2));

        let mut clip_then_gain = mono(vec![10_000, -12_000]);
        clip_then_gain
            .apply(Filter::clip(i16::MAX / 2))
            .apply(Filter::gain(2.0));

        assert_eq!(gain_then_clip.samples(), &[16383, -16383]);
        assert_eq!(clip_then_gain.samples(), &[20_000, -24_000]);
    }

    #[test]
    fn copies_are_independent() {
        let original = mono(vec![1, 2, 3]);
        let mut modulated = original.clone();
        modulated.apply(Filter::gain(3.0)).convolve(&[1.0, 1.0]);

        assert_eq!(original.samples(), &[1, 2, 3]);
        assert_eq!(original.header().subchunk2_size, 6);
        assert_eq!(modulated.samples(), &[3, 9, 15, 9]);
        assert_eq!(modulated.header().subchunk2_size, 8);
    }

    #[test]
    fn maximum_intensity_keeps_sign() {
        assert_eq!(mono(vec![5, -9, 7]).maximum_intensity(), Ok(-9));
        assert_eq!(mono(vec![-7, 7]).maximum_intensity(), Ok(-7));
        assert_eq!(mono(vec![i16::MAX, i16::MIN]).maximum_intensity(), Ok(i16::MIN));
    }

    #[test]
    fn empty_signal() {
        let mut wav = mono(vec![]);

        assert_eq!(wav.maximum_intensity(), Err(Error::EmptySignal));
        assert_eq!(wav.maximum_amplitude(), Err(Error::EmptySignal));

        wav.normalize();
        assert!(wav.is_empty());
    }

    #[test]
    fn normalize_silence_is_noop() {
        let mut wav = mono(vec![0; 16]);
        wav.normalize();

        assert_eq!(wav.samples(), &[0; 16]);
    }

    #[test]
    fn normalize_puts_peak_on_full_scale() {
        for peak in [-30_000, -12_345, 1, 777, 16_384, 32_766] {
            let mut wav = mono(vec![peak / 2, peak, -(peak / 3), 0]);
            wav.normalize();

            assert_eq!(wav.samples()[1], if peak < 0 { -i16::MAX } else { i16::MAX });
            assert_eq!(wav.maximum_amplitude().unwrap().abs(), 1.0);
            assert!(wav.iter_as::<f32>().all(|a| a.abs() <= 1.0));
        }
    }

    #[test]
    fn normalize_negative_rail() {
        let mut wav = mono(vec![i16::MIN, 16_384, i16::MAX]);
        wav.normalize();

        assert_eq!(wav.samples()[0], -i16::MAX);
        assert!(wav.iter_as::<f32>().all(|a| a.abs() <= 1.0));
    }

    #[test]
    fn normalize_sine() {
        let mut wav = mono(sine(441, 0.66));
        wav.normalize();

        let peak = wav.maximum_intensity().unwrap();
        assert_eq!(peak.unsigned_abs(), i16::MAX as u16);
    }

    #[test]
    fn convolve_resizes_header() {
        let mut wav = mono(vec![1000, -1000, 500, 0, 250]);
        wav.convolve(&[0.5, 0.25, 0.0]);

        assert_eq!(wav.len(), 7);
        assert_eq!(wav.header().subchunk2_size, 14);
        assert_eq!(wav.header().chunk_size, 36 + 14);
        assert_eq!(wav.samples(), &[500, -250, 0, 125, 125, 63, 0]);
    }

    #[test]
    fn convolve_then_normalize_pipeline() {
        let kernel: [f32; 13] = [
            0.1, 0.0, -0.2, 0.0, 0.3, 0.0, -0.1, 0.0, 0.01, 0.0, -0.1, 0.0, 0.1111,
        ];
        let original = mono(sine(2_000, 0.66));

        let mut modulated = original.clone();
        modulated.convolve(&kernel).normalize();

        assert_eq!(modulated.len(), original.len() + kernel.len() - 1);
        assert_eq!(
            modulated.maximum_intensity().unwrap().unsigned_abs(),
            i16::MAX as u16
        );

        let decoded = Waveform::from_bytes(&modulated.to_bytes()).unwrap();
        assert_eq!(decoded, modulated);
    }

    #[test]
    fn convolve_normalized_with_kernel_gain() {
        let mut clamped = mono(vec![20_000, 30_000, 10_000]);
        clamped.convolve(&[1.0, 1.0]).normalize();
        assert_eq!(clamped.samples(), &[20_000, 32_767, 32_767, 10_000]);

        let mut scaled = mono(vec![20_000, 30_000, 10_000]);
        scaled.convolve_normalized(&[1.0, 1.0]);
        assert_eq!(scaled.samples(), &[13_107, 32_767, 26_214, 6_553]);
        assert_eq!(scaled.header().subchunk2_size, 8);
        assert_eq!(scaled.maximum_amplitude(), Ok(1.0));
    }

    #[test]
    fn convolve_normalized_matches_pipeline_within_range() {
        let kernel = [0.25f32, 0.5, 0.25];
        let samples = vec![1_000, -3_000, 2_000, 500];

        let mut pipeline = mono(samples.clone());
        pipeline.convolve(&kernel).normalize();

        let mut combined = mono(samples);
        combined.convolve_normalized(&kernel);

        for (a, b) in pipeline.samples().iter().zip(combined.samples()) {
            assert!((*a as i32 - *b as i32).abs() <= 1);
        }
        assert_eq!(combined.maximum_intensity(), pipeline.maximum_intensity());
    }

    #[test]
    fn set_samples_syncs_header() {
        let mut wav = mono(vec![1, 2, 3, 4]);
        wav.set_samples(vec![9]);

        assert_eq!(wav.header().subchunk2_size, 2);
        assert_eq!(wav.into_parts().1, vec![9]);
    }

    #[test]
    fn to_bytes_round_trip() {
        let wav = Waveform::from_samples(Header::new(48_000, 2), sine(64, 0.4));
        let bytes = wav.to_bytes();

        assert_eq!(bytes.len(), 44 + 128);
        assert_eq!(Waveform::from_bytes(&bytes).unwrap(), wav);
    }

    #[test]
    fn lenient_bytes_keep_declared_header() {
        let wav = mono(vec![1, 2, 3, 4]);
        let bytes = wav.to_bytes();

        let truncated = &bytes[..bytes.len() - 3];
        assert_eq!(
            Waveform::from_bytes(truncated),
            Err(Error::TruncatedData {
                declared: 8,
                available: 5
            })
        );

        let lenient = Waveform::from_bytes_with(truncated, DecodeMode::Lenient).unwrap();
        assert_eq!(lenient.samples(), &[1, 2]);
        assert_eq!(lenient.header().subchunk2_size, 8);

        let resaved = Waveform::from_bytes(&lenient.to_bytes()).unwrap();
        assert_eq!(resaved.header().subchunk2_size, 4);
        assert_eq!(resaved.samples(), &[1, 2]);
    }

    #[test]
    fn iter_as_widens() {
        let wav = mono(vec![i16::MIN, 0, i16::MAX]);
        let values: Vec<i32> = wav.iter_as::<i32>().collect();

        assert_eq!(values, vec![-32768, 0, 32767]);
        assert_eq!(wav.iter_as::<f64>().len(), 3);
    }

    #[cfg(feature = "io")]
    #[test]
    fn reader_and_writer() {
        let wav = mono(vec![7, -7, 700]);
        let mut out = [0u8; 50];
        let mut writer = &mut out[..];
        wav.write_to(&mut writer).unwrap();

        let decoded = Waveform::from_reader(&mut &out[..], DecodeMode::Strict).unwrap();
        assert_eq!(decoded, wav);
    }

    #[test]
    fn sizes_follow_encoded_samples_whatever_the_bit_depth() {
        let mut header = Header::mono(8_000);
        header.bits_per_sample = 8;

        let wav = Waveform::from_samples(header, vec![1, 2, 3, 4]);
        let bytes = wav.to_bytes();

        assert_eq!(wav.header().subchunk2_size, 8);
        assert_eq!(bytes.len(), 44 + 8);
        assert_eq!(&bytes[40..44], &8u32.to_le_bytes());
    }

    #[cfg(feature = "std")]
    mod files {
        use super::*;

        fn entries(dir: &Path) -> Vec<String> {
            let mut names: Vec<_> = std::fs::read_dir(dir)
                .unwrap()
                .map(|entry| entry.unwrap().file_name().into_string().unwrap())
                .collect();
            names.sort();
            names
        }

        #[test]
        fn save_and_load() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("sine.wav");

            let wav = mono(sine(1_000, 0.5));
            wav.save(&path).unwrap();

            assert_eq!(std::fs::metadata(&path).unwrap().len(), 44 + 2_000);
            assert_eq!(Waveform::load(&path).unwrap(), wav);
            assert_eq!(entries(dir.path()), vec!["sine.wav"]);
        }

        #[test]
        fn save_leaves_unrelated_part_files_alone() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("out.wav");
            let user_file = dir.path().join("out.wav.part");
            std::fs::write(&user_file, b"keep me").unwrap();

            mono(vec![1, 2]).save(&path).unwrap();

            assert_eq!(std::fs::read(&user_file).unwrap(), b"keep me");
            assert_eq!(entries(dir.path()), vec!["out.wav", "out.wav.part"]);
        }

        #[test]
        fn save_to_a_directory_name_fails_cleanly() {
            let dir = tempfile::tempdir().unwrap();
            let inner = dir.path().join("inner");
            std::fs::create_dir(&inner).unwrap();

            assert!(mono(vec![1]).save(inner.join("..")).is_err());
            assert!(mono(vec![1]).save(&inner).is_err());
            assert_eq!(entries(dir.path()), vec!["inner"]);
            assert!(entries(&inner).is_empty());
        }

        #[test]
        fn save_overwrites_existing_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("out.wav");
            std::fs::write(&path, vec![0xaa; 4_096]).unwrap();

            let wav = mono(vec![1, 2]);
            wav.save(&path).unwrap();

            assert_eq!(std::fs::read(&path).unwrap(), wav.to_bytes());
        }

        #[test]
        fn save_failure_is_reported_and_leaves_nothing() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("missing").join("out.wav");

            let err = mono(vec![1]).save(&path).unwrap_err();

            match err {
                FileError::Io { path: reported, .. } => assert_eq!(reported, path),
                other => panic!("unexpected error: {other:?}"),
            }
            assert!(!path.exists());
            assert!(entries(dir.path()).is_empty());
        }

        #[test]
        fn save_failure_does_not_stop_a_batch() {
            let dir = tempfile::tempdir().unwrap();
            let wav = mono(sine(100, 0.5));
            let targets = [
                dir.path().join("clip.wav"),
                dir.path().join("nope").join("gain.wav"),
                dir.path().join("pulse.wav"),
            ];

            let results: Vec<_> = targets.iter().map(|t| wav.save(t)).collect();

            assert!(results[0].is_ok());
            assert!(results[1].is_err());
            assert!(results[2].is_ok());
        }

        #[test]
        fn load_missing_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("absent.wav");

            assert!(matches!(Waveform::load(&path), Err(FileError::Io { .. })));
        }

        #[test]
        fn load_truncated_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("cut.wav");
            let bytes = mono(vec![1, 2, 3, 4]).to_bytes();
            std::fs::write(&path, &bytes[..bytes.len() - 2]).unwrap();

            match Waveform::load(&path) {
                Err(FileError::Decode { source, .. }) => assert_eq!(
                    source,
                    Error::TruncatedData {
                        declared: 8,
                        available: 6
                    }
                ),
                other => panic!("unexpected result: {other:?}"),
            }

            let wav = Waveform::load_with(&path, DecodeMode::Lenient).unwrap();
            assert_eq!(wav.samples(), &[1, 2, 3]);
        }

        #[test]
        fn load_short_header() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("short.wav");
            std::fs::write(&path, b"RIFF").unwrap();

            assert!(matches!(
                Waveform::load(&path),
                Err(FileError::Decode {
                    source: Error::Format { found: 4 },
                    ..
                })
            ));
        }

        #[tokio::test]
        async fn async_save_and_load() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("async.wav");

            let mut wav = mono(sine(500, 0.8));
            wav.apply(Filter::pulsify(0.5));
            wav.save_async(&path).await.unwrap();

            let loaded = Waveform::load_async(&path).await.unwrap();
            assert_eq!(loaded, wav);
            assert_eq!(Waveform::load(&path).unwrap(), wav);
        }

        #[tokio::test]
        async fn async_save_failure() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("missing").join("out.wav");

            assert!(mono(vec![1]).save_async(&path).await.is_err());
            assert!(entries(dir.path()).is_empty());
        }

        #[tokio::test]
        async fn async_save_leaves_only_the_destination() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("async.wav");
            std::fs::write(dir.path().join("async.wav.part"), b"x").unwrap();

            mono(vec![3, 2, 1]).save_async(&path).await.unwrap();

            assert_eq!(entries(dir.path()), vec!["async.wav", "async.wav.part"]);
            assert_eq!(Waveform::load(&path).unwrap().samples(), &[3, 2, 1]);
        }
    }
}
