use crate::error::Error;

/// Size of the canonical header in bytes; sample data starts at this offset
pub const HEADER_LEN: usize = 44;

/// `audio_format` value for uncompressed PCM
pub const PCM: u16 = 1;

/// The only sample width this crate decodes
pub const BITS_PER_SAMPLE: u16 = 16;

/// Four byte chunk identifier as it appears on disk
pub type ChunkId = [u8; 4];

/// `RIFF` chunk id
pub const RIFF: ChunkId = *b"RIFF";
/// `WAVE` format tag
pub const WAVE: ChunkId = *b"WAVE";
/// `fmt ` sub-chunk id
pub const FMT: ChunkId = *b"fmt ";
/// `data` sub-chunk id
pub const DATA: ChunkId = *b"data";

/// The canonical 44 byte WAVE header: RIFF descriptor, `fmt ` and `data` sub-chunk headers.
///
/// Fields are kept exactly as read so that non-conformant captures survive a
/// load/save cycle; use [`Header::validate`] to enforce the canonical layout.
///
/// for more information see [`here`]
///
/// [`here`]: http://soundfile.sapp.org/doc/WaveFormat/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// should read `RIFF`
    pub chunk_id: ChunkId,
    /// total file size minus 8
    pub chunk_size: u32,
    /// should read `WAVE`
    pub format: ChunkId,
    /// should read `fmt `
    pub subchunk1_id: ChunkId,
    /// 16 for PCM
    pub subchunk1_size: u32,
    /// 1 for PCM, anything else is compressed
    pub audio_format: u16,
    /// number of interleaved channels
    pub num_channels: u16,
    /// sample rate, typical values are `44_100` or `48_000`
    pub sample_rate: u32,
    /// `sample_rate * num_channels * bits_per_sample / 8`
    pub byte_rate: u32,
    /// `num_channels * bits_per_sample / 8`
    pub block_align: u16,
    /// bit depth of each sample
    pub bits_per_sample: u16,
    /// should read `data`
    pub subchunk2_id: ChunkId,
    /// number of sample data bytes following the header
    pub subchunk2_size: u32,
}

impl Header {
    /// Create a canonical 16-bit PCM header without any sample data.
    ///
    /// Rates and channel counts too large for the derived fields saturate them.
    ///
    /// ```
    /// use wavfx::Header;
    ///
    /// let header = Header::new(48_000, 2);
    ///
    /// assert_eq!(header.byte_rate, 192_000);
    /// assert_eq!(header.block_align, 4);
    /// assert_eq!(header.chunk_size, 36);
    /// assert!(header.validate().is_ok());
    /// ```
    pub fn new(sample_rate: u32, num_channels: u16) -> Self {
        let block_align = num_channels.saturating_mul(BITS_PER_SAMPLE / 8);

        Header {
            chunk_id: RIFF,
            chunk_size: 36,
            format: WAVE,
            subchunk1_id: FMT,
            subchunk1_size: 16,
            audio_format: PCM,
            num_channels,
            sample_rate,
            byte_rate: sample_rate.saturating_mul(block_align as u32),
            block_align,
            bits_per_sample: BITS_PER_SAMPLE,
            subchunk2_id: DATA,
            subchunk2_size: 0,
        }
    }

    /// Canonical mono header, e.g. `Header::mono(44_100)`
    pub fn mono(sample_rate: u32) -> Self {
        Self::new(sample_rate, 1)
    }

    /// Parse the header fields in file order, all integers little-endian
    pub fn from_bytes(bytes: &[u8; HEADER_LEN]) -> Self {
        let tag = |at: usize| -> ChunkId { [bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]] };
        let u16_at = |at: usize| u16::from_le_bytes([bytes[at], bytes[at + 1]]);
        let u32_at = |at: usize| u32::from_le_bytes(tag(at));

        Header {
            chunk_id: tag(0),
            chunk_size: u32_at(4),
            format: tag(8),
            subchunk1_id: tag(12),
            subchunk1_size: u32_at(16),
            audio_format: u16_at(20),
            num_channels: u16_at(22),
            sample_rate: u32_at(24),
            byte_rate: u32_at(28),
            block_align: u16_at(32),
            bits_per_sample: u16_at(34),
            subchunk2_id: tag(36),
            subchunk2_size: u32_at(40),
        }
    }

    /// Parse a header from the start of a slice
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        let fixed: &[u8; HEADER_LEN] = bytes
            .get(..HEADER_LEN)
            .and_then(|b| b.try_into().ok())
            .ok_or(Error::Format { found: bytes.len() })?;

        Ok(Self::from_bytes(fixed))
    }

    /// Serialize the header verbatim, field by field
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0; HEADER_LEN];
        let mut put = |at: usize, field: &[u8]| bytes[at..at + field.len()].copy_from_slice(field);

        put(0, &self.chunk_id);
        put(4, &self.chunk_size.to_le_bytes());
        put(8, &self.format);
        put(12, &self.subchunk1_id);
        put(16, &self.subchunk1_size.to_le_bytes());
        put(20, &self.audio_format.to_le_bytes());
        put(22, &self.num_channels.to_le_bytes());
        put(24, &self.sample_rate.to_le_bytes());
        put(28, &self.byte_rate.to_le_bytes());
        put(32, &self.block_align.to_le_bytes());
        put(34, &self.bits_per_sample.to_le_bytes());
        put(36, &self.subchunk2_id);
        put(40, &self.subchunk2_size.to_le_bytes());

        bytes
    }

    /// Check the tags and format fields against the canonical 16-bit PCM layout.
    ///
    /// The codec never calls this; rejecting malformed files is up to the caller.
    pub fn validate(&self) -> Result<(), Error> {
        if self.chunk_id != RIFF {
            return Err(Error::NoRiffChunkFound);
        }
        if self.format != WAVE {
            return Err(Error::NoWaveTagFound);
        }
        if self.subchunk1_id != FMT {
            return Err(Error::NoFmtChunkFound);
        }
        if self.audio_format != PCM {
            return Err(Error::UnsupportedFormat(self.audio_format));
        }
        if self.bits_per_sample != BITS_PER_SAMPLE {
            return Err(Error::UnsupportedBitDepth(self.bits_per_sample));
        }
        if self.subchunk2_id != DATA {
            return Err(Error::NoDataChunkFound);
        }

        Ok(())
    }

    /// Bytes occupied by one sample of one channel
    pub fn bytes_per_sample(&self) -> usize {
        (self.bits_per_sample / 8) as usize
    }

    /// Number of sample values (all channels) the data chunk declares
    pub fn num_samples(&self) -> usize {
        match self.bytes_per_sample() {
            0 => 0,
            n => self.subchunk2_size as usize / n,
        }
    }

    /// Playback length in seconds
    pub fn duration_secs(&self) -> f64 {
        let frames = self.num_samples() as f64 / self.num_channels.max(1) as f64;

        match self.sample_rate {
            0 => 0.0,
            rate => frames / rate as f64,
        }
    }

    /// Recompute the size fields for `len` sample values as the codec writes them.
    ///
    /// Samples are always encoded as 16-bit, whatever `bits_per_sample` says.
    /// Sizes past `u32::MAX` saturate.
    pub fn sync_data_len(&mut self, len: usize) {
        let bytes = len.saturating_mul((BITS_PER_SAMPLE / 8) as usize);

        self.subchunk2_size = u32::try_from(bytes).unwrap_or(u32::MAX);
        self.chunk_size = self.subchunk2_size.saturating_add(HEADER_LEN as u32 - 8);
    }
}
