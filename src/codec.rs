//! Byte level (de)serialization of the canonical 44 byte header followed by
//! little-endian 16-bit sample data.
//!
//! The codec exposes header fields as read and writes them back verbatim; it
//! neither validates tags nor recomputes sizes. Keeping `subchunk2_size` in
//! step with the samples is the caller's job ([`Waveform::save`](crate::Waveform::save)
//! does it before encoding).

use crate::error::Error;
use crate::header::{BITS_PER_SAMPLE, HEADER_LEN, Header};
use alloc::vec::Vec;

/// How to treat a data chunk that is shorter than `subchunk2_size` declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Fail with [`Error::TruncatedData`]
    #[default]
    Strict,
    /// Decode the samples that are present
    Lenient,
}

/// Decode a complete file in strict mode.
///
/// ```
/// use wavfx::codec;
///
/// let bytes: [u8; 48] = [
///     0x52, 0x49, 0x46, 0x46, // RIFF
///     0x28, 0x00, 0x00, 0x00, // chunk size
///     0x57, 0x41, 0x56, 0x45, // WAVE
///     0x66, 0x6d, 0x74, 0x20, // fmt_
///     0x10, 0x00, 0x00, 0x00, // chunk size
///     0x01, 0x00, // audio format
///     0x01, 0x00, // num channels
///     0x44, 0xac, 0x00, 0x00, // sample rate
///     0x88, 0x58, 0x01, 0x00, // byte rate
///     0x02, 0x00, // block align
///     0x10, 0x00, // bits per sample
///     0x64, 0x61, 0x74, 0x61, // data
///     0x04, 0x00, 0x00, 0x00, // chunk size
///     0x64, 0x00, 0x38, 0xff, // samples
/// ];
///
/// let (header, samples) = codec::decode(&bytes).unwrap();
///
/// assert_eq!(header.sample_rate, 44_100);
/// assert_eq!(samples, vec![100, -200]);
/// ```
pub fn decode(bytes: &[u8]) -> Result<(Header, Vec<i16>), Error> {
    decode_with(bytes, DecodeMode::Strict)
}

/// Decode a complete file with an explicit truncation policy
pub fn decode_with(bytes: &[u8], mode: DecodeMode) -> Result<(Header, Vec<i16>), Error> {
    let header = Header::from_slice(bytes)?;
    let data = &bytes[HEADER_LEN..];
    let samples = decode_data(&header, data, mode)?;

    Ok((header, samples))
}

/// Encode a header and its samples.
///
/// The header is written as given, followed by each sample as two
/// little-endian bytes starting at offset 44.
pub fn encode(header: &Header, samples: &[i16]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(HEADER_LEN + samples.len() * 2);

    bytes.extend_from_slice(&header.to_bytes());
    for sample in samples {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }

    bytes
}

fn check_bit_depth(header: &Header) -> Result<(), Error> {
    if header.bits_per_sample != BITS_PER_SAMPLE {
        return Err(Error::UnsupportedBitDepth(header.bits_per_sample));
    }

    Ok(())
}

/// Number of data bytes to decode given what the stream actually holds
fn usable_data_len(header: &Header, available: usize, mode: DecodeMode) -> Result<usize, Error> {
    let declared = header.subchunk2_size as usize;

    if available >= declared {
        return Ok(declared);
    }

    match mode {
        DecodeMode::Strict => Err(Error::TruncatedData {
            declared,
            available,
        }),
        DecodeMode::Lenient => {
            log::warn!(
                "data chunk truncated: {} bytes declared, decoding the {} present",
                declared,
                available
            );
            Ok(available)
        }
    }
}

fn decode_data(header: &Header, data: &[u8], mode: DecodeMode) -> Result<Vec<i16>, Error> {
    check_bit_depth(header)?;
    let len = usable_data_len(header, data.len(), mode)?;

    // A dangling odd byte is not a sample
    Ok(data[..len]
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
        .collect())
}

#[cfg(feature = "io")]
const READ_CHUNK: usize = 512;

#[cfg(feature = "io")]
pub use blocking::{decode_from, encode_to};

#[cfg(feature = "io")]
mod blocking {
    use super::*;
    use crate::error::ReadError;
    use alloc::vec;

    /// Read until `buf` is full or the reader is exhausted, returning the bytes read
    fn fill<R: embedded_io::Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, R::Error> {
        let mut filled = 0;
        while filled < buf.len() {
            match reader.read(&mut buf[filled..])? {
                0 => break,
                n => filled += n,
            }
        }
        Ok(filled)
    }

    /// Decode from a reader, consuming at most `44 + subchunk2_size` bytes.
    ///
    /// ```
    /// use wavfx::{Header, codec};
    /// use wavfx::codec::DecodeMode;
    ///
    /// let mut header = Header::mono(8_000);
    /// header.sync_data_len(3);
    /// let bytes = codec::encode(&header, &[1, 2, 3]);
    ///
    /// let (_, samples) = codec::decode_from(&mut &bytes[..], DecodeMode::Strict).unwrap();
    /// assert_eq!(samples, vec![1, 2, 3]);
    /// ```
    pub fn decode_from<R: embedded_io::Read>(
        reader: &mut R,
        mode: DecodeMode,
    ) -> Result<(Header, Vec<i16>), ReadError<R::Error>> {
        let mut head = [0; HEADER_LEN];
        let found = fill(reader, &mut head).map_err(ReadError::Reader)?;
        if found < HEADER_LEN {
            return Err(Error::Format { found }.into());
        }

        let header = Header::from_bytes(&head);
        check_bit_depth(&header)?;

        let declared = header.subchunk2_size as usize;
        let mut data = vec![];
        let mut tmp = [0; READ_CHUNK];
        while data.len() < declared {
            let want = (declared - data.len()).min(READ_CHUNK);
            match reader.read(&mut tmp[..want]) {
                Ok(0) => break,
                Ok(n) => data.extend_from_slice(&tmp[..n]),
                Err(e) => return Err(ReadError::Reader(e)),
            }
        }

        let samples = decode_data(&header, &data, mode)?;
        Ok((header, samples))
    }

    /// Encode to a writer and flush it
    pub fn encode_to<W: embedded_io::Write>(
        writer: &mut W,
        header: &Header,
        samples: &[i16],
    ) -> Result<(), W::Error> {
        writer.write_all(&header.to_bytes())?;

        let mut buffer = [0; READ_CHUNK];
        for chunk in samples.chunks(READ_CHUNK / 2) {
            for (bytes, sample) in buffer.chunks_exact_mut(2).zip(chunk) {
                bytes.copy_from_slice(&sample.to_le_bytes());
            }
            writer.write_all(&buffer[..chunk.len() * 2])?;
        }

        writer.flush()
    }
}

//-----------------------------------
// MARK: Async

/// Async versions of [`decode_from`](crate::codec::decode_from) and [`encode_to`](crate::codec::encode_to)
#[cfg(feature = "io")]
pub mod asynch {
    use super::*;
    use crate::error::ReadError;
    use alloc::vec;

    async fn fill<R: embedded_io_async::Read>(
        reader: &mut R,
        buf: &mut [u8],
    ) -> Result<usize, R::Error> {
        let mut filled = 0;
        while filled < buf.len() {
            match reader.read(&mut buf[filled..]).await? {
                0 => break,
                n => filled += n,
            }
        }
        Ok(filled)
    }

    /// Decode from an async reader, consuming at most `44 + subchunk2_size` bytes
    pub async fn decode_from<R: embedded_io_async::Read>(
        reader: &mut R,
        mode: DecodeMode,
    ) -> Result<(Header, Vec<i16>), ReadError<R::Error>> {
        let mut head = [0; HEADER_LEN];
        let found = fill(reader, &mut head).await.map_err(ReadError::Reader)?;
        if found < HEADER_LEN {
            return Err(Error::Format { found }.into());
        }

        let header = Header::from_bytes(&head);
        check_bit_depth(&header)?;

        let declared = header.subchunk2_size as usize;
        let mut data = vec![];
        let mut tmp = [0; READ_CHUNK];
        while data.len() < declared {
            let want = (declared - data.len()).min(READ_CHUNK);
            match reader.read(&mut tmp[..want]).await {
                Ok(0) => break,
                Ok(n) => data.extend_from_slice(&tmp[..n]),
                Err(e) => return Err(ReadError::Reader(e)),
            }
        }

        let samples = decode_data(&header, &data, mode)?;
        Ok((header, samples))
    }

    /// Encode to an async writer and flush it
    pub async fn encode_to<W: embedded_io_async::Write>(
        writer: &mut W,
        header: &Header,
        samples: &[i16],
    ) -> Result<(), W::Error> {
        writer.write_all(&header.to_bytes()).await?;

        let mut buffer = [0; READ_CHUNK];
        for chunk in samples.chunks(READ_CHUNK / 2) {
            for (bytes, sample) in buffer.chunks_exact_mut(2).zip(chunk) {
                bytes.copy_from_slice(&sample.to_le_bytes());
            }
            writer.write_all(&buffer[..chunk.len() * 2]).await?;
        }

        writer.flush().await
    }
}

//-----------------------------------
// MARK: Tests
