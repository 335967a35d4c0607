use thiserror::Error;

/// Error type for decoding failures and signal queries
#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum Error {
    /// The stream ended before the 44 header bytes were read
    #[error("incomplete header: expected 44 bytes, found {found}")]
    Format {
        /// Number of header bytes actually available
        found: usize,
    },
    /// The data chunk declares more bytes than the stream holds
    #[error("truncated data chunk: {declared} bytes declared, {available} available")]
    TruncatedData {
        /// `subchunk2_size` as read from the header
        declared: usize,
        /// Data bytes present after the header
        available: usize,
    },
    /// Amplitude query on a waveform without samples
    #[error("the signal contains no samples")]
    EmptySignal,
    /// Unsupported bit depth
    #[error("unsupported bit depth: {0}")]
    UnsupportedBitDepth(u16),
    /// Unsupported audio format
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(u16),
    /// No RIFF tag found
    #[error("missing RIFF chunk id")]
    NoRiffChunkFound,
    /// No WAVE tag found
    #[error("missing WAVE format tag")]
    NoWaveTagFound,
    /// No `fmt ` tag found
    #[error("missing fmt sub-chunk id")]
    NoFmtChunkFound,
    /// No `data` tag found
    #[error("missing data sub-chunk id")]
    NoDataChunkFound,
}

/// Error returned when decoding from a generic reader
#[cfg(feature = "io")]
#[derive(Debug, PartialEq)]
pub enum ReadError<E> {
    /// Error from the underlying reader
    Reader(E),
    /// Error from the parser
    Parser(Error),
}

#[cfg(feature = "io")]
impl<E> From<Error> for ReadError<E> {
    fn from(e: Error) -> Self {
        ReadError::Parser(e)
    }
}

#[cfg(feature = "io")]
impl<E: core::fmt::Debug> core::fmt::Display for ReadError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ReadError::Reader(e) => write!(f, "reader error: {e:?}"),
            ReadError::Parser(e) => write!(f, "{e}"),
        }
    }
}

/// Error from loading or saving a waveform on the file system
#[cfg(feature = "std")]
#[derive(Debug, Error)]
pub enum FileError {
    /// Opening, reading, writing or renaming failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// Source or destination of the failed operation
        path: std::path::PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },
    /// The file was read but is not a decodable WAVE file
    #[error("cannot decode {}: {source}", .path.display())]
    Decode {
        /// Source file
        path: std::path::PathBuf,
        /// Underlying cause
        #[source]
        source: Error,
    },
}

#[cfg(feature = "std")]
impl FileError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        FileError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn decode(path: &std::path::Path, source: Error) -> Self {
        FileError::Decode {
            path: path.to_path_buf(),
            source,
        }
    }
}
