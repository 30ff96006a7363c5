//! Error types for compression operations.

use core::fmt;

use thiserror::Error;

/// Result type alias for compression operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Part of a compressed stream being read when an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// The leading magic number.
    Magic,
    /// The serialized code description following the magic.
    Header,
    /// The encoded symbols following the header.
    Content,
}

impl Section {
    /// Get section name as string.
    pub fn name(self) -> &'static str {
        match self {
            Section::Magic => "magic",
            Section::Header => "header",
            Section::Content => "content",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compression error types.
#[derive(Debug, Error)]
pub enum Error {
    /// Stream does not start with the expected magic number.
    #[error("bad magic: expected 0x{expected:08x}, found {}", fmt_magic(.found))]
    BadMagic { expected: u32, found: Option<u32> },

    /// Input ended before the end-of-stream marker was decoded.
    #[error("truncated stream: input ended in {section} after {bits_read} bits")]
    Truncated { section: Section, bits_read: u64 },

    /// Input data is corrupted or invalid.
    #[error("corrupted data: {message}")]
    CorruptedData { message: String },

    /// Buffer too small for output.
    #[error("buffer too small: need {required} bytes, got {provided}")]
    BufferTooSmall { required: usize, provided: usize },

    /// I/O error from underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unsupported feature or input.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

fn fmt_magic(found: &Option<u32>) -> String {
    match found {
        Some(magic) => format!("0x{magic:08x}"),
        None => "end of stream".to_string(),
    }
}

impl Error {
    /// Create a bad magic error.
    pub fn bad_magic(expected: u32, found: Option<u32>) -> Self {
        Error::BadMagic { expected, found }
    }

    /// Create a truncated stream error.
    pub fn truncated(section: Section, bits_read: u64) -> Self {
        Error::Truncated { section, bits_read }
    }

    /// Create a corrupted data error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Error::CorruptedData {
            message: message.into(),
        }
    }

    /// Create a corrupted data error with bit offset context.
    pub fn corrupted_at(message: impl Into<String>, bit_offset: u64) -> Self {
        Error::CorruptedData {
            message: format!("{} at bit {}", message.into(), bit_offset),
        }
    }

    /// Create a buffer too small error.
    pub fn buffer_too_small(required: usize, provided: usize) -> Self {
        Error::BufferTooSmall { required, provided }
    }

    /// Create an unsupported input error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Error::Unsupported(message.into())
    }

    /// Check if the error means the input is not a valid compressed stream.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Error::BadMagic { .. } | Error::Truncated { .. } | Error::CorruptedData { .. }
        )
    }

    /// Get error category for metrics.
    pub fn category(&self) -> &'static str {
        match self {
            Error::BadMagic { .. } => "bad_magic",
            Error::Truncated { .. } => "truncated",
            Error::CorruptedData { .. } => "corrupted_data",
            Error::BufferTooSmall { .. } => "buffer_too_small",
            Error::Io(_) => "io_error",
            Error::Unsupported(_) => "unsupported",
        }
    }
}
