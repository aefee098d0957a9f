use thiserror::Error;

/// Custom error types for the devstream library.
#[derive(Error, Debug)]
pub enum Error {
    /// Underlying I/O errors from the reader and writer adapters.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Checksum mismatch between the computed sum and the trailing frame byte.
    ///
    /// The decoder treats this as recoverable: the frame is dropped and decoding continues.
    #[error("Checksum mismatch: expected {expected:#04x}, found {found:#04x}")]
    ChecksumMismatch { expected: u8, found: u8 },

    /// A header named a device type the decoder cannot size. The stream is
    /// desynchronized until `StreamDecoder::reset` is called.
    #[error("Unknown device type {device_type:#04x}; stream desynchronized until reset")]
    UnknownDeviceType { device_type: u8 },

    /// `pop_next_message` was called for a device with nothing pending.
    #[error("No pending message for device {device_id:#06x}")]
    NoMessage { device_id: u16 },

    /// Structurally invalid frame or message (length disagreement, oversize payload).
    #[error("Invalid frame: {message}")]
    InvalidFrame { message: String },
}

impl Error {
    /// Create a new `InvalidFrame` error with a descriptive message.
    pub fn invalid_frame(message: impl Into<String>) -> Self {
        Self::InvalidFrame {
            message: message.into(),
        }
    }

    /// Create a new `ChecksumMismatch` error with expected and found values.
    pub fn checksum_mismatch(expected: u8, found: u8) -> Self {
        Self::ChecksumMismatch { expected, found }
    }

    /// Returns true for errors that leave the decoder unable to frame further input.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::UnknownDeviceType { .. })
    }
}

/// Result type alias for the library operations.
pub type Result<T> = std::result::Result<T, Error>;
