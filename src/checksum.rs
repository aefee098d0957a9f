//! Defines the `Checksum` trait and the sum-of-bytes implementation used on the wire.

use crate::error::{Error, Result};

/// A trait for frame checksum algorithms.
///
/// The wire format reserves a single trailing byte, so checksums are 8 bits wide.
pub trait Checksum {
    /// Calculates the checksum over every frame byte preceding the checksum byte.
    fn calculate(&self, bytes: &[u8]) -> u8;

    /// Verifies the checksum. Returns `Ok(())` if it matches, otherwise
    /// `Error::ChecksumMismatch` carrying the computed and received values.
    fn verify(&self, found: u8, bytes: &[u8]) -> Result<()> {
        let expected = self.calculate(bytes);
        if expected == found {
            Ok(())
        } else {
            Err(Error::checksum_mismatch(expected, found))
        }
    }
}

/// Sum of all bytes modulo 256.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sum8;

impl Sum8 {
    pub fn new() -> Self {
        Self
    }
}

impl Checksum for Sum8 {
    #[inline]
    fn calculate(&self, bytes: &[u8]) -> u8 {
        bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
    }
}
