//! Pumps an `io::Read` byte source into a [`StreamDecoder`].

use crate::checksum::{Checksum, Sum8};
use crate::decoder::StreamDecoder;
use crate::error::Result;
use std::io::{ErrorKind, Read};

const DEFAULT_CHUNK_SIZE: usize = 4096;

/// A reader that feeds a byte source (serial port, socket, file) into a decoder.
///
/// Reads arrive in whatever chunk sizes the source produces; the decoder does not
/// care where frame boundaries fall.
///
/// ```rust
/// # use devstream::{StreamDecoder, StreamReader};
/// # use std::io::Cursor;
/// let wire = vec![0x22, 0x01, 0x0F, 0x00, 0x01, 0xDE, 0xAD, 0x0F, 0x01, 0x01, 0x04, 0xD3];
/// let mut reader = StreamReader::new(Cursor::new(wire), StreamDecoder::new());
/// reader.read_to_end()?;
/// assert!(reader.decoder().has_message(0x2201));
/// # Ok::<(), devstream::Error>(())
/// ```
pub struct StreamReader<R: Read, C: Checksum = Sum8> {
    reader: R,
    decoder: StreamDecoder<C>,
    // Reused for every read.
    chunk: Vec<u8>,
}

impl<R: Read, C: Checksum> StreamReader<R, C> {
    /// Creates a new `StreamReader` with a 4 KiB read chunk.
    pub fn new(reader: R, decoder: StreamDecoder<C>) -> Self {
        Self::with_chunk_size(reader, decoder, DEFAULT_CHUNK_SIZE)
    }

    /// Creates a reader that requests at most `chunk_size` bytes per read (minimum 1).
    pub fn with_chunk_size(reader: R, decoder: StreamDecoder<C>, chunk_size: usize) -> Self {
        Self {
            reader,
            decoder,
            chunk: vec![0; chunk_size.max(1)],
        }
    }

    /// Performs one read and feeds the bytes to the decoder.
    ///
    /// Returns `Ok(Some(n))` with the number of bytes read, `Ok(None)` on EOF.
    /// `Interrupted` reads are retried.
    pub fn read_chunk(&mut self) -> Result<Option<usize>> {
        let n = loop {
            match self.reader.read(&mut self.chunk) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };
        if n == 0 {
            return Ok(None);
        }
        self.decoder.ingest(&self.chunk[..n])?;
        Ok(Some(n))
    }

    /// Reads until EOF, returning the total number of bytes read.
    pub fn read_to_end(&mut self) -> Result<usize> {
        let mut total = 0;
        while let Some(n) = self.read_chunk()? {
            total += n;
        }
        Ok(total)
    }

    pub fn decoder(&self) -> &StreamDecoder<C> {
        &self.decoder
    }

    pub fn decoder_mut(&mut self) -> &mut StreamDecoder<C> {
        &mut self.decoder
    }

    /// Consumes the reader, returning the byte source and the decoder.
    pub fn into_parts(self) -> (R, StreamDecoder<C>) {
        (self.reader, self.decoder)
    }
}
