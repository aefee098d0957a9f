//! A writer that frames messages onto an `io::Write` sink.

use crate::checksum::{Checksum, Sum8};
use crate::error::Result;
use crate::framing::FrameEncoder;
use crate::message::Message;
use std::io::Write;

/// A writer for emitting device frames.
///
/// This is the device side of the protocol: useful for simulators, test
/// fixtures, and replay tooling.
pub struct StreamWriter<W: Write, C: Checksum = Sum8> {
    writer: W,
    encoder: FrameEncoder<C>,
    // Scratch buffer reused across writes.
    frame: Vec<u8>,
}

impl<W: Write> StreamWriter<W, Sum8> {
    /// Creates a new `StreamWriter` using the wire checksum.
    pub fn new(writer: W) -> Self {
        Self::with_encoder(writer, FrameEncoder::new())
    }
}

impl<W: Write, C: Checksum> StreamWriter<W, C> {
    pub fn with_encoder(writer: W, encoder: FrameEncoder<C>) -> Self {
        Self {
            writer,
            encoder,
            frame: Vec::new(),
        }
    }

    /// Encodes and writes a single frame.
    pub fn write(&mut self, message: &Message) -> Result<()> {
        self.frame.clear();
        self.encoder.encode_into(message, &mut self.frame)?;
        self.writer.write_all(&self.frame)?;
        Ok(())
    }

    /// Writes every message in order, stopping at the first error.
    pub fn write_all<'a, I>(&mut self, messages: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Message>,
    {
        for message in messages {
            self.write(message)?;
        }
        Ok(())
    }

    /// Flushes the underlying writer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Consumes the writer, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
