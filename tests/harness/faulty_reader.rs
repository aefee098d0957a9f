use std::io::{Read, Result};

pub struct FaultyReader<R: Read> {
    inner: R,
    mode: FaultMode,
    counter: usize,
}

#[allow(dead_code)]
pub enum FaultMode {
    OneByteChunks,
    InterruptedEvery(usize),
    BrokenPipeAt(usize),
}

impl<R: Read> FaultyReader<R> {
    pub fn new(inner: R, mode: FaultMode) -> Self {
        Self {
            inner,
            mode,
            counter: 0,
        }
    }
}

impl<R: Read> Read for FaultyReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.counter += 1;
        match self.mode {
            FaultMode::OneByteChunks => {
                let len = buf.len().min(1);
                self.inner.read(&mut buf[..len])
            }
            FaultMode::InterruptedEvery(n) if n != 0 && self.counter % n == 0 => {
                Err(std::io::Error::from(std::io::ErrorKind::Interrupted))
            }
            FaultMode::BrokenPipeAt(n) if self.counter >= n => {
                Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
            }
            _ => self.inner.read(buf),
        }
    }
}
