//! The incremental stream decoder.

use crate::checksum::{Checksum, Sum8};
use crate::error::{Error, Result};
use crate::framing::{
    decode_frame, resolve_frame_len, DEVICE_ID_HI, DEVICE_ID_LO, DEVICE_TYPE, HEADER_LEN,
    MESSAGE_TYPE, MIN_FRAME_LEN, PAYLOAD, SEQUENCE,
};
use crate::message::{DeviceType, Message};
use crate::store::MessageStore;

/// Running counters for a decoder instance.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DecoderStats {
    /// Bytes accepted into the frame buffer.
    pub bytes_ingested: u64,
    /// Frames that passed the checksum and were queued.
    pub frames_decoded: u64,
    /// Frames dropped for a checksum mismatch.
    pub checksum_failures: u64,
}

/// Reassembles frames from an arbitrarily chunked byte stream and queues the
/// decoded messages per device.
///
/// Bytes may be split or merged across `ingest` calls in any way, as long as
/// they arrive in wire order. Retrieval is per device, earliest sequence first:
///
/// ```rust
/// use devstream::{Message, StreamDecoder};
///
/// let mut decoder = StreamDecoder::new();
/// let frame = [0x22, 0x01, 0x0F, 0x00, 0x01, 0xDE, 0xAD, 0x0F, 0x01, 0x01, 0x04, 0xD3];
/// decoder.ingest(&frame[..4])?;
/// decoder.ingest(&frame[4..])?;
///
/// assert!(decoder.has_message(0x2201));
/// match decoder.pop_next_message(0x2201)? {
///     Message::Widget(w) => assert_eq!(w.serial(), 0xDEAD),
///     other => panic!("unexpected {other:?}"),
/// }
/// # Ok::<(), devstream::Error>(())
/// ```
///
/// A checksum mismatch drops the frame and decoding carries on. An unknown
/// device type makes frame boundaries unrecoverable: `ingest` keeps returning
/// `Error::UnknownDeviceType` until [`reset`](Self::reset) is called.
///
/// The decoder is not internally synchronized; wrap it in a mutex to share it.
#[derive(Debug)]
pub struct StreamDecoder<C: Checksum = Sum8> {
    checksum_alg: C,
    buffer: Vec<u8>,
    expected_bytes: usize,
    // Device type byte that broke framing, if any.
    desync: Option<u8>,
    store: MessageStore,
    stats: DecoderStats,
}

impl StreamDecoder<Sum8> {
    /// Creates a decoder using the wire format's sum-of-bytes checksum.
    pub fn new() -> Self {
        Self::with_checksum(Sum8)
    }
}

impl Default for StreamDecoder<Sum8> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Checksum> StreamDecoder<C> {
    pub fn with_checksum(checksum_alg: C) -> Self {
        Self {
            checksum_alg,
            buffer: Vec::with_capacity(MIN_FRAME_LEN),
            expected_bytes: MIN_FRAME_LEN,
            desync: None,
            store: MessageStore::new(),
            stats: DecoderStats::default(),
        }
    }

    /// Feeds bytes in wire order.
    ///
    /// Any number of frames may complete within one call. On a fatal framing
    /// error the remaining bytes of `data` are not consumed.
    pub fn ingest(&mut self, data: &[u8]) -> Result<()> {
        for &byte in data {
            self.ingest_byte(byte)?;
        }
        Ok(())
    }

    /// Feeds a single byte.
    pub fn ingest_byte(&mut self, byte: u8) -> Result<()> {
        if let Some(device_type) = self.desync {
            return Err(Error::UnknownDeviceType { device_type });
        }

        self.buffer.push(byte);
        self.stats.bytes_ingested += 1;
        let received = self.buffer.len();

        if received == HEADER_LEN {
            match resolve_frame_len(self.buffer[DEVICE_TYPE], self.buffer[MESSAGE_TYPE]) {
                Ok(len) => self.expected_bytes = len,
                Err(err) => {
                    let device_type = self.buffer[DEVICE_TYPE];
                    tracing::error!(
                        device_type,
                        device_id = self.buffer_device_id(),
                        "unknown device type; stream desynchronized until reset"
                    );
                    self.desync = Some(device_type);
                    return Err(err);
                }
            }
        }

        if received == PAYLOAD + 1 && self.buffer[DEVICE_TYPE] == DeviceType::Blip.as_byte() {
            self.expected_bytes += byte as usize;
        }

        if received == self.expected_bytes {
            self.complete_frame();
        }
        Ok(())
    }

    fn buffer_device_id(&self) -> u16 {
        u16::from_be_bytes([self.buffer[DEVICE_ID_HI], self.buffer[DEVICE_ID_LO]])
    }

    fn complete_frame(&mut self) {
        let device_id = self.buffer_device_id();
        let sequence = self.buffer[SEQUENCE];
        if let Some(found) = self.buffer.pop() {
            match self.checksum_alg.verify(found, &self.buffer) {
                Ok(()) => match decode_frame(&self.buffer) {
                    Ok(message) => {
                        tracing::debug!(
                            device_id,
                            device_type = ?message.device_type(),
                            sequence,
                            message_type = message.message_type(),
                            "decoded frame"
                        );
                        self.store.push(message);
                        self.stats.frames_decoded += 1;
                    }
                    Err(err) => {
                        tracing::warn!(device_id, sequence, error = %err, "dropping undecodable frame");
                    }
                },
                Err(Error::ChecksumMismatch { expected, found }) => {
                    tracing::warn!(
                        device_id,
                        sequence,
                        expected,
                        found,
                        "checksum mismatch; dropping frame"
                    );
                    self.stats.checksum_failures += 1;
                }
                Err(err) => {
                    tracing::warn!(device_id, sequence, error = %err, "checksum verification failed");
                    self.stats.checksum_failures += 1;
                }
            }
        }
        self.clear_buffer();
    }

    fn clear_buffer(&mut self) {
        self.buffer.clear();
        self.expected_bytes = MIN_FRAME_LEN;
    }

    /// True if at least one message is pending for `device_id`.
    pub fn has_message(&self, device_id: u16) -> bool {
        self.store.has_message(device_id)
    }

    /// Removes and returns the earliest pending message for `device_id`.
    ///
    /// Returns `Error::NoMessage` if nothing is pending for that device.
    pub fn pop_next_message(&mut self, device_id: u16) -> Result<Message> {
        let message = self.store.pop_next(device_id)?;
        tracing::trace!(device_id, sequence = message.sequence(), "popped message");
        Ok(message)
    }

    /// Pops every pending message for `device_id`, earliest first.
    pub fn drain(&mut self, device_id: u16) -> Drain<'_, C> {
        Drain {
            decoder: self,
            device_id,
        }
    }

    /// Drops all pending messages and any partial frame, and clears a desync.
    pub fn reset(&mut self) {
        tracing::debug!(
            dropped_messages = self.store.len(),
            dropped_bytes = self.buffer.len(),
            "resetting decoder"
        );
        self.store.clear();
        self.clear_buffer();
        self.desync = None;
    }

    /// Pending messages, for queries beyond `has_message`.
    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    /// Bytes held for the frame currently being assembled.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// True once an unknown device type has broken framing.
    pub fn is_desynchronized(&self) -> bool {
        self.desync.is_some()
    }
}

/// Iterator returned by [`StreamDecoder::drain`].
pub struct Drain<'a, C: Checksum> {
    decoder: &'a mut StreamDecoder<C>,
    device_id: u16,
}

impl<C: Checksum> Iterator for Drain<'_, C> {
    type Item = Message;

    fn next(&mut self) -> Option<Message> {
        self.decoder.pop_next_message(self.device_id).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framing::FrameEncoder;
    use crate::message::{Blip, Latch, Widget};

    const WIDGET_FRAME: [u8; 12] = [
        0x22, 0x01, 0x0F, 0x00, 0x01, 0xDE, 0xAD, 0x0F, 0x01, 0x01, 0x04, 0xD3,
    ];

    #[test]
    fn test_concrete_widget_frame() {
        let mut decoder = StreamDecoder::new();
        decoder.ingest(&WIDGET_FRAME).unwrap();
        assert_eq!(decoder.buffered_len(), 0);
        let msg = decoder.pop_next_message(0x2201).unwrap();
        assert_eq!(
            msg,
            Message::widget(0x2201, 0, Widget::VERSION_INFO, 0xDEAD, 0x0F, (1, 1, 4))
        );
        match msg {
            Message::Widget(w) => assert_eq!(w.version(), 0x010104),
            other => panic!("expected widget, got {other:?}"),
        }
    }

    #[test]
    fn test_byte_at_a_time() {
        let mut decoder = StreamDecoder::new();
        for (i, &b) in WIDGET_FRAME.iter().enumerate() {
            decoder.ingest_byte(b).unwrap();
            let done = i + 1 == WIDGET_FRAME.len();
            assert_eq!(decoder.has_message(0x2201), done);
        }
    }

    #[test]
    fn test_blip_empty_and_full_payloads() {
        let enc = FrameEncoder::new();
        let mut stream = Vec::new();
        enc.encode_into(&Message::blip(5, 0, Blip::HELLO, Vec::new()), &mut stream)
            .unwrap();
        enc.encode_into(&Message::blip(5, 1, Blip::HELLO, vec![0u8; 255]), &mut stream)
            .unwrap();

        let mut decoder = StreamDecoder::new();
        decoder.ingest(&stream).unwrap();
        let lens: Vec<usize> = decoder
            .drain(5)
            .map(|m| match m {
                Message::Blip(b) => b.payload().len(),
                other => panic!("expected blip, got {other:?}"),
            })
            .collect();
        assert_eq!(lens, vec![0, 255]);
    }

    #[test]
    fn test_zero_payload_latch() {
        let frame = FrameEncoder::new()
            .encode(&Message::latch(0x0101, 3, Latch::CLOSED, false))
            .unwrap();
        assert_eq!(frame.len(), MIN_FRAME_LEN);
        let mut decoder = StreamDecoder::new();
        decoder.ingest(&frame).unwrap();
        assert_eq!(decoder.store().pending(0x0101), 1);
    }

    #[test]
    fn test_checksum_failure_counts_and_recovers() {
        let mut bad = WIDGET_FRAME;
        bad[11] ^= 0x01;
        let mut decoder = StreamDecoder::new();
        decoder.ingest(&bad).unwrap();
        assert!(!decoder.has_message(0x2201));
        decoder.ingest(&WIDGET_FRAME).unwrap();
        assert!(decoder.has_message(0x2201));
        assert_eq!(
            decoder.stats(),
            DecoderStats {
                bytes_ingested: 24,
                frames_decoded: 1,
                checksum_failures: 1,
            }
        );
    }

    #[test]
    fn test_unknown_device_type_is_sticky() {
        let mut decoder = StreamDecoder::new();
        decoder.ingest(&WIDGET_FRAME).unwrap();
        let err = decoder.ingest(&[0x00, 0x01, 0x42, 0x00, 0x01, 0xFF]).unwrap_err();
        assert!(matches!(err, Error::UnknownDeviceType { device_type: 0x42 }));
        assert!(err.is_fatal());
        assert!(decoder.is_desynchronized());
        // the trailing byte after the bad header was not consumed
        assert_eq!(decoder.stats().bytes_ingested, 17);
        assert!(decoder.ingest(&WIDGET_FRAME).is_err());
        // messages decoded before the fault are still available
        assert!(decoder.has_message(0x2201));

        decoder.reset();
        assert!(!decoder.is_desynchronized());
        assert!(!decoder.has_message(0x2201));
        decoder.ingest(&WIDGET_FRAME).unwrap();
        assert!(decoder.has_message(0x2201));
    }

    #[test]
    fn test_reset_discards_partial_frame() {
        let mut decoder = StreamDecoder::new();
        decoder.ingest(&WIDGET_FRAME[..7]).unwrap();
        assert_eq!(decoder.buffered_len(), 7);
        decoder.reset();
        assert_eq!(decoder.buffered_len(), 0);
        decoder.ingest(&WIDGET_FRAME).unwrap();
        assert_eq!(decoder.store().len(), 1);
    }

    #[derive(Debug, Default, Clone, Copy)]
    struct Xor8;

    impl Checksum for Xor8 {
        fn calculate(&self, bytes: &[u8]) -> u8 {
            bytes.iter().fold(0, |acc, b| acc ^ b)
        }
    }

    #[test]
    fn test_custom_checksum_strategy() {
        let msg = Message::widget(0x2201, 0, Widget::VERSION_INFO, 0xDEAD, 0x0F, (1, 1, 4));
        let frame = FrameEncoder::with_checksum(Xor8).encode(&msg).unwrap();
        assert_eq!(frame[..11], WIDGET_FRAME[..11]);
        assert_eq!(frame[11], 0x55);

        let mut decoder = StreamDecoder::with_checksum(Xor8);
        decoder.ingest(&frame).unwrap();
        assert_eq!(decoder.pop_next_message(0x2201).unwrap(), msg);

        // a sum-checksummed frame does not pass the xor check
        decoder.ingest(&WIDGET_FRAME).unwrap();
        assert!(!decoder.has_message(0x2201));
        assert_eq!(decoder.stats().checksum_failures, 1);
    }
}
