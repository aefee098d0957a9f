//! Wire layout, frame length resolution, and the frame codec.
//!
//! Frame layout (multi-byte fields are big-endian):
//!
//! ```text
//! [id hi][id lo][device type][sequence][message type][payload ...][checksum]
//! ```
//!
//! The checksum byte is the `Checksum` of every byte before it.

use crate::checksum::{Checksum, Sum8};
use crate::error::{Error, Result};
use crate::message::{DeviceType, Latch, Message};

pub const DEVICE_ID_HI: usize = 0;
pub const DEVICE_ID_LO: usize = 1;
pub const DEVICE_TYPE: usize = 2;
pub const SEQUENCE: usize = 3;
pub const MESSAGE_TYPE: usize = 4;
pub const PAYLOAD: usize = 5;

/// Bytes up to and including the message type.
pub const HEADER_LEN: usize = 5;
pub const CHECKSUM_LEN: usize = 1;
/// A header followed directly by its checksum (e.g. LATCH OPEN).
pub const MIN_FRAME_LEN: usize = HEADER_LEN + CHECKSUM_LEN;

/// BLIP payloads start with a one-byte length prefix.
pub const BLIP_LENGTH_PREFIX_LEN: usize = 1;
pub const BLIP_MAX_PAYLOAD: usize = u8::MAX as usize;
/// Serial (2), batch, major, minor, patch.
pub const WIDGET_PAYLOAD_LEN: usize = 6;
/// Versions are packed into major, minor, patch bytes.
pub const WIDGET_MAX_VERSION: u32 = 0x00FF_FFFF;

fn latch_payload_len(message_type: u8) -> usize {
    if message_type == Latch::STATUS {
        1
    } else {
        0
    }
}

/// Computes the total frame length implied by a received header.
///
/// For BLIP the result covers only the length-prefix byte; the caller extends it
/// by the prefix value once that byte arrives.
///
/// Returns `Error::UnknownDeviceType` when the device type cannot be sized.
pub fn resolve_frame_len(device_type: u8, message_type: u8) -> Result<usize> {
    let payload_len = match DeviceType::from_byte(device_type) {
        Some(DeviceType::Blip) => BLIP_LENGTH_PREFIX_LEN,
        Some(DeviceType::Widget) => WIDGET_PAYLOAD_LEN,
        Some(DeviceType::Latch) => latch_payload_len(message_type),
        None => return Err(Error::UnknownDeviceType { device_type }),
    };
    Ok(HEADER_LEN + payload_len + CHECKSUM_LEN)
}

/// Decodes a checksum-verified frame body (all bytes except the trailing checksum).
pub fn decode_frame(body: &[u8]) -> Result<Message> {
    if body.len() < HEADER_LEN {
        return Err(Error::invalid_frame(format!(
            "frame body of {} bytes is shorter than the {HEADER_LEN}-byte header",
            body.len()
        )));
    }

    let device_id = u16::from_be_bytes([body[DEVICE_ID_HI], body[DEVICE_ID_LO]]);
    let sequence = body[SEQUENCE];
    let message_type = body[MESSAGE_TYPE];
    let device_type = DeviceType::from_byte(body[DEVICE_TYPE]).ok_or(Error::UnknownDeviceType {
        device_type: body[DEVICE_TYPE],
    })?;
    let mut expected_len = resolve_frame_len(body[DEVICE_TYPE], message_type)? - CHECKSUM_LEN;
    if device_type == DeviceType::Blip {
        if let Some(&len) = body.get(PAYLOAD) {
            expected_len += len as usize;
        }
    }
    if body.len() != expected_len {
        return Err(Error::invalid_frame(format!(
            "{device_type:?} frame body is {} bytes, header implies {expected_len}",
            body.len()
        )));
    }

    let payload = &body[PAYLOAD..];
    let message = match device_type {
        DeviceType::Blip => Message::blip(device_id, sequence, message_type, &payload[1..]),
        DeviceType::Widget => Message::widget(
            device_id,
            sequence,
            message_type,
            u16::from_be_bytes([payload[0], payload[1]]),
            payload[2],
            (payload[3], payload[4], payload[5]),
        ),
        DeviceType::Latch => {
            let state = match message_type {
                Latch::STATUS => payload[0] != 0,
                other => other == Latch::OPEN,
            };
            Message::latch(device_id, sequence, message_type, state)
        }
    };
    Ok(message)
}

/// Serializes messages into wire frames.
///
/// When to use: building fixtures, simulators, or anything that has to speak the
/// device side of the protocol.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameEncoder<C: Checksum = Sum8> {
    checksum_alg: C,
}

impl FrameEncoder<Sum8> {
    pub fn new() -> Self {
        Self { checksum_alg: Sum8 }
    }
}

impl<C: Checksum> FrameEncoder<C> {
    pub fn with_checksum(checksum_alg: C) -> Self {
        Self { checksum_alg }
    }

    /// Appends the encoded frame to `out`. On error `out` is left unchanged.
    pub fn encode_into(&self, message: &Message, out: &mut Vec<u8>) -> Result<()> {
        let header = message.header();
        let start = out.len();
        let id = header.device_id().to_be_bytes();

        let device_type = match message {
            Message::Blip(_) => DeviceType::Blip,
            Message::Widget(_) => DeviceType::Widget,
            Message::Latch(_) => DeviceType::Latch,
        };
        if header.device_type() != device_type {
            return Err(Error::invalid_frame(format!(
                "{device_type:?} message carries a {:?} header",
                header.device_type()
            )));
        }

        // Validate before touching the output so a failed encode leaves no partial frame.
        match message {
            Message::Blip(blip) if blip.payload().len() > BLIP_MAX_PAYLOAD => {
                return Err(Error::invalid_frame(format!(
                    "BLIP payload of {} bytes exceeds the {BLIP_MAX_PAYLOAD}-byte limit",
                    blip.payload().len()
                )));
            }
            Message::Widget(widget) if widget.version() > WIDGET_MAX_VERSION => {
                return Err(Error::invalid_frame(format!(
                    "WIDGET version {:#x} does not fit in three bytes",
                    widget.version()
                )));
            }
            Message::Latch(latch)
                if header.message_type() != Latch::STATUS
                    && latch.state() != (header.message_type() == Latch::OPEN) =>
            {
                return Err(Error::invalid_frame(format!(
                    "LATCH message type {:#04x} cannot carry state {}",
                    header.message_type(),
                    latch.state()
                )));
            }
            _ => {}
        }

        out.extend_from_slice(&[
            id[0],
            id[1],
            device_type.as_byte(),
            header.sequence(),
            header.message_type(),
        ]);
        match message {
            Message::Blip(blip) => {
                out.push(blip.payload().len() as u8);
                out.extend_from_slice(blip.payload());
            }
            Message::Widget(widget) => {
                let (major, minor, patch) = widget.version_parts();
                out.extend_from_slice(&widget.serial().to_be_bytes());
                out.extend_from_slice(&[widget.batch(), major, minor, patch]);
            }
            Message::Latch(latch) => {
                if header.message_type() == Latch::STATUS {
                    out.push(latch.state() as u8);
                }
            }
        }
        let checksum = self.checksum_alg.calculate(&out[start..]);
        out.push(checksum);
        Ok(())
    }

    /// Encodes a single message into a fresh buffer.
    pub fn encode(&self, message: &Message) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(MIN_FRAME_LEN + WIDGET_PAYLOAD_LEN);
        self.encode_into(message, &mut out)?;
        Ok(out)
    }
}
