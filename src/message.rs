//! Decoded message types.
//!
//! Every frame carries a common [`Header`]; the payload shape is selected by the
//! header's [`DeviceType`]. [`Message`] is the closed sum over the three device
//! families, so callers match on the variant instead of downcasting.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The protocol family of a device, which governs its payload layout.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DeviceType {
    Blip = 0x05,
    Widget = 0x0F,
    Latch = 0x1F,
}

impl DeviceType {
    /// Maps a wire byte to a device type, or `None` if unrecognized.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x05 => Some(Self::Blip),
            0x0F => Some(Self::Widget),
            0x1F => Some(Self::Latch),
            _ => None,
        }
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

/// Fields common to every frame.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Header {
    device_id: u16,
    device_type: DeviceType,
    sequence: u8,
    message_type: u8,
}

impl Header {
    pub fn new(device_id: u16, device_type: DeviceType, sequence: u8, message_type: u8) -> Self {
        Self {
            device_id,
            device_type,
            sequence,
            message_type,
        }
    }

    pub fn device_id(&self) -> u16 {
        self.device_id
    }

    pub fn device_type(&self) -> DeviceType {
        self.device_type
    }

    /// Wrapping per-device sequence number.
    pub fn sequence(&self) -> u8 {
        self.sequence
    }

    pub fn message_type(&self) -> u8 {
        self.message_type
    }
}

/// A BLIP message: an opaque byte payload of up to 255 bytes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blip {
    header: Header,
    payload: Vec<u8>,
}

impl Blip {
    pub const HELLO: u8 = 0x01;

    /// The payload is raw bytes; embedded zeros are preserved.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}

/// A WIDGET version report.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
    header: Header,
    serial: u16,
    batch: u8,
    version: u32,
}

impl Widget {
    pub const VERSION_INFO: u8 = 0x01;

    pub fn serial(&self) -> u16 {
        self.serial
    }

    pub fn batch(&self) -> u8 {
        self.batch
    }

    /// Packed `major << 16 | minor << 8 | patch`.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// The version split into `(major, minor, patch)`.
    pub fn version_parts(&self) -> (u8, u8, u8) {
        let [_, major, minor, patch] = self.version.to_be_bytes();
        (major, minor, patch)
    }
}

/// A LATCH state report.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Latch {
    header: Header,
    state: bool,
}

impl Latch {
    /// Carries an explicit state byte.
    pub const STATUS: u8 = 0x01;
    /// Implies `state == true`; no payload.
    pub const OPEN: u8 = 0x02;
    /// Implies `state == false`; no payload.
    pub const CLOSED: u8 = 0x03;

    /// `true` when the latch is open.
    pub fn state(&self) -> bool {
        self.state
    }
}

/// A decoded frame.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Blip(Blip),
    Widget(Widget),
    Latch(Latch),
}

impl Message {
    /// Builds a BLIP message. Payloads longer than 255 bytes are rejected at encode time.
    pub fn blip(device_id: u16, sequence: u8, message_type: u8, payload: impl Into<Vec<u8>>) -> Self {
        Self::Blip(Blip {
            header: Header::new(device_id, DeviceType::Blip, sequence, message_type),
            payload: payload.into(),
        })
    }

    /// Builds a WIDGET message from its version triple.
    pub fn widget(
        device_id: u16,
        sequence: u8,
        message_type: u8,
        serial: u16,
        batch: u8,
        (major, minor, patch): (u8, u8, u8),
    ) -> Self {
        Self::Widget(Widget {
            header: Header::new(device_id, DeviceType::Widget, sequence, message_type),
            serial,
            batch,
            version: u32::from_be_bytes([0, major, minor, patch]),
        })
    }

    /// Builds a LATCH message.
    pub fn latch(device_id: u16, sequence: u8, message_type: u8, state: bool) -> Self {
        Self::Latch(Latch {
            header: Header::new(device_id, DeviceType::Latch, sequence, message_type),
            state,
        })
    }

    pub fn header(&self) -> &Header {
        match self {
            Self::Blip(m) => &m.header,
            Self::Widget(m) => &m.header,
            Self::Latch(m) => &m.header,
        }
    }

    pub fn device_id(&self) -> u16 {
        self.header().device_id()
    }

    pub fn device_type(&self) -> DeviceType {
        self.header().device_type()
    }

    pub fn sequence(&self) -> u8 {
        self.header().sequence()
    }

    pub fn message_type(&self) -> u8 {
        self.header().message_type()
    }
}
