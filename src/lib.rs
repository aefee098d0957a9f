//! # devstream
//!
//! A streaming decoder for a fixed multi-device wire format.
//!
//! ## Overview
//!
//! Devices of three families (BLIP, WIDGET, LATCH) share one byte stream. Each
//! frame is a five-byte header, a payload whose length depends on the device type,
//! and a one-byte checksum. `devstream` reassembles frames from arbitrarily split
//! or merged input, drops frames with bad checksums, decodes the rest into typed
//! [`Message`]s, and hands them back per device in wrapping sequence order.
//!
//! ## Quick Start
//!
//! ```rust
//! use devstream::*;
//!
//! // Device side: encode a couple of frames.
//! let mut writer = StreamWriter::new(Vec::new());
//! writer.write(&Message::latch(0x0100, 0xFF, Latch::OPEN, true))?;
//! writer.write(&Message::latch(0x0100, 0x00, Latch::CLOSED, false))?;
//! let wire = writer.into_inner();
//!
//! // Host side: feed bytes in any chunking, then collect.
//! let mut decoder = StreamDecoder::new();
//! for chunk in wire.chunks(5) {
//!     decoder.ingest(chunk)?;
//! }
//!
//! // 0xFF precedes 0x00 across the rollover.
//! assert_eq!(decoder.pop_next_message(0x0100)?.sequence(), 0xFF);
//! assert_eq!(decoder.pop_next_message(0x0100)?.sequence(), 0x00);
//! assert!(matches!(
//!     decoder.pop_next_message(0x0100),
//!     Err(Error::NoMessage { .. })
//! ));
//! # Ok::<(), devstream::Error>(())
//! ```
//!
//! ## Architecture
//!
//! * **`checksum`**: the `Checksum` strategy and the wire's `Sum8`
//! * **`framing`**: wire layout, frame length resolution, decode and encode
//! * **`decoder`**: the byte-at-a-time frame assembler
//! * **`store`** / **`sequence`**: per-device pending messages and wraparound ordering
//! * **`reader`** / **`writer`**: `io::Read` and `io::Write` adapters
//!
//! Diagnostics are emitted through `tracing`; install a subscriber to see them.

pub mod checksum;
pub mod decoder;
pub mod error;
pub mod framing;
pub mod message;
pub mod reader;
pub mod sequence;
pub mod store;
pub mod writer;

// Re-export the main public API for user convenience.
pub use checksum::{Checksum, Sum8};
pub use decoder::{DecoderStats, Drain, StreamDecoder};
pub use error::{Error, Result};
pub use framing::FrameEncoder;
pub use message::{Blip, DeviceType, Header, Latch, Message, Widget};
pub use reader::StreamReader;
pub use store::MessageStore;
pub use writer::StreamWriter;
