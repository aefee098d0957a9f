//! Decodes a hex-encoded byte stream from the command line or stdin and prints
//! every message, per device, in sequence order.
//!
//! ```text
//! RUST_LOG=debug cargo run --example decode_stream -- 22010F000001DEAD0F010104D3
//! ```

use devstream::{Message, Result, StreamDecoder, StreamReader};
use std::collections::BTreeSet;
use std::io::Read;
use tracing_subscriber::EnvFilter;

fn parse_hex(text: &str) -> Vec<u8> {
    let digits: Vec<u8> = text
        .bytes()
        .filter(u8::is_ascii_hexdigit)
        .map(|b| (b as char).to_digit(16).unwrap_or(0) as u8)
        .collect();
    let pairs = digits.chunks_exact(2);
    if let [nibble] = pairs.remainder() {
        tracing::warn!(nibble, "odd number of hex digits; ignoring the trailing one");
    }
    pairs.map(|p| p[0] << 4 | p[1]).collect()
}

fn describe(message: &Message) -> String {
    match message {
        Message::Blip(b) => format!("blip {} bytes", b.payload().len()),
        Message::Widget(w) => format!(
            "widget serial {:04X} batch {:02X} ver {:06X}",
            w.serial(),
            w.batch(),
            w.version()
        ),
        Message::Latch(l) => format!("latch {}", if l.state() { "open" } else { "closed" }),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let text = if args.is_empty() {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        input
    } else {
        args.join("")
    };

    let mut reader = StreamReader::new(std::io::Cursor::new(parse_hex(&text)), StreamDecoder::new());
    if let Err(err) = reader.read_to_end() {
        eprintln!("stream stopped: {err}");
    }

    let decoder = reader.decoder_mut();
    let devices: BTreeSet<u16> = decoder.store().device_ids().collect();
    for device_id in devices {
        for message in decoder.drain(device_id) {
            println!(
                "{device_id:04X} seq {:02X}: {}",
                message.sequence(),
                describe(&message)
            );
        }
    }
    let stats = decoder.stats();
    println!(
        "{} bytes, {} frames, {} checksum failures",
        stats.bytes_ingested, stats.frames_decoded, stats.checksum_failures
    );
    Ok(())
}
