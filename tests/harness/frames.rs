use devstream::{Blip, FrameEncoder, Latch, Message, Widget};

/// The WIDGET frame from the protocol reference: device 0x2201, serial 0xDEAD.
pub const REFERENCE_WIDGET: [u8; 12] = [
    0x22, 0x01, 0x0F, 0x00, 0x01, 0xDE, 0xAD, 0x0F, 0x01, 0x01, 0x04, 0xD3,
];

pub fn encode(message: &Message) -> Vec<u8> {
    FrameEncoder::new().encode(message).unwrap()
}

pub fn encode_all(messages: &[Message]) -> Vec<u8> {
    let encoder = FrameEncoder::new();
    let mut out = Vec::new();
    for m in messages {
        encoder.encode_into(m, &mut out).unwrap();
    }
    out
}

/// One message of each family and shape, all for `device_id`.
pub fn mixed_messages(device_id: u16) -> Vec<Message> {
    vec![
        Message::blip(device_id, 0, Blip::HELLO, b"hello\0world".to_vec()),
        Message::blip(device_id, 1, Blip::HELLO, Vec::new()),
        Message::widget(device_id, 2, Widget::VERSION_INFO, 0xBEEF, 0x42, (2, 0, 17)),
        Message::latch(device_id, 3, Latch::STATUS, true),
        Message::latch(device_id, 4, Latch::STATUS, false),
        Message::latch(device_id, 5, Latch::OPEN, true),
        Message::latch(device_id, 6, Latch::CLOSED, false),
    ]
}
