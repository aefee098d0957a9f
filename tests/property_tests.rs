use devstream::*;
use proptest::prelude::*;

mod harness;
use harness::frames::{encode, encode_all};

const DEVICES: [u16; 3] = [0x0001, 0x2201, 0xFFFF];

fn arb_message() -> impl Strategy<Value = Message> {
    let device = proptest::sample::select(DEVICES.to_vec());
    prop_oneof![
        (device.clone(), any::<u8>(), any::<u8>(), proptest::collection::vec(any::<u8>(), 0..=255))
            .prop_map(|(id, seq, mt, payload)| Message::blip(id, seq, mt, payload)),
        (device.clone(), any::<u8>(), any::<u8>(), any::<u16>(), any::<u8>(), any::<(u8, u8, u8)>())
            .prop_map(|(id, seq, mt, serial, batch, version)| {
                Message::widget(id, seq, mt, serial, batch, version)
            }),
        (device.clone(), any::<u8>(), any::<bool>())
            .prop_map(|(id, seq, state)| Message::latch(id, seq, Latch::STATUS, state)),
        (device, any::<u8>(), any::<bool>()).prop_map(|(id, seq, open)| {
            let mt = if open { Latch::OPEN } else { Latch::CLOSED };
            Message::latch(id, seq, mt, open)
        }),
    ]
}

fn drain_all(decoder: &mut StreamDecoder) -> Vec<Vec<Message>> {
    DEVICES.iter().map(|&id| decoder.drain(id).collect()).collect()
}

proptest! {
    #[test]
    fn roundtrip_single_message(msg in arb_message()) {
        let mut decoder = StreamDecoder::new();
        decoder.ingest(&encode(&msg)).unwrap();
        prop_assert_eq!(decoder.store().len(), 1);
        prop_assert_eq!(decoder.pop_next_message(msg.device_id()).unwrap(), msg);
    }

    #[test]
    fn arbitrary_splits_match_single_ingest(
        messages in proptest::collection::vec(arb_message(), 1..16),
        cuts in proptest::collection::vec(any::<prop::sample::Index>(), 0..24),
    ) {
        let wire = encode_all(&messages);

        let mut whole = StreamDecoder::new();
        whole.ingest(&wire).unwrap();
        prop_assert_eq!(whole.stats().frames_decoded, messages.len() as u64);

        let mut points: Vec<usize> = cuts.iter().map(|i| i.index(wire.len() + 1)).collect();
        points.sort_unstable();
        let mut split = StreamDecoder::new();
        let mut start = 0;
        for p in points {
            split.ingest(&wire[start..p]).unwrap();
            start = p;
        }
        split.ingest(&wire[start..]).unwrap();

        prop_assert_eq!(split.stats(), whole.stats());
        prop_assert_eq!(split.buffered_len(), 0);
        prop_assert_eq!(drain_all(&mut split), drain_all(&mut whole));
    }

    #[test]
    fn corrupted_widget_is_dropped_and_next_frame_survives(
        serial in any::<u16>(),
        idx in prop::sample::select(vec![0usize, 1, 3, 4, 5, 6, 7, 8, 9, 10, 11]),
        mask in 1u8..=255,
    ) {
        let msg = Message::widget(0x2201, 9, Widget::VERSION_INFO, serial, 1, (1, 2, 3));
        let mut bad = encode(&msg);
        bad[idx] ^= mask;

        let mut decoder = StreamDecoder::new();
        decoder.ingest(&bad).unwrap();
        prop_assert_eq!(decoder.store().len(), 0);
        prop_assert_eq!(decoder.stats().checksum_failures, 1);

        decoder.ingest(&encode(&msg)).unwrap();
        prop_assert_eq!(decoder.pop_next_message(0x2201).unwrap(), msg);
    }

    #[test]
    fn corrupted_blip_payload_is_dropped(
        payload in proptest::collection::vec(any::<u8>(), 1..64),
        pick in any::<prop::sample::Index>(),
        mask in 1u8..=255,
    ) {
        let msg = Message::blip(0x0001, 0, Blip::HELLO, payload.clone());
        let mut bad = encode(&msg);
        // payload bytes follow the header and the length prefix
        let idx = 6 + pick.index(payload.len());
        bad[idx] ^= mask;

        let mut decoder = StreamDecoder::new();
        decoder.ingest(&bad).unwrap();
        decoder.ingest(&encode(&msg)).unwrap();
        prop_assert_eq!(decoder.store().len(), 1);
        prop_assert_eq!(decoder.pop_next_message(0x0001).unwrap(), msg);
    }
}
