// tests/broadcast_pipeline.rs
// End-to-end over the public API: fixture alert → render → segment → queue.

use smhi_meshtastic::feed::{filter_alerts, RawAlertFeed};
use smhi_meshtastic::{segment, RebroadcastQueue, MAX_PAYLOAD_BYTES};

const FIXTURE: &str = include_str!("fixtures/smhi_warnings.json");

#[test]
fn fixture_alert_fits_one_unsuffixed_payload() {
    let feed = RawAlertFeed::from_json(FIXTURE).unwrap();
    let records = filter_alerts(feed, 1);
    let message = records[0].render();

    let chunks = segment(&message, MAX_PAYLOAD_BYTES, 2);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0], message);
    assert!(!chunks[0].ends_with("1/1"));
}

#[test]
fn long_alert_splits_within_payload_and_cap() {
    // A verbose description, well past one payload.
    let long_event = "Mycket höga flöden i vattendrag och sjöar med översvämmade \
        strandnära områden, vägar och källare som följd, särskilt i de lägre \
        belägna delarna av avrinningsområdet där marken redan är mättad sedan \
        tidigare nederbörd och snösmältning under veckan";
    let message = format!(
        "SMHI: Röd varning för Dalälven - {long_event} från 2026-03-01 06:00 till 2026-03-02 18:00"
    );
    assert!(message.len() > MAX_PAYLOAD_BYTES);

    let chunks = segment(&message, MAX_PAYLOAD_BYTES, 2);
    assert!(chunks.len() <= 2);
    for (i, c) in chunks.iter().enumerate() {
        assert!(c.len() <= MAX_PAYLOAD_BYTES, "chunk {i} too long");
        assert!(c.ends_with(&format!("{}/{}", i + 1, chunks.len())));
    }
}

#[test]
fn segmented_chunks_flow_through_the_queue_intact() {
    let message = "x ".repeat(300);
    let chunks = segment(message.trim(), MAX_PAYLOAD_BYTES, 3);
    assert!(chunks.len() > 1);

    let mut queue = RebroadcastQueue::new(2, 3);
    assert!(queue.is_enabled());
    queue.schedule(&chunks);

    let mut seen = 0;
    for cycle in 0..6 {
        for sequence in queue.advance() {
            assert_eq!(sequence, chunks, "chunks must round-trip unmodified");
            assert!(cycle == 2 || cycle == 5, "due at the wrong cycle: {cycle}");
            seen += 1;
        }
    }
    assert_eq!(seen, 2);
}
