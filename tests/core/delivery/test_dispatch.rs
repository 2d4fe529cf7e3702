//! End-to-end dispatch tests
//!
//! A room message goes through the dispatcher built by `Services`, runs
//! against a SQLite catalog and is delivered to a recording sender.

use crate::common::{create_test_catalog, sample_records, RecordingSender, Sent};
use romfinder::core::config::Config;
use romfinder::core::delivery::{DeliveryOutcome, EventId, OutgoingMessage, ReactionKey, RoomId};
use romfinder::core::dispatch::{Dispatch, Dispatcher, EventFilter, IncomingMessage};
use romfinder::core::services::Services;
use romfinder::core::types::CatalogRecord;

const ROOM: &str = "!games:example.org";

fn dispatcher(records: Vec<CatalogRecord>, max_results: usize, batch_size: usize) -> Dispatcher {
    let mut config = Config::default();
    config.search.max_results = max_results;
    config.search.batch_size = batch_size;
    let services = Services::with_catalog(config, create_test_catalog(records));

    services.dispatcher(EventFilter {
        own_user: "@romfinder:example.org".to_string(),
        room: RoomId::new(ROOM),
        started_at_ms: 0,
    })
}

fn command(body: &str) -> IncomingMessage {
    IncomingMessage {
        event_id: EventId::new("$cmd"),
        room: RoomId::new(ROOM),
        sender: "@player:example.org".to_string(),
        body: body.to_string(),
        msgtype: "m.text".to_string(),
        timestamp_ms: 1_700_000_000_000,
    }
}

fn numbered(n: usize) -> Vec<CatalogRecord> {
    (0..n)
        .map(|i| CatalogRecord::new("S", "C", format!("Game {i:04}.zip"), format!("u{i}")))
        .collect()
}

#[tokio::test]
async fn test_mario_minus_demo_scenario() {
    let records = vec![
        CatalogRecord::new("SNES", "Nintendo", "Mario.zip", "u1"),
        CatalogRecord::new("SNES", "Nintendo", "Mario Demo.zip", "u2"),
    ];
    let sender = RecordingSender::default();

    let outcome = dispatcher(records, 1000, 100)
        .handle(&command("!roms mario -demo"), &sender)
        .await;

    assert_eq!(
        outcome,
        Dispatch::Delivered {
            delivery: DeliveryOutcome::Delivered { batches: 1, records: 1 }
        }
    );
    assert_eq!(
        sender.sent()[0],
        Sent::Reaction(ReactionKey::Accepted, EventId::new("$cmd"))
    );
    let replies = sender.replies();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].body, "SNES - Nintendo - Mario.zip\n");
    assert_eq!(replies[0].html, "SNES - Nintendo - <a href=\"u1\">Mario.zip</a><br>");
}

#[tokio::test]
async fn test_exactly_max_results_is_delivered() {
    let sender = RecordingSender::default();
    let outcome = dispatcher(numbered(20), 20, 10)
        .handle(&command("!roms game"), &sender)
        .await;

    assert_eq!(
        outcome,
        Dispatch::Delivered {
            delivery: DeliveryOutcome::Delivered { batches: 2, records: 20 }
        }
    );
}

#[tokio::test]
async fn test_overflow_reports_full_match_count() {
    let sender = RecordingSender::default();
    let outcome = dispatcher(numbered(57), 20, 10)
        .handle(&command("!roms game"), &sender)
        .await;

    assert_eq!(
        outcome,
        Dispatch::Delivered {
            delivery: DeliveryOutcome::Overflow { total: 57 }
        }
    );
    assert_eq!(sender.reactions(), vec![ReactionKey::Rejected]);

    let messages = sender.messages();
    assert_eq!(messages.len(), 1);
    match &messages[0] {
        OutgoingMessage::OverflowNotice(notice) => {
            assert_eq!(notice.body, "Too many results: 57");
            assert_eq!(notice.reply_to, EventId::new("$cmd"));
        }
        other => panic!("expected overflow notice, got {other:?}"),
    }
}

#[tokio::test]
async fn test_batches_thread_and_chain() {
    let sender = RecordingSender::default();
    dispatcher(numbered(11), 1000, 5)
        .handle(&command("!roms game"), &sender)
        .await;

    let replies = sender.replies();
    let sizes: Vec<usize> = replies.iter().map(|r| r.body.lines().count()).collect();
    assert_eq!(sizes, vec![5, 5, 1]);

    let targets: Vec<&str> = replies.iter().map(|r| r.reply_to.as_str()).collect();
    assert_eq!(targets, vec!["$cmd", "$sent1", "$sent2"]);
    assert!(replies.iter().all(|r| r.thread_root.as_str() == "$cmd"));
    assert!(replies.iter().all(|r| r.is_falling_back()));

    assert!(replies[0].body.starts_with("S - C - Game 0000.zip\n"));
    assert!(replies[2].body.starts_with("S - C - Game 0010.zip\n"));
}

#[tokio::test]
async fn test_failed_batch_stops_delivery() {
    let sender = RecordingSender::failing_at(2);
    let outcome = dispatcher(numbered(30), 1000, 10)
        .handle(&command("!roms game"), &sender)
        .await;

    match outcome {
        Dispatch::Delivered {
            delivery: DeliveryOutcome::Halted { batches_sent, error },
        } => {
            assert_eq!(batches_sent, 1);
            assert!(error.contains("connection reset"));
        }
        other => panic!("expected halted delivery, got {other:?}"),
    }
    assert_eq!(sender.replies().len(), 1);
}

#[tokio::test]
async fn test_html_escaping_in_delivery() {
    let records = vec![CatalogRecord::new(
        "Misc",
        "PC",
        "Tom & Jerry <\"Deluxe\">.zip",
        "https://x.example/t?a=1&b=2",
    )];
    let sender = RecordingSender::default();
    dispatcher(records, 1000, 100)
        .handle(&command("!roms jerry"), &sender)
        .await;

    let reply = &sender.replies()[0];
    assert_eq!(reply.body, "Misc - PC - Tom & Jerry <\"Deluxe\">.zip\n");
    assert!(reply
        .html
        .contains("Tom &amp; Jerry &lt;&quot;Deluxe&quot;&gt;.zip"));
    assert!(reply.html.contains("href=\"https://x.example/t?a=1&b=2\""));
}

#[tokio::test]
async fn test_other_commands_are_ignored() {
    let sender = RecordingSender::default();
    let d = dispatcher(sample_records(), 1000, 100);

    for body in ["!help", "!romsmario", "roms mario", "mario"] {
        let outcome = d.handle(&command(body), &sender).await;
        assert!(matches!(outcome, Dispatch::Ignored { .. }), "{body} should be ignored");
    }
    assert!(sender.sent().is_empty());
}
