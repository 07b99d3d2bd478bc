//! Batch orchestrator tests
//!
//! Exercise the full pipeline against an in-memory object store: per-item
//! failure isolation, partial-batch failure reporting, ordering, and the
//! content of the written output.

use async_trait::async_trait;
use csvpress_common::compress::gzip_decompress;
use csvpress_worker::storage::ObjectStore;
use csvpress_worker::{handle_event, SqsEvent, SqsMessage, WorkerConfig};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory object store that records every call in order.
#[derive(Default)]
struct MemoryStore {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    gets: Mutex<Vec<(String, String)>>,
    puts: Mutex<Vec<(String, String, Vec<u8>)>>,
}

impl MemoryStore {
    fn with_object(self, bucket: &str, key: &str, data: &[u8]) -> Self {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), data.to_vec());
        self
    }

    fn gets(&self) -> Vec<(String, String)> {
        self.gets.lock().unwrap().clone()
    }

    fn puts(&self) -> Vec<(String, String, Vec<u8>)> {
        self.puts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get(&self, bucket: &str, key: &str) -> anyhow::Result<Vec<u8>> {
        self.gets
            .lock()
            .unwrap()
            .push((bucket.to_string(), key.to_string()));
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no such object: s3://{}/{}", bucket, key))
    }

    async fn put(&self, bucket: &str, key: &str, data: Vec<u8>) -> anyhow::Result<()> {
        self.puts
            .lock()
            .unwrap()
            .push((bucket.to_string(), key.to_string(), data.clone()));
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), data);
        Ok(())
    }
}

fn test_config() -> WorkerConfig {
    WorkerConfig {
        target_bucket: "target-bucket".to_string(),
        key_prefix: "normalized".to_string(),
    }
}

/// Build a realistic notification body for the given (bucket, key) pairs.
fn notification_body(entries: &[(&str, &str)]) -> String {
    let records: Vec<_> = entries
        .iter()
        .map(|(bucket, key)| {
            json!({
                "eventVersion": "2.1",
                "eventSource": "aws:s3",
                "awsRegion": "us-east-1",
                "eventTime": "2024-08-25T12:00:00.000Z",
                "eventName": "ObjectCreated:Put",
                "s3": {
                    "bucket": {"name": bucket},
                    "object": {"key": key}
                }
            })
        })
        .collect();
    json!({"Records": records}).to_string()
}

fn message(id: &str, body: &str) -> SqsMessage {
    SqsMessage {
        message_id: id.to_string(),
        body: body.to_string(),
    }
}

fn batch(messages: Vec<SqsMessage>) -> SqsEvent {
    SqsEvent { records: messages }
}

fn failed_ids(response: &csvpress_worker::SqsBatchResponse) -> Vec<&str> {
    response
        .batch_item_failures
        .iter()
        .map(|f| f.item_identifier.as_str())
        .collect()
}

#[tokio::test]
async fn test_valid_records_are_fetched_and_written_in_order() {
    let store = MemoryStore::default()
        .with_object("b", "first.csv", b"h1;h2\n1;2\n")
        .with_object("b", "second.csv", b"h1;h2\n3;4\n");

    let body = notification_body(&[("b", "first.csv"), ("b", "second.csv")]);
    let event = batch(vec![message("m-1", &body)]);

    let response = handle_event(event, &store, &test_config()).await;

    assert!(response.batch_item_failures.is_empty());
    assert_eq!(
        store.gets(),
        vec![
            ("b".to_string(), "first.csv".to_string()),
            ("b".to_string(), "second.csv".to_string()),
        ]
    );
    assert_eq!(store.puts().len(), 2);
}

#[tokio::test]
async fn test_undecodable_body_fails_without_any_io() {
    let store = MemoryStore::default();
    let event = batch(vec![message("m-1", "this is not json")]);

    let response = handle_event(event, &store, &test_config()).await;

    assert_eq!(failed_ids(&response), vec!["m-1"]);
    assert!(store.gets().is_empty());
    assert!(store.puts().is_empty());
}

#[tokio::test]
async fn test_mixed_batch_reports_only_the_failing_message() {
    let store = MemoryStore::default().with_object("b", "good.csv", b"h\nv\n");

    let good = notification_body(&[("b", "good.csv")]);
    for order in [["m-bad", "m-good"], ["m-good", "m-bad"]] {
        let messages = order
            .iter()
            .map(|id| {
                if *id == "m-bad" {
                    message(id, "{broken")
                } else {
                    message(id, &good)
                }
            })
            .collect();

        let response = handle_event(batch(messages), &store, &test_config()).await;
        assert_eq!(failed_ids(&response), vec!["m-bad"]);
    }
}

#[tokio::test]
async fn test_rejected_extension_skips_fetch_and_write() {
    let store = MemoryStore::default().with_object("b", "data.txt", b"h\nv\n");

    let body = notification_body(&[("b", "data.txt")]);
    let response = handle_event(batch(vec![message("m-1", &body)]), &store, &test_config()).await;

    assert_eq!(failed_ids(&response), vec!["m-1"]);
    assert!(store.gets().is_empty());
    assert!(store.puts().is_empty());
}

#[tokio::test]
async fn test_scenario_txt_rejected_csv_normalized() {
    let store = MemoryStore::default().with_object("b", "test_file2.csv", b"Hello;World;2\n");

    let event = batch(vec![
        message("m-a", &notification_body(&[("b", "test_file1.txt")])),
        message("m-b", &notification_body(&[("b", "test_file2.csv")])),
    ]);

    let response = handle_event(event, &store, &test_config()).await;

    assert_eq!(failed_ids(&response), vec!["m-a"]);

    let puts = store.puts();
    assert_eq!(puts.len(), 1);
    let (bucket, key, data) = &puts[0];
    assert_eq!(bucket, "target-bucket");
    assert!(key.starts_with("normalized_"));
    assert!(key.ends_with(".csv.gz"));

    let decompressed = gzip_decompress(data).unwrap();
    assert_eq!(decompressed, b"Hello;World;2\n");
}

#[tokio::test]
async fn test_sibling_records_still_attempted_after_a_failure() {
    // First record points at a missing object, second is fine.
    let store = MemoryStore::default().with_object("b", "present.csv", b"h\nv\n");

    let body = notification_body(&[("b", "missing.csv"), ("b", "present.csv")]);
    let response = handle_event(batch(vec![message("m-1", &body)]), &store, &test_config()).await;

    // Message fails once, but the second record was processed and written.
    assert_eq!(failed_ids(&response), vec!["m-1"]);
    assert_eq!(store.gets().len(), 2);
    assert_eq!(store.puts().len(), 1);
}

#[tokio::test]
async fn test_repeated_failing_records_collapse_to_one_failure_entry() {
    let store = MemoryStore::default();

    let body = notification_body(&[("b", "missing.csv"), ("b", "missing.csv")]);
    let response = handle_event(batch(vec![message("m-1", &body)]), &store, &test_config()).await;

    assert_eq!(failed_ids(&response), vec!["m-1"]);
}

#[tokio::test]
async fn test_duplicate_message_ids_collapse_to_one_failure_entry() {
    let store = MemoryStore::default();

    let event = batch(vec![
        message("m-1", "{broken"),
        message("m-1", "{broken"),
    ]);
    let response = handle_event(event, &store, &test_config()).await;

    assert_eq!(failed_ids(&response), vec!["m-1"]);
}

#[tokio::test]
async fn test_redelivery_produces_independent_writes() {
    let store = MemoryStore::default().with_object("b", "data.csv", b"h1;h2\n1;2\n");

    let body = notification_body(&[("b", "data.csv")]);
    let event = batch(vec![message("m-1", &body)]);

    let first = handle_event(event.clone(), &store, &test_config()).await;
    let second = handle_event(event, &store, &test_config()).await;

    assert!(first.batch_item_failures.is_empty());
    assert!(second.batch_item_failures.is_empty());

    // Accepted at-least-once duplication: two writes under distinct keys.
    let puts = store.puts();
    assert_eq!(puts.len(), 2);
    assert_ne!(puts[0].1, puts[1].1);
}

#[tokio::test]
async fn test_empty_batch_reports_no_failures() {
    let store = MemoryStore::default();
    let response = handle_event(batch(vec![]), &store, &test_config()).await;
    assert!(response.batch_item_failures.is_empty());
}

#[tokio::test]
async fn test_empty_record_list_is_a_success() {
    let store = MemoryStore::default();
    let event = batch(vec![message("m-1", r#"{"Records": []}"#)]);

    let response = handle_event(event, &store, &test_config()).await;

    assert!(response.batch_item_failures.is_empty());
    assert!(store.puts().is_empty());
}

#[tokio::test]
async fn test_malformed_record_fields_fail_the_message() {
    let store = MemoryStore::default();
    let body = r#"{"Records": [{"s3": {"bucket": {"name": ""}, "object": {"key": "x.csv"}}}]}"#;

    let response = handle_event(batch(vec![message("m-1", body)]), &store, &test_config()).await;

    assert_eq!(failed_ids(&response), vec!["m-1"]);
    assert!(store.gets().is_empty());
}

#[tokio::test]
async fn test_non_utf8_content_fails_the_message() {
    let store = MemoryStore::default().with_object("b", "data.csv", &[0xff, 0xfe, 0x00]);

    let body = notification_body(&[("b", "data.csv")]);
    let response = handle_event(batch(vec![message("m-1", &body)]), &store, &test_config()).await;

    assert_eq!(failed_ids(&response), vec!["m-1"]);
    assert!(store.puts().is_empty());
}

#[tokio::test]
async fn test_ragged_rows_fail_the_message() {
    let store = MemoryStore::default().with_object("b", "data.csv", b"a;b;c\n1;2\n");

    let body = notification_body(&[("b", "data.csv")]);
    let response = handle_event(batch(vec![message("m-1", &body)]), &store, &test_config()).await;

    assert_eq!(failed_ids(&response), vec!["m-1"]);
    assert!(store.puts().is_empty());
}
