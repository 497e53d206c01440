use models_activity::{IndexSettings, activity_index_schema};
use serde_json::json;

use super::*;

fn valid_document() -> Value {
    json!({
        "timestamp": "2024-06-15T12:00:00.000Z",
        "user_id": "U001",
        "user_name": "Alice Johnson",
        "action": "login",
        "department": "engineering",
        "status": "success",
        "response_time": 120.5,
        "ip_address": "192.168.1.10",
        "user_agent": "Mozilla/5.0",
        "location": { "lat": 40.7128, "lon": -74.006 },
        "session_duration": 600
    })
}

async fn store_with_index() -> InMemoryStore {
    let store = InMemoryStore::new();
    let created = store
        .create_collection("logs", &activity_index_schema(IndexSettings::default()))
        .await
        .unwrap();
    assert!(created);
    store
}

#[tokio::test]
async fn test_accepts_valid_document() {
    let store = store_with_index().await;

    let outcomes = store.bulk_write("logs", &[valid_document()]).await.unwrap();

    assert!(matches!(outcomes[0], DocumentOutcome::Accepted { .. }));
}

#[tokio::test]
async fn test_rejects_mismatched_fields() {
    let store = store_with_index().await;
    let cases = [
        ("timestamp", json!("yesterday")),
        ("response_time", json!("fast")),
        ("ip_address", json!("300.1.1.1")),
        ("location", json!({ "lat": 10.0 })),
        ("location", json!("91.0,0.0")),
        ("session_duration", json!([1, 2])),
        ("session_duration", json!(3_000_000_000_u64)),
        ("session_duration", json!(3.5)),
        ("session_duration", json!("-2147483649")),
        ("user_id", json!({ "nested": true })),
    ];

    for (field, value) in cases {
        let mut document = valid_document();
        document[field] = value.clone();

        let outcomes = store.bulk_write("logs", &[document]).await.unwrap();

        match &outcomes[0] {
            DocumentOutcome::Rejected { reason } => {
                assert!(reason.contains(&format!("[{field}]")), "{reason}")
            }
            other => panic!("{field}={value} should be rejected, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_coerces_like_a_mapped_index() {
    let store = store_with_index().await;
    let mut document = valid_document();
    document["response_time"] = json!("120.5");
    document["location"] = json!("51.5074,-0.1278");
    document["timestamp"] = json!(1718452800000_i64);
    document["session_duration"] = json!("2147483647");
    document["unmapped"] = json!({ "anything": [1, 2, 3] });

    let outcomes = store.bulk_write("logs", &[document]).await.unwrap();

    assert!(matches!(outcomes[0], DocumentOutcome::Accepted { .. }));
}

#[tokio::test]
async fn test_non_object_document_rejected() {
    let store = store_with_index().await;

    let outcomes = store.bulk_write("logs", &[json!([1, 2])]).await.unwrap();

    assert!(matches!(outcomes[0], DocumentOutcome::Rejected { .. }));
}

#[tokio::test]
async fn test_refresh_controls_visibility() {
    let store = store_with_index().await;
    store
        .bulk_write("logs", &[valid_document(), valid_document()])
        .await
        .unwrap();

    let body = json!({ "query": { "match_all": {} }, "size": 1 });
    let before = store.search("logs", body.clone()).await.unwrap();
    assert_eq!(before["hits"]["total"]["value"], 0);

    store.refresh("logs").await.unwrap();
    let after = store.search("logs", body).await.unwrap();
    assert_eq!(after["hits"]["total"]["value"], 2);
    assert_eq!(after["hits"]["hits"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_collection_and_query() {
    let store = store_with_index().await;

    assert_eq!(
        store.refresh("missing").await.unwrap_err(),
        InMemoryStoreError::UnknownCollection {
            name: "missing".to_string()
        }
    );
    assert!(matches!(
        store
            .search("logs", json!({ "query": { "term": { "status": "failed" } } }))
            .await
            .unwrap_err(),
        InMemoryStoreError::UnsupportedQuery { .. }
    ));
}

#[tokio::test]
async fn test_unavailable() {
    let store = store_with_index().await;
    store.set_available(false);

    assert_eq!(store.ping().await, Err(InMemoryStoreError::Unavailable));
    assert!(PipelineError::from(InMemoryStoreError::Unavailable).is_connection());

    store.set_available(true);
    assert_eq!(store.ping().await, Ok(()));
}

#[tokio::test]
async fn test_create_existing_collection_is_noop() {
    let store = store_with_index().await;
    let other = IndexSchema::new(IndexSettings::default()).field("x", FieldType::Keyword);

    assert!(!store.create_collection("logs", &other).await.unwrap());
    let types = store.collection_field_types("logs").await.unwrap();
    assert_eq!(types.get("response_time").map(String::as_str), Some("float"));
    assert!(!types.contains_key("x"));
}
