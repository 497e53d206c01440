use activity_pipeline::{
    BulkLoader, LoaderConfig,
    outbound::mock::{MockDocumentStore, MockStoreError},
};
use chrono::{TimeZone, Utc};
use models_activity::{ActivityRecord, Action, Department, GeoPoint, Status};

use super::*;

fn record(user_name: &str, action: Action, status: Status, response_time: f64) -> ActivityRecord {
    ActivityRecord {
        timestamp: Utc.with_ymd_and_hms(2024, 6, 15, 9, 30, 5).unwrap(),
        user_id: "U001".to_string(),
        user_name: user_name.to_string(),
        action,
        department: Department::Engineering,
        status,
        response_time,
        ip_address: "192.168.4.20".parse().unwrap(),
        user_agent: "Mozilla/5.0".to_string(),
        location: GeoPoint::LONDON,
        session_duration: 900,
    }
}

fn summary(record: &ActivityRecord) -> HitSummary {
    serde_json::from_value(serde_json::to_value(record).unwrap()).unwrap()
}

fn term(key: &str, doc_count: u64) -> TermBucket {
    TermBucket {
        key: key.to_string(),
        doc_count,
    }
}

#[test]
fn test_format_searches() {
    let records = [
        summary(&record("Alice Johnson", Action::Login, Status::Success, 120.5)),
        summary(&record("Bob Smith", Action::FileUpload, Status::Failed, 4999.99)),
    ];

    assert_eq!(
        format_recent(&records),
        vec![
            "2024-06-15T09:30:05 | Alice Johnson | login | success",
            "2024-06-15T09:30:05 | Bob Smith | file_upload | failed",
        ]
    );
    assert_eq!(
        format_engineering(42, &records[..1]),
        vec!["Found 42 engineering users", "Alice Johnson - login"]
    );
    assert_eq!(
        format_failed(1, &records[1..]),
        vec!["Found 1 failed actions", "Bob Smith - file_upload - 4999.99ms"]
    );
}

#[test]
fn test_format_hits_written_by_other_tools() {
    let hits: Vec<HitSummary> = serde_json::from_value(json!([
        {
            "timestamp": "2024-06-15T09:30:05.123456",
            "user_name": "Dave Brown",
            "action": "search",
            "status": "failed",
            "response_time": 87
        },
        { "timestamp": 1718443805000_i64, "user_name": "Eve Davis" }
    ]))
    .unwrap();

    assert_eq!(
        format_recent(&hits),
        vec![
            "2024-06-15T09:30:05 | Dave Brown | search | failed",
            "1718443805000 | Eve Davis | - | -",
        ]
    );
    assert_eq!(
        format_failed(2, &hits),
        vec![
            "Found 2 failed actions",
            "Dave Brown - search - 87ms",
            "Eve Davis - - - -ms",
        ]
    );
}

#[test]
fn test_format_aggregations() {
    assert_eq!(
        format_departments(&[term("engineering", 40), term("sales", 12)]),
        vec!["engineering: 40 actions", "sales: 12 actions"]
    );

    assert_eq!(
        format_response_times(&[ResponseTimeBucket {
            key: "api_call".to_string(),
            doc_count: 3,
            avg_response_time: MetricValue {
                value: Some(1234.5678),
            },
        }]),
        vec!["api_call: 1234.57ms average (3 samples)"]
    );

    assert_eq!(
        format_status_distribution(&[term("success", 2), term("failed", 1)]),
        vec!["success: 2 (66.7%)", "failed: 1 (33.3%)"]
    );

    assert_eq!(
        format_daily_activity(&[DayBucket {
            key_as_string: "2024-06-14".to_string(),
            doc_count: 21,
        }]),
        vec!["2024-06-14: 21 activities"]
    );

    assert_eq!(
        format_session_time(&[SessionBucket {
            key: "Alice Johnson".to_string(),
            doc_count: 4,
            total_session_time: MetricValue {
                value: Some(5400.0),
            },
        }]),
        vec!["Alice Johnson: 1.5 hours total (4 sessions)"]
    );
}

#[test]
fn test_status_distribution_of_nothing() {
    assert_eq!(
        format_status_distribution(&[term("success", 0)]),
        vec!["success: 0 (0.0%)"]
    );
    assert!(format_status_distribution(&[]).is_empty());
}

fn aggregation_response(aggregations: Value) -> SearchResponse<Value> {
    serde_json::from_value(json!({
        "took": 3,
        "timed_out": false,
        "hits": {
            "total": { "value": 150, "relation": "eq" },
            "max_score": null,
            "hits": []
        },
        "aggregations": aggregations
    }))
    .unwrap()
}

#[test]
fn test_buckets() {
    let response = aggregation_response(json!({
        "by_action": {
            "doc_count_error_upper_bound": 0,
            "sum_other_doc_count": 0,
            "buckets": [
                { "key": "login", "doc_count": 30, "avg_response_time": { "value": 250.0 } },
                { "key": "logout", "doc_count": 20, "avg_response_time": { "value": null } }
            ]
        }
    }));

    let parsed: Vec<ResponseTimeBucket> = buckets(&response, "by_action").unwrap();

    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].avg_response_time.value, Some(250.0));
    assert_eq!(parsed[1].avg_response_time.value, None);
    assert!(buckets::<TermBucket>(&response, "by_status").is_err());
}

#[tokio::test]
async fn test_searches_through_the_loader() {
    let source = serde_json::to_value(record("Carol White", Action::ApiCall, Status::Failed, 310.0))
        .unwrap();
    let mut store = MockDocumentStore::new();
    store
        .expect_search()
        .times(3)
        .withf(|name, _| name.to_string() == "logs")
        .returning(move |_, _| {
            let response = json!({
                "took": 1,
                "timed_out": false,
                "hits": {
                    "total": { "value": 7, "relation": "eq" },
                    "max_score": 1.0,
                    "hits": [{ "_id": "a", "_score": 1.0, "_source": source.clone() }]
                }
            });
            Box::pin(async move { Ok::<_, MockStoreError>(response) })
        });
    let loader = BulkLoader::new(store, LoaderConfig::default()).unwrap();

    let sections = Reporter::new(&loader, "logs").searches().await.unwrap();

    assert_eq!(sections.len(), 3);
    assert_eq!(sections[1].lines[0], "Found 7 engineering users");
    assert_eq!(
        sections[2].lines,
        vec!["Found 7 failed actions", "Carol White - api_call - 310ms"]
    );
}

#[tokio::test]
async fn test_searches_tolerate_foreign_documents() {
    let mut store = MockDocumentStore::new();
    store.expect_search().times(3).returning(|_, _| {
        let response = json!({
            "took": 1,
            "timed_out": false,
            "hits": {
                "total": { "value": 1, "relation": "eq" },
                "max_score": 1.0,
                "hits": [{
                    "_id": "legacy",
                    "_score": 1.0,
                    "_source": {
                        "timestamp": "2024-06-15T09:30:05.123456",
                        "user_name": "Frank Miller",
                        "action": "logout",
                        "status": "success",
                        "response_time": 1500.25,
                        "location": "not even a point"
                    }
                }]
            }
        });
        Box::pin(async move { Ok::<_, MockStoreError>(response) })
    });
    let loader = BulkLoader::new(store, LoaderConfig::default()).unwrap();

    let sections = Reporter::new(&loader, "logs").searches().await.unwrap();

    assert_eq!(
        sections[0].lines,
        vec!["2024-06-15T09:30:05 | Frank Miller | logout | success"]
    );
    assert_eq!(sections[2].lines[1], "Frank Miller - logout - 1500.25ms");
}

#[tokio::test]
async fn test_unreachable_store_fails_the_report() {
    let mut store = MockDocumentStore::new();
    store
        .expect_search()
        .returning(|_, _| Box::pin(async { Err::<Value, _>(MockStoreError::Unavailable) }));
    let loader = BulkLoader::new(store, LoaderConfig::default()).unwrap();

    let err = Reporter::new(&loader, "logs")
        .aggregations()
        .await
        .unwrap_err();

    let pipeline_err = err.downcast_ref::<PipelineError>().unwrap();
    assert!(pipeline_err.is_connection());
}

#[test]
fn test_section_display() {
    let section = Section {
        title: "3. Failed actions:",
        lines: vec!["Found 0 failed actions".to_string()],
    };

    assert_eq!(
        section.to_string(),
        "3. Failed actions:\n   Found 0 failed actions\n"
    );
}
