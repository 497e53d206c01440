//! An in process [DocumentStore] for tests.
//! Documents are checked against the collection schema the way a mapped index would check
//! them, and only become searchable after [DocumentStore::refresh].

use std::{
    collections::BTreeMap,
    net::IpAddr,
    sync::{Mutex, MutexGuard, PoisonError},
};

use models_activity::{FieldType, IndexSchema, timestamp_format};
use serde_json::{Value, json};

use crate::domain::{error::PipelineError, models::DocumentOutcome, ports::DocumentStore};

#[cfg(test)]
mod test;

/// Errors returned by [InMemoryStore]
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InMemoryStoreError {
    /// the store was switched off with [InMemoryStore::set_available]
    #[error("store is unavailable")]
    Unavailable,
    /// the collection was never created
    #[error("no such collection: {name}")]
    UnknownCollection {
        /// the requested collection
        name: String,
    },
    /// only `match_all` searches are understood
    #[error("unsupported query: {details}")]
    UnsupportedQuery {
        /// the part of the body that was not understood
        details: String,
    },
}

impl From<InMemoryStoreError> for PipelineError {
    fn from(err: InMemoryStoreError) -> Self {
        let details = err.to_string();
        match err {
            InMemoryStoreError::Unavailable => PipelineError::Connection { details },
            _ => PipelineError::Store { details },
        }
    }
}

#[derive(Debug)]
struct Collection {
    schema: IndexSchema,
    pending: Vec<(String, Value)>,
    visible: Vec<(String, Value)>,
}

#[derive(Debug)]
struct State {
    available: bool,
    collections: BTreeMap<String, Collection>,
    next_id: u64,
    bulk_calls: usize,
}

/// See the module docs
#[derive(Debug)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

const DEFAULT_SEARCH_SIZE: usize = 10;

impl InMemoryStore {
    /// create an empty, reachable store
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                available: true,
                collections: BTreeMap::new(),
                next_id: 1,
                bulk_calls: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_available(&self) -> Result<MutexGuard<'_, State>, InMemoryStoreError> {
        let state = self.lock();
        if !state.available {
            return Err(InMemoryStoreError::Unavailable);
        }
        Ok(state)
    }

    /// when false every operation fails with [InMemoryStoreError::Unavailable]
    pub fn set_available(&self, available: bool) {
        self.lock().available = available;
    }

    /// number of bulk requests received so far
    pub fn bulk_calls(&self) -> usize {
        self.lock().bulk_calls
    }

    /// number of stored documents in the collection, searchable or not
    pub fn document_count(&self, name: &str) -> usize {
        self.lock()
            .collections
            .get(name)
            .map(|c| c.pending.len() + c.visible.len())
            .unwrap_or(0)
    }
}

fn mapping_error(field: &str, field_type: FieldType) -> String {
    format!(
        "mapper_parsing_exception: failed to parse field [{field}] of type [{}]",
        field_type.mapping_type()
    )
}

fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => s.trim().parse::<f64>().is_ok_and(f64::is_finite),
        _ => false,
    }
}

/// whole numbers in the signed 32 bit range, `3.0` and `"42"` included
fn is_integer(value: &Value) -> bool {
    let in_range =
        |n: f64| n.fract() == 0.0 && (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&n);
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(n) => i32::try_from(n).is_ok(),
            None => n.as_f64().is_some_and(in_range),
        },
        Value::String(s) => s.trim().parse::<f64>().is_ok_and(in_range),
        _ => false,
    }
}

fn is_geo_point(value: &Value) -> bool {
    let in_range =
        |lat: f64, lon: f64| (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon);
    match value {
        Value::Object(point) => match (
            point.get("lat").and_then(Value::as_f64),
            point.get("lon").and_then(Value::as_f64),
        ) {
            (Some(lat), Some(lon)) => in_range(lat, lon),
            _ => false,
        },
        Value::String(s) => match s.split_once(',') {
            Some((lat, lon)) => match (lat.trim().parse(), lon.trim().parse()) {
                (Ok(lat), Ok(lon)) => in_range(lat, lon),
                _ => false,
            },
            None => false,
        },
        _ => false,
    }
}

fn accepts(field_type: FieldType, value: &Value) -> bool {
    if value.is_null() {
        return true;
    }
    match field_type {
        FieldType::Date => match value {
            Value::String(s) => timestamp_format::parse(s).is_ok(),
            Value::Number(n) => n.is_i64() || n.is_u64(),
            _ => false,
        },
        FieldType::Keyword | FieldType::Text | FieldType::TextWithKeyword => {
            matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
        }
        FieldType::Float => is_numeric(value),
        FieldType::Integer => is_integer(value),
        FieldType::Ip => value
            .as_str()
            .is_some_and(|s| s.parse::<IpAddr>().is_ok()),
        FieldType::GeoPoint => is_geo_point(value),
    }
}

/// Check a document against the schema, unmapped fields are accepted as is
fn validate_document(schema: &IndexSchema, document: &Value) -> Result<(), String> {
    let Some(fields) = document.as_object() else {
        return Err("mapper_parsing_exception: document must be an object".to_string());
    };

    for (name, value) in fields {
        if let Some(field_type) = schema.field_type(name)
            && !accepts(field_type, value)
        {
            return Err(mapping_error(name, field_type));
        }
    }
    Ok(())
}

fn search_size(body: &Value) -> Result<usize, InMemoryStoreError> {
    match body.get("size") {
        None => Ok(DEFAULT_SEARCH_SIZE),
        Some(size) => size
            .as_u64()
            .map(|s| s as usize)
            .ok_or_else(|| InMemoryStoreError::UnsupportedQuery {
                details: format!("size: {size}"),
            }),
    }
}

fn check_query(body: &Value) -> Result<(), InMemoryStoreError> {
    match body.get("query") {
        None => Ok(()),
        Some(query) if query.get("match_all").is_some() => Ok(()),
        Some(query) => Err(InMemoryStoreError::UnsupportedQuery {
            details: query.to_string(),
        }),
    }
}

impl DocumentStore for InMemoryStore {
    type Err = InMemoryStoreError;

    async fn ping(&self) -> Result<(), Self::Err> {
        self.lock_available().map(|_| ())
    }

    async fn collection_exists(&self, name: &str) -> Result<bool, Self::Err> {
        Ok(self.lock_available()?.collections.contains_key(name))
    }

    async fn collection_field_types(
        &self,
        name: &str,
    ) -> Result<BTreeMap<String, String>, Self::Err> {
        let state = self.lock_available()?;
        let collection =
            state
                .collections
                .get(name)
                .ok_or_else(|| InMemoryStoreError::UnknownCollection {
                    name: name.to_string(),
                })?;

        Ok(collection
            .schema
            .fields()
            .map(|(field, ty)| (field.to_string(), ty.mapping_type().to_string()))
            .collect())
    }

    async fn create_collection(&self, name: &str, schema: &IndexSchema) -> Result<bool, Self::Err> {
        let mut state = self.lock_available()?;
        if state.collections.contains_key(name) {
            return Ok(false);
        }
        state.collections.insert(
            name.to_string(),
            Collection {
                schema: schema.clone(),
                pending: Vec::new(),
                visible: Vec::new(),
            },
        );
        Ok(true)
    }

    async fn bulk_write(
        &self,
        name: &str,
        documents: &[Value],
    ) -> Result<Vec<DocumentOutcome>, Self::Err> {
        let mut state = self.lock_available()?;
        state.bulk_calls += 1;

        let State {
            collections,
            next_id,
            ..
        } = &mut *state;
        let collection =
            collections
                .get_mut(name)
                .ok_or_else(|| InMemoryStoreError::UnknownCollection {
                    name: name.to_string(),
                })?;

        let outcomes = documents
            .iter()
            .map(|document| match validate_document(&collection.schema, document) {
                Ok(()) => {
                    let id = format!("doc-{next_id}");
                    *next_id += 1;
                    collection.pending.push((id.clone(), document.clone()));
                    DocumentOutcome::Accepted { id }
                }
                Err(reason) => DocumentOutcome::Rejected { reason },
            })
            .collect();

        Ok(outcomes)
    }

    async fn refresh(&self, name: &str) -> Result<(), Self::Err> {
        let mut state = self.lock_available()?;
        let collection =
            state
                .collections
                .get_mut(name)
                .ok_or_else(|| InMemoryStoreError::UnknownCollection {
                    name: name.to_string(),
                })?;

        let pending = std::mem::take(&mut collection.pending);
        collection.visible.extend(pending);
        Ok(())
    }

    async fn search(&self, name: &str, body: Value) -> Result<Value, Self::Err> {
        check_query(&body)?;
        let size = search_size(&body)?;

        let state = self.lock_available()?;
        let collection =
            state
                .collections
                .get(name)
                .ok_or_else(|| InMemoryStoreError::UnknownCollection {
                    name: name.to_string(),
                })?;

        let hits: Vec<Value> = collection
            .visible
            .iter()
            .take(size)
            .map(|(id, source)| {
                json!({
                    "_index": name,
                    "_id": id,
                    "_score": 1.0,
                    "_source": source
                })
            })
            .collect();

        Ok(json!({
            "took": 0,
            "timed_out": false,
            "hits": {
                "total": { "value": collection.visible.len(), "relation": "eq" },
                "max_score": if hits.is_empty() { Value::Null } else { json!(1.0) },
                "hits": hits
            }
        }))
    }
}
