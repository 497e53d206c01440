//! Description of the index mapping that activity records are stored under

use std::collections::BTreeMap;

use serde_json::{Value, json};


/// The mapping type of a single field
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum FieldType {
    /// `date`
    Date,
    /// `keyword`
    Keyword,
    /// `text`
    Text,
    /// `text` with a `keyword` sub-field for exact matching and aggregations
    TextWithKeyword,
    /// `float`
    Float,
    /// `ip`
    Ip,
    /// `geo_point`
    GeoPoint,
    /// `integer`
    Integer,
}

impl FieldType {
    /// The value of the `type` key in the mapping
    pub fn mapping_type(&self) -> &'static str {
        match self {
            FieldType::Date => "date",
            FieldType::Keyword => "keyword",
            FieldType::Text | FieldType::TextWithKeyword => "text",
            FieldType::Float => "float",
            FieldType::Ip => "ip",
            FieldType::GeoPoint => "geo_point",
            FieldType::Integer => "integer",
        }
    }

    fn mapping(&self) -> Value {
        match self {
            FieldType::TextWithKeyword => json!({
                "type": "text",
                "fields": { "keyword": { "type": "keyword" } }
            }),
            other => json!({ "type": other.mapping_type() }),
        }
    }
}

/// Shard and replica settings applied when the index is created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSettings {
    /// `number_of_shards`
    pub number_of_shards: u32,
    /// `number_of_replicas`
    pub number_of_replicas: u32,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            number_of_shards: 1,
            number_of_replicas: 1,
        }
    }
}

/// A field whose existing mapping disagrees with the schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldConflict {
    /// the field name
    pub field: String,
    /// the type the schema asks for
    pub expected: &'static str,
    /// the type currently mapped, `None` when the field is not mapped at all
    pub actual: Option<String>,
}

impl std::fmt::Display for FieldConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.actual {
            Some(actual) => write!(
                f,
                "{} is mapped as {actual}, expected {}",
                self.field, self.expected
            ),
            None => write!(f, "{} is not mapped, expected {}", self.field, self.expected),
        }
    }
}

/// The field types and settings of an index
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSchema {
    fields: Vec<(String, FieldType)>,
    /// settings used on creation
    pub settings: IndexSettings,
}

impl IndexSchema {
    /// create an empty schema with the given settings
    pub fn new(settings: IndexSettings) -> Self {
        Self {
            fields: Vec::new(),
            settings,
        }
    }

    /// add a field, replacing the type of an existing field with the same name
    pub fn field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(existing) => existing.1 = field_type,
            None => self.fields.push((name, field_type)),
        }
        self
    }

    /// iterate the fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&str, FieldType)> {
        self.fields.iter().map(|(name, ty)| (name.as_str(), *ty))
    }

    /// look up the type of a field
    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, ty)| *ty)
    }

    /// The body of the create index request
    pub fn to_index_body(&self) -> Value {
        let properties: serde_json::Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, ty)| (name.clone(), ty.mapping()))
            .collect();

        json!({
            "settings": {
                "number_of_shards": self.settings.number_of_shards,
                "number_of_replicas": self.settings.number_of_replicas
            },
            "mappings": {
                "properties": properties
            }
        })
    }

    /// Compare the schema against the field types of an existing index.
    /// Extra fields in the existing index are allowed.
    pub fn conflicts(&self, existing: &BTreeMap<String, String>) -> Vec<FieldConflict> {
        self.fields
            .iter()
            .filter_map(|(name, ty)| {
                let expected = ty.mapping_type();
                match existing.get(name) {
                    Some(actual) if actual == expected => None,
                    actual => Some(FieldConflict {
                        field: name.clone(),
                        expected,
                        actual: actual.cloned(),
                    }),
                }
            })
            .collect()
    }
}

/// Flatten the top level `properties` object of a mapping into `field -> type`.
/// Object fields without an explicit type are reported as `object`.
pub fn field_types_from_properties(properties: &Value) -> BTreeMap<String, String> {
    properties
        .as_object()
        .map(|props| {
            props
                .iter()
                .map(|(name, mapping)| {
                    let ty = mapping["type"].as_str().unwrap_or("object").to_string();
                    (name.clone(), ty)
                })
                .collect()
        })
        .unwrap_or_default()
}

/// The schema activity records are stored with
pub fn activity_index_schema(settings: IndexSettings) -> IndexSchema {
    IndexSchema::new(settings)
        .field("timestamp", FieldType::Date)
        .field("user_id", FieldType::Keyword)
        .field("user_name", FieldType::TextWithKeyword)
        .field("action", FieldType::Keyword)
        .field("department", FieldType::Keyword)
        .field("status", FieldType::Keyword)
        .field("response_time", FieldType::Float)
        .field("ip_address", FieldType::Ip)
        .field("user_agent", FieldType::Text)
        .field("location", FieldType::GeoPoint)
        .field("session_duration", FieldType::Integer)
}
