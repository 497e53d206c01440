//! The synthetic users that activity records are attributed to

/// The department a synthetic user belongs to
#[derive(
    Debug,
    Clone,
    Copy,
    Hash,
    Eq,
    PartialEq,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::VariantArray,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Department {
    /// Engineering
    Engineering,
    /// Marketing
    Marketing,
    /// Sales
    Sales,
    /// Human resources
    Hr,
}

/// A synthetic user. Entities are fixed for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// The user id e.g. `U001`
    pub id: String,
    /// The display name of the user
    pub name: String,
    /// The department of the user
    pub department: Department,
}

impl Entity {
    /// create a new [Entity]
    pub fn new(id: impl Into<String>, name: impl Into<String>, department: Department) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            department,
        }
    }
}

/// The five users activity is generated for when no population is supplied
pub fn default_population() -> Vec<Entity> {
    vec![
        Entity::new("U001", "John Doe", Department::Engineering),
        Entity::new("U002", "Jane Smith", Department::Marketing),
        Entity::new("U003", "Bob Johnson", Department::Sales),
        Entity::new("U004", "Alice Brown", Department::Engineering),
        Entity::new("U005", "Charlie Wilson", Department::Hr),
    ]
}
