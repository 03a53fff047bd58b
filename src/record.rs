// Record types: the document stored in the `sales` collection and the
// editable subset the user types in.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One document of the collection. `id` is assigned by the store on
/// insert, so it is skipped when serializing a record that has none yet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Record {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub revenue: f64,
}

/// Fields collected from the user for a create or an update.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFields {
    pub name: String,
    pub revenue: f64,
}

impl RecordFields {
    pub fn new(name: impl Into<String>, revenue: f64) -> Self {
        Self {
            name: name.into(),
            revenue,
        }
    }

    /// Build a record without an id, ready for insert.
    pub fn into_record(self) -> Record {
        Record {
            id: None,
            name: self.name,
            revenue: self.revenue,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{} {} {}", id.to_hex(), self.name, self.revenue),
            None => write!(f, "- {} {}", self.name, self.revenue),
        }
    }
}

/// The text typed for a record id is not a 24 character hex ObjectId.
#[derive(Debug, Error)]
#[error("Invalid ID format: {input:?}")]
pub struct InvalidRecordId {
    pub input: String,
    #[source]
    source: mongodb::bson::oid::Error,
}

/// Parse user input into the store's identifier format.
pub fn parse_record_id(input: &str) -> Result<ObjectId, InvalidRecordId> {
    ObjectId::parse_str(input).map_err(|source| InvalidRecordId {
        input: input.to_string(),
        source,
    })
}
