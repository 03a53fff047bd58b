// Store module: the `RecordStore` seam used by the operations and its
// MongoDB implementation. The MongoDB side uses the driver's blocking API
// so the whole tool stays synchronous.

use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use mongodb::sync::{Client, Collection};
use thiserror::Error;

use crate::config::Config;
use crate::record::{Record, RecordFields};

/// Errors raised by a record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The client could not be built from the connection string.
    #[error("Failed to connect to {uri}")]
    Connect {
        uri: String,
        #[source]
        source: mongodb::error::Error,
    },

    /// A request to the database failed or its reply could not be decoded.
    #[error("Database error")]
    Database(#[from] mongodb::error::Error),

    /// The store replied with an `_id` that is not an ObjectId.
    #[error("Inserted id is not an ObjectId: {0}")]
    UnexpectedId(String),

    /// The store is not reachable.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// The four calls the CRUD operations need from a document store.
pub trait RecordStore {
    /// Insert a new record and return the id the store assigned to it.
    fn insert(&self, fields: &RecordFields) -> Result<ObjectId>;

    /// Every record in the collection, unfiltered.
    fn find_all(&self) -> Result<Vec<Record>>;

    /// Set name and revenue on the record with `id`. Returns the record as
    /// it is after the update, or `None` when no record has that id.
    fn update(&self, id: ObjectId, fields: &RecordFields) -> Result<Option<Record>>;

    /// Delete the record with `id` and return how many were removed (0 or 1).
    fn delete(&self, id: ObjectId) -> Result<u64>;
}

/// Holds the single client handle for the process and the collection
/// every operation is scoped to.
pub struct MongoStore {
    // kept so the connection pool lives as long as the store
    _client: Client,
    collection: Collection<Record>,
}

impl MongoStore {
    /// Build a client from the configured URI. The driver connects lazily,
    /// so this only fails on a bad connection string or options.
    pub fn connect(config: &Config) -> Result<Self> {
        let client = Client::with_uri_str(&config.uri).map_err(|source| StoreError::Connect {
            uri: config.redacted_uri(),
            source,
        })?;
        let collection = client
            .database(&config.database)
            .collection::<Record>(&config.collection);
        tracing::debug!(
            uri = %config.redacted_uri(),
            database = %config.database,
            collection = %config.collection,
            "mongodb client ready"
        );
        Ok(Self {
            _client: client,
            collection,
        })
    }
}

impl RecordStore for MongoStore {
    fn insert(&self, fields: &RecordFields) -> Result<ObjectId> {
        tracing::debug!(name = %fields.name, revenue = fields.revenue, "insert_one");
        let record = fields.clone().into_record();
        let res = self.collection.insert_one(&record, None)?;
        // the driver generates an ObjectId when `_id` is missing
        res.inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::UnexpectedId(res.inserted_id.to_string()))
    }

    fn find_all(&self) -> Result<Vec<Record>> {
        tracing::debug!("find (no filter)");
        let cursor = self.collection.find(None, None)?;
        let records = cursor.collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn update(&self, id: ObjectId, fields: &RecordFields) -> Result<Option<Record>> {
        tracing::debug!(%id, "find_one_and_update");
        let filter = doc! { "_id": id };
        let update = doc! {
            "$set": {
                "name": fields.name.as_str(),
                "revenue": fields.revenue,
            }
        };
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        Ok(self
            .collection
            .find_one_and_update(filter, update, options)?)
    }

    fn delete(&self, id: ObjectId) -> Result<u64> {
        tracing::debug!(%id, "delete_one");
        let res = self.collection.delete_one(doc! { "_id": id }, None)?;
        Ok(res.deleted_count)
    }
}
