// Record operations. Each one makes a single store call and reports the
// outcome on the console.
//
// Failures come in two kinds: those returned as `Err` end the run (bad
// id, unreadable collection), while a failed insert, update or delete is
// only reported and the operation returns `Ok`.

use anyhow::{Context, Result};
use mongodb::bson::oid::ObjectId;

use crate::input::{collect_fields, collect_id, Console};
use crate::record::{parse_record_id, Record, RecordFields};
use crate::store::{RecordStore, StoreError};

/// `error: cause: cause`, for messages that are printed rather than
/// returned.
fn chain(e: &StoreError) -> String {
    let mut out = e.to_string();
    let mut source = std::error::Error::source(e);
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

/// Insert a new record. Returns the id the store assigned, or `None` if
/// the insert failed (already reported).
pub fn create_record<S, C>(store: &S, console: &mut C, fields: RecordFields) -> Result<Option<ObjectId>>
where
    S: RecordStore + ?Sized,
    C: Console + ?Sized,
{
    let spinner = console.progress("Creating record...");
    let res = store.insert(&fields);
    spinner.finish_and_clear();

    match res {
        Ok(id) => {
            tracing::info!(%id, name = %fields.name, "record created");
            console.say(&format!("Created record: {}", id.to_hex()))?;
            Ok(Some(id))
        }
        Err(e) => {
            tracing::warn!(error = %chain(&e), "insert failed");
            console.say(&format!("Could not insert record: {}", chain(&e)))?;
            Ok(None)
        }
    }
}

/// Print every record in the collection. Any store error here is fatal.
pub fn read_all<S, C>(store: &S, console: &mut C) -> Result<Vec<Record>>
where
    S: RecordStore + ?Sized,
    C: Console + ?Sized,
{
    let spinner = console.progress("Loading records...");
    let res = store.find_all();
    spinner.finish_and_clear();

    let records = res.context("Could not read records")?;
    if records.is_empty() {
        console.say("No records found.")?;
    }
    for record in &records {
        console.say(&record.to_string())?;
    }
    Ok(records)
}

/// Ask for an id, then for the new fields, and apply them. A malformed
/// id ends the run before the fields are asked for.
pub fn update_record<S, C>(store: &S, console: &mut C) -> Result<Option<Record>>
where
    S: RecordStore + ?Sized,
    C: Console + ?Sized,
{
    let raw = collect_id(console)?;
    let id = parse_record_id(&raw)?;
    let fields = collect_fields(console)?;

    let spinner = console.progress("Updating record...");
    let res = store.update(id, &fields);
    spinner.finish_and_clear();

    match res {
        Ok(Some(record)) => {
            tracing::info!(%id, "record updated");
            console.say(&format!("Updated record: {record}"))?;
            Ok(Some(record))
        }
        Ok(None) => {
            tracing::warn!(%id, "update matched no record");
            console.say(&format!(
                "Failed to update record: no record with id {}",
                id.to_hex()
            ))?;
            Ok(None)
        }
        Err(e) => {
            tracing::warn!(%id, error = %chain(&e), "update failed");
            console.say(&format!("Failed to update record: {}", chain(&e)))?;
            Ok(None)
        }
    }
}

/// Ask for an id and delete that record. Returns the number removed, or
/// `None` if the store call failed (already reported).
pub fn delete_record<S, C>(store: &S, console: &mut C) -> Result<Option<u64>>
where
    S: RecordStore + ?Sized,
    C: Console + ?Sized,
{
    let raw = collect_id(console)?;
    let id = parse_record_id(&raw)?;

    let spinner = console.progress("Deleting record...");
    let res = store.delete(id);
    spinner.finish_and_clear();

    match res {
        Ok(n) => {
            tracing::info!(%id, deleted = n, "delete done");
            console.say(&format!("Successfully deleted: {n} record(s)"))?;
            Ok(Some(n))
        }
        Err(e) => {
            tracing::warn!(%id, error = %chain(&e), "delete failed");
            console.say(&format!("Could not delete record: {}", chain(&e)))?;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::LineConsole;
    use crate::memory::MemoryStore;
    use std::io::Cursor;

    type TestConsole = LineConsole<Cursor<Vec<u8>>, Vec<u8>>;

    fn console(input: &str) -> TestConsole {
        LineConsole::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn printed(c: &TestConsole) -> String {
        String::from_utf8(c.output().clone()).unwrap()
    }

    #[test]
    fn create_reports_assigned_id() {
        let store = MemoryStore::new();
        let mut c = console("");
        let id = create_record(&store, &mut c, RecordFields::new("Widget", 12.5))
            .unwrap()
            .unwrap();
        assert!(printed(&c).contains(&format!("Created record: {}", id.to_hex())));
        assert_eq!(store.records()[0].id, Some(id));
    }

    #[test]
    fn read_all_prints_each_record() {
        let store = MemoryStore::new();
        let a = store.insert(&RecordFields::new("Widget", 12.5)).unwrap();
        let b = store.insert(&RecordFields::new("Gadget", 9.0)).unwrap();

        let mut c = console("");
        let records = read_all(&store, &mut c).unwrap();
        assert_eq!(records.len(), 2);

        let out = printed(&c);
        assert!(out.contains(&format!("{} Widget 12.5", a.to_hex())));
        assert!(out.contains(&format!("{} Gadget 9", b.to_hex())));
    }

    #[test]
    fn read_all_on_empty_collection() {
        let store = MemoryStore::new();
        let mut c = console("");
        assert!(read_all(&store, &mut c).unwrap().is_empty());
        assert_eq!(printed(&c), "No records found.\n");
    }

    #[test]
    fn update_unknown_id_is_reported_not_fatal() {
        let store = MemoryStore::new();
        let mut c = console("671aa05bf8333e0581fe6911\nGadget\n9.0\n");
        let res = update_record(&store, &mut c).unwrap();
        assert!(res.is_none());
        assert!(printed(&c).contains("Failed to update record: no record with id"));
    }

    #[test]
    fn malformed_id_fails_before_field_prompts() {
        let store = MemoryStore::new();
        let mut c = console("not-an-id\nGadget\n9.0\n");
        let err = update_record(&store, &mut c).unwrap_err();
        assert!(err.to_string().contains("Invalid ID format"));
        assert!(!printed(&c).contains("Insert the name"));
        assert_eq!(store.call_count(), 0);
    }

    #[test]
    fn delete_missing_id_reports_zero() {
        let store = MemoryStore::new();
        let mut c = console("671aa05bf8333e0581fe6911\n");
        assert_eq!(delete_record(&store, &mut c).unwrap(), Some(0));
        assert!(printed(&c).contains("Successfully deleted: 0 record(s)"));
    }
}
