// Library root
// -----------
// This crate exposes the pieces of the sales CRUD tool. The binary
// (`main.rs`) wires them together: load config, connect, run the menu.
//
// Module responsibilities:
// - `config`: resolves connection and logging settings from defaults,
//   an optional JSON file in the home directory and the environment.
// - `record`: the `Record` document and the editable `RecordFields`.
// - `store`: the `RecordStore` trait and the MongoDB implementation.
// - `memory`: an in-memory `RecordStore` used by the tests.
// - `input`: console abstraction plus the prompt sequences.
// - `ops`: the four record operations (create, read, update, delete).
// - `menu`: parses the menu selection and dispatches one command.
pub mod config;
pub mod input;
pub mod memory;
pub mod menu;
pub mod ops;
pub mod record;
pub mod store;
