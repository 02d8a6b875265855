//! Spreadsheet → Postgres contract import pipeline.
//!
//! Loads a customer/contract spreadsheet export, normalizes each row into a
//! typed record, and reconciles it against the relational schema: clients are
//! found-or-created by CPF/CNPJ, plans and statuses are resolved through a
//! run-scoped lookup cache, contracts are upserted on the (client, plan) key,
//! and contacts are attached idempotently.
//!
//! # Modules
//!
//! - `config`: Environment-derived configuration.
//! - `db`: Database connection and pool management.
//! - `errors`: Import error taxonomy.
//! - `models`: Raw/clean records, contact kinds, run report.
//! - `normalize`: Field normalization (tax ids, dates, flags, state codes).
//! - `lookup`: Run-scoped cache for plan/status/contact-type ids.
//! - `importer`: Per-record reconciliation and the run loop.
//! - `spreadsheet`: Excel loading and column-to-field mapping.
//! - `report`: Run summary output (stdout + report file).

pub mod config;
pub mod db;
pub mod errors;
pub mod importer;
pub mod lookup;
pub mod models;
pub mod normalize;
pub mod report;
pub mod spreadsheet;
