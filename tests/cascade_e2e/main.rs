//! Cascading deletion E2E test suite.
//!
//! Runs the deletion engine, the services around it and the HTTP surface
//! against a fresh in-memory SQLite database per test.
//!
//! Run with: cargo test --test cascade_e2e

mod test_helpers;

mod test_access_control;
mod test_bulk_delete;
mod test_legacy_schema;
mod test_project_cascade;
mod test_records;
mod test_user_cascade;
