//! TestLedger server library.
//!
//! Entities, migrations and repositories for test-management records, the
//! cascading deletion engine, aggregate reporting and the actix-web API.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
