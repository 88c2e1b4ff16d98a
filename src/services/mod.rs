//! Business logic services.

pub mod assignments;
pub mod cascade;
pub mod deletion;
pub mod executions;
pub mod reporting;
pub mod user_admin;

pub use cascade::{CascadeEngine, CascadeReport};
pub use deletion::{DeletionError, DeletionService};
