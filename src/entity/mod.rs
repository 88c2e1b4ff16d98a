//! SeaORM entity definitions.

pub mod assignment;
pub mod bug;
pub mod comment;
pub mod notification;
pub mod project;
pub mod requirement;
pub mod test_case;
pub mod test_execution;
pub mod test_suite;
pub mod user;
