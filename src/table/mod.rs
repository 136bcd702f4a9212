//! Read-only table of submitted onboarding records.

pub mod routes;
pub mod viewer;

pub use viewer::{COLUMNS, Column, DataTableViewer};
