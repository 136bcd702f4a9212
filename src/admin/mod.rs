//! Admin screen: assigns optional fields to wizard steps 2 and 3.

pub mod configurator;
pub mod routes;

pub use configurator::{AdminConfigurator, AdminView, SAVED_MESSAGE};
