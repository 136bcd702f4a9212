//! Form model shared by the wizard and the admin screen.

pub mod config;
pub mod field;

pub use config::{ConfigStep, FormConfig, FormConfigReader, FormConfigWriter};
pub use field::{FieldId, InputKind, InputSpec, credential_inputs, inputs_for};
