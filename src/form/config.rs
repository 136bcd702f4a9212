//! Form configuration: which optional fields appear in step 2 and step 3.
//!
//! The configuration is a partition: every field is in exactly one of
//! {step 2, step 3, unassigned}. `assign` refuses to put a field in a step
//! while it sits in the other one.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::field::FieldId;
use crate::error::FormConfigError;

/// A configurable wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfigStep {
    Step2,
    Step3,
}

impl ConfigStep {
    pub const ALL: [ConfigStep; 2] = [ConfigStep::Step2, ConfigStep::Step3];

    /// 1-based step number as shown to users.
    pub fn number(&self) -> u8 {
        match self {
            Self::Step2 => 2,
            Self::Step3 => 3,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            2 => Some(Self::Step2),
            3 => Some(Self::Step3),
            _ => None,
        }
    }

    pub fn other(&self) -> Self {
        match self {
            Self::Step2 => Self::Step3,
            Self::Step3 => Self::Step2,
        }
    }

    pub fn title(&self) -> String {
        format!("Step {} Configuration", self.number())
    }
}

/// Ordered field sets for steps 2 and 3.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormConfig {
    step2_fields: Vec<FieldId>,
    step3_fields: Vec<FieldId>,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            step2_fields: vec![FieldId::AboutMe, FieldId::Address],
            step3_fields: vec![FieldId::Birthdate],
        }
    }
}

impl FormConfig {
    /// A configuration with nothing assigned.
    pub fn empty() -> Self {
        Self {
            step2_fields: Vec::new(),
            step3_fields: Vec::new(),
        }
    }

    /// Fields of a step, in the order they were assigned.
    pub fn fields(&self, step: ConfigStep) -> &[FieldId] {
        match step {
            ConfigStep::Step2 => &self.step2_fields,
            ConfigStep::Step3 => &self.step3_fields,
        }
    }

    fn fields_mut(&mut self, step: ConfigStep) -> &mut Vec<FieldId> {
        match step {
            ConfigStep::Step2 => &mut self.step2_fields,
            ConfigStep::Step3 => &mut self.step3_fields,
        }
    }

    /// Where the field currently lives, if anywhere.
    pub fn assignment(&self, field: FieldId) -> Option<ConfigStep> {
        ConfigStep::ALL
            .into_iter()
            .find(|step| self.fields(*step).contains(&field))
    }

    /// Put `field` into `step`. Idempotent when it is already there.
    pub fn assign(&mut self, field: FieldId, step: ConfigStep) -> Result<(), FormConfigError> {
        match self.assignment(field) {
            Some(current) if current == step => Ok(()),
            Some(current) => Err(FormConfigError::AssignedElsewhere {
                field,
                step: current.number(),
            }),
            None => {
                self.fields_mut(step).push(field);
                Ok(())
            }
        }
    }

    /// Remove `field` from `step`. Returns whether anything changed.
    pub fn unassign(&mut self, field: FieldId, step: ConfigStep) -> bool {
        let fields = self.fields_mut(step);
        let before = fields.len();
        fields.retain(|f| *f != field);
        fields.len() != before
    }

    /// Whether `field` may be toggled in `step` (false while the other step owns it).
    pub fn is_selectable(&self, field: FieldId, step: ConfigStep) -> bool {
        !self.fields(step.other()).contains(&field)
    }

    /// A step is valid while it keeps at least one field.
    pub fn is_step_valid(&self, step: ConfigStep) -> bool {
        !self.fields(step).is_empty()
    }

    pub fn can_save(&self) -> bool {
        ConfigStep::ALL.into_iter().all(|step| self.is_step_valid(step))
    }
}

/// The single writer of the shared configuration.
///
/// Not `Clone`: whoever owns it is the only component that can mutate the
/// configuration. Consumers get a [`FormConfigReader`].
#[derive(Debug)]
pub struct FormConfigWriter {
    inner: Arc<RwLock<FormConfig>>,
}

impl FormConfigWriter {
    pub fn new(config: FormConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Hand out a read-only view onto the same configuration.
    pub fn reader(&self) -> FormConfigReader {
        FormConfigReader {
            inner: Arc::clone(&self.inner),
        }
    }

    pub async fn snapshot(&self) -> FormConfig {
        self.inner.read().await.clone()
    }

    /// Mutate under the write lock.
    pub async fn update<T>(&self, f: impl FnOnce(&mut FormConfig) -> T) -> T {
        let mut config = self.inner.write().await;
        f(&mut config)
    }
}

/// Read-only handle onto the shared configuration.
#[derive(Debug, Clone)]
pub struct FormConfigReader {
    inner: Arc<RwLock<FormConfig>>,
}

impl FormConfigReader {
    pub async fn snapshot(&self) -> FormConfig {
        self.inner.read().await.clone()
    }

    pub async fn fields(&self, step: ConfigStep) -> Vec<FieldId> {
        self.inner.read().await.fields(step).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout() {
        let config = FormConfig::default();
        assert_eq!(
            config.fields(ConfigStep::Step2),
            &[FieldId::AboutMe, FieldId::Address]
        );
        assert_eq!(config.fields(ConfigStep::Step3), &[FieldId::Birthdate]);
        assert!(config.can_save());
    }

    #[test]
    fn assign_rejects_field_owned_by_other_step() {
        let mut config = FormConfig::default();
        let err = config
            .assign(FieldId::AboutMe, ConfigStep::Step3)
            .unwrap_err();
        assert_eq!(
            err,
            FormConfigError::AssignedElsewhere {
                field: FieldId::AboutMe,
                step: 2
            }
        );
        assert_eq!(config.fields(ConfigStep::Step3), &[FieldId::Birthdate]);
    }

    #[test]
    fn assign_is_idempotent() {
        let mut config = FormConfig::default();
        config.assign(FieldId::Birthdate, ConfigStep::Step3).unwrap();
        assert_eq!(config.fields(ConfigStep::Step3), &[FieldId::Birthdate]);
    }

    #[test]
    fn move_field_between_steps() {
        let mut config = FormConfig::default();
        assert!(config.unassign(FieldId::Address, ConfigStep::Step2));
        assert_eq!(config.assignment(FieldId::Address), None);
        config.assign(FieldId::Address, ConfigStep::Step3).unwrap();
        assert_eq!(
            config.fields(ConfigStep::Step3),
            &[FieldId::Birthdate, FieldId::Address]
        );
        assert_eq!(config.assignment(FieldId::Address), Some(ConfigStep::Step3));
    }

    #[test]
    fn unassign_missing_field_is_noop() {
        let mut config = FormConfig::default();
        assert!(!config.unassign(FieldId::Birthdate, ConfigStep::Step2));
        assert_eq!(config, FormConfig::default());
    }

    #[test]
    fn selectable_is_exclusive_across_steps() {
        let config = FormConfig::default();
        for field in FieldId::ALL {
            match config.assignment(field) {
                Some(step) => {
                    assert!(config.is_selectable(field, step));
                    assert!(!config.is_selectable(field, step.other()));
                }
                None => {
                    assert!(config.is_selectable(field, ConfigStep::Step2));
                    assert!(config.is_selectable(field, ConfigStep::Step3));
                }
            }
        }
    }

    #[test]
    fn save_requires_both_steps_non_empty() {
        let mut config = FormConfig::default();
        config.unassign(FieldId::Birthdate, ConfigStep::Step3);
        assert!(!config.is_step_valid(ConfigStep::Step3));
        assert!(!config.can_save());

        config.assign(FieldId::Birthdate, ConfigStep::Step3).unwrap();
        assert!(config.can_save());

        let empty = FormConfig::empty();
        assert!(!empty.is_step_valid(ConfigStep::Step2));
        assert!(!empty.can_save());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(FormConfig::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "step2Fields": ["aboutMe", "address"],
                "step3Fields": ["birthdate"],
            })
        );
    }

    #[tokio::test]
    async fn reader_sees_writer_updates() {
        let writer = FormConfigWriter::new(FormConfig::default());
        let reader = writer.reader();

        writer
            .update(|c| c.unassign(FieldId::AboutMe, ConfigStep::Step2))
            .await;

        assert_eq!(reader.fields(ConfigStep::Step2).await, vec![FieldId::Address]);
        assert_eq!(reader.snapshot().await, writer.snapshot().await);
    }
}
