//! AdminConfigurator: the single writer of the form configuration.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tracing::{debug, info};

use crate::error::FormConfigError;
use crate::form::{ConfigStep, FieldId, FormConfig, FormConfigReader, FormConfigWriter};
use crate::notification::Notification;

pub const SAVED_MESSAGE: &str = "Configuration saved successfully!";

/// What the admin page renders.
#[derive(Debug, Clone)]
pub struct AdminView {
    pub config: FormConfig,
    pub notification: Option<Notification>,
}

impl AdminView {
    /// Warnings for steps left without any field.
    pub fn warnings(&self) -> Vec<FormConfigError> {
        ConfigStep::ALL
            .into_iter()
            .filter(|step| !self.config.is_step_valid(*step))
            .map(|step| FormConfigError::EmptyStep {
                step: step.number(),
            })
            .collect()
    }

    pub fn save_enabled(&self) -> bool {
        self.config.can_save()
    }
}

pub struct AdminConfigurator {
    config: FormConfigWriter,
    notification: Mutex<Option<Notification>>,
    notification_ttl: Duration,
}

impl AdminConfigurator {
    pub fn new(config: FormConfigWriter, notification_ttl: Duration) -> Self {
        Self {
            config,
            notification: Mutex::new(None),
            notification_ttl,
        }
    }

    /// Read-only handle for the wizard.
    pub fn reader(&self) -> FormConfigReader {
        self.config.reader()
    }

    pub async fn view(&self) -> AdminView {
        let notification = self
            .notification
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .filter(Notification::is_open);
        AdminView {
            config: self.config.snapshot().await,
            notification,
        }
    }

    /// Check or uncheck `field` for `step`.
    ///
    /// Checking a field that the other step owns is refused.
    pub async fn toggle(
        &self,
        field: FieldId,
        step: ConfigStep,
        checked: bool,
    ) -> Result<(), FormConfigError> {
        let result = self
            .config
            .update(|config| {
                if checked {
                    config.assign(field, step)
                } else {
                    config.unassign(field, step);
                    Ok(())
                }
            })
            .await;

        match &result {
            Ok(()) => info!(field = %field, step = step.number(), checked, "Form configuration changed"),
            Err(e) => debug!(field = %field, step = step.number(), error = %e, "Toggle refused"),
        }
        result
    }

    /// Save. Only shows a confirmation: the configuration lives in memory
    /// for the lifetime of the process.
    pub async fn save(&self) -> Result<Notification, FormConfigError> {
        let config = self.config.snapshot().await;
        if let Some(step) = ConfigStep::ALL
            .into_iter()
            .find(|step| !config.is_step_valid(*step))
        {
            return Err(FormConfigError::EmptyStep {
                step: step.number(),
            });
        }

        let notification = Notification::success(SAVED_MESSAGE, self.notification_ttl);
        *self
            .notification
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(notification.clone());
        info!(
            step2 = ?config.fields(ConfigStep::Step2),
            step3 = ?config.fields(ConfigStep::Step3),
            "Form configuration saved"
        );
        Ok(notification)
    }

    pub fn close_notification(&self) {
        *self
            .notification
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }
}
