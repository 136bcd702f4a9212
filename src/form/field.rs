//! Field catalogue: the optional field identifiers and the widgets they render as.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FormConfigError;

/// An optional form field that the admin can place in step 2 or step 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldId {
    AboutMe,
    Address,
    Birthdate,
}

impl FieldId {
    /// Every configurable field, in display order.
    pub const ALL: [FieldId; 3] = [FieldId::AboutMe, FieldId::Address, FieldId::Birthdate];

    /// Wire/identifier form, e.g. `aboutMe`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AboutMe => "aboutMe",
            Self::Address => "address",
            Self::Birthdate => "birthdate",
        }
    }

    /// Checkbox label on the admin screen: the identifier with its first letter capitalised.
    pub fn admin_label(&self) -> String {
        let id = self.as_str();
        let mut chars = id.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Inputs rendered for this field inside a wizard step.
    pub fn inputs(&self) -> Vec<InputSpec> {
        match self {
            Self::AboutMe => vec![InputSpec::new(
                "aboutMe",
                "About Me",
                InputKind::Multiline { rows: 4 },
            )],
            Self::Address => vec![
                InputSpec::new("address", "Street Address", InputKind::Text),
                InputSpec::new("city", "City", InputKind::Text),
                InputSpec::new("state", "State", InputKind::Text),
                InputSpec::new("zipCode", "Zip Code", InputKind::Number),
            ],
            Self::Birthdate => vec![InputSpec::new("birthdate", "Birthdate", InputKind::Date)],
        }
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldId {
    type Err = FormConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| FormConfigError::UnknownField(s.to_string()))
    }
}

/// HTML widget type for a single input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Email,
    Password,
    Multiline { rows: u8 },
    Number,
    Date,
}

impl InputKind {
    /// Value of the `type` attribute (`None` for a textarea).
    pub fn html_type(&self) -> Option<&'static str> {
        match self {
            Self::Text => Some("text"),
            Self::Email => Some("email"),
            Self::Password => Some("password"),
            Self::Multiline { .. } => None,
            Self::Number => Some("number"),
            Self::Date => Some("date"),
        }
    }
}

/// One rendered input: draft key, label, widget and validation attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSpec {
    /// Key in the wizard draft (`email`, `zipCode`, ...).
    pub name: &'static str,
    pub label: &'static str,
    pub kind: InputKind,
    pub required: bool,
    pub min_length: Option<u32>,
}

impl InputSpec {
    fn new(name: &'static str, label: &'static str, kind: InputKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: true,
            min_length: None,
        }
    }

    fn with_min_length(mut self, min: u32) -> Self {
        self.min_length = Some(min);
        self
    }
}

/// Inputs of the sign-up step. Not configurable.
pub fn credential_inputs() -> Vec<InputSpec> {
    vec![
        InputSpec::new("email", "Email", InputKind::Email),
        InputSpec::new("password", "Password", InputKind::Password).with_min_length(6),
    ]
}

/// Inputs for an ordered list of configured fields.
pub fn inputs_for(fields: &[FieldId]) -> Vec<InputSpec> {
    fields.iter().flat_map(FieldId::inputs).collect()
}
