//! The configuration record a combobox is constructed from.

use std::fmt;

use clap::ValueEnum;

/// Which selection model the combobox uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Variant {
    /// Single selection shown as one pill; the input clears after a commit.
    #[default]
    Default,
    /// Any number of selections shown as pills.
    Multi,
    /// Single selection shown inline as the input text.
    SingleInline,
}

impl Variant {
    /// Variants that render the selection as pills.
    pub fn has_pills(self) -> bool {
        matches!(self, Variant::Default | Variant::Multi)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variant::Default => "default",
            Variant::Multi => "multi",
            Variant::SingleInline => "single-inline",
        };
        f.write_str(name)
    }
}

/// Visible text for the control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub label: String,
    pub placeholder: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            label: "Search".to_string(),
            placeholder: "Search Salesforce".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("instance id must not be empty")]
    EmptyInstanceId,
    #[error("instance id {0:?} contains whitespace and cannot prefix a DOM id")]
    WhitespaceInInstanceId(String),
}

/// Every recognized mode and flag, enumerated up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboboxConfig {
    pub variant: Variant,
    /// Restrict commits to options present in the option set.
    pub predefined_options_only: bool,
    /// Start with the menu open.
    pub is_open: bool,
    /// Prefix for every derived DOM id.
    pub instance_id: String,
    pub labels: Labels,
    /// Whether Enter with no highlighted candidate still commits freeform
    /// text when nothing matched.
    pub freeform_on_no_match: bool,
}

impl ComboboxConfig {
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self {
            variant: Variant::Default,
            predefined_options_only: false,
            is_open: false,
            instance_id: instance_id.into(),
            labels: Labels::default(),
            freeform_on_no_match: true,
        }
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_predefined_options_only(mut self, predefined: bool) -> Self {
        self.predefined_options_only = predefined;
        self
    }

    pub fn with_open(mut self, is_open: bool) -> Self {
        self.is_open = is_open;
        self
    }

    pub fn with_labels(mut self, label: impl Into<String>, placeholder: impl Into<String>) -> Self {
        self.labels = Labels {
            label: label.into(),
            placeholder: placeholder.into(),
        };
        self
    }

    pub fn with_freeform_on_no_match(mut self, allow: bool) -> Self {
        self.freeform_on_no_match = allow;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.instance_id.is_empty() {
            return Err(ConfigError::EmptyInstanceId);
        }
        if self.instance_id.chars().any(char::is_whitespace) {
            return Err(ConfigError::WhitespaceInInstanceId(
                self.instance_id.clone(),
            ));
        }
        Ok(())
    }
}
