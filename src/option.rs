//! Options, selections, and the snapshot a host hands to the engine each cycle.

use serde::{Deserialize, Serialize};

/// Type tag given to options synthesized from raw typed text.
pub const FREEFORM_TYPE: &str = "freeform";

/// One entry of an option set. Identity is by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComboOption {
    pub id: String,
    /// Missing labels are tolerated and simply never match a filter.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub sub_title: Option<String>,
    /// Opaque renderable token; the engine never looks inside it.
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl ComboOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: Some(label.into()),
            sub_title: None,
            icon: None,
            kind: kind.into(),
        }
    }

    pub fn with_sub_title(mut self, sub_title: impl Into<String>) -> Self {
        self.sub_title = Some(sub_title.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Synthesize an option from raw typed text.
    pub fn freeform(value: &str) -> Self {
        Self {
            id: format!("{FREEFORM_TYPE}:{value}"),
            label: Some(value.to_string()),
            sub_title: None,
            icon: None,
            kind: FREEFORM_TYPE.to_string(),
        }
    }

    /// The label, or an empty string for malformed entries.
    pub fn label_or_empty(&self) -> &str {
        self.label.as_deref().unwrap_or("")
    }

    pub fn is_freeform(&self) -> bool {
        self.kind == FREEFORM_TYPE
    }
}

/// Whether `selection` already holds an option with this id.
pub fn contains_id(selection: &[ComboOption], id: &str) -> bool {
    selection.iter().any(|o| o.id == id)
}

/// Host-owned state handed to the engine with every event.
///
/// The engine never keeps a copy of these between events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub options: Vec<ComboOption>,
    pub selection: Vec<ComboOption>,
    pub input_value: String,
}

impl Snapshot {
    pub fn new(options: Vec<ComboOption>) -> Self {
        Self {
            options,
            selection: Vec::new(),
            input_value: String::new(),
        }
    }

    pub fn with_selection(mut self, selection: Vec<ComboOption>) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_input(mut self, input_value: impl Into<String>) -> Self {
        self.input_value = input_value.into();
        self
    }
}

/// The eight sample accounts used by the terminal host when no options file
/// is given.
pub fn sample_accounts() -> Vec<ComboOption> {
    vec![
        ComboOption::new("1", "Acme", "account").with_sub_title("Account • San Francisco"),
        ComboOption::new("2", "Salesforce.com, Inc.", "account")
            .with_sub_title("Account • San Francisco"),
        ComboOption::new("3", "Paddy's Pub", "account").with_sub_title("Account • Boston, MA"),
        ComboOption::new("4", "Tyrell Corp", "account")
            .with_sub_title("Account • San Francisco, CA"),
        ComboOption::new("5", "Paper St. Soap Company", "account")
            .with_sub_title("Account • Beloit, WI"),
        ComboOption::new("6", "Nakatomi Investments", "account")
            .with_sub_title("Account • Chicago, IL"),
        ComboOption::new("7", "Acme Landscaping", "account"),
        ComboOption::new("8", "Acme Construction", "account")
            .with_sub_title("Account • Grand Marais, MN"),
    ]
    .into_iter()
    .map(|o| o.with_icon("standard:account"))
    .collect()
}
