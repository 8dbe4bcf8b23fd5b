//! ARIA attribute derivation.
//!
//! Everything here is computed from the interaction state and the current
//! candidate list alone, so it can be checked without painting anything.

use std::fmt;

use crate::config::ComboboxConfig;
use crate::filter::Candidate;
use crate::ids;
use crate::machine::InteractionState;

/// Text of the non-selectable entry shown when nothing matches.
pub const NO_MATCHES: &str = "No matches found.";

/// One rendered row of the candidate listbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListboxEntry {
    Option {
        id: String,
        label: String,
        /// Value of `aria-selected`.
        selected: bool,
    },
    /// Presentational status row; never focusable, never highlighted.
    Status(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AriaAttributes {
    pub has_popup: &'static str,
    pub expanded: &'static str,
    pub controls: String,
    pub active_descendant: Option<String>,
    /// Listbox rows; empty while closed.
    pub entries: Vec<ListboxEntry>,
}

impl AriaAttributes {
    /// The status row, if one is showing.
    pub fn status(&self) -> Option<&'static str> {
        self.entries.iter().find_map(|e| match e {
            ListboxEntry::Status(text) => Some(*text),
            ListboxEntry::Option { .. } => None,
        })
    }
}

pub fn derive(
    config: &ComboboxConfig,
    state: &InteractionState,
    candidates: &[Candidate],
    show_status: bool,
) -> AriaAttributes {
    let instance_id = config.instance_id.as_str();
    let active = state.active_index();

    let entries = if !state.is_open() {
        Vec::new()
    } else if candidates.is_empty() {
        if config.predefined_options_only || !show_status {
            Vec::new()
        } else {
            vec![ListboxEntry::Status(NO_MATCHES)]
        }
    } else {
        candidates
            .iter()
            .enumerate()
            .map(|(i, c)| ListboxEntry::Option {
                id: ids::option_id(instance_id, c.position),
                label: c.option.label_or_empty().to_string(),
                selected: active == Some(i),
            })
            .collect()
    };

    let active_descendant = active
        .and_then(|i| candidates.get(i))
        .map(|c| ids::option_id(instance_id, c.position));

    AriaAttributes {
        has_popup: "listbox",
        expanded: if state.is_open() { "true" } else { "false" },
        controls: ids::listbox_id(instance_id),
        active_descendant,
        entries,
    }
}

impl fmt::Display for AriaAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "aria-haspopup=\"{}\"", self.has_popup)?;
        writeln!(f, "aria-expanded=\"{}\"", self.expanded)?;
        writeln!(f, "aria-controls=\"{}\"", self.controls)?;
        write!(
            f,
            "aria-activedescendant=\"{}\"",
            self.active_descendant.as_deref().unwrap_or("")
        )?;
        for entry in &self.entries {
            match entry {
                ListboxEntry::Option {
                    id,
                    label,
                    selected,
                } => write!(f, "\n{id} aria-selected=\"{selected}\" {label}")?,
                ListboxEntry::Status(text) => write!(f, "\nstatus {text}")?,
            }
        }
        Ok(())
    }
}
