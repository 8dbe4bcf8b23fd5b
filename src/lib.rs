//! Accessible combobox interaction engine.
//!
//! The engine turns typed text, an option set and the current selection into
//! a candidate list ([`filter`]), drives open/closed state, highlighting and
//! selection changes from keyboard, focus and click events ([`Combobox`]),
//! and derives the ARIA attributes a renderer needs ([`aria`]).

pub mod aria;
pub mod config;
pub mod filter;
pub mod host;
pub mod ids;
pub mod machine;
pub mod option;

pub use aria::{AriaAttributes, ListboxEntry, NO_MATCHES};
pub use config::{ComboboxConfig, ConfigError, Labels, Variant};
pub use filter::{filter, match_indices, Candidate};
pub use host::ComboboxHost;
pub use machine::{Combobox, Effect, Event, Focus, InteractionState, Key};
pub use option::{sample_accounts, ComboOption, Snapshot};
