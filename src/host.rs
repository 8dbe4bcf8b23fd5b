//! A reference host: owns the snapshot, feeds events to the engine and folds
//! the returned effects back into its own state.

use crate::aria::AriaAttributes;
use crate::config::{ComboboxConfig, ConfigError};
use crate::filter::Candidate;
use crate::machine::{Combobox, Effect, Event, Focus, Key};
use crate::option::{ComboOption, Snapshot};

pub struct ComboboxHost {
    combobox: Combobox,
    snapshot: Snapshot,
    /// Every effect emitted so far, oldest first.
    log: Vec<Effect>,
}

impl ComboboxHost {
    pub fn new(config: ComboboxConfig, options: Vec<ComboOption>) -> Result<Self, ConfigError> {
        Ok(Self {
            combobox: Combobox::new(config)?,
            snapshot: Snapshot::new(options),
            log: Vec::new(),
        })
    }

    /// Start from an existing selection.
    pub fn with_selection(mut self, selection: Vec<ComboOption>) -> Self {
        self.snapshot.selection = selection;
        self.combobox.sync(&self.snapshot);
        self
    }

    pub fn combobox(&self) -> &Combobox {
        &self.combobox
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn input_value(&self) -> &str {
        &self.snapshot.input_value
    }

    pub fn selection(&self) -> &[ComboOption] {
        &self.snapshot.selection
    }

    pub fn log(&self) -> &[Effect] {
        &self.log
    }

    pub fn candidates(&self) -> Vec<Candidate> {
        self.combobox.candidates(&self.snapshot)
    }

    pub fn aria(&self) -> AriaAttributes {
        self.combobox.aria(&self.snapshot)
    }

    pub fn focus(&self) -> Focus {
        self.combobox.focus()
    }

    /// Replace the option set, e.g. after the host reloaded its data.
    pub fn set_options(&mut self, options: Vec<ComboOption>) {
        self.snapshot.options = options;
        self.combobox.sync(&self.snapshot);
    }

    pub fn dispatch(&mut self, event: Event) -> Vec<Effect> {
        let effects = self.combobox.handle(&self.snapshot, event);
        for effect in &effects {
            self.apply(effect);
        }
        self.log.extend(effects.iter().cloned());
        effects
    }

    pub fn type_text(&mut self, value: &str) -> Vec<Effect> {
        self.dispatch(Event::Change(value.to_string()))
    }

    pub fn press(&mut self, key: Key) -> Vec<Effect> {
        self.dispatch(Event::Key(key))
    }

    fn apply(&mut self, effect: &Effect) {
        match effect {
            Effect::Change { value } => self.snapshot.input_value = value.clone(),
            Effect::Select {
                selection,
                input_value,
            }
            | Effect::RequestRemoveSelectedOption {
                selection,
                input_value,
            } => {
                self.snapshot.selection = selection.clone();
                self.snapshot.input_value = input_value.clone();
            }
            Effect::Submit { .. } | Effect::PillFocus { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aria::NO_MATCHES;
    use crate::config::Variant;
    use crate::option::sample_accounts;
    use pretty_assertions::assert_eq;

    const ID: &str = "combobox-unique-id";

    fn host(config: ComboboxConfig) -> ComboboxHost {
        ComboboxHost::new(config, sample_accounts()).unwrap()
    }

    #[test]
    fn test_haspopup_and_expanded_follow_click() {
        let mut h = host(ComboboxConfig::new(ID).with_variant(Variant::Multi));
        assert_eq!(h.aria().has_popup, "listbox");
        assert_eq!(h.aria().expanded, "false");
        h.dispatch(Event::Click);
        assert_eq!(h.aria().expanded, "true");
    }

    #[test]
    fn test_filter_highlight_and_select_second_account() {
        let accounts = sample_accounts();
        let mut h = host(
            ComboboxConfig::new(ID)
                .with_variant(Variant::Multi)
                .with_open(true),
        );
        h.dispatch(Event::Focus);
        h.type_text("Salesforce.com, Inc.");
        h.press(Key::ArrowDown);

        let aria = h.aria();
        assert!(matches!(
            aria.entries.first(),
            Some(crate::aria::ListboxEntry::Option { selected: true, .. })
        ));
        assert_eq!(
            aria.active_descendant.as_deref(),
            Some("combobox-unique-id-listbox-option-2")
        );

        h.press(Key::Enter);
        assert_eq!(h.input_value(), "");
        assert_eq!(h.selection(), &[accounts[1].clone()][..]);
        assert_eq!(h.aria().expanded, "false");
    }

    #[test]
    fn test_limit_to_predefined_choices() {
        let mut h = host(
            ComboboxConfig::new(ID)
                .with_variant(Variant::Multi)
                .with_predefined_options_only(true),
        );
        h.dispatch(Event::Focus);
        h.type_text("x");
        h.press(Key::Enter);
        assert!(h.selection().is_empty());
        assert_eq!(h.input_value(), "x");
        assert!(!h.log().iter().any(|e| matches!(e, Effect::Submit { .. })));
    }

    #[test]
    fn test_inline_single_selection_remove() {
        let accounts = sample_accounts();
        let mut h = host(ComboboxConfig::new(ID).with_variant(Variant::SingleInline));
        h.dispatch(Event::Focus);
        h.type_text("Salesforce.com, Inc.");
        h.press(Key::Enter);
        // Enter without a highlight commits the typed text as freeform.
        assert_eq!(h.input_value(), "Salesforce.com, Inc.");
        assert_eq!(h.selection().len(), 1);

        h.dispatch(Event::ClearSelection);
        assert_eq!(h.input_value(), "");
        assert!(h.selection().is_empty());

        // Selecting through the list yields the real option.
        h.type_text("Salesforce");
        h.press(Key::ArrowDown);
        h.press(Key::Enter);
        assert_eq!(h.input_value(), "Salesforce.com, Inc.");
        assert_eq!(h.selection(), &[accounts[1].clone()][..]);

        h.dispatch(Event::RemovePill(accounts[1].id.clone()));
        assert_eq!(h.input_value(), "");
        assert!(h.selection().is_empty());
    }

    #[test]
    fn test_single_inline_commit_replaces() {
        let accounts = sample_accounts();
        let mut h = host(ComboboxConfig::new(ID).with_variant(Variant::SingleInline))
            .with_selection(vec![accounts[0].clone()]);
        h.type_text("nakatomi");
        h.press(Key::ArrowDown);
        h.press(Key::Enter);
        assert_eq!(h.selection(), &[accounts[5].clone()][..]);
        assert_eq!(h.input_value(), "Nakatomi Investments");
    }

    #[test]
    fn test_single_inline_reopen_keeps_committed_option() {
        let accounts = sample_accounts();
        let mut h = host(ComboboxConfig::new(ID).with_variant(Variant::SingleInline));
        h.type_text("paddy");
        h.press(Key::ArrowDown);
        h.press(Key::Enter);
        assert_eq!(h.input_value(), "Paddy's Pub");
        let logged = h.log().len();

        // The input shows the selection, not an unmatched query.
        h.dispatch(Event::Click);
        assert_eq!(h.aria().expanded, "true");
        assert_eq!(h.aria().status(), None);

        assert!(h.press(Key::Enter).is_empty());
        assert_eq!(h.selection(), &[accounts[2].clone()][..]);
        assert_eq!(h.log().len(), logged);
        assert_eq!(h.aria().expanded, "false");
    }

    #[test]
    fn test_single_inline_ignores_pill_focus() {
        let mut h = host(ComboboxConfig::new(ID).with_variant(Variant::SingleInline));
        h.type_text("paddy");
        h.press(Key::ArrowDown);
        h.press(Key::Enter);

        assert!(h.dispatch(Event::FocusPill(0)).is_empty());
        assert_eq!(h.focus(), Focus::Input);
        h.press(Key::Delete);
        assert_eq!(h.selection().len(), 1);
        assert_eq!(h.input_value(), "Paddy's Pub");
    }

    #[test]
    fn test_displays_no_match_found() {
        let mut h = host(ComboboxConfig::new(ID).with_open(true));
        h.dispatch(Event::Focus);
        h.type_text("Random text");
        let aria = h.aria();
        assert_eq!(aria.entries.len(), 1);
        assert_eq!(aria.status(), Some(NO_MATCHES));
    }

    #[test]
    fn test_freeform_submit_then_select() {
        let mut h = host(ComboboxConfig::new(ID).with_variant(Variant::Multi));
        h.type_text("Initech");
        h.press(Key::Enter);
        h.type_text("Acme");
        h.press(Key::ArrowDown);
        h.press(Key::Enter);

        let labels: Vec<&str> = h.selection().iter().map(|o| o.label_or_empty()).collect();
        assert_eq!(labels, vec!["Initech", "Acme"]);
        assert!(h.selection()[0].is_freeform());
        assert_eq!(
            h.log()
                .iter()
                .filter(|e| matches!(e, Effect::Submit { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_selected_pills_cycle_focus() {
        let accounts = sample_accounts();
        let mut h = host(ComboboxConfig::new(ID).with_variant(Variant::Multi))
            .with_selection(accounts[..5].to_vec());
        h.dispatch(Event::Focus);
        h.press(Key::Tab);
        assert_eq!(h.focus(), Focus::Pill(0));

        // Remove the first pill.
        h.press(Key::Delete);
        assert_eq!(h.focus(), Focus::Pill(0));
        // Remove the third original pill (now second).
        h.press(Key::ArrowRight);
        h.press(Key::Delete);
        assert_eq!(h.focus(), Focus::Pill(1));
        // Remaining: 2, 4, 5. Remove the last; focus cycles to the first.
        h.press(Key::ArrowRight);
        h.press(Key::Delete);
        assert_eq!(h.focus(), Focus::Pill(0));
        let ids: Vec<&str> = h.selection().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "4"]);

        h.press(Key::Delete);
        h.press(Key::Delete);
        assert!(h.selection().is_empty());
        assert_eq!(h.focus(), Focus::Input);

        let focused: Vec<&str> = h
            .log()
            .iter()
            .filter_map(|e| match e {
                Effect::PillFocus { id } => Some(id.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(focused, vec!["1", "2", "3", "4", "5", "2", "4"]);
    }

    #[test]
    fn test_new_option_set_recomputes_highlight() {
        let accounts = sample_accounts();
        let mut h = host(ComboboxConfig::new(ID).with_variant(Variant::Multi));
        h.type_text("acme");
        h.press(Key::ArrowDown);
        h.press(Key::ArrowDown);
        assert_eq!(
            h.aria().active_descendant.as_deref(),
            Some("combobox-unique-id-listbox-option-7")
        );

        // Drop "Acme"; the highlighted option is now first in the list.
        h.set_options(accounts[1..].to_vec());
        assert_eq!(h.combobox().active_index(), Some(0));
        assert_eq!(
            h.aria().active_descendant.as_deref(),
            Some("combobox-unique-id-listbox-option-6")
        );
    }
}
