//! The combobox interaction state machine.
//!
//! `Combobox` is a reducer: each call to [`Combobox::handle`] takes the
//! host's current [`Snapshot`] and one [`Event`], updates the interaction
//! state (open/closed, highlighted candidate, keyboard focus) and returns the
//! [`Effect`]s the host must apply. Selection and input text are never stored
//! here; the host owns them and passes them back in with the next event.

use tracing::debug;

use crate::aria::{self, AriaAttributes};
use crate::config::{ComboboxConfig, ConfigError, Variant};
use crate::filter::{filter, Candidate};
use crate::option::{contains_id, ComboOption, Snapshot};

/// Keys the engine reacts to. Text editing keys are the host's business and
/// reach the engine as [`Event::Change`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    ArrowLeft,
    ArrowRight,
    Enter,
    Escape,
    Tab,
    Delete,
    Backspace,
}

/// Inbound events from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The text input received focus.
    Focus,
    /// The control was clicked.
    Click,
    /// Focus left the whole control.
    Blur,
    /// The input text was edited; carries the new text.
    Change(String),
    /// A key press, routed to the input or the focused pill.
    Key(Key),
    /// A candidate row was clicked (index into the current candidate list).
    Pick(usize),
    /// A pill received focus (index into the selection).
    FocusPill(usize),
    /// A pill's remove affordance was used.
    RemovePill(String),
    /// The single-inline clear control was used.
    ClearSelection,
}

/// Outbound effects, returned in the order they fire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Change {
        value: String,
    },
    Select {
        selection: Vec<ComboOption>,
        input_value: String,
    },
    RequestRemoveSelectedOption {
        selection: Vec<ComboOption>,
        input_value: String,
    },
    Submit {
        value: String,
    },
    PillFocus {
        id: String,
    },
}

/// Where keyboard focus sits inside the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    /// Index into the selection.
    Pill(usize),
}

/// Highlighted candidate. The id lets the index be recomputed when the
/// candidate list changes shape.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Active {
    index: usize,
    id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionState {
    is_open: bool,
    active: Option<Active>,
    focus: Focus,
}

impl InteractionState {
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Index into the current candidate list, if a candidate is highlighted.
    pub fn active_index(&self) -> Option<usize> {
        self.active.as_ref().map(|a| a.index)
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }
}

pub struct Combobox {
    config: ComboboxConfig,
    state: InteractionState,
}

impl Combobox {
    pub fn new(config: ComboboxConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = InteractionState {
            is_open: config.is_open,
            active: None,
            focus: Focus::Input,
        };
        Ok(Self { config, state })
    }

    pub fn config(&self) -> &ComboboxConfig {
        &self.config
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open
    }

    pub fn active_index(&self) -> Option<usize> {
        self.state.active_index()
    }

    pub fn focus(&self) -> Focus {
        self.state.focus
    }

    /// Current candidate list for the snapshot.
    pub fn candidates(&self, snapshot: &Snapshot) -> Vec<Candidate> {
        filter(
            &snapshot.input_value,
            &snapshot.options,
            &snapshot.selection,
            self.config.variant,
        )
    }

    /// ARIA attributes for the snapshot.
    pub fn aria(&self, snapshot: &Snapshot) -> AriaAttributes {
        aria::derive(
            &self.config,
            &self.state,
            &self.candidates(snapshot),
            !self.shows_selection(snapshot),
        )
    }

    /// A single-inline input that still reads as the committed option's
    /// label. The option itself is filtered out, so an empty candidate list
    /// here is not a "no matches" situation.
    fn shows_selection(&self, snapshot: &Snapshot) -> bool {
        self.config.variant == Variant::SingleInline
            && !snapshot.input_value.is_empty()
            && snapshot
                .selection
                .first()
                .is_some_and(|o| o.label_or_empty() == snapshot.input_value)
    }

    /// Reconcile interaction state with a snapshot the host changed on its
    /// own (new option set, externally edited selection).
    pub fn sync(&mut self, snapshot: &Snapshot) {
        let candidates = self.candidates(snapshot);
        self.settle(&candidates, snapshot.selection.len());
    }

    pub fn handle(&mut self, snapshot: &Snapshot, event: Event) -> Vec<Effect> {
        debug!(?event, state = ?self.state, "combobox event");
        let mut effects = Vec::new();

        match event {
            Event::Change(value) => {
                self.state.focus = Focus::Input;
                self.state.active = None;
                self.open();
                effects.push(Effect::Change { value: value.clone() });
                let candidates = filter(
                    &value,
                    &snapshot.options,
                    &snapshot.selection,
                    self.config.variant,
                );
                self.settle(&candidates, snapshot.selection.len());
                return self.finish(effects);
            }
            Event::Focus | Event::Click => {
                self.state.focus = Focus::Input;
                self.open();
            }
            Event::Blur => {
                self.state.focus = Focus::Input;
                self.close();
            }
            Event::Key(key) => {
                let candidates = self.candidates(snapshot);
                self.settle(&candidates, snapshot.selection.len());
                match self.state.focus {
                    Focus::Input => self.input_key(snapshot, &candidates, key, &mut effects),
                    Focus::Pill(index) => self.pill_key(snapshot, index, key, &mut effects),
                }
            }
            Event::Pick(index) => {
                let candidates = self.candidates(snapshot);
                if let Some(candidate) = candidates.get(index) {
                    self.state.focus = Focus::Input;
                    self.commit(snapshot, candidate.option.clone(), &mut effects);
                }
            }
            Event::FocusPill(index) if self.config.variant.has_pills() => {
                if let Some(pill) = snapshot.selection.get(index) {
                    self.close();
                    self.state.focus = Focus::Pill(index);
                    effects.push(Effect::PillFocus { id: pill.id.clone() });
                }
            }
            Event::FocusPill(_) => {}
            Event::RemovePill(id) => {
                if self.config.variant == Variant::SingleInline {
                    self.clear(snapshot, &mut effects);
                } else if let Some(index) = snapshot.selection.iter().position(|o| o.id == id) {
                    self.remove_at(snapshot, index, &mut effects);
                }
            }
            Event::ClearSelection => self.clear(snapshot, &mut effects),
        }

        let selection_len = selection_len_after(&effects, snapshot.selection.len());
        let candidates = self.candidates_after(snapshot, &effects);
        self.settle(&candidates, selection_len);
        self.finish(effects)
    }

    fn input_key(
        &mut self,
        snapshot: &Snapshot,
        candidates: &[Candidate],
        key: Key,
        effects: &mut Vec<Effect>,
    ) {
        match key {
            Key::ArrowDown | Key::ArrowUp => {
                self.open();
                self.navigate(candidates, key == Key::ArrowDown);
            }
            Key::Enter => self.enter(snapshot, candidates, effects),
            Key::Escape => self.close(),
            Key::Tab => {
                self.close();
                if self.config.variant.has_pills() {
                    if let Some(first) = snapshot.selection.first() {
                        self.state.focus = Focus::Pill(0);
                        effects.push(Effect::PillFocus { id: first.id.clone() });
                    }
                }
            }
            Key::ArrowLeft | Key::ArrowRight | Key::Delete | Key::Backspace => {}
        }
    }

    fn pill_key(&mut self, snapshot: &Snapshot, index: usize, key: Key, effects: &mut Vec<Effect>) {
        let len = snapshot.selection.len();
        if index >= len {
            self.state.focus = Focus::Input;
            return;
        }
        match key {
            Key::ArrowLeft | Key::ArrowRight => {
                let next = if key == Key::ArrowRight {
                    (index + 1) % len
                } else {
                    (index + len - 1) % len
                };
                self.state.focus = Focus::Pill(next);
                effects.push(Effect::PillFocus {
                    id: snapshot.selection[next].id.clone(),
                });
            }
            Key::Delete | Key::Backspace => self.remove_at(snapshot, index, effects),
            Key::Escape | Key::Tab => self.state.focus = Focus::Input,
            Key::ArrowDown | Key::ArrowUp | Key::Enter => {}
        }
    }

    fn navigate(&mut self, candidates: &[Candidate], forward: bool) {
        let n = candidates.len();
        if n == 0 {
            self.state.active = None;
            return;
        }
        let next = match (self.state.active_index(), forward) {
            (None, true) => 0,
            (None, false) => n - 1,
            (Some(i), true) => (i + 1) % n,
            (Some(i), false) => (i + n - 1) % n,
        };
        self.state.active = Some(Active {
            index: next,
            id: candidates[next].option.id.clone(),
        });
    }

    fn enter(&mut self, snapshot: &Snapshot, candidates: &[Candidate], effects: &mut Vec<Effect>) {
        if let Some(candidate) = self.state.active_index().and_then(|i| candidates.get(i)) {
            self.commit(snapshot, candidate.option.clone(), effects);
            return;
        }

        let value = snapshot.input_value.as_str();
        if value.is_empty() {
            return;
        }
        if self.shows_selection(snapshot) {
            debug!(value, "input already shows the selection");
            self.close();
            return;
        }
        if self.config.predefined_options_only {
            debug!(value, "discarding freeform entry, predefined options only");
            self.close();
            return;
        }
        if candidates.is_empty() && !self.config.freeform_on_no_match {
            debug!(value, "discarding freeform entry, no matches");
            self.close();
            return;
        }

        let option = ComboOption::freeform(value);
        if contains_id(&snapshot.selection, &option.id) {
            debug!(value, "freeform entry already selected");
            self.close();
            return;
        }
        effects.push(Effect::Submit {
            value: value.to_string(),
        });
        self.commit(snapshot, option, effects);
    }

    fn commit(&mut self, snapshot: &Snapshot, option: ComboOption, effects: &mut Vec<Effect>) {
        let (selection, input_value) = match self.config.variant {
            Variant::Multi => {
                let mut selection = snapshot.selection.clone();
                if !contains_id(&selection, &option.id) {
                    selection.push(option);
                }
                (selection, String::new())
            }
            Variant::Default => (vec![option], String::new()),
            Variant::SingleInline => {
                let label = option.label_or_empty().to_string();
                (vec![option], label)
            }
        };
        effects.push(Effect::Select {
            selection,
            input_value,
        });
        self.close();
    }

    fn remove_at(&mut self, snapshot: &Snapshot, index: usize, effects: &mut Vec<Effect>) {
        if !self.config.variant.has_pills() {
            self.clear(snapshot, effects);
            return;
        }
        let mut selection = snapshot.selection.clone();
        selection.remove(index);

        effects.push(Effect::RequestRemoveSelectedOption {
            selection: selection.clone(),
            input_value: snapshot.input_value.clone(),
        });
        effects.push(Effect::Select {
            selection: selection.clone(),
            input_value: snapshot.input_value.clone(),
        });

        if selection.is_empty() {
            self.state.focus = Focus::Input;
        } else {
            // The next pill slides into the removed slot; past the end wraps
            // to the first pill.
            let next = if index < selection.len() { index } else { 0 };
            self.state.focus = Focus::Pill(next);
            effects.push(Effect::PillFocus {
                id: selection[next].id.clone(),
            });
        }
    }

    fn clear(&mut self, snapshot: &Snapshot, effects: &mut Vec<Effect>) {
        self.state.focus = Focus::Input;
        if snapshot.selection.is_empty() && snapshot.input_value.is_empty() {
            return;
        }
        effects.push(Effect::RequestRemoveSelectedOption {
            selection: Vec::new(),
            input_value: String::new(),
        });
        effects.push(Effect::Select {
            selection: Vec::new(),
            input_value: String::new(),
        });
    }

    fn open(&mut self) {
        if !self.state.is_open {
            debug!("combobox opened");
            self.state.is_open = true;
            self.state.active = None;
        }
    }

    fn close(&mut self) {
        if self.state.is_open {
            debug!("combobox closed");
        }
        self.state.is_open = false;
        self.state.active = None;
    }

    /// Re-establish the state invariants against a freshly derived candidate
    /// list: the highlight follows its option by id or is dropped, and a
    /// predefined-only menu with nothing to offer closes.
    fn settle(&mut self, candidates: &[Candidate], selection_len: usize) {
        if let Focus::Pill(index) = self.state.focus {
            if index >= selection_len {
                self.state.focus = Focus::Input;
            }
        }

        if self.state.is_open && candidates.is_empty() && self.config.predefined_options_only {
            self.close();
        }

        if !self.state.is_open || candidates.is_empty() {
            self.state.active = None;
            return;
        }

        if let Some(active) = self.state.active.take() {
            let still_there = candidates
                .get(active.index)
                .is_some_and(|c| c.option.id == active.id);
            self.state.active = if still_there {
                Some(active)
            } else {
                candidates
                    .iter()
                    .position(|c| c.option.id == active.id)
                    .map(|index| Active {
                        index,
                        id: active.id,
                    })
            };
        }
    }

    /// Candidate list as it will look once the host applies `effects`.
    fn candidates_after(&self, snapshot: &Snapshot, effects: &[Effect]) -> Vec<Candidate> {
        match last_select(effects) {
            Some((selection, input_value)) => {
                filter(input_value, &snapshot.options, selection, self.config.variant)
            }
            None => self.candidates(snapshot),
        }
    }

    fn finish(&self, effects: Vec<Effect>) -> Vec<Effect> {
        for effect in &effects {
            debug!(?effect, "combobox effect");
        }
        effects
    }
}

fn last_select(effects: &[Effect]) -> Option<(&[ComboOption], &str)> {
    effects.iter().rev().find_map(|e| match e {
        Effect::Select {
            selection,
            input_value,
        } => Some((selection.as_slice(), input_value.as_str())),
        _ => None,
    })
}

fn selection_len_after(effects: &[Effect], current: usize) -> usize {
    last_select(effects).map_or(current, |(selection, _)| selection.len())
}
