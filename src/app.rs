use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui_interact::components::InputState;
use ratatui_interact::traits::ClickRegionRegistry;
use ratatui_themes::{ThemeName, ThemePalette};

use combotui::{
    ComboOption, ComboboxConfig, ComboboxHost, ConfigError, Event, Focus, Key, Variant,
};

/// Actions that the event loop should take after handling an input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
}

/// Clickable parts of the combobox, registered on every render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Region {
    Input,
    /// Index into the current candidate list.
    Candidate(usize),
    /// Remove glyph of the pill with this option id.
    PillRemove(String),
    /// Clear control of the single-inline variant.
    Clear,
}

/// Terminal host state: the engine host plus everything only the terminal
/// needs (caret editing, theme, hit-testing).
pub struct App {
    pub host: ComboboxHost,

    /// Text editing state for the combobox input. Mirrors the host's input
    /// value after every dispatched event.
    pub input: InputState,

    /// Current color theme.
    pub theme_name: ThemeName,

    /// Click region registry for mouse hit-testing.
    pub click_regions: ClickRegionRegistry<Region>,

    /// First listbox row shown in the viewport.
    pub listbox_scroll: usize,
}

impl App {
    pub fn new(config: ComboboxConfig, options: Vec<ComboOption>) -> Result<Self, ConfigError> {
        Self::with_theme(config, options, ThemeName::default())
    }

    pub fn with_theme(
        config: ComboboxConfig,
        options: Vec<ComboOption>,
        theme_name: ThemeName,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            host: ComboboxHost::new(config, options)?,
            input: InputState::empty(),
            theme_name,
            click_regions: ClickRegionRegistry::new(),
            listbox_scroll: 0,
        })
    }

    /// Get the current theme palette.
    pub fn palette(&self) -> ThemePalette {
        self.theme_name.palette()
    }

    /// Cycle to the next theme.
    pub fn next_theme(&mut self) {
        self.theme_name = self.theme_name.next();
    }

    pub fn variant(&self) -> Variant {
        self.host.combobox().config().variant
    }

    /// Labels of the current selection, in order.
    pub fn selection_labels(&self) -> Vec<String> {
        self.host
            .selection()
            .iter()
            .map(|o| o.label_or_empty().to_string())
            .collect()
    }

    /// Ensure the scroll offset keeps the highlighted candidate visible within
    /// a listbox of `total` rows and the given viewport height.
    pub fn ensure_visible(&mut self, total: usize, viewport_height: usize) {
        if viewport_height == 0 {
            return;
        }
        if let Some(active) = self.host.combobox().active_index() {
            if active < self.listbox_scroll {
                self.listbox_scroll = active;
            } else if active >= self.listbox_scroll + viewport_height {
                self.listbox_scroll = active + 1 - viewport_height;
            }
        }
        self.listbox_scroll = self
            .listbox_scroll
            .min(total.saturating_sub(viewport_height));
    }

    /// Send an event to the engine and bring the text field in line with the
    /// host's input value.
    pub fn dispatch(&mut self, event: Event) {
        self.host.dispatch(event);
        if self.input.text() != self.host.input_value() {
            self.input.set_text(self.host.input_value().to_string());
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => Action::Quit,
                KeyCode::Char('t') => {
                    self.next_theme();
                    Action::None
                }
                KeyCode::Char('x') => {
                    self.dispatch(Event::ClearSelection);
                    Action::None
                }
                _ => Action::None,
            };
        }

        if let Focus::Pill(_) = self.host.focus() {
            return self.handle_pill_key(key);
        }

        match key.code {
            KeyCode::Char(c) => {
                self.input.insert_char(c);
                self.dispatch(Event::Change(self.input.text().to_string()));
            }
            KeyCode::Backspace => {
                self.input.delete_char_backward();
                self.dispatch(Event::Change(self.input.text().to_string()));
            }
            KeyCode::Delete => {
                self.input.delete_char_forward();
                self.dispatch(Event::Change(self.input.text().to_string()));
            }
            KeyCode::Down => self.dispatch(Event::Key(Key::ArrowDown)),
            KeyCode::Up => self.dispatch(Event::Key(Key::ArrowUp)),
            KeyCode::Enter => self.dispatch(Event::Key(Key::Enter)),
            KeyCode::Esc => self.dispatch(Event::Key(Key::Escape)),
            KeyCode::Tab => self.dispatch(Event::Key(Key::Tab)),
            _ => {}
        }
        Action::None
    }

    fn handle_pill_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Left => self.dispatch(Event::Key(Key::ArrowLeft)),
            KeyCode::Right => self.dispatch(Event::Key(Key::ArrowRight)),
            KeyCode::Delete => self.dispatch(Event::Key(Key::Delete)),
            KeyCode::Backspace => self.dispatch(Event::Key(Key::Backspace)),
            KeyCode::Esc => self.dispatch(Event::Key(Key::Escape)),
            KeyCode::Tab | KeyCode::BackTab => self.dispatch(Event::Key(Key::Tab)),
            KeyCode::Char(_) => {
                // Typing goes back to the text field.
                self.dispatch(Event::Focus);
                return self.handle_key(key);
            }
            _ => {}
        }
        Action::None
    }

    pub fn handle_mouse(&mut self, event: MouseEvent) -> Action {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(region) = self
                    .click_regions
                    .handle_click(event.column, event.row)
                    .cloned()
                else {
                    return Action::None;
                };
                match region {
                    Region::Input => self.dispatch(Event::Click),
                    Region::Candidate(index) => self.dispatch(Event::Pick(index)),
                    Region::PillRemove(id) => self.dispatch(Event::RemovePill(id)),
                    Region::Clear => self.dispatch(Event::ClearSelection),
                }
                Action::None
            }
            MouseEventKind::ScrollDown => {
                if self.host.combobox().is_open() {
                    self.dispatch(Event::Key(Key::ArrowDown));
                }
                Action::None
            }
            MouseEventKind::ScrollUp => {
                if self.host.combobox().is_open() {
                    self.dispatch(Event::Key(Key::ArrowUp));
                }
                Action::None
            }
            _ => Action::None,
        }
    }
}
