use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use combotui::{ids, ListboxEntry, Variant};

use crate::app::{App, Region};
use crate::widgets::{
    build_highlighted_text, highlight_styles, panel_block, push_selection_cursor, push_sub_title,
    UiColors,
};
use combotui::Focus;

/// Main render function called from the event loop. Also re-registers the
/// click regions for the frame being drawn.
pub fn render(frame: &mut Frame, app: &mut App) {
    let colors = UiColors::from_palette(&app.palette());
    let area = frame.area();
    app.click_regions.clear();

    let aria_lines = 6;
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),              // label
            Constraint::Length(3),              // input
            Constraint::Length(1),              // pills
            Constraint::Min(3),                 // listbox
            Constraint::Length(aria_lines + 2), // aria panel
            Constraint::Length(1),              // help
        ])
        .split(area);

    render_label(frame, app, outer[0], &colors);
    render_input(frame, app, outer[1], &colors);
    render_pills(frame, app, outer[2], &colors);
    render_listbox(frame, app, outer[3], &colors);
    render_aria(frame, app, outer[4], &colors);
    render_help_bar(frame, app, outer[5], &colors);
}

fn render_label(frame: &mut Frame, app: &App, area: Rect, colors: &UiColors) {
    let config = app.host.combobox().config();
    let line = Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(
            config.labels.label.clone(),
            Style::default()
                .fg(colors.label)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  ({})", config.variant),
            Style::default().fg(colors.placeholder),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(colors.bar_bg)),
        area,
    );
}

fn render_input(frame: &mut Frame, app: &mut App, area: Rect, colors: &UiColors) {
    let combobox = app.host.combobox();
    let focused = combobox.focus() == Focus::Input;
    let title = format!(" {} ", combobox.config().instance_id);
    let block = panel_block(title, focused, colors);

    let text = app.input.text();
    let mut spans = Vec::new();
    if text.is_empty() {
        spans.push(Span::styled(
            combobox.config().labels.placeholder.clone(),
            Style::default()
                .fg(colors.placeholder)
                .add_modifier(Modifier::ITALIC),
        ));
    } else {
        spans.push(Span::styled(
            text.to_string(),
            Style::default().fg(colors.input),
        ));
    }
    if focused {
        spans.push(Span::styled(
            "▏",
            Style::default()
                .fg(colors.active_border)
                .add_modifier(Modifier::SLOW_BLINK),
        ));
    }

    let show_clear =
        combobox.config().variant == Variant::SingleInline && !app.host.selection().is_empty();

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);

    if show_clear && area.width > 6 {
        let clear_area = Rect::new(area.x + area.width - 4, area.y + 1, 2, 1);
        frame.render_widget(
            Paragraph::new(Span::styled("✕", Style::default().fg(colors.status))),
            clear_area,
        );
        app.click_regions.register(clear_area, Region::Clear);
        let input_area = Rect::new(area.x, area.y, area.width - 5, area.height);
        app.click_regions.register(input_area, Region::Input);
    } else {
        app.click_regions.register(area, Region::Input);
    }
}

fn render_pills(frame: &mut Frame, app: &mut App, area: Rect, colors: &UiColors) {
    if !app.variant().has_pills() || app.host.selection().is_empty() {
        return;
    }
    let focus = app.host.focus();

    let mut spans = vec![Span::raw(" ")];
    let mut x = area.x + 1;
    let mut removes = Vec::new();
    for (i, option) in app.host.selection().iter().enumerate() {
        let is_focused = focus == Focus::Pill(i);
        let style = if is_focused {
            Style::default()
                .fg(colors.pill)
                .bg(colors.focused_pill_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.pill)
        };
        let label = format!("[{} ", option.label_or_empty());
        let label_width = label.chars().count() as u16;
        spans.push(Span::styled(label, style));
        spans.push(Span::styled("✕", style.fg(colors.status)));
        spans.push(Span::styled("] ", style));

        removes.push((x.saturating_add(label_width), option.id.clone()));
        x = x.saturating_add(label_width).saturating_add(3);
        if x >= area.right() {
            break;
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
    for (col, id) in removes {
        if col < area.right() {
            app.click_regions
                .register(Rect::new(col, area.y, 1, 1), Region::PillRemove(id));
        }
    }
}

fn render_listbox(frame: &mut Frame, app: &mut App, area: Rect, colors: &UiColors) {
    let combobox = app.host.combobox();
    if !combobox.is_open() {
        return;
    }
    let aria = app.host.aria();
    if aria.entries.is_empty() {
        return;
    }

    let block = panel_block(format!(" {} ", aria.controls), true, colors);
    let inner = block.inner(area);
    app.ensure_visible(aria.entries.len(), inner.height as usize);
    let scroll = app.listbox_scroll;
    let candidates = app.host.candidates();
    let input = app.host.input_value().to_string();
    let width = inner.width as usize;

    let mut lines = Vec::new();
    let mut rows = Vec::new();
    for (i, entry) in aria.entries.iter().enumerate() {
        match entry {
            ListboxEntry::Option { label, selected, .. } => {
                let mut spans = Vec::new();
                push_selection_cursor(&mut spans, *selected, colors);
                let (normal, highlight) = highlight_styles(colors.candidate, colors.bg, *selected);
                spans.extend(build_highlighted_text(label, &input, normal, highlight));
                if let Some(sub_title) = candidates.get(i).and_then(|c| c.option.sub_title.as_deref())
                {
                    push_sub_title(&mut spans, sub_title, width, colors);
                }
                let line = Line::from(spans);
                lines.push(if *selected {
                    line.style(Style::default().bg(colors.selected_bg))
                } else {
                    line
                });
                rows.push(i);
            }
            ListboxEntry::Status(text) => {
                lines.push(Line::from(Span::styled(
                    format!("  {text}"),
                    Style::default()
                        .fg(colors.status)
                        .add_modifier(Modifier::ITALIC),
                )));
            }
        }
    }

    let visible: Vec<Line> = lines.into_iter().skip(scroll).collect();
    frame.render_widget(Paragraph::new(visible).block(block), area);
    for index in rows {
        let Some(offset) = index.checked_sub(scroll) else {
            continue;
        };
        if offset >= inner.height as usize {
            break;
        }
        app.click_regions.register(
            Rect::new(inner.x, inner.y + offset as u16, inner.width, 1),
            Region::Candidate(index),
        );
    }
}

fn render_aria(frame: &mut Frame, app: &App, area: Rect, colors: &UiColors) {
    let aria = app.host.aria();
    let instance_id = app.host.combobox().config().instance_id.as_str();
    let focused = match app.host.focus() {
        Focus::Input => format!("{instance_id}-input"),
        Focus::Pill(i) => ids::pill_id(instance_id, i + 1),
    };
    let style = Style::default().fg(colors.aria);
    let attr = |name: &str, value: &str| {
        Line::from(vec![
            Span::styled(format!("{name}="), style),
            Span::styled(
                format!("\"{value}\""),
                style.add_modifier(Modifier::BOLD),
            ),
        ])
    };
    let lines = vec![
        attr("role", "combobox"),
        attr("aria-haspopup", aria.has_popup),
        attr("aria-expanded", aria.expanded),
        attr("aria-controls", &aria.controls),
        attr(
            "aria-activedescendant",
            aria.active_descendant.as_deref().unwrap_or(""),
        ),
        attr("focus", &focused),
    ];
    let block = panel_block(" ARIA ".to_string(), false, colors);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn render_help_bar(frame: &mut Frame, app: &App, area: Rect, colors: &UiColors) {
    let help = match app.host.focus() {
        Focus::Pill(_) => " ←/→ move  Del remove  Esc back to input  ^C quit",
        Focus::Input if app.variant() == Variant::SingleInline => {
            " ↑/↓ highlight  Enter select  Esc close  ^X clear  ^T theme  ^C quit"
        }
        Focus::Input => " ↑/↓ highlight  Enter select  Esc close  Tab pills  ^T theme  ^C quit",
    };
    frame.render_widget(
        Paragraph::new(Span::styled(help, Style::default().fg(colors.placeholder)))
            .style(Style::default().bg(colors.bar_bg)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use combotui::{
        sample_accounts, ComboOption, ComboboxConfig, ComboboxHost, Event, Key, NO_MATCHES,
    };
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    fn app(config: ComboboxConfig) -> App {
        App::new(config, sample_accounts()).unwrap()
    }

    fn render_to_string(app: &mut App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut output = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                let cell = &buffer[(x, y)];
                output.push_str(cell.symbol());
            }
            // Trim trailing whitespace per line for cleaner comparisons
            let trimmed = output.trim_end();
            output = trimmed.to_string();
            output.push('\n');
        }
        output
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    #[test]
    fn test_render_closed() {
        let mut app = app(ComboboxConfig::new("combobox-unique-id"));
        let output = render_to_string(&mut app, 80, 24);
        assert!(output.contains("Search"));
        assert!(output.contains("Search Salesforce"));
        assert!(output.contains("aria-expanded=\"false\""));
        assert!(output.contains("aria-haspopup=\"listbox\""));
        assert!(!output.contains("Paddy's Pub"));
    }

    #[test]
    fn test_render_open_lists_candidates() {
        let mut app = app(ComboboxConfig::new("combobox-unique-id").with_open(true));
        let output = render_to_string(&mut app, 80, 24);
        assert!(output.contains("combobox-unique-id-listbox"));
        assert!(output.contains("Acme"));
        assert!(output.contains("Paddy's Pub"));
        assert!(output.contains("Account • Boston, MA"));
        assert!(output.contains("aria-expanded=\"true\""));
    }

    #[test]
    fn test_render_highlight_and_activedescendant() {
        let mut app = app(ComboboxConfig::new("combobox-unique-id").with_variant(Variant::Multi));
        type_str(&mut app, "Salesforce");
        app.dispatch(Event::Key(Key::ArrowDown));
        let output = render_to_string(&mut app, 100, 24);
        assert!(output.contains("▶ Salesforce.com, Inc."));
        assert!(output.contains("combobox-unique-id-listbox-option-2"));
    }

    #[test]
    fn test_render_listbox_scrolls_to_highlight() {
        let mut app = app(ComboboxConfig::new("combobox-unique-id").with_open(true));
        // Wraps to the last candidate.
        app.dispatch(Event::Key(Key::ArrowUp));
        // Leaves two listbox rows, starting at y = 6.
        let output = render_to_string(&mut app, 80, 18);
        assert!(output.contains("▶ Acme Construction"));
        assert!(output.contains("Acme Landscaping"));
        assert!(!output.contains("Paddy's Pub"));
        assert_eq!(app.listbox_scroll, 6);
        assert_eq!(
            app.click_regions.handle_click(5, 6),
            Some(&Region::Candidate(6))
        );
        assert_eq!(
            app.click_regions.handle_click(5, 7),
            Some(&Region::Candidate(7))
        );

        app.dispatch(Event::Key(Key::ArrowDown));
        let output = render_to_string(&mut app, 80, 18);
        assert!(output.contains("▶ Acme"));
        assert_eq!(app.listbox_scroll, 0);
    }

    #[test]
    fn test_render_pills_stop_at_edge() {
        let many: Vec<ComboOption> = (0..500)
            .map(|i| ComboOption::new(i.to_string(), format!("Option {i}"), "account"))
            .collect();
        let config = ComboboxConfig::new("combobox-unique-id").with_variant(Variant::Multi);
        let mut app = App::new(config.clone(), many.clone()).unwrap();
        app.host = ComboboxHost::new(config, many.clone())
            .unwrap()
            .with_selection(many);
        let output = render_to_string(&mut app, 40, 24);
        assert!(output.contains("[Option 0 ✕]"));
    }

    #[test]
    fn test_render_no_matches() {
        let mut app = app(ComboboxConfig::new("combobox-unique-id").with_open(true));
        type_str(&mut app, "Random text");
        let output = render_to_string(&mut app, 80, 24);
        assert!(output.contains(NO_MATCHES));
        assert!(output.contains("Random text"));
    }

    #[test]
    fn test_render_pills_and_remove_region() {
        let mut app = app(ComboboxConfig::new("combobox-unique-id").with_variant(Variant::Multi));
        type_str(&mut app, "acme");
        app.dispatch(Event::Key(Key::ArrowDown));
        app.dispatch(Event::Key(Key::Enter));
        let output = render_to_string(&mut app, 80, 24);
        assert!(output.contains("[Acme ✕]"));

        // The remove glyph sits after "[Acme " on the pills row (y = 4).
        let col = 1 + "[Acme ".chars().count() as u16;
        assert_eq!(
            app.click_regions.handle_click(col, 4),
            Some(&Region::PillRemove("1".to_string()))
        );
    }

    #[test]
    fn test_render_single_inline_clear_control() {
        let mut app = app(
            ComboboxConfig::new("combobox-unique-id").with_variant(Variant::SingleInline),
        );
        type_str(&mut app, "tyrell");
        app.dispatch(Event::Key(Key::ArrowDown));
        app.dispatch(Event::Key(Key::Enter));
        let output = render_to_string(&mut app, 80, 24);
        assert!(output.contains("Tyrell Corp"));
        assert!(output.contains("✕"));
        assert!(output.contains("^X clear"));
        assert_eq!(app.click_regions.handle_click(76, 2), Some(&Region::Clear));
    }
}
