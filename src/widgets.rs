//! Reusable styling helpers for the combobox panels.

use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Padding},
};

use combotui::match_indices;
use ratatui_themes::ThemePalette;

/// Semantic color palette derived from the active theme.
/// Maps abstract UI roles to concrete `Color` values.
pub struct UiColors {
    pub label: Color,
    pub input: Color,
    pub placeholder: Color,
    pub pill: Color,
    pub candidate: Color,
    pub sub_title: Color,
    pub status: Color,
    pub aria: Color,
    pub active_border: Color,
    pub inactive_border: Color,
    pub selected_bg: Color,
    pub focused_pill_bg: Color,
    pub bg: Color,
    pub bar_bg: Color,
}

impl UiColors {
    pub fn from_palette(p: &ThemePalette) -> Self {
        let bar_bg = match p.bg {
            Color::Rgb(r, g, b) => Color::Rgb(
                r.saturating_add(10),
                g.saturating_add(10),
                b.saturating_add(15),
            ),
            _ => Color::Rgb(30, 30, 40),
        };

        let selected_bg = match p.selection {
            Color::Rgb(r, g, b) => Color::Rgb(r, g, b),
            _ => Color::Rgb(40, 40, 60),
        };

        let focused_pill_bg = match p.selection {
            Color::Rgb(r, g, b) => Color::Rgb(
                r.saturating_add(15),
                g.saturating_sub(5),
                b.saturating_sub(10),
            ),
            _ => Color::Rgb(50, 30, 30),
        };

        Self {
            label: p.info,
            input: p.fg,
            placeholder: p.muted,
            pill: p.success,
            candidate: p.fg,
            sub_title: p.muted,
            status: p.warning,
            aria: p.secondary,
            active_border: p.accent,
            inactive_border: p.muted,
            selected_bg,
            focused_pill_bg,
            bg: p.bg,
            bar_bg,
        }
    }
}

/// Build a bordered panel block; the border is highlighted while `active`.
pub fn panel_block(title: String, active: bool, colors: &UiColors) -> Block<'static> {
    let border = if active {
        colors.active_border
    } else {
        colors.inactive_border
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title)
        .title_style(Style::default().fg(border).add_modifier(Modifier::BOLD))
        .padding(Padding::horizontal(1))
}

/// Push the highlight cursor indicator (`▶ ` or `  `) onto spans.
pub fn push_selection_cursor(spans: &mut Vec<Span<'static>>, is_active: bool, colors: &UiColors) {
    if is_active {
        spans.push(Span::styled(
            "▶ ",
            Style::default()
                .fg(colors.active_border)
                .add_modifier(Modifier::BOLD),
        ));
    } else {
        spans.push(Span::styled("  ", Style::default()));
    }
}

/// Compute the highlight styles for a candidate.
/// Returns `(normal_style, highlight_style)` for use with `build_highlighted_text`.
pub fn highlight_styles(base_color: Color, bg_color: Color, is_active: bool) -> (Style, Style) {
    if is_active {
        (
            Style::default()
                .fg(base_color)
                .add_modifier(Modifier::BOLD),
            Style::default()
                .fg(bg_color)
                .bg(base_color)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (
            Style::default().fg(base_color),
            Style::default()
                .fg(base_color)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
    }
}

/// Build spans with the characters matched by `input` highlighted.
pub fn build_highlighted_text(
    text: &str,
    input: &str,
    normal_style: Style,
    highlight_style: Style,
) -> Vec<Span<'static>> {
    let indices = match_indices(text, input);

    if indices.is_empty() {
        return vec![Span::styled(text.to_string(), normal_style)];
    }

    let mut spans = Vec::new();
    let chars: Vec<char> = text.chars().collect();
    let mut last_idx = 0;

    for &match_idx in &indices {
        let idx = match_idx as usize;
        if idx >= chars.len() {
            continue;
        }

        if last_idx < idx {
            let before: String = chars[last_idx..idx].iter().collect();
            spans.push(Span::styled(before, normal_style));
        }

        spans.push(Span::styled(chars[idx].to_string(), highlight_style));
        last_idx = idx + 1;
    }

    if last_idx < chars.len() {
        let after: String = chars[last_idx..].iter().collect();
        spans.push(Span::styled(after, normal_style));
    }

    spans
}

/// Push right-aligned secondary text (an option's sub-title) onto spans.
pub fn push_sub_title(
    spans: &mut Vec<Span<'static>>,
    sub_title: &str,
    available_width: usize,
    colors: &UiColors,
) {
    let current_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let sub_len = sub_title.chars().count();

    if current_len + sub_len + 1 < available_width {
        let padding = available_width.saturating_sub(current_len + sub_len);
        spans.push(Span::raw(" ".repeat(padding)));
    } else {
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(
        sub_title.to_string(),
        Style::default().fg(colors.sub_title),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_highlighted_text_splits_on_match() {
        let normal = Style::default();
        let highlight = Style::default().add_modifier(Modifier::BOLD);
        let spans = build_highlighted_text("Paddy's Pub", "pub", normal, highlight);
        let parts: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(parts, vec!["Paddy's ", "P", "u", "b"]);
        assert_eq!(spans[1].style, highlight);
        assert_eq!(spans[0].style, normal);
    }

    #[test]
    fn test_highlighted_text_without_match() {
        let spans = build_highlighted_text("Acme", "", Style::default(), Style::default());
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].content, "Acme");
    }

    #[test]
    fn test_sub_title_is_right_aligned() {
        let colors = UiColors::from_palette(&ratatui_themes::ThemeName::default().palette());
        let mut spans = vec![Span::raw("Acme")];
        push_sub_title(&mut spans, "Account", 20, &colors);
        let total: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        assert_eq!(total, 20);
    }
}
