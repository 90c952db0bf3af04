pub mod deck;
pub mod help;
pub mod outline;
pub mod prompt;
pub mod upload;

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::App;

/// Spinner frames for animated progress indication.
const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Get the current spinner character based on a tick counter.
pub fn spinner_char(tick: usize) -> char {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Truncate a string to fit in `max_width` columns, appending "…" if truncated.
pub fn truncate(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if s.chars().count() <= max_width {
        return s.to_string();
    }
    let mut truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}

/// Top bar: app name, screen title, document name and stage.
pub fn render_header(f: &mut Frame, area: Rect, app: &App, title: &str) {
    let theme = &app.theme;
    let state = app.workflow.state();
    let stage = state.stage();

    let mut spans = vec![
        Span::styled(" PDFDECK ", theme.header_style()),
        Span::styled(
            format!(" {title}"),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(name) = state.document_name() {
        spans.push(Span::styled(" > ", Style::default().fg(theme.dim)));
        spans.push(Span::styled(
            truncate(name, (area.width as usize).saturating_sub(40)),
            Style::default().fg(theme.text),
        ));
    }
    let stage_text = if stage.is_busy() {
        format!("  {} {}", spinner_char(app.tick), stage.label())
    } else {
        format!("  [{}]", stage.label())
    };
    spans.push(Span::styled(stage_text, Style::default().fg(theme.stage_color(stage))));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Bottom bar: the pending notice if there is one, otherwise key hints.
pub fn render_footer(f: &mut Frame, area: Rect, app: &App, hints: &str) {
    let theme = &app.theme;
    let line = match &app.notice {
        Some(notice) => Line::from(vec![
            Span::styled(" ! ", theme.error_style()),
            Span::styled(notice.as_str(), Style::default().fg(theme.warning)),
        ]),
        None => Line::from(Span::styled(format!(" {hints}"), theme.footer_style())),
    };
    f.render_widget(Paragraph::new(line), area);
}

/// Create a centered rectangle of the given width (columns) and height (rows).
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .split(area);
    Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .split(vertical[0])[0]
}
