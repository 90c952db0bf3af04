use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::model::form::{Field, Prompt, TopicForm};
use crate::theme::Theme;
use crate::view::centered_rect;

/// Render a text prompt as a centered popup.
pub fn render(f: &mut Frame, prompt: &Prompt, theme: &Theme) {
    let area = f.area();
    let width = area.width.saturating_sub(4).min(72);

    let (title, lines, height) = match prompt {
        Prompt::OpenFile(path) => (
            " Open PDF ",
            vec![
                Line::from(Span::styled("Path to a PDF file:", Style::default().fg(theme.dim))),
                input_line(path, true, theme),
                Line::from(""),
                hint_line("Enter:open  Esc:cancel", theme),
            ],
            6,
        ),
        Prompt::Topic(form) => (form.heading(), topic_lines(form, theme), 9),
    };

    let popup = centered_rect(width, height, area);
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.active))
                .title(title),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

fn topic_lines<'a>(form: &'a TopicForm, theme: &Theme) -> Vec<Line<'a>> {
    vec![
        label_line("Title", form.focus == Field::Title, theme),
        input_line(&form.title, form.focus == Field::Title, theme),
        label_line("Description", form.focus == Field::Description, theme),
        input_line(&form.description, form.focus == Field::Description, theme),
        Line::from(""),
        hint_line("Tab:switch field  Enter:save  Esc:cancel", theme),
    ]
}

fn label_line<'a>(label: &'a str, focused: bool, theme: &Theme) -> Line<'a> {
    let style = if focused {
        Style::default().fg(theme.active).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.dim)
    };
    Line::from(Span::styled(label, style))
}

fn input_line<'a>(value: &'a str, focused: bool, theme: &Theme) -> Line<'a> {
    let mut spans = vec![
        Span::styled("> ", Style::default().fg(theme.dim)),
        Span::styled(value, Style::default().fg(theme.text)),
    ];
    if focused {
        spans.push(Span::styled(
            "█",
            Style::default().fg(theme.active).add_modifier(Modifier::SLOW_BLINK),
        ));
    }
    Line::from(spans)
}

fn hint_line<'a>(hint: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(hint, theme.footer_style()))
}
