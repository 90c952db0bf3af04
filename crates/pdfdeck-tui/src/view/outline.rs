use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use pdfdeck_core::Stage;

use crate::app::App;
use crate::view::{render_footer, render_header, spinner_char, truncate};

/// Render the Outline screen.
pub fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    let chunks = Layout::vertical([
        Constraint::Length(1), // header
        Constraint::Length(1), // stage status
        Constraint::Min(5),    // topics + detail
        Constraint::Length(1), // footer
    ])
    .split(area);

    render_header(f, chunks[0], app, "Outline");
    render_status(f, chunks[1], app);

    let body = if chunks[2].width >= 100 {
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[2])
    } else {
        Layout::vertical([Constraint::Min(5), Constraint::Length(7)]).split(chunks[2])
    };
    render_table(f, body[0], app);
    render_detail(f, body[1], app);

    let hints = if app.workflow.stage() == Stage::Presenting {
        "j/k:nav  a:add  e:edit  d:remove  p:regenerate  Tab:deck  ?:help  q:quit"
    } else {
        "j/k:nav  a:add  e:edit  d:remove  p:generate  o:open  ?:help  q:quit"
    };
    render_footer(f, chunks[3], app, hints);
}

fn render_status(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let state = app.workflow.state();
    let line = match state.stage() {
        Stage::Generating => Line::from(vec![
            Span::styled(
                format!(" {} ", spinner_char(app.tick)),
                Style::default().fg(theme.spinner),
            ),
            Span::styled("Generating presentation...", Style::default().fg(theme.text)),
        ]),
        Stage::GenerateFailed => Line::from(vec![
            Span::styled(" Generation failed: ", theme.error_style()),
            Span::styled(
                state.generate_error().unwrap_or_default().to_string(),
                Style::default().fg(theme.error),
            ),
        ]),
        _ if state.topics().is_empty() => Line::from(Span::styled(
            " No topics. Press a to add one before generating.",
            Style::default().fg(theme.warning),
        )),
        _ => Line::from(Span::styled(
            format!(
                " {} topics, {} images, {} chars of text",
                state.topics().len(),
                state.images().len(),
                state.raw_text().chars().count()
            ),
            Style::default().fg(theme.dim),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_table(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let topics = app.workflow.state().topics();

    let header = Row::new(
        ["#", "Title", "Description"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD))),
    )
    .height(1);

    let title_width = (area.width as usize / 3).max(12);
    let rows: Vec<Row> = topics
        .iter()
        .enumerate()
        .map(|(i, topic)| {
            let title_style = if topic.is_local() {
                Style::default().fg(theme.local)
            } else {
                Style::default().fg(theme.text)
            };
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(truncate(&topic.title, title_width)).style(title_style),
                Cell::from(truncate(
                    &topic.description,
                    (area.width as usize).saturating_sub(title_width + 10),
                ))
                .style(Style::default().fg(theme.dim)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Length(title_width as u16),
        Constraint::Min(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.focused_border_style())
                .title(" 2. Curate Outline "),
        )
        .row_highlight_style(theme.highlight_style());

    let mut state = TableState::default();
    if !topics.is_empty() {
        state.select(Some(app.outline_cursor));
    }
    f.render_stateful_widget(table, area, &mut state);
}

fn render_detail(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let mut lines: Vec<Line> = Vec::new();

    match app.selected_topic() {
        Some(topic) => {
            lines.push(Line::from(Span::styled(
                topic.title.as_str(),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                format!("id: {}", topic.id),
                Style::default().fg(theme.dim),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(topic.description.as_str()));
        }
        None => lines.push(Line::from(Span::styled(
            "Nothing selected",
            Style::default().fg(theme.dim),
        ))),
    }

    let detail = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(" Topic "),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(detail, area);
}
