use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use pdfdeck_core::Stage;

use crate::app::App;
use crate::view::{render_footer, render_header, spinner_char};

/// Render the Upload screen (nothing selected, extraction running or failed).
pub fn render(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let state = app.workflow.state();
    let area = f.area();

    let chunks = Layout::vertical([
        Constraint::Length(1), // header
        Constraint::Min(5),    // body
        Constraint::Length(1), // footer
    ])
    .split(area);

    render_header(f, chunks[0], app, "Upload");

    let mut lines: Vec<Line> = vec![Line::from("")];
    match state.stage() {
        Stage::Uploading => {
            let name = state.document_name().unwrap_or("document");
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {} ", spinner_char(app.tick)),
                    Style::default().fg(theme.spinner),
                ),
                Span::styled(
                    format!("Processing {name}..."),
                    Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
                ),
            ]));
            lines.push(Line::from(Span::styled(
                "  Extracting topics and images. This can take a while for large files.",
                Style::default().fg(theme.dim),
            )));
        }
        Stage::UploadFailed => {
            lines.push(Line::from(Span::styled(
                "  Upload failed",
                theme.error_style(),
            )));
            if let Some(error) = state.upload_error() {
                lines.push(Line::from(Span::styled(
                    format!("  {error}"),
                    Style::default().fg(theme.error),
                )));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "  Press o to choose another PDF.",
                Style::default().fg(theme.dim),
            )));
        }
        _ => {
            lines.push(Line::from(Span::styled(
                "  Turn a PDF into a slide deck.",
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "  Press o (or Enter) to choose a PDF file.",
                Style::default().fg(theme.dim),
            )));
            lines.push(Line::from(Span::styled(
                format!("  Service: {}", app.backend_url),
                Style::default().fg(theme.dim),
            )));
        }
    }

    let body = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(" 1. Upload PDF "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(body, chunks[1]);

    render_footer(f, chunks[2], app, "o:open  ?:help  q:quit");
}
