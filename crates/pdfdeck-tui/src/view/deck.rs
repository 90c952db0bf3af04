use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use pdfdeck_core::{Slide, SlideBody, resolve_asset_url};

use crate::app::App;
use crate::theme::Theme;
use crate::view::{render_footer, render_header};

/// Shown in place of an image when the slide carries no URL.
pub const NO_IMAGE: &str = "[no image]";

/// Render the Deck screen.
pub fn render(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let deck = app.workflow.state().deck();
    let area = f.area();

    let chunks = Layout::vertical([
        Constraint::Length(1), // header
        Constraint::Min(5),    // slide
        Constraint::Length(1), // position
        Constraint::Length(1), // footer
    ])
    .split(area);

    render_header(f, chunks[0], app, "Presentation");

    match deck.current() {
        Some(slide) => render_slide(f, chunks[1], slide, &app.backend_url, theme),
        None => {
            let empty = Paragraph::new(Line::from(Span::styled(
                "  The service returned no slides.",
                Style::default().fg(theme.warning),
            )))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.border_style())
                    .title(" 3. Presentation "),
            );
            f.render_widget(empty, chunks[1]);
        }
    }

    let position = Line::from(vec![
        Span::styled(
            if deck.is_first() { "   " } else { " ◀ " },
            Style::default().fg(theme.active),
        ),
        Span::styled(
            deck.progress_label().unwrap_or_default(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            if deck.is_last() { "   " } else { " ▶ " },
            Style::default().fg(theme.active),
        ),
    ]);
    f.render_widget(Paragraph::new(position), chunks[2]);

    render_footer(
        f,
        chunks[3],
        app,
        "h/l:prev/next  g/G:first/last  Tab:outline  p:regenerate  o:open  ?:help  q:quit",
    );
}

/// Draw one slide. Each layout has its own arm so a new variant cannot be
/// forgotten here.
fn render_slide(f: &mut Frame, area: Rect, slide: &Slide, base_url: &str, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.focused_border_style())
        .title(Span::styled(
            format!(" {} ", slide.title),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    match &slide.body {
        SlideBody::TextOnly { content } => {
            text_panel(f, inner, content, theme);
        }
        SlideBody::TextLeftImageRight {
            text_content,
            image_url,
            image_alt,
        } => {
            let [left, right] = halves(inner);
            text_panel(f, left, text_content, theme);
            image_panel(f, right, base_url, image_url, image_alt, theme);
        }
        SlideBody::ImageLeftTextRight {
            image_url,
            image_alt,
            text_content,
        } => {
            let [left, right] = halves(inner);
            image_panel(f, left, base_url, image_url, image_alt, theme);
            text_panel(f, right, text_content, theme);
        }
        SlideBody::TwoColumnText {
            column1_content,
            column2_content,
        } => {
            let [left, right] = halves(inner);
            text_panel(f, left, column1_content, theme);
            text_panel(f, right, column2_content, theme);
        }
    }
}

fn halves(area: Rect) -> [Rect; 2] {
    let chunks = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .spacing(2)
        .split(area);
    [chunks[0], chunks[1]]
}

fn text_panel(f: &mut Frame, area: Rect, text: &str, theme: &Theme) {
    let paragraph = Paragraph::new(markdown_lines(text, theme)).wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn image_panel(
    f: &mut Frame,
    area: Rect,
    base_url: &str,
    image_url: &str,
    image_alt: &str,
    theme: &Theme,
) {
    let paragraph = Paragraph::new(image_lines(base_url, image_url, image_alt, theme))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(" Image "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

/// Describe an image slot: the resolved address and its alt text, or a
/// placeholder when there is no image.
pub fn image_lines(
    base_url: &str,
    image_url: &str,
    image_alt: &str,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let src = resolve_asset_url(base_url, image_url);
    if src.is_empty() {
        return vec![Line::from(Span::styled(NO_IMAGE, Style::default().fg(theme.dim)))];
    }
    let mut lines = vec![Line::from(Span::styled(
        src,
        Style::default()
            .fg(theme.active)
            .add_modifier(Modifier::UNDERLINED),
    ))];
    if !image_alt.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            image_alt.to_string(),
            Style::default().fg(theme.dim).add_modifier(Modifier::ITALIC),
        )));
    }
    lines
}

/// Light markdown: `#` headings in bold, `-`/`*` bullets as dots, `**bold**`
/// spans. Everything else is plain text.
pub fn markdown_lines(text: &str, theme: &Theme) -> Vec<Line<'static>> {
    text.lines()
        .map(|raw| {
            let line = raw.trim_end();
            let trimmed = line.trim_start();
            if let Some(heading) = trimmed.strip_prefix('#') {
                let heading = heading.trim_start_matches('#').trim();
                return Line::from(Span::styled(
                    heading.to_string(),
                    Style::default().fg(theme.active).add_modifier(Modifier::BOLD),
                ));
            }
            if let Some(item) = trimmed
                .strip_prefix("- ")
                .or_else(|| trimmed.strip_prefix("* "))
            {
                let indent = " ".repeat(line.len() - trimmed.len());
                let mut spans = vec![Span::raw(format!("{indent}• "))];
                spans.extend(inline_spans(item, theme));
                return Line::from(spans);
            }
            Line::from(inline_spans(line, theme))
        })
        .collect()
}

fn inline_spans(text: &str, theme: &Theme) -> Vec<Span<'static>> {
    let bold = Style::default().fg(theme.text).add_modifier(Modifier::BOLD);
    text.split("**")
        .enumerate()
        .filter(|(_, part)| !part.is_empty())
        .map(|(i, part)| {
            // Odd segments sit between a pair of markers
            if i % 2 == 1 {
                Span::styled(part.to_string(), bold)
            } else {
                Span::raw(part.to_string())
            }
        })
        .collect()
}
