//! Plain-text and JSON renderings of outlines and decks.

use owo_colors::{OwoColorize, Style};
use serde::Serialize;

use pdfdeck_core::{Slide, SlideBody, Topic, resolve_asset_url};

/// Applies terminal styles unless colour is switched off.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    color: bool,
}

impl Painter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.color {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn heading(&self, text: &str) -> String {
        self.paint(text, Style::new().bold().cyan())
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint(text, Style::new().dimmed())
    }

    pub fn ok(&self, text: &str) -> String {
        self.paint(text, Style::new().green())
    }

    pub fn error(&self, text: &str) -> String {
        self.paint(text, Style::new().bold().red())
    }

    pub fn local(&self, text: &str) -> String {
        self.paint(text, Style::new().magenta())
    }
}

/// Wire shape of a generated deck.
#[derive(Serialize)]
struct DeckDocument<'a> {
    slides: &'a [Slide],
}

#[derive(Serialize)]
struct OutlineDocument<'a> {
    topics: &'a [Topic],
}

pub fn deck_json(slides: &[Slide]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&DeckDocument { slides })
}

pub fn outline_json(topics: &[Topic]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&OutlineDocument { topics })
}

pub fn outline_text(topics: &[Topic], painter: Painter) -> String {
    if topics.is_empty() {
        return format!("{}\n", painter.dim("(no topics)"));
    }
    let mut out = String::new();
    for (i, topic) in topics.iter().enumerate() {
        let title = if topic.is_local() {
            painter.local(&topic.title)
        } else {
            painter.heading(&topic.title)
        };
        out.push_str(&format!(
            "{:>3}. {} {}\n     {}\n",
            i + 1,
            title,
            painter.dim(&format!("[{}]", topic.id)),
            topic.description
        ));
    }
    out
}

/// One slide as text. Layouts with two parts print them one after the other.
pub fn slide_text(slide: &Slide, index: usize, total: usize, base_url: &str, painter: Painter) -> String {
    let mut out = format!(
        "{} {}\n",
        painter.dim(&format!("Slide {} / {}", index + 1, total)),
        painter.heading(&slide.title)
    );
    match &slide.body {
        SlideBody::TextOnly { content } => push_block(&mut out, content),
        SlideBody::TextLeftImageRight {
            text_content,
            image_url,
            image_alt,
        } => {
            push_block(&mut out, text_content);
            push_image(&mut out, base_url, image_url, image_alt, painter);
        }
        SlideBody::ImageLeftTextRight {
            image_url,
            image_alt,
            text_content,
        } => {
            push_image(&mut out, base_url, image_url, image_alt, painter);
            push_block(&mut out, text_content);
        }
        SlideBody::TwoColumnText {
            column1_content,
            column2_content,
        } => {
            push_block(&mut out, column1_content);
            out.push_str(&format!("  {}\n", painter.dim("--")));
            push_block(&mut out, column2_content);
        }
    }
    out
}

fn push_block(out: &mut String, text: &str) {
    for line in text.lines() {
        out.push_str("  ");
        out.push_str(line);
        out.push('\n');
    }
}

fn push_image(out: &mut String, base_url: &str, image_url: &str, image_alt: &str, painter: Painter) {
    let src = resolve_asset_url(base_url, image_url);
    if src.is_empty() {
        out.push_str(&format!("  {}\n", painter.dim("[no image]")));
        return;
    }
    let label = if image_alt.is_empty() {
        format!("[image] {src}")
    } else {
        format!("[image: {image_alt}] {src}")
    };
    out.push_str(&format!("  {}\n", painter.ok(&label)));
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: Painter = Painter { color: false };

    fn image_slide(url: &str) -> Slide {
        Slide {
            id: "s2".into(),
            title: "Architecture".into(),
            body: SlideBody::ImageLeftTextRight {
                image_url: url.into(),
                image_alt: "Diagram".into(),
                text_content: "- parser\n- renderer".into(),
            },
        }
    }

    #[test]
    fn image_slide_resolves_relative_url() {
        let text = slide_text(&image_slide("/uploads/d.png"), 1, 3, "http://localhost:3001", PLAIN);
        assert_eq!(
            text,
            "Slide 2 / 3 Architecture\n  [image: Diagram] http://localhost:3001/uploads/d.png\n  - parser\n  - renderer\n"
        );
    }

    #[test]
    fn missing_image_prints_placeholder() {
        let text = slide_text(&image_slide(""), 0, 1, "http://localhost:3001", PLAIN);
        assert!(text.contains("[no image]"));
        assert!(!text.contains("http://"));
    }

    #[test]
    fn outline_lists_topics_in_order() {
        let topics = vec![
            Topic {
                id: "t1".into(),
                title: "Intro".into(),
                description: "Why".into(),
            },
            Topic {
                id: "manual-1".into(),
                title: "Extra".into(),
                description: "Added".into(),
            },
        ];
        let text = outline_text(&topics, PLAIN);
        assert_eq!(text, "  1. Intro [t1]\n     Why\n  2. Extra [manual-1]\n     Added\n");
    }

    #[test]
    fn deck_json_uses_wire_shape() {
        let json = deck_json(&[image_slide("/a.png")]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let slide = &value["slides"][0];
        assert_eq!(slide["type"], "image_left_text_right");
        assert_eq!(slide["imageUrl"], "/a.png");
        assert_eq!(slide["textContent"], "- parser\n- renderer");
    }

    #[test]
    fn color_can_be_disabled() {
        assert_eq!(PLAIN.error("boom"), "boom");
        assert_ne!(Painter::new(true).error("boom"), "boom");
    }
}
