//! Slide records produced by generation.
//!
//! The service describes each slide as a loosely-typed JSON object tagged by
//! `type`. [`normalize`] turns any such record into a [`Slide`] whose body
//! carries exactly the fields its layout needs, defaulting missing ones to the
//! empty string. Unknown tags become a visible error slide instead of a failure.

use serde::Serialize;
use serde_json::{Map, Value};

/// Title of the slide substituted for an unrecognized record.
pub const FALLBACK_TITLE: &str = "Error";
/// Content of the slide substituted for an unrecognized record.
pub const FALLBACK_CONTENT: &str = "Unknown slide type.";

/// One slide of a generated deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slide {
    pub id: String,
    pub title: String,
    #[serde(flatten)]
    pub body: SlideBody,
}

/// The visual layout of a slide together with the fields it requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum SlideBody {
    TextOnly {
        content: String,
    },
    TextLeftImageRight {
        text_content: String,
        image_url: String,
        image_alt: String,
    },
    ImageLeftTextRight {
        image_url: String,
        image_alt: String,
        text_content: String,
    },
    TwoColumnText {
        column1_content: String,
        column2_content: String,
    },
}

/// Layout tag, as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideKind {
    TextOnly,
    TextLeftImageRight,
    ImageLeftTextRight,
    TwoColumnText,
}

impl SlideKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "text_only" => Some(Self::TextOnly),
            "text_left_image_right" => Some(Self::TextLeftImageRight),
            "image_left_text_right" => Some(Self::ImageLeftTextRight),
            "two_column_text" => Some(Self::TwoColumnText),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::TextOnly => "text_only",
            Self::TextLeftImageRight => "text_left_image_right",
            Self::ImageLeftTextRight => "image_left_text_right",
            Self::TwoColumnText => "two_column_text",
        }
    }
}

impl Slide {
    /// The slide shown in place of a record whose layout is not recognized.
    pub fn fallback(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: FALLBACK_TITLE.to_string(),
            body: SlideBody::TextOnly {
                content: FALLBACK_CONTENT.to_string(),
            },
        }
    }

    pub fn kind(&self) -> SlideKind {
        match self.body {
            SlideBody::TextOnly { .. } => SlideKind::TextOnly,
            SlideBody::TextLeftImageRight { .. } => SlideKind::TextLeftImageRight,
            SlideBody::ImageLeftTextRight { .. } => SlideKind::ImageLeftTextRight,
            SlideBody::TwoColumnText { .. } => SlideKind::TwoColumnText,
        }
    }

    /// Server-relative image path of an image slide, if any.
    pub fn image_url(&self) -> Option<&str> {
        match &self.body {
            SlideBody::TextLeftImageRight { image_url, .. }
            | SlideBody::ImageLeftTextRight { image_url, .. } => Some(image_url),
            SlideBody::TextOnly { .. } | SlideBody::TwoColumnText { .. } => None,
        }
    }

    /// Image location ready for the renderer; empty when the slide has no image.
    pub fn image_src(&self, base_url: &str) -> String {
        resolve_asset_url(base_url, self.image_url().unwrap_or_default())
    }
}

/// Normalize one raw slide record from the generation service.
///
/// Never fails: a non-object record or an unrecognized `type` yields
/// [`Slide::fallback`].
pub fn normalize(raw: &Value) -> Slide {
    let Some(obj) = raw.as_object() else {
        log::warn!("slide record is not an object; substituting fallback slide");
        return Slide::fallback("");
    };

    let id = text_field(obj, "id");
    let tag = obj.get("type").and_then(Value::as_str).unwrap_or_default();
    let Some(kind) = SlideKind::from_tag(tag) else {
        log::warn!("unknown slide type {tag:?} on slide {id:?}; substituting fallback slide");
        return Slide::fallback(id);
    };

    let body = match kind {
        SlideKind::TextOnly => SlideBody::TextOnly {
            content: text_field(obj, "content"),
        },
        SlideKind::TextLeftImageRight => SlideBody::TextLeftImageRight {
            text_content: text_field(obj, "textContent"),
            image_url: text_field(obj, "imageUrl"),
            image_alt: text_field(obj, "imageAlt"),
        },
        SlideKind::ImageLeftTextRight => SlideBody::ImageLeftTextRight {
            image_url: text_field(obj, "imageUrl"),
            image_alt: text_field(obj, "imageAlt"),
            text_content: text_field(obj, "textContent"),
        },
        SlideKind::TwoColumnText => SlideBody::TwoColumnText {
            column1_content: text_field(obj, "column1Content"),
            column2_content: text_field(obj, "column2Content"),
        },
    };

    Slide {
        id,
        title: text_field(obj, "title"),
        body,
    }
}

/// Normalize a whole `slides` array in order.
pub fn normalize_all(raw: &[Value]) -> Vec<Slide> {
    raw.iter().map(normalize).collect()
}

/// Read a string-ish field; scalars are stringified, anything else is `""`.
fn text_field(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Join a server-relative asset path onto the service base URL.
///
/// Exactly one `/` separates the two parts whatever slashes either side
/// carries. An empty path resolves to `""` so the renderer can show its
/// placeholder; a path that is already an absolute URL is returned as is.
pub fn resolve_asset_url(base_url: &str, path: &str) -> String {
    let path = path.trim();
    if path.is_empty() {
        return String::new();
    }
    if url::Url::parse(path).is_ok() {
        return path.to_string();
    }
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_only_keeps_content() {
        let slide = normalize(&json!({
            "id": "s1", "type": "text_only", "title": "Intro", "content": "hello"
        }));
        assert_eq!(slide.id, "s1");
        assert_eq!(slide.title, "Intro");
        assert_eq!(
            slide.body,
            SlideBody::TextOnly {
                content: "hello".into()
            }
        );
    }

    #[test]
    fn image_slides_default_missing_fields() {
        let slide = normalize(&json!({
            "id": "s2", "type": "text_left_image_right", "title": "Arch",
            "textContent": "- a\n- b"
        }));
        assert_eq!(
            slide.body,
            SlideBody::TextLeftImageRight {
                text_content: "- a\n- b".into(),
                image_url: String::new(),
                image_alt: String::new(),
            }
        );

        let slide = normalize(&json!({
            "id": "s3", "type": "image_left_text_right", "title": "Flow",
            "imageUrl": "/images/u1/fig1.png", "imageAlt": "diagram"
        }));
        assert_eq!(slide.kind(), SlideKind::ImageLeftTextRight);
        assert_eq!(slide.image_url(), Some("/images/u1/fig1.png"));
        match slide.body {
            SlideBody::ImageLeftTextRight { text_content, .. } => assert!(text_content.is_empty()),
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn two_column_fields_are_extracted() {
        let slide = normalize(&json!({
            "id": "s4", "type": "two_column_text", "title": "Compare",
            "column1Content": "left", "column2Content": "right",
            "content": "ignored"
        }));
        assert_eq!(
            slide.body,
            SlideBody::TwoColumnText {
                column1_content: "left".into(),
                column2_content: "right".into(),
            }
        );
    }

    #[test]
    fn unknown_type_becomes_error_slide() {
        for raw in [
            json!({"id": "x", "type": "three_column", "title": "T", "content": "c"}),
            json!({"id": "x", "title": "no type"}),
            json!({"id": "x", "type": 7}),
        ] {
            let slide = normalize(&raw);
            assert_eq!(slide.kind(), SlideKind::TextOnly);
            assert_eq!(slide.title, "Error");
            assert_eq!(
                slide.body,
                SlideBody::TextOnly {
                    content: "Unknown slide type.".into()
                }
            );
        }
    }

    #[test]
    fn non_object_record_becomes_error_slide() {
        let slide = normalize(&json!("just a string"));
        assert_eq!(slide, Slide::fallback(""));
    }

    #[test]
    fn missing_title_and_scalar_coercion() {
        let slide = normalize(&json!({"id": 12, "type": "text_only", "content": true}));
        assert_eq!(slide.id, "12");
        assert_eq!(slide.title, "");
        assert_eq!(
            slide.body,
            SlideBody::TextOnly {
                content: "true".into()
            }
        );

        let slide = normalize(&json!({"type": "text_only", "title": ["x"], "content": {"a": 1}}));
        assert_eq!(slide.title, "");
        assert_eq!(
            slide.body,
            SlideBody::TextOnly {
                content: String::new()
            }
        );
    }

    #[test]
    fn serializes_in_wire_shape() {
        let slide = normalize(&json!({
            "id": "s2", "type": "two_column_text", "title": "T",
            "column1Content": "a", "column2Content": "b"
        }));
        let value = serde_json::to_value(&slide).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "s2", "type": "two_column_text", "title": "T",
                "column1Content": "a", "column2Content": "b"
            })
        );
    }

    #[test]
    fn join_uses_exactly_one_slash() {
        let expected = "http://host/img/a.png";
        assert_eq!(resolve_asset_url("http://host/", "/img/a.png"), expected);
        assert_eq!(resolve_asset_url("http://host", "img/a.png"), expected);
        assert_eq!(resolve_asset_url("http://host/", "img/a.png"), expected);
        assert_eq!(resolve_asset_url("http://host", "/img/a.png"), expected);
        assert_eq!(resolve_asset_url("http://host//", "//img/a.png"), expected);
    }

    #[test]
    fn join_edge_cases() {
        assert_eq!(resolve_asset_url("http://host", ""), "");
        assert_eq!(resolve_asset_url("http://host", "   "), "");
        assert_eq!(
            resolve_asset_url("http://host", "https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
        assert_eq!(
            resolve_asset_url("http://host:3001/api/", "images/a.png"),
            "http://host:3001/api/images/a.png"
        );
    }

    #[test]
    fn image_src_for_text_slide_is_empty() {
        let slide = normalize(&json!({"id": "s", "type": "text_only", "title": "t"}));
        assert_eq!(slide.image_src("http://host"), "");
    }
}
