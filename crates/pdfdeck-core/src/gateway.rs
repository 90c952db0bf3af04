//! Request/response contracts with the extraction/generation service.
//!
//! Both calls are single-shot: no retry, no backoff, no deduplication. Every
//! failure is converted into a [`GatewayError`] here so callers never see a
//! raw transport error.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::error::GatewayError;
use crate::outline::Topic;
use crate::slide::{self, Slide, resolve_asset_url};

/// Multipart field carrying the uploaded document.
pub const UPLOAD_FIELD: &str = "pdfFile";

/// The two remote operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Extract,
    Generate,
}

impl Operation {
    pub fn path(self) -> &'static str {
        match self {
            Self::Extract => "/upload-pdf",
            Self::Generate => "/generate-content",
        }
    }

    /// Message used when the service fails without saying why.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::Extract => "Failed to upload PDF and extract topics.",
            Self::Generate => "Failed to generate presentation content.",
        }
    }

    fn service_label(self) -> &'static str {
        match self {
            Self::Extract => "extraction service",
            Self::Generate => "generation service",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Extract => "extract",
            Self::Generate => "generate",
        })
    }
}

/// A document selected for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct Document {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read a document from disk. Blocking.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { file_name, bytes })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("file_name", &self.file_name)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// An image pulled out of the document by extraction. Passed through to
/// generation untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedImage {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub filename: String,
    /// Server-relative; resolve with [`ExtractedImage::resolved_url`].
    #[serde(default)]
    pub relative_path: String,
    #[serde(default)]
    pub description: String,
}

impl ExtractedImage {
    pub fn resolved_url(&self, base_url: &str) -> String {
        resolve_asset_url(base_url, &self.relative_path)
    }
}

/// Successful extraction payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extraction {
    #[serde(default, deserialize_with = "null_as_default")]
    pub topics: Vec<Topic>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub extracted_images: Vec<ExtractedImage>,
    /// Opaque; only ever handed back to generation.
    #[serde(default, deserialize_with = "null_as_default")]
    pub raw_text_content: String,
    #[serde(default)]
    pub upload_id: Option<String>,
}

/// Body of a generation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub topics: Vec<Topic>,
    pub raw_text_content: String,
    pub extracted_images: Vec<ExtractedImage>,
    pub upload_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    slides: Vec<Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The remote service as seen by the workflow controller.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    async fn extract_topics(&self, document: &Document) -> Result<Extraction, GatewayError>;

    /// Returns the generated slides, already normalized.
    async fn generate_slides(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<Slide>, GatewayError>;
}

/// [`RemoteGateway`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self::with_client(client, config.backend_url.clone()))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, operation: Operation) -> String {
        resolve_asset_url(&self.base_url, operation.path())
    }
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn extract_topics(&self, document: &Document) -> Result<Extraction, GatewayError> {
        let operation = Operation::Extract;
        let part = Part::bytes(document.bytes.clone())
            .file_name(document.file_name.clone())
            .mime_str("application/pdf")
            .map_err(|e| transport(operation, e))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        log::debug!(
            "POST {} ({}, {} bytes)",
            operation.path(),
            document.file_name,
            document.len()
        );
        let response = self
            .client
            .post(self.endpoint(operation))
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport(operation, e))?;

        let extraction: Extraction = decode(operation, response).await?;
        log::info!(
            "extracted {} topics, {} images (upload id {:?})",
            extraction.topics.len(),
            extraction.extracted_images.len(),
            extraction.upload_id
        );
        Ok(extraction)
    }

    async fn generate_slides(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<Slide>, GatewayError> {
        let operation = Operation::Generate;
        log::debug!(
            "POST {} ({} topics, {} images)",
            operation.path(),
            request.topics.len(),
            request.extracted_images.len()
        );
        let response = self
            .client
            .post(self.endpoint(operation))
            .json(request)
            .send()
            .await
            .map_err(|e| transport(operation, e))?;

        let body: GenerationResponse = decode(operation, response).await?;
        let slides = slide::normalize_all(&body.slides);
        log::info!("generated {} slides", slides.len());
        Ok(slides)
    }
}

/// Map a response to `T`, or to the failure the caller should display.
async fn decode<T: DeserializeOwned>(
    operation: Operation,
    response: reqwest::Response,
) -> Result<T, GatewayError> {
    let status = response.status();
    if !status.is_success() {
        // A body we cannot read is treated like a body without a message.
        let body = response.bytes().await.unwrap_or_default();
        let message = rejection_message(operation, &body);
        log::warn!("{operation} rejected with {status}: {message}");
        return Err(GatewayError::Rejected {
            operation,
            status: status.as_u16(),
            message,
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| transport(operation, e))?;
    serde_json::from_slice(&body).map_err(|e| GatewayError::Decode {
        operation,
        message: format!("Malformed response from the {}: {e}", operation.service_label()),
    })
}

/// Pull a displayable message out of an error body.
///
/// The payload shape is not trusted: a missing, empty or non-scalar `message`
/// falls back to the operation's generic text.
pub(crate) fn rejection_message(operation: Operation, body: &[u8]) -> String {
    let message = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| match v.get("message") {
            Some(Value::String(s)) => Some(s.trim().to_string()),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::Bool(b)) => Some(b.to_string()),
            _ => None,
        })
        .filter(|m| !m.is_empty());
    message.unwrap_or_else(|| operation.fallback_message().to_string())
}

fn transport(operation: Operation, err: reqwest::Error) -> GatewayError {
    let message = if err.is_timeout() {
        format!("The {} timed out.", operation.service_label())
    } else {
        format!("Could not reach the {}: {err}", operation.service_label())
    };
    log::warn!("{operation} transport failure: {err}");
    GatewayError::Transport { operation, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_uses_service_message() {
        assert_eq!(
            rejection_message(Operation::Extract, br#"{"message":"bad pdf"}"#),
            "bad pdf"
        );
        assert_eq!(
            rejection_message(Operation::Generate, br#"{"message":503}"#),
            "503"
        );
    }

    #[test]
    fn rejection_falls_back_on_unusable_payloads() {
        for body in [
            &b""[..],
            b"<html>oops</html>",
            br#"{}"#,
            br#"{"message":null}"#,
            br#"{"message":"   "}"#,
            br#"{"message":{"nested":"x"}}"#,
            br#"["message"]"#,
        ] {
            assert_eq!(
                rejection_message(Operation::Extract, body),
                "Failed to upload PDF and extract topics."
            );
        }
        assert_eq!(
            rejection_message(Operation::Generate, b"nope"),
            "Failed to generate presentation content."
        );
    }

    #[test]
    fn extraction_tolerates_nulls_and_missing_fields() {
        let extraction: Extraction = serde_json::from_str(
            r#"{"topics":[{"id":"t1","title":"Intro","description":"d"}],
                "extractedImages":null,"rawTextContent":null}"#,
        )
        .unwrap();
        assert_eq!(extraction.topics.len(), 1);
        assert!(extraction.extracted_images.is_empty());
        assert_eq!(extraction.raw_text_content, "");
        assert_eq!(extraction.upload_id, None);
    }

    #[test]
    fn generation_request_uses_wire_names() {
        let request = GenerationRequest {
            topics: vec![Topic {
                id: "t1".into(),
                title: "Intro".into(),
                description: "d".into(),
            }],
            raw_text_content: "raw".into(),
            extracted_images: vec![ExtractedImage {
                id: "i1".into(),
                filename: "a.png".into(),
                relative_path: "/images/u1/a.png".into(),
                description: "chart".into(),
            }],
            upload_id: Some("u1".into()),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["rawTextContent"], "raw");
        assert_eq!(value["uploadId"], "u1");
        assert_eq!(value["extractedImages"][0]["relativePath"], "/images/u1/a.png");
        assert_eq!(value["topics"][0]["title"], "Intro");
    }

    #[test]
    fn endpoints_join_base_url() {
        let gateway = HttpGateway::with_client(reqwest::Client::new(), "http://host:3001/");
        assert_eq!(gateway.endpoint(Operation::Extract), "http://host:3001/upload-pdf");
        assert_eq!(
            gateway.endpoint(Operation::Generate),
            "http://host:3001/generate-content"
        );
    }

    #[test]
    fn image_path_is_resolved_on_demand() {
        let image = ExtractedImage {
            relative_path: "images/u1/a.png".into(),
            ..Default::default()
        };
        assert_eq!(image.resolved_url("http://host/"), "http://host/images/u1/a.png");
        assert_eq!(image.relative_path, "images/u1/a.png");
    }
}
