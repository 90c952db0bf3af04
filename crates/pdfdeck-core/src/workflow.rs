//! The upload → outline → generate → present state machine.
//!
//! [`Workflow`] owns the whole [`WorkflowState`] and is the only place that
//! mutates it. Remote work is not performed inline: events that need the
//! service return a [`Command`] tagged with a fresh epoch; the driver runs it
//! with [`Command::run`] and hands the resulting [`Completion`] back to
//! [`Workflow::apply`]. A completion whose epoch is no longer current is
//! discarded, so a response that arrives after a restart never touches the
//! new state.

use std::fmt;

use crate::deck::Deck;
use crate::error::{GatewayError, WorkflowError};
use crate::gateway::{Document, ExtractedImage, Extraction, GenerationRequest, Operation, RemoteGateway};
use crate::outline::{Outline, Topic};
use crate::slide::Slide;

/// Monotonic tag of a remote request.
pub type Epoch = u64;

/// Where the workflow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Idle,
    Uploading,
    UploadFailed,
    OutlineReady,
    Generating,
    GenerateFailed,
    Presenting,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Uploading => "uploading",
            Self::UploadFailed => "upload failed",
            Self::OutlineReady => "outline ready",
            Self::Generating => "generating",
            Self::GenerateFailed => "generation failed",
            Self::Presenting => "presenting",
        }
    }

    /// A request is in flight.
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Uploading | Self::Generating)
    }

    /// Outline edits are accepted.
    pub fn accepts_edits(self) -> bool {
        matches!(
            self,
            Self::OutlineReady | Self::GenerateFailed | Self::Presenting
        )
    }

    /// The outline exists and may be shown.
    pub fn has_outline(self) -> bool {
        matches!(
            self,
            Self::OutlineReady | Self::Generating | Self::GenerateFailed | Self::Presenting
        )
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Remote work requested by the controller.
#[derive(Debug, Clone)]
pub enum Command {
    Extract {
        epoch: Epoch,
        document: Document,
    },
    Generate {
        epoch: Epoch,
        request: GenerationRequest,
    },
}

impl Command {
    pub fn epoch(&self) -> Epoch {
        match self {
            Self::Extract { epoch, .. } | Self::Generate { epoch, .. } => *epoch,
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            Self::Extract { .. } => Operation::Extract,
            Self::Generate { .. } => Operation::Generate,
        }
    }

    /// Perform the request once. Never fails: the outcome is inside the completion.
    pub async fn run(self, gateway: &dyn RemoteGateway) -> Completion {
        match self {
            Self::Extract { epoch, document } => Completion::Extracted {
                epoch,
                result: gateway.extract_topics(&document).await,
            },
            Self::Generate { epoch, request } => Completion::Generated {
                epoch,
                result: gateway.generate_slides(&request).await,
            },
        }
    }
}

/// Outcome of a [`Command`], fed back through [`Workflow::apply`].
#[derive(Debug, Clone)]
pub enum Completion {
    Extracted {
        epoch: Epoch,
        result: Result<Extraction, GatewayError>,
    },
    Generated {
        epoch: Epoch,
        result: Result<Vec<Slide>, GatewayError>,
    },
}

impl Completion {
    pub fn epoch(&self) -> Epoch {
        match self {
            Self::Extracted { epoch, .. } | Self::Generated { epoch, .. } => *epoch,
        }
    }
}

/// What [`Workflow::apply`] did with a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The completion was current and moved the workflow to this stage.
    Transitioned(Stage),
    /// The completion belonged to an abandoned request and was dropped.
    Stale,
}

/// Everything the front-end renders from. Read-only outside this module.
#[derive(Debug, Clone, Default)]
pub struct WorkflowState {
    stage: Stage,
    document: Option<Document>,
    outline: Outline,
    images: Vec<ExtractedImage>,
    raw_text: String,
    upload_id: Option<String>,
    deck: Deck,
    upload_error: Option<String>,
    generate_error: Option<String>,
    epoch: Epoch,
}

impl WorkflowState {
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn document_name(&self) -> Option<&str> {
        self.document.as_ref().map(|d| d.file_name.as_str())
    }

    pub fn topics(&self) -> &[Topic] {
        self.outline.topics()
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    pub fn images(&self) -> &[ExtractedImage] {
        &self.images
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn upload_id(&self) -> Option<&str> {
        self.upload_id.as_deref()
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn upload_error(&self) -> Option<&str> {
        self.upload_error.as_deref()
    }

    pub fn generate_error(&self) -> Option<&str> {
        self.generate_error.as_deref()
    }

    /// Error belonging to the stage currently shown, if any.
    pub fn current_error(&self) -> Option<&str> {
        match self.stage {
            Stage::UploadFailed => self.upload_error(),
            Stage::GenerateFailed => self.generate_error(),
            _ => None,
        }
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn is_busy(&self) -> bool {
        self.stage.is_busy()
    }

    pub fn can_generate(&self) -> bool {
        self.stage.accepts_edits() && !self.outline.is_empty()
    }
}

/// The controller. See the module docs for the command/completion cycle.
#[derive(Debug, Default)]
pub struct Workflow {
    state: WorkflowState,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    /// Start over with a new document.
    ///
    /// Accepted in every stage: all per-document state is reset and any
    /// request still in flight becomes stale.
    pub fn select_file(&mut self, document: Document) -> Command {
        let epoch = self.next_epoch();
        let state = &mut self.state;
        state.outline.clear();
        state.images.clear();
        state.raw_text.clear();
        state.upload_id = None;
        state.deck.reset();
        state.upload_error = None;
        state.generate_error = None;
        state.document = Some(document.clone());
        state.stage = Stage::Uploading;

        log::info!(
            "epoch {epoch}: extracting {} ({} bytes)",
            document.file_name,
            document.len()
        );
        Command::Extract { epoch, document }
    }

    /// Ask for slides from the current outline.
    pub fn generate(&mut self) -> Result<Command, WorkflowError> {
        match self.state.stage {
            Stage::Uploading | Stage::Generating => {
                log::debug!("generate ignored while {}", self.state.stage);
                return Err(WorkflowError::Busy {
                    stage: self.state.stage,
                });
            }
            Stage::Idle | Stage::UploadFailed => {
                return Err(WorkflowError::NotReady {
                    stage: self.state.stage,
                });
            }
            Stage::OutlineReady | Stage::GenerateFailed | Stage::Presenting => {}
        }
        if self.state.outline.is_empty() {
            return Err(WorkflowError::EmptyOutline);
        }

        let epoch = self.next_epoch();
        let state = &mut self.state;
        let request = GenerationRequest {
            topics: state.outline.snapshot(),
            raw_text_content: state.raw_text.clone(),
            extracted_images: state.images.clone(),
            upload_id: state.upload_id.clone(),
        };
        state.generate_error = None;
        state.deck.reset();
        state.stage = Stage::Generating;

        log::info!(
            "epoch {epoch}: generating slides for {} topics",
            request.topics.len()
        );
        Ok(Command::Generate { epoch, request })
    }

    pub fn add_topic(&mut self, title: &str, description: &str) -> Result<Topic, WorkflowError> {
        self.ensure_editable()?;
        let topic = self.state.outline.add(title, description)?;
        log::debug!("added topic {}", topic.id);
        self.after_edit();
        Ok(topic)
    }

    pub fn update_topic(
        &mut self,
        id: &str,
        title: &str,
        description: &str,
    ) -> Result<Topic, WorkflowError> {
        self.ensure_editable()?;
        let topic = self.state.outline.update(id, title, description)?;
        log::debug!("updated topic {}", topic.id);
        self.after_edit();
        Ok(topic)
    }

    /// Remove a topic; removing an unknown id changes nothing.
    pub fn remove_topic(&mut self, id: &str) -> Result<Option<Topic>, WorkflowError> {
        self.ensure_editable()?;
        let removed = self.state.outline.remove(id);
        if removed.is_some() {
            log::debug!("removed topic {id}");
            self.after_edit();
        }
        Ok(removed)
    }

    /// Apply the outcome of a command.
    pub fn apply(&mut self, completion: Completion) -> Applied {
        let epoch = completion.epoch();
        if epoch != self.state.epoch {
            log::debug!(
                "discarding stale completion (epoch {epoch}, current {})",
                self.state.epoch
            );
            return Applied::Stale;
        }

        let state = &mut self.state;
        match completion {
            Completion::Extracted { result, .. } => {
                if state.stage != Stage::Uploading {
                    log::warn!("extraction result arrived while {}; dropped", state.stage);
                    return Applied::Stale;
                }
                match result {
                    Ok(extraction) => {
                        state.outline.replace_all(extraction.topics);
                        state.images = extraction.extracted_images;
                        state.raw_text = extraction.raw_text_content;
                        state.upload_id = extraction.upload_id;
                        state.upload_error = None;
                        state.stage = Stage::OutlineReady;
                        log::info!(
                            "epoch {epoch}: outline ready with {} topics",
                            state.outline.len()
                        );
                    }
                    Err(err) => {
                        log::warn!("epoch {epoch}: extraction failed: {err}");
                        state.outline.clear();
                        state.upload_error = Some(err.message().to_string());
                        state.stage = Stage::UploadFailed;
                    }
                }
            }
            Completion::Generated { result, .. } => {
                if state.stage != Stage::Generating {
                    log::warn!("generation result arrived while {}; dropped", state.stage);
                    return Applied::Stale;
                }
                match result {
                    Ok(slides) => {
                        state.deck = Deck::new(slides);
                        state.generate_error = None;
                        state.stage = Stage::Presenting;
                        log::info!("epoch {epoch}: presenting {} slides", state.deck.len());
                    }
                    Err(err) => {
                        log::warn!("epoch {epoch}: generation failed: {err}");
                        state.generate_error = Some(err.message().to_string());
                        state.stage = Stage::GenerateFailed;
                    }
                }
            }
        }
        Applied::Transitioned(self.state.stage)
    }

    pub fn next_slide(&mut self) {
        self.state.deck.next();
    }

    pub fn prev_slide(&mut self) {
        self.state.deck.prev();
    }

    pub fn first_slide(&mut self) {
        self.state.deck.first();
    }

    pub fn last_slide(&mut self) {
        self.state.deck.last();
    }

    fn next_epoch(&mut self) -> Epoch {
        self.state.epoch += 1;
        self.state.epoch
    }

    fn ensure_editable(&self) -> Result<(), WorkflowError> {
        let stage = self.state.stage;
        if stage.accepts_edits() {
            Ok(())
        } else if stage.is_busy() {
            Err(WorkflowError::Busy { stage })
        } else {
            Err(WorkflowError::NotEditable { stage })
        }
    }

    /// A successful edit after a failed generation returns to the outline.
    fn after_edit(&mut self) {
        if self.state.stage == Stage::GenerateFailed {
            self.state.stage = Stage::OutlineReady;
            self.state.generate_error = None;
        }
    }
}
