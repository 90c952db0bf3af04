//! Turn a PDF into a navigable slide deck.
//!
//! The [`Workflow`] controller sequences upload, outline curation, generation
//! and presentation. It talks to the remote service only through
//! [`RemoteGateway`] and exposes everything a front-end renders through
//! [`WorkflowState`].

pub mod config;
pub mod deck;
pub mod error;
pub mod gateway;
pub mod outline;
pub mod slide;
pub mod workflow;

pub use config::{Config, Layer};
pub use deck::Deck;
pub use error::{ConfigError, GatewayError, OutlineError, WorkflowError};
pub use gateway::{
    Document, ExtractedImage, Extraction, GenerationRequest, HttpGateway, Operation,
    RemoteGateway,
};
pub use outline::{Outline, Topic};
pub use slide::{Slide, SlideBody, SlideKind, resolve_asset_url};
pub use workflow::{Applied, Command, Completion, Epoch, Stage, Workflow, WorkflowState};
