use std::path::PathBuf;

use pdfdeck_core::{Completion, Document};

/// Events flowing from backend tasks to the TUI.
///
/// File reads carry the `seq` of the request that started them so the app can
/// ignore a read the user has since replaced.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    /// A chosen file was read from disk.
    DocumentLoaded { seq: u64, document: Document },
    /// A chosen file could not be read.
    DocumentUnreadable {
        seq: u64,
        path: PathBuf,
        error: String,
    },
    /// A remote command finished (successfully or not).
    Completed(Completion),
}
