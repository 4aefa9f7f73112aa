//! Asynchronous import of markdown files
//!
//! Reads run on a small tokio runtime. Each read resolves to an
//! [`UploadResult`] that the UI thread collects with [`Uploader::drain`] and
//! turns into a new document. Reads finish independently, so documents from a
//! multi-file upload land in completion order rather than selection order.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Extensions accepted by the importer
pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

const MARKDOWN_MIME_TYPES: &[&str] = &["text/markdown", "text/x-markdown"];

/// Errors raised while reading an uploaded file
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to start upload runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

pub type UploadResult = Result<UploadedFile, UploadError>;

/// Content of a file that finished reading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Name to create the document under
    pub name: String,
    pub content: String,
}

/// Where an uploaded file's bytes come from
#[derive(Debug, Clone)]
pub enum UploadSource {
    /// A file on disk, read asynchronously
    Path(PathBuf),
    /// Bytes already held in memory (e.g. delivered with a drop event)
    Bytes { name: String, bytes: Arc<[u8]> },
}

impl UploadSource {
    /// Display name of the file
    pub fn name(&self) -> String {
        match self {
            Self::Path(path) => file_name(path),
            Self::Bytes { name, .. } => name.clone(),
        }
    }

    async fn read(self) -> UploadResult {
        match self {
            Self::Path(path) => {
                let bytes = tokio::fs::read(&path)
                    .await
                    .map_err(|source| UploadError::Read {
                        path: path.clone(),
                        source,
                    })?;
                Ok(UploadedFile {
                    name: document_name(&file_name(&path)),
                    content: String::from_utf8_lossy(&bytes).into_owned(),
                })
            }
            Self::Bytes { name, bytes } => Ok(UploadedFile {
                name: document_name(&name),
                content: String::from_utf8_lossy(&bytes).into_owned(),
            }),
        }
    }
}

/// Whether a file should be imported, judged by its name or declared type
pub fn is_markdown_candidate(name: &str, mime: Option<&str>) -> bool {
    let by_extension = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            MARKDOWN_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false);

    let by_mime = mime
        .map(|mime| {
            let essence = mime.split(';').next().unwrap_or_default().trim();
            MARKDOWN_MIME_TYPES
                .iter()
                .any(|known| essence.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false);

    by_extension || by_mime
}

/// Map an uploaded file name onto a document name
///
/// Any accepted markdown extension, in any case, becomes `.md`.
fn document_name(name: &str) -> String {
    let path = Path::new(name);
    let is_markdown = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            MARKDOWN_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false);

    match path.file_stem().and_then(|stem| stem.to_str()) {
        Some(stem) if is_markdown => format!("{}.md", stem),
        _ => name.to_string(),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Runs file reads in the background and hands results back to the UI thread
pub struct Uploader {
    runtime: Runtime,
    tx: UnboundedSender<UploadResult>,
    rx: UnboundedReceiver<UploadResult>,
    pending: usize,
    waker: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl Uploader {
    pub fn new() -> Result<Self, UploadError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("upload-reader")
            .enable_all()
            .build()
            .map_err(UploadError::Runtime)?;
        let (tx, rx) = mpsc::unbounded_channel();

        Ok(Self {
            runtime,
            tx,
            rx,
            pending: 0,
            waker: None,
        })
    }

    /// Call `waker` whenever a read completes (used to request a repaint)
    pub fn with_waker(mut self, waker: impl Fn() + Send + Sync + 'static) -> Self {
        self.waker = Some(Arc::new(waker));
        self
    }

    /// Start reading `source` if it looks like markdown
    ///
    /// Returns `false` when the file was filtered out; such files are
    /// silently ignored.
    pub fn submit(&mut self, source: UploadSource, mime: Option<&str>) -> bool {
        let name = source.name();
        if !is_markdown_candidate(&name, mime) {
            tracing::debug!("Skipping non-markdown upload: {}", name);
            return false;
        }

        tracing::info!("Reading upload: {}", name);
        let tx = self.tx.clone();
        let waker = self.waker.clone();
        self.pending += 1;
        self.runtime.spawn(async move {
            let result = source.read().await;
            // The receiver only goes away with the uploader itself
            let _ = tx.send(result);
            if let Some(waker) = waker {
                waker();
            }
        });
        true
    }

    /// Collect every read that has completed since the last call
    pub fn drain(&mut self) -> Vec<UploadResult> {
        let mut completed = Vec::new();
        while let Ok(result) = self.rx.try_recv() {
            self.pending = self.pending.saturating_sub(1);
            completed.push(result);
        }
        completed
    }

    /// Number of reads still in flight
    pub fn pending(&self) -> usize {
        self.pending
    }
}
