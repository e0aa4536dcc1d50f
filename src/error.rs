use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while turning a dataset selector into a graph.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A required local file does not exist.
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The HTTP request failed or its body could not be read.
    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// The downloaded bytes are not a readable zip archive.
    #[error("invalid archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// The archive does not contain the expected entry.
    #[error("archive has no entry named {0:?}")]
    MissingEntry(String),

    /// Archive entry is not valid UTF-8.
    #[error("archive entry {0:?} is not valid UTF-8")]
    Encoding(String),

    #[error(transparent)]
    Gml(#[from] GmlError),

    #[error(transparent)]
    EdgeList(#[from] EdgeListError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Malformed graph markup.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("GML line {line}: {message}")]
pub struct GmlError {
    pub line: usize,
    pub message: String,
}

impl GmlError {
    pub(crate) fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Malformed edge-list content.
#[derive(Debug, Error)]
pub enum EdgeListError {
    #[error("edge list line {line}: expected `source target`, found {found:?}")]
    MissingTarget { line: u64, found: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors raised by community detection and scoring.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommunityError {
    /// The graph has no nodes.
    #[error("graph is empty")]
    EmptyGraph,

    /// Communities overlap or do not cover every node.
    #[error("not a partition: {0}")]
    NotAPartition(String),

    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        name: &'static str,
        message: &'static str,
    },
}

/// Errors that end an interactive session early.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Community(#[from] CommunityError),
}
