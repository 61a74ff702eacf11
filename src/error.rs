use std::path::{Path, PathBuf};

use thiserror::Error;

/// Where in a saved flow an error was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowErrorLocation {
    pub path: Option<String>,
    pub source_path: Option<PathBuf>,
    pub line: Option<usize>,
    pub col: Option<usize>,
}

impl FlowErrorLocation {
    pub fn at_path(path: impl Into<String>) -> Self {
        FlowErrorLocation {
            path: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn at_path_with_position(
        path: impl Into<String>,
        line: Option<usize>,
        col: Option<usize>,
    ) -> Self {
        FlowErrorLocation {
            path: Some(path.into()),
            line,
            col,
            ..Default::default()
        }
    }

    pub fn with_source_path(mut self, source_path: Option<&Path>) -> Self {
        self.source_path = source_path.map(Path::to_path_buf);
        self
    }

    /// Human readable `path:line:col`, or `None` when nothing is known.
    pub fn describe(&self) -> Option<String> {
        let base = self
            .source_path
            .as_ref()
            .map(|p| p.display().to_string())
            .or_else(|| self.path.clone())?;
        match (self.line, self.col) {
            (Some(line), Some(col)) => Some(format!("{base}:{line}:{col}")),
            (Some(line), None) => Some(format!("{base}:{line}")),
            _ => Some(base),
        }
    }
}

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("JSON parse error{}: {message}", at(.location))]
    Json {
        message: String,
        location: FlowErrorLocation,
    },
    #[error("Duplicate node id '{node_id}'{}", at(.location))]
    DuplicateNode {
        node_id: String,
        location: FlowErrorLocation,
    },
    #[error("Duplicate edge id '{edge_id}'{}", at(.location))]
    DuplicateEdge {
        edge_id: String,
        location: FlowErrorLocation,
    },
    #[error("Edge '{edge_id}' references missing node '{node_id}'{}", at(.location))]
    DanglingEdge {
        edge_id: String,
        node_id: String,
        location: FlowErrorLocation,
    },
    #[error("Template error: {message}")]
    Template {
        message: String,
        location: FlowErrorLocation,
    },
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        location: FlowErrorLocation,
    },
}

impl FlowError {
    pub fn location(&self) -> &FlowErrorLocation {
        match self {
            FlowError::Json { location, .. }
            | FlowError::DuplicateNode { location, .. }
            | FlowError::DuplicateEdge { location, .. }
            | FlowError::DanglingEdge { location, .. }
            | FlowError::Template { location, .. }
            | FlowError::Internal { location, .. } => location,
        }
    }
}

fn at(location: &FlowErrorLocation) -> String {
    location
        .describe()
        .map(|where_str| format!(" at {where_str}"))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, FlowError>;
