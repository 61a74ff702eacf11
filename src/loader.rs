use std::{fs, path::Path};

use crate::{
    error::{FlowError, FlowErrorLocation, Result},
    model::Graph,
};

const INLINE_SOURCE: &str = "<inline>";

/// File name the editor uses when saving a flow.
pub const FLOW_FILE_NAME: &str = "crew-flow.json";

/// Load a saved flow from JSON text and check its integrity.
pub fn load_graph_from_str(json: &str) -> Result<Graph> {
    load_with_source(json, INLINE_SOURCE, None)
}

/// Load a saved flow from a file on disk and check its integrity.
pub fn load_graph_from_path(path: &Path) -> Result<Graph> {
    let content = fs::read_to_string(path).map_err(|e| FlowError::Internal {
        message: format!("failed to read {}: {e}", path.display()),
        location: FlowErrorLocation::at_path(path.display().to_string())
            .with_source_path(Some(path)),
    })?;
    load_with_source(&content, path.display().to_string(), Some(path))
}

pub(crate) fn load_with_source(
    json: &str,
    source_label: impl Into<String>,
    source_path: Option<&Path>,
) -> Result<Graph> {
    let source_label = source_label.into();
    let graph: Graph = serde_json::from_str(json).map_err(|e| FlowError::Json {
        message: e.to_string(),
        location: FlowErrorLocation::at_path_with_position(
            source_label.clone(),
            Some(e.line()),
            Some(e.column()),
        )
        .with_source_path(source_path),
    })?;
    graph.check_integrity().map_err(|err| relabel(err, &source_label, source_path))?;
    tracing::debug!(
        source = %source_label,
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "loaded flow"
    );
    Ok(graph)
}

/// Serialize a graph in the editor's save format: the bare `{ nodes, edges }`
/// object, pretty-printed with two-space indentation.
pub fn save_graph_to_string(graph: &Graph) -> Result<String> {
    serde_json::to_string_pretty(graph).map_err(|e| FlowError::Internal {
        message: format!("serialize flow: {e}"),
        location: FlowErrorLocation::at_path(FLOW_FILE_NAME),
    })
}

pub fn save_graph_to_path(graph: &Graph, path: &Path) -> Result<()> {
    let text = save_graph_to_string(graph)?;
    fs::write(path, text).map_err(|e| FlowError::Internal {
        message: format!("failed to write {}: {e}", path.display()),
        location: FlowErrorLocation::at_path(path.display().to_string())
            .with_source_path(Some(path)),
    })
}

/// Prefix integrity locations (`edges[2].target`) with the source they came from.
fn relabel(err: FlowError, source_label: &str, source_path: Option<&Path>) -> FlowError {
    let qualify = |location: FlowErrorLocation| {
        let path = location
            .path
            .map(|p| format!("{source_label}::{p}"))
            .unwrap_or_else(|| source_label.to_string());
        FlowErrorLocation::at_path(path).with_source_path(source_path)
    };
    match err {
        FlowError::DuplicateNode { node_id, location } => FlowError::DuplicateNode {
            node_id,
            location: qualify(location),
        },
        FlowError::DuplicateEdge { edge_id, location } => FlowError::DuplicateEdge {
            edge_id,
            location: qualify(location),
        },
        FlowError::DanglingEdge {
            edge_id,
            node_id,
            location,
        } => FlowError::DanglingEdge {
            edge_id,
            node_id,
            location: qualify(location),
        },
        other => other,
    }
}
