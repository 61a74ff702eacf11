mod cycles;
mod isolation;
mod required_fields;

use serde::{Deserialize, Serialize};

use crate::{index::GraphIndex, model::Graph};

pub use cycles::CycleRule;
pub use isolation::IsolationRule;
pub use required_fields::RequiredFieldsRule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One validation finding. Findings are values, never errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    pub code: String,
    pub message: String,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn error(node_id: &str, code: &str, message: impl Into<String>) -> Self {
        Diagnostic {
            node_id: Some(node_id.to_string()),
            code: code.to_string(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn warning(node_id: &str, code: &str, message: impl Into<String>) -> Self {
        Diagnostic {
            node_id: Some(node_id.to_string()),
            code: code.to_string(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Run every rule over a graph snapshot. Total: malformed input still yields a list.
pub fn validate(graph: &Graph) -> Vec<Diagnostic> {
    let index = GraphIndex::new(graph);
    let mut diags = IsolationRule::check(&index);
    diags.extend(RequiredFieldsRule::check(&index));
    diags.extend(CycleRule::check(&index));
    tracing::debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        findings = diags.len(),
        "validated graph"
    );
    diags
}

pub fn has_errors(diags: &[Diagnostic]) -> bool {
    diags.iter().any(Diagnostic::is_error)
}
