use std::{collections::HashSet, fmt};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{FlowError, FlowErrorLocation, Result};

/// A crew graph snapshot exactly as the editor saves it: `{ nodes, edges }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub position: Position,
    #[serde(flatten)]
    pub kind: NodeKind,
    /// Editor-owned attributes (selection state, sizes) carried through untouched.
    #[serde(flatten, default)]
    pub extra: IndexMap<String, Value>,
}

/// Kind tag plus the kind-specific property record, stored as `type` / `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum NodeKind {
    Agent(AgentProps),
    Task(TaskProps),
    Tool(ToolProps),
    Flow(FlowProps),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentProps {
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub goals: Option<String>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub backstory: Option<String>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub llm_model: Option<String>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub custom_model: Option<String>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub allow_delegation: Option<String>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    #[serde(flatten, default)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskProps {
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<String>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub execution_order: Option<String>,
    #[serde(flatten, default)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolProps {
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub tool_type: Option<String>,
    /// Raw JSON text as typed in the editor; parsed lazily so bad input stays reportable.
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub configuration: Option<String>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "flag", skip_serializing_if = "Option::is_none")]
    pub return_direct: Option<bool>,
    #[serde(flatten, default)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowProps {
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub flow_type: Option<String>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(
        rename = "managerLLM",
        default,
        deserialize_with = "text",
        skip_serializing_if = "Option::is_none"
    )]
    pub manager_llm: Option<String>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub custom_manager_model: Option<String>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub manager_api_key: Option<String>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<String>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
    #[serde(flatten, default)]
    pub extra: IndexMap<String, Value>,
}

impl FlowProps {
    pub fn is_conditional(&self) -> bool {
        filled(&self.flow_type) == Some("conditional")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    /// Handles, edge styling and anything else the editor attaches.
    #[serde(flatten, default)]
    pub extra: IndexMap<String, Value>,
}

impl Edge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Edge {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            extra: IndexMap::new(),
        }
    }
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Node {
            id: id.into(),
            position: Position::default(),
            kind,
            extra: IndexMap::new(),
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position { x, y };
        self
    }

    /// Display label, falling back to the node id when none was entered.
    pub fn label(&self) -> &str {
        let label = match &self.kind {
            NodeKind::Agent(props) => &props.label,
            NodeKind::Task(props) => &props.label,
            NodeKind::Tool(props) => &props.label,
            NodeKind::Flow(props) => &props.label,
        };
        filled(label).unwrap_or(&self.id)
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn as_agent(&self) -> Option<&AgentProps> {
        match &self.kind {
            NodeKind::Agent(props) => Some(props),
            _ => None,
        }
    }

    pub fn as_task(&self) -> Option<&TaskProps> {
        match &self.kind {
            NodeKind::Task(props) => Some(props),
            _ => None,
        }
    }

    pub fn as_tool(&self) -> Option<&ToolProps> {
        match &self.kind {
            NodeKind::Tool(props) => Some(props),
            _ => None,
        }
    }

    pub fn as_flow(&self) -> Option<&FlowProps> {
        match &self.kind {
            NodeKind::Flow(props) => Some(props),
            _ => None,
        }
    }
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Agent(_) => "agent",
            NodeKind::Task(_) => "task",
            NodeKind::Tool(_) => "tool",
            NodeKind::Flow(_) => "flow",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Graph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Graph { nodes, edges }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Fail fast on snapshots the editor should never produce: duplicate ids or
    /// edges whose endpoints do not resolve.
    pub fn check_integrity(&self) -> Result<()> {
        let mut node_ids = HashSet::with_capacity(self.nodes.len());
        for (idx, node) in self.nodes.iter().enumerate() {
            if !node_ids.insert(node.id.as_str()) {
                return Err(FlowError::DuplicateNode {
                    node_id: node.id.clone(),
                    location: FlowErrorLocation::at_path(format!("nodes[{idx}].id")),
                });
            }
        }

        let mut edge_ids = HashSet::with_capacity(self.edges.len());
        for (idx, edge) in self.edges.iter().enumerate() {
            if !edge_ids.insert(edge.id.as_str()) {
                return Err(FlowError::DuplicateEdge {
                    edge_id: edge.id.clone(),
                    location: FlowErrorLocation::at_path(format!("edges[{idx}].id")),
                });
            }
            for (field, endpoint) in [("source", &edge.source), ("target", &edge.target)] {
                if !node_ids.contains(endpoint.as_str()) {
                    return Err(FlowError::DanglingEdge {
                        edge_id: edge.id.clone(),
                        node_id: endpoint.clone(),
                        location: FlowErrorLocation::at_path(format!("edges[{idx}].{field}")),
                    });
                }
            }
        }
        Ok(())
    }
}

/// The value of a text property, treating an empty string as absent.
pub fn filled(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string, number or boolean, found {other}"
        ))),
    }
}

fn flag<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(b)),
        Some(Value::String(s)) => match s.as_str() {
            "true" => Ok(Some(true)),
            "false" | "" => Ok(Some(false)),
            other => Err(serde::de::Error::custom(format!(
                "expected a boolean, found '{other}'"
            ))),
        },
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a boolean, found {other}"
        ))),
    }
}
