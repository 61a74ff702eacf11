use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    index::GraphIndex,
    model::{Graph, Node, NodeKind, filled},
};

/// Delay modelled per evaluated node unless configured otherwise.
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Error,
    Warning,
}

/// One simulated readiness outcome for a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    /// Empty when the record is about the graph as a whole.
    pub node_id: String,
    pub status: RunStatus,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    /// Ids of evaluated nodes, in evaluation order.
    pub completed_nodes: Vec<String>,
    pub records: Vec<ExecutionRecord>,
    pub is_complete: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub success: usize,
    pub warning: usize,
    pub error: usize,
}

impl SimulationReport {
    pub fn counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for record in &self.records {
            match record.status {
                RunStatus::Success => counts.success += 1,
                RunStatus::Warning => counts.warning += 1,
                RunStatus::Error => counts.error += 1,
            }
        }
        counts
    }

    pub fn has_errors(&self) -> bool {
        self.records.iter().any(|r| r.status == RunStatus::Error)
    }

    pub fn record_for(&self, node_id: &str) -> Option<&ExecutionRecord> {
        self.records.iter().find(|r| r.node_id == node_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatorOptions {
    pub step_delay: Duration,
}

impl Default for SimulatorOptions {
    fn default() -> Self {
        SimulatorOptions {
            step_delay: DEFAULT_STEP_DELAY,
        }
    }
}

/// Walks a crew graph from its source nodes and checks each reached node
/// for readiness, without invoking any model or tool.
///
/// Nodes are evaluated strictly one at a time: every source node first, in
/// node-array order, then a depth-first walk from each source following
/// outgoing edges in edge-array order. A node is evaluated the first time it
/// is reached. Nodes not reachable from a source are never evaluated.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    options: SimulatorOptions,
}

impl Simulator {
    pub fn new(options: SimulatorOptions) -> Self {
        Simulator { options }
    }

    pub fn with_step_delay(step_delay: Duration) -> Self {
        Simulator::new(SimulatorOptions { step_delay })
    }

    pub async fn run(&self, graph: &Graph) -> SimulationReport {
        let index = GraphIndex::new(graph);
        let sources = index.sources();
        if sources.is_empty() {
            info!(nodes = graph.nodes.len(), "no source nodes, nothing to simulate");
            return SimulationReport {
                completed_nodes: Vec::new(),
                records: vec![ExecutionRecord {
                    node_id: String::new(),
                    status: RunStatus::Error,
                    message: "No starting nodes found in the flow".to_string(),
                    timestamp: Utc::now(),
                }],
                is_complete: true,
            };
        }

        let mut evaluated = vec![false; index.len()];
        let mut expanded = vec![false; index.len()];
        let mut completed_nodes = Vec::new();
        let mut records = Vec::new();

        for &source in &sources {
            evaluated[source] = true;
            let record = self.evaluate(&index, source).await;
            completed_nodes.push(record.node_id.clone());
            records.push(record);
        }

        for &source in &sources {
            if expanded[source] {
                continue;
            }
            expanded[source] = true;
            // (node, next outgoing link to follow)
            let mut stack = vec![(source, 0usize)];
            while let Some(frame) = stack.last_mut() {
                let (node, cursor) = *frame;
                let Some(link) = index.outgoing(node).get(cursor) else {
                    stack.pop();
                    continue;
                };
                frame.1 += 1;
                let next = link.node;
                if !evaluated[next] {
                    evaluated[next] = true;
                    let record = self.evaluate(&index, next).await;
                    completed_nodes.push(record.node_id.clone());
                    records.push(record);
                }
                if !expanded[next] {
                    expanded[next] = true;
                    stack.push((next, 0));
                }
            }
        }

        let report = SimulationReport {
            completed_nodes,
            records,
            is_complete: true,
        };
        let counts = report.counts();
        info!(
            evaluated = report.completed_nodes.len(),
            success = counts.success,
            warning = counts.warning,
            error = counts.error,
            "simulation finished"
        );
        report
    }

    async fn evaluate(&self, index: &GraphIndex<'_>, idx: usize) -> ExecutionRecord {
        let node = index.node(idx);
        debug!(node = %node.id, kind = node.kind_name(), "evaluating node");
        tokio::time::sleep(self.options.step_delay).await;
        let (status, message) = assess(node, index.has_incoming(idx));
        debug!(node = %node.id, ?status, %message, "node evaluated");
        ExecutionRecord {
            node_id: node.id.clone(),
            status,
            message,
            timestamp: Utc::now(),
        }
    }
}

/// Simulate with default options.
pub async fn simulate(graph: &Graph) -> SimulationReport {
    Simulator::default().run(graph).await
}

fn assess(node: &Node, has_incoming: bool) -> (RunStatus, String) {
    let label = node.label();
    match &node.kind {
        NodeKind::Agent(props) => {
            if filled(&props.role).is_none() || filled(&props.goals).is_none() {
                (RunStatus::Error, "Agent requires role and goals".to_string())
            } else {
                (
                    RunStatus::Success,
                    format!("Agent '{label}' initialized successfully"),
                )
            }
        }
        NodeKind::Task(props) => {
            if filled(&props.description).is_none() {
                (RunStatus::Error, "Task requires a description".to_string())
            } else if !has_incoming {
                (RunStatus::Warning, "Task has no assigned agent".to_string())
            } else {
                (
                    RunStatus::Success,
                    format!("Task '{label}' validated successfully"),
                )
            }
        }
        NodeKind::Tool(props) => {
            if filled(&props.tool_type).is_none() {
                return (RunStatus::Error, "Tool requires a type".to_string());
            }
            if let Some(config) = filled(&props.configuration)
                && serde_json::from_str::<serde_json::Value>(config).is_err()
            {
                return (
                    RunStatus::Error,
                    "Invalid tool configuration JSON".to_string(),
                );
            }
            (
                RunStatus::Success,
                format!("Tool '{label}' configured successfully"),
            )
        }
        NodeKind::Flow(props) => {
            if props.is_conditional() && filled(&props.condition).is_none() {
                (
                    RunStatus::Warning,
                    "Conditional flow missing condition".to_string(),
                )
            } else {
                (
                    RunStatus::Success,
                    format!("Flow '{label}' validated successfully"),
                )
            }
        }
    }
}
