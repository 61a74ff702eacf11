use serde::Serialize;

use crate::model::{AgentProps, FlowProps, Node, NodeKind, Position, TaskProps, ToolProps};

/// A ready-made node the editor offers from its template picker.
#[derive(Debug, Clone, Serialize)]
pub struct Preset {
    pub name: &'static str,
    pub kind: NodeKind,
}

impl Preset {
    /// Build a node from this preset. The caller owns id allocation.
    pub fn instantiate(&self, id: impl Into<String>, position: Position) -> Node {
        let mut node = Node::new(id, self.kind.clone());
        node.position = position;
        node
    }
}

fn s(value: &str) -> Option<String> {
    Some(value.to_string())
}

pub fn presets() -> Vec<Preset> {
    vec![
        Preset {
            name: "Research Agent",
            kind: NodeKind::Agent(AgentProps {
                label: s("Research Agent"),
                role: s("Researcher"),
                goals: s("Gather and analyze information\nProvide detailed reports"),
                backstory: s("Expert in data analysis and research methodologies"),
                allow_delegation: s("true"),
                memory: s("1000"),
                llm_model: s("gpt-4-0125-preview"),
                ..Default::default()
            }),
        },
        Preset {
            name: "Writer Agent",
            kind: NodeKind::Agent(AgentProps {
                label: s("Writer Agent"),
                role: s("Content Creator"),
                goals: s("Create engaging content\nMaintain consistent style"),
                backstory: s("Experienced content writer with expertise in various topics"),
                allow_delegation: s("false"),
                memory: s("2000"),
                llm_model: s("gpt-4-0125-preview"),
                ..Default::default()
            }),
        },
        Preset {
            name: "Research Task",
            kind: NodeKind::Task(TaskProps {
                label: s("Research Task"),
                description: s("Conduct comprehensive research on the given topic"),
                expected_output: s("Detailed research report with citations"),
                priority: s("high"),
                context: s("Focus on recent developments and reliable sources"),
                execution_order: s("1"),
                ..Default::default()
            }),
        },
        Preset {
            name: "Content Creation",
            kind: NodeKind::Task(TaskProps {
                label: s("Content Creation"),
                description: s("Create engaging content based on research findings"),
                expected_output: s("Well-structured article or report"),
                priority: s("medium"),
                context: s("Target audience: technical professionals"),
                execution_order: s("2"),
                ..Default::default()
            }),
        },
        Preset {
            name: "Web Scraper",
            kind: NodeKind::Tool(ToolProps {
                label: s("Web Scraper"),
                tool_type: s("FirecrawlScrapeWebsiteTool"),
                configuration: s(
                    "{\n  \"selectors\": [\n    \".content\",\n    \".article\",\n    \"p\"\n  ],\n  \"timeout\": 30\n}",
                ),
                description: s("Scrape web content with customizable settings"),
                return_direct: Some(true),
                ..Default::default()
            }),
        },
        Preset {
            name: "Code Interpreter",
            kind: NodeKind::Tool(ToolProps {
                label: s("Code Interpreter"),
                tool_type: s("CodeInterpreterTool"),
                configuration: s("{\n  \"timeout\": 60,\n  \"memory_limit\": \"512M\"\n}"),
                description: s("Execute Python code for data processing"),
                return_direct: Some(false),
                ..Default::default()
            }),
        },
        Preset {
            name: "Sequential Research",
            kind: NodeKind::Flow(FlowProps {
                label: s("Sequential Research"),
                flow_type: s("sequential"),
                manager_llm: s("gpt-4-0125-preview"),
                max_retries: s("3"),
                timeout: s("300"),
                ..Default::default()
            }),
        },
        Preset {
            name: "Parallel Processing",
            kind: NodeKind::Flow(FlowProps {
                label: s("Parallel Processing"),
                flow_type: s("parallel"),
                manager_llm: s("gpt-4-0125-preview"),
                max_retries: s("2"),
                timeout: s("600"),
                ..Default::default()
            }),
        },
    ]
}

/// Presets whose node kind is `kind` (`agent`, `task`, `tool` or `flow`).
pub fn presets_of_kind(kind: &str) -> Vec<Preset> {
    presets()
        .into_iter()
        .filter(|preset| preset.kind.name() == kind)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::RequiredFieldsRule;
    use crate::{index::GraphIndex, model::Graph};

    #[test]
    fn two_presets_per_kind() {
        for kind in ["agent", "task", "tool", "flow"] {
            assert_eq!(presets_of_kind(kind).len(), 2, "{kind}");
        }
    }

    #[test]
    fn presets_fill_their_required_fields() {
        let nodes = presets()
            .iter()
            .enumerate()
            .map(|(i, p)| p.instantiate(format!("n{i}"), Position::default()))
            .collect();
        let graph = Graph::new(nodes, Vec::new());
        let diags = RequiredFieldsRule::check(&GraphIndex::new(&graph));
        // Tasks are unassigned here; every other field is filled in.
        assert!(
            diags.iter().all(|d| d.code == "TASK_AGENT_REQUIRED"),
            "unexpected diagnostics: {diags:?}"
        );
    }

    #[test]
    fn preset_tool_configuration_is_valid_json() {
        for preset in presets_of_kind("tool") {
            let NodeKind::Tool(props) = &preset.kind else {
                unreachable!()
            };
            let config = props.configuration.as_deref().unwrap();
            serde_json::from_str::<serde_json::Value>(config).unwrap();
        }
    }
}
