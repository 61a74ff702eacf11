use crate::{
    index::GraphIndex,
    model::{NodeKind, filled},
};

use super::Diagnostic;

#[derive(Clone, Debug, Default)]
pub struct RequiredFieldsRule;

impl RequiredFieldsRule {
    pub fn check(index: &GraphIndex<'_>) -> Vec<Diagnostic> {
        let mut diags = Vec::new();
        for idx in 0..index.len() {
            let node = index.node(idx);
            let id = node.id.as_str();
            let label = node.label();
            match &node.kind {
                NodeKind::Agent(props) => {
                    if filled(&props.role).is_none() {
                        diags.push(Diagnostic::error(
                            id,
                            "AGENT_ROLE_REQUIRED",
                            format!("Agent '{label}' requires a role"),
                        ));
                    }
                    if filled(&props.goals).is_none() {
                        diags.push(Diagnostic::error(
                            id,
                            "AGENT_GOALS_REQUIRED",
                            format!("Agent '{label}' requires at least one goal"),
                        ));
                    }
                }
                NodeKind::Task(props) => {
                    if filled(&props.description).is_none() {
                        diags.push(Diagnostic::error(
                            id,
                            "TASK_DESCRIPTION_REQUIRED",
                            format!("Task '{label}' requires a description"),
                        ));
                    }
                    if !index.has_incoming(idx) {
                        diags.push(Diagnostic::error(
                            id,
                            "TASK_AGENT_REQUIRED",
                            format!("Task '{label}' needs to be assigned to an agent"),
                        ));
                    }
                }
                NodeKind::Tool(props) => {
                    if filled(&props.tool_type).is_none() {
                        diags.push(Diagnostic::error(
                            id,
                            "TOOL_TYPE_REQUIRED",
                            format!("Tool '{label}' requires a tool type"),
                        ));
                    }
                }
                NodeKind::Flow(props) => {
                    if props.is_conditional() && filled(&props.condition).is_none() {
                        diags.push(Diagnostic::warning(
                            id,
                            "FLOW_CONDITION_REQUIRED",
                            format!("Conditional flow '{label}' requires a condition"),
                        ));
                    }
                }
            }
        }
        diags
    }
}
