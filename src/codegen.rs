//! CrewAI script generation.
//!
//! Generation happens in two steps: [`CrewPlan::resolve`] turns a graph into
//! fully wired registries (which tools an agent owns, which agent runs a
//! task, which flow node sets the crew policy), then the embedded Handlebars
//! template renders that plan as Python. Wiring gaps degrade to best-effort
//! output; only model-integrity faults abort.

use std::collections::BTreeSet;

use indexmap::IndexSet;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use tracing::{debug, warn};

use crate::{
    catalog::{CUSTOM_MODEL, CUSTOM_TOOL, DEFAULT_MODEL, Provider, find_model, find_tool},
    error::Result,
    index::GraphIndex,
    model::{Graph, Node, ToolProps, filled},
    template::{TemplateRenderer, py_str},
    util::is_python_identifier,
};

/// File name offered when the generated script is downloaded.
pub const SCRIPT_FILE_NAME: &str = "crew_script.py";
pub const SCRIPT_MIME_TYPE: &str = "text/x-python";

const CREW_TEMPLATE_NAME: &str = "crew.py";
const CREW_TEMPLATE: &str = include_str!("../templates/crew.py.hbs");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Model used when an agent or the manager leaves it unset.
    pub default_model: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            default_model: DEFAULT_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Process {
    Sequential,
    Parallel,
}

impl Process {
    fn from_flow_type(flow_type: Option<&str>) -> Self {
        match flow_type {
            Some("parallel") => Process::Parallel,
            _ => Process::Sequential,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolEntry {
    pub id: String,
    /// Library class to instantiate; `None` for custom or skipped tools.
    pub class: Option<String>,
    pub custom: bool,
    pub name: String,
    pub description: String,
    pub return_direct: bool,
    pub config: Map<String, Value>,
    pub has_config: bool,
    /// Why the tool could not be emitted.
    pub reason: Option<String>,
}

impl ToolEntry {
    pub fn is_emitted(&self) -> bool {
        self.class.is_some() || self.custom
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentEntry {
    pub id: String,
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub allow_delegation: bool,
    pub memory: Value,
    pub llm: String,
    /// Keys into the tool registry, in edge order.
    pub tools: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskEntry {
    pub id: String,
    pub description: String,
    pub expected_output: String,
    /// Key into the agent registry, `None` when no agent could be resolved.
    pub agent: Option<String>,
    pub context: String,
    pub priority: String,
}

/// Everything the script template needs, with all cross-node references resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrewPlan {
    pub tool_imports: String,
    pub uses_custom_tool: bool,
    pub credentials: Vec<String>,
    pub tools: Vec<ToolEntry>,
    pub agents: Vec<AgentEntry>,
    pub tasks: Vec<TaskEntry>,
    pub process: Process,
    pub manager_llm: String,
}

impl CrewPlan {
    pub fn resolve(graph: &Graph, options: &GeneratorOptions) -> Self {
        let index = GraphIndex::new(graph);

        let tools: Vec<ToolEntry> = graph
            .nodes
            .iter()
            .filter_map(|node| node.as_tool().map(|props| tool_entry(node, props)))
            .collect();
        let emitted: IndexSet<&str> = tools
            .iter()
            .filter(|tool| tool.is_emitted())
            .map(|tool| tool.id.as_str())
            .collect();
        let tool_imports = tools
            .iter()
            .filter_map(|tool| tool.class.as_deref())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>()
            .join(", ");
        let uses_custom_tool = tools.iter().any(|tool| tool.custom);

        let mut agents = Vec::new();
        let mut tasks = Vec::new();
        let mut credentials = IndexSet::new();
        for (idx, node) in graph.nodes.iter().enumerate() {
            if let Some(props) = node.as_agent() {
                let owned: IndexSet<String> = index
                    .outgoing(idx)
                    .iter()
                    .map(|link| index.node(link.node))
                    .filter(|target| emitted.contains(target.id.as_str()))
                    .map(|target| target.id.clone())
                    .collect();
                let selected = filled(&props.llm_model);
                if let Some(key) = filled(&props.api_key) {
                    credentials.insert(credential_line(selected, key));
                }
                agents.push(AgentEntry {
                    id: node.id.clone(),
                    role: text(&props.role, ""),
                    goal: text(&props.goals, ""),
                    backstory: text(&props.backstory, ""),
                    allow_delegation: filled(&props.allow_delegation) == Some("true"),
                    memory: memory_value(filled(&props.memory)),
                    llm: resolve_model(
                        selected,
                        filled(&props.custom_model),
                        &options.default_model,
                    ),
                    tools: owned.into_iter().collect(),
                });
            } else if let Some(props) = node.as_task() {
                let agent = index.incoming(idx).first().and_then(|link| {
                    let source = index.node(link.node);
                    if source.as_agent().is_some() {
                        Some(source.id.clone())
                    } else {
                        warn!(
                            task = %node.id,
                            source = %source.id,
                            "task's first incoming edge is not from an agent"
                        );
                        None
                    }
                });
                if index.incoming(idx).is_empty() {
                    warn!(task = %node.id, "task has no executing agent, emitting None");
                }
                tasks.push(TaskEntry {
                    id: node.id.clone(),
                    description: text(&props.description, ""),
                    expected_output: text(&props.expected_output, ""),
                    agent,
                    context: text(&props.context, ""),
                    priority: text(&props.priority, "medium"),
                });
            }
        }

        let flow = graph.nodes.iter().find_map(Node::as_flow);
        let manager_selected = flow.and_then(|props| filled(&props.manager_llm));
        if let Some(key) = flow.and_then(|props| filled(&props.manager_api_key)) {
            credentials.insert(credential_line(manager_selected, key));
        }
        let process = Process::from_flow_type(flow.and_then(|props| filled(&props.flow_type)));
        let manager_llm = resolve_model(
            manager_selected,
            flow.and_then(|props| filled(&props.custom_manager_model)),
            &options.default_model,
        );

        debug!(
            tools = tools.len(),
            agents = agents.len(),
            tasks = tasks.len(),
            credentials = credentials.len(),
            ?process,
            "resolved crew plan"
        );

        CrewPlan {
            tool_imports,
            uses_custom_tool,
            credentials: credentials.into_iter().collect(),
            tools,
            agents,
            tasks,
            process,
            manager_llm,
        }
    }

    pub fn agent(&self, id: &str) -> Option<&AgentEntry> {
        self.agents.iter().find(|agent| agent.id == id)
    }

    pub fn task(&self, id: &str) -> Option<&TaskEntry> {
        self.tasks.iter().find(|task| task.id == id)
    }
}

/// Renders crew graphs into CrewAI Python scripts.
pub struct CodeGenerator {
    renderer: TemplateRenderer,
    options: GeneratorOptions,
}

impl CodeGenerator {
    pub fn new(options: GeneratorOptions) -> Result<Self> {
        let mut renderer = TemplateRenderer::new();
        renderer.register(CREW_TEMPLATE_NAME, CREW_TEMPLATE)?;
        Ok(CodeGenerator { renderer, options })
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Render a script. Identical graphs always render byte-identical output.
    pub fn generate(&self, graph: &Graph) -> Result<String> {
        graph.check_integrity()?;
        let plan = CrewPlan::resolve(graph, &self.options);
        self.renderer.render(CREW_TEMPLATE_NAME, &plan)
    }
}

/// Generate with default options.
pub fn generate(graph: &Graph) -> Result<String> {
    CodeGenerator::new(GeneratorOptions::default())?.generate(graph)
}

fn text(value: &Option<String>, fallback: &str) -> String {
    filled(value).unwrap_or(fallback).to_string()
}

fn resolve_model(selected: Option<&str>, custom: Option<&str>, default_model: &str) -> String {
    match selected {
        Some(CUSTOM_MODEL) => custom.unwrap_or(CUSTOM_MODEL).to_string(),
        Some(model) => model.to_string(),
        None => default_model.to_string(),
    }
}

/// The provider is taken from the model the user picked, not the default
/// model: an unset model writes `CUSTOM_API_KEY`.
fn credential_line(model: Option<&str>, key: &str) -> String {
    let provider = model
        .and_then(find_model)
        .map(|info| info.provider)
        .unwrap_or_else(|| Provider::from_model(model));
    format!("os.environ[\"{}\"] = {}", provider.env_var(), py_str(key))
}

fn memory_value(memory: Option<&str>) -> Value {
    let Some(raw) = memory else {
        return Value::Null;
    };
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => {
            if let Ok(n) = raw.parse::<i64>() {
                Value::Number(n.into())
            } else if let Some(n) = raw.parse::<f64>().ok().and_then(Number::from_f64) {
                Value::Number(n)
            } else {
                Value::String(raw.to_string())
            }
        }
    }
}

fn tool_entry(node: &Node, props: &ToolProps) -> ToolEntry {
    let config = tool_config(node, props);
    let mut entry = ToolEntry {
        id: node.id.clone(),
        class: None,
        custom: false,
        name: node.label().to_string(),
        description: text(&props.description, ""),
        return_direct: props.return_direct.unwrap_or(false),
        has_config: !config.is_empty(),
        config,
        reason: None,
    };
    match filled(&props.tool_type) {
        None => {
            warn!(tool = %node.id, "tool has no type, skipping");
            entry.reason = Some("no tool type".to_string());
        }
        Some(CUSTOM_TOOL) => entry.custom = true,
        Some(class) if is_python_identifier(class) => entry.class = Some(class.to_string()),
        Some(other) => {
            warn!(tool = %node.id, tool_type = other, "tool type is not a valid class name, skipping");
            entry.reason = Some(format!("unsupported tool type {}", py_str(other)));
        }
    }
    entry
}

fn tool_config(node: &Node, props: &ToolProps) -> Map<String, Value> {
    let Some(raw) = filled(&props.configuration) else {
        return filled(&props.tool_type)
            .and_then(find_tool)
            .and_then(|spec| spec.default_config().as_object().cloned())
            .unwrap_or_default();
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            warn!(tool = %node.id, "tool configuration is not a JSON object, ignoring it");
            Map::new()
        }
        Err(e) => {
            warn!(tool = %node.id, error = %e, "tool configuration is not valid JSON, ignoring it");
            Map::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn custom_model_substitutes_only_when_named() {
        assert_eq!(resolve_model(Some("custom"), Some("llama3"), DEFAULT_MODEL), "llama3");
        assert_eq!(resolve_model(Some("custom"), None, DEFAULT_MODEL), "custom");
        assert_eq!(resolve_model(None, Some("llama3"), DEFAULT_MODEL), DEFAULT_MODEL);
        assert_eq!(resolve_model(Some("claude-3-opus"), None, DEFAULT_MODEL), "claude-3-opus");
    }

    #[test]
    fn memory_becomes_a_python_literal() {
        assert_eq!(memory_value(None), Value::Null);
        assert_eq!(memory_value(Some("1000")), json!(1000));
        assert_eq!(memory_value(Some("true")), json!(true));
        assert_eq!(memory_value(Some("short")), json!("short"));
    }

    #[test]
    fn credential_line_names_provider_variable() {
        assert_eq!(
            credential_line(Some("claude-3-opus"), "sk-ant"),
            r#"os.environ["ANTHROPIC_API_KEY"] = "sk-ant""#
        );
        assert_eq!(
            credential_line(Some("custom"), "k"),
            r#"os.environ["CUSTOM_API_KEY"] = "k""#
        );
        assert_eq!(
            credential_line(None, "k"),
            r#"os.environ["CUSTOM_API_KEY"] = "k""#
        );
    }

    #[test]
    fn process_defaults_to_sequential() {
        assert_eq!(Process::from_flow_type(Some("parallel")), Process::Parallel);
        assert_eq!(Process::from_flow_type(Some("conditional")), Process::Sequential);
        assert_eq!(Process::from_flow_type(None), Process::Sequential);
    }
}
