use crew_flow::{
    lint::{Severity, has_errors, validate},
    loader::load_graph_from_path,
    model::{AgentProps, Edge, FlowProps, Graph, Node, NodeKind, TaskProps, ToolProps},
};
use pretty_assertions::assert_eq;
use std::path::Path;

fn codes(graph: &Graph) -> Vec<(String, String)> {
    validate(graph)
        .into_iter()
        .map(|d| (d.node_id.unwrap_or_default(), d.code))
        .collect()
}

fn agent(id: &str, role: &str, goals: &str) -> Node {
    Node::new(
        id,
        NodeKind::Agent(AgentProps {
            label: Some(id.to_uppercase()),
            role: Some(role.to_string()),
            goals: Some(goals.to_string()),
            ..Default::default()
        }),
    )
}

fn task(id: &str, description: &str) -> Node {
    Node::new(
        id,
        NodeKind::Task(TaskProps {
            description: Some(description.to_string()),
            ..Default::default()
        }),
    )
}

#[test]
fn research_crew_is_clean() {
    let graph = load_graph_from_path(Path::new("fixtures/research_crew.json")).unwrap();
    assert_eq!(validate(&graph), Vec::new());
}

#[test]
fn empty_graph_has_no_findings() {
    assert!(validate(&Graph::default()).is_empty());
}

#[test]
fn lone_complete_agent_only_warns_about_isolation() {
    let graph = Graph::new(vec![agent("a1", "Analyst", "Analyze")], Vec::new());
    let diags = validate(&graph);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, "NODE_ISOLATED");
    assert_eq!(diags[0].severity, Severity::Warning);
    assert_eq!(
        diags[0].message,
        "agent 'A1' is not connected to any other component"
    );
    assert!(!has_errors(&diags));
}

#[test]
fn empty_strings_count_as_missing() {
    let graph = Graph::new(
        vec![agent("a1", "", ""), task("k1", "Do it")],
        vec![Edge::new("e1", "a1", "k1")],
    );
    assert_eq!(
        codes(&graph),
        vec![
            ("a1".to_string(), "AGENT_ROLE_REQUIRED".to_string()),
            ("a1".to_string(), "AGENT_GOALS_REQUIRED".to_string()),
        ]
    );
}

#[test]
fn unassigned_task_and_conditional_flow() {
    let graph = load_graph_from_path(Path::new("fixtures/unassigned_task.json")).unwrap();
    let diags = validate(&graph);
    assert_eq!(
        codes(&graph),
        vec![
            ("k1".to_string(), "TASK_AGENT_REQUIRED".to_string()),
            ("f1".to_string(), "FLOW_CONDITION_REQUIRED".to_string()),
        ]
    );
    assert_eq!(diags[0].message, "Task 'Orphan' needs to be assigned to an agent");
    assert_eq!(diags[1].severity, Severity::Warning);
}

#[test]
fn tool_without_type_is_an_error() {
    let tool = Node::new(
        "t1",
        NodeKind::Tool(ToolProps {
            label: Some("Mystery".to_string()),
            ..Default::default()
        }),
    );
    let graph = Graph::new(
        vec![agent("a1", "R", "G"), tool],
        vec![Edge::new("e1", "a1", "t1")],
    );
    let diags = validate(&graph);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, "TOOL_TYPE_REQUIRED");
    assert_eq!(diags[0].message, "Tool 'Mystery' requires a tool type");
}

#[test]
fn triangle_cycle_is_reported_once() {
    let graph = load_graph_from_path(Path::new("fixtures/cyclic.json")).unwrap();
    let diags = validate(&graph);
    assert_eq!(
        codes(&graph),
        vec![("a".to_string(), "CYCLE_DETECTED".to_string())]
    );
    assert_eq!(diags[0].message, "Circular dependency detected in the workflow");
    assert!(has_errors(&diags));
}

#[test]
fn self_loop_is_a_cycle_and_not_isolated() {
    let graph = Graph::new(
        vec![agent("a1", "R", "G")],
        vec![Edge::new("e1", "a1", "a1")],
    );
    assert_eq!(
        codes(&graph),
        vec![("a1".to_string(), "CYCLE_DETECTED".to_string())]
    );
}

#[test]
fn rules_run_isolation_then_fields_then_cycles() {
    let flow = Node::new(
        "f1",
        NodeKind::Flow(FlowProps {
            flow_type: Some("conditional".to_string()),
            ..Default::default()
        }),
    );
    let graph = Graph::new(
        vec![agent("a", "", "G"), agent("b", "R", "G"), flow],
        vec![Edge::new("e1", "a", "b"), Edge::new("e2", "b", "a")],
    );
    assert_eq!(
        codes(&graph),
        vec![
            ("f1".to_string(), "NODE_ISOLATED".to_string()),
            ("a".to_string(), "AGENT_ROLE_REQUIRED".to_string()),
            ("f1".to_string(), "FLOW_CONDITION_REQUIRED".to_string()),
            ("a".to_string(), "CYCLE_DETECTED".to_string()),
        ]
    );
}

#[test]
fn validation_is_deterministic() {
    let graph = load_graph_from_path(Path::new("fixtures/unassigned_task.json")).unwrap();
    assert_eq!(validate(&graph), validate(&graph));
}

#[test]
fn dangling_edges_still_count_as_connections() {
    let graph = Graph::new(
        vec![agent("a1", "R", "G")],
        vec![Edge::new("e1", "a1", "ghost")],
    );
    assert_eq!(validate(&graph), Vec::new());

    let graph = Graph::new(
        vec![task("k1", "Summarize")],
        vec![Edge::new("e1", "ghost", "k1")],
    );
    assert_eq!(validate(&graph), Vec::new());
}
