use crew_flow::{
    loader::{load_graph_from_path, load_graph_from_str, save_graph_to_path, save_graph_to_string},
    model::NodeKind,
};
use pretty_assertions::assert_eq;
use std::path::Path;

#[test]
fn loads_research_crew_fixture() {
    let graph = load_graph_from_path(Path::new("fixtures/research_crew.json")).unwrap();
    assert_eq!(graph.nodes.len(), 7);
    assert_eq!(graph.edges.len(), 6);

    let researcher = graph.node("a1").and_then(|n| n.as_agent()).unwrap();
    assert_eq!(researcher.llm_model.as_deref(), Some("claude-3-opus"));
    assert_eq!(researcher.memory.as_deref(), Some("1000"));

    let lookup = graph.node("t2").and_then(|n| n.as_tool()).unwrap();
    assert_eq!(lookup.return_direct, Some(true));

    let kinds: Vec<&str> = graph.nodes.iter().map(|n| n.kind_name()).collect();
    assert_eq!(
        kinds,
        vec!["agent", "agent", "tool", "tool", "task", "task", "flow"]
    );
}

#[test]
fn save_then_load_preserves_graph() {
    let graph = load_graph_from_path(Path::new("fixtures/research_crew.json")).unwrap();
    let text = save_graph_to_string(&graph).unwrap();
    let reloaded = load_graph_from_str(&text).unwrap();
    assert_eq!(graph, reloaded);
}

#[test]
fn save_to_disk_round_trips() {
    let graph = load_graph_from_path(Path::new("fixtures/research_crew.json")).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(crew_flow::loader::FLOW_FILE_NAME);
    save_graph_to_path(&graph, &path).unwrap();
    assert_eq!(load_graph_from_path(&path).unwrap(), graph);
}

#[test]
fn editor_attributes_survive_a_save() {
    let json = r#"{
      "nodes": [{
        "id": "a1", "type": "agent", "position": {"x": 1.5, "y": 2},
        "data": {"label": "Scout", "role": "Scout", "goals": "Look", "color": "teal"},
        "selected": true
      }],
      "edges": [],
      "viewport": {"zoom": 1}
    }"#;
    let graph = load_graph_from_str(json).unwrap();
    let node = &graph.nodes[0];
    assert_eq!(node.extra.get("selected"), Some(&serde_json::Value::Bool(true)));
    let NodeKind::Agent(props) = &node.kind else {
        panic!("expected an agent");
    };
    assert_eq!(props.extra.get("color"), Some(&serde_json::json!("teal")));

    let saved: serde_json::Value = serde_json::from_str(&save_graph_to_string(&graph).unwrap()).unwrap();
    assert_eq!(saved["nodes"][0]["selected"], serde_json::json!(true));
    assert_eq!(saved["nodes"][0]["data"]["color"], serde_json::json!("teal"));
    assert_eq!(saved["nodes"][0]["type"], serde_json::json!("agent"));
}

#[test]
fn numeric_and_boolean_text_fields_are_accepted() {
    let json = r#"{
      "nodes": [{
        "id": "a1", "type": "agent", "position": {"x": 0, "y": 0},
        "data": {"role": "R", "goals": "G", "memory": 512, "allowDelegation": true}
      }]
    }"#;
    let graph = load_graph_from_str(json).unwrap();
    let props = graph.nodes[0].as_agent().unwrap();
    assert_eq!(props.memory.as_deref(), Some("512"));
    assert_eq!(props.allow_delegation.as_deref(), Some("true"));
}
