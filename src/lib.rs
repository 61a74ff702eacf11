//! Validation, dry-run simulation and Python code generation for crew graphs
//! built in a visual agent-flow editor.
#![forbid(unsafe_code)]

pub mod catalog;
pub mod codegen;
pub mod config;
pub mod error;
pub mod index;
pub mod json_output;
pub mod lint;
pub mod loader;
pub mod model;
pub mod presets;
pub mod simulate;
pub mod template;
pub mod util;

pub use codegen::{CodeGenerator, GeneratorOptions, generate};
pub use error::{FlowError, FlowErrorLocation, Result};
pub use lint::{Diagnostic, Severity, validate};
pub use loader::{load_graph_from_path, load_graph_from_str, save_graph_to_string};
pub use model::{Edge, Graph, Node, NodeKind, Position};
pub use simulate::{
    ExecutionRecord, RunStatus, SimulationReport, Simulator, SimulatorOptions, simulate,
};
