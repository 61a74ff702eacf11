use serde::Serialize;

use crate::{
    error::{FlowError, FlowErrorLocation},
    lint::{Diagnostic, has_errors, validate},
    loader::load_graph_from_str,
    simulate::{SimulationReport, StatusCounts},
};

/// A load-time failure, flattened for machine consumers.
#[derive(Serialize, Clone, Debug)]
pub struct JsonDiagnostic {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col: Option<usize>,
}

impl JsonDiagnostic {
    pub fn from_location(message: String, location: FlowErrorLocation) -> Self {
        let FlowErrorLocation {
            path,
            source_path,
            line,
            col,
        } = location;
        JsonDiagnostic {
            message,
            source_path: source_path
                .as_ref()
                .map(|p| p.display().to_string())
                .or(path),
            line,
            col,
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct CheckJsonOutput {
    pub ok: bool,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<JsonDiagnostic>,
}

impl CheckJsonOutput {
    pub fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        CheckJsonOutput {
            ok: !has_errors(&diagnostics),
            diagnostics,
            errors: Vec::new(),
        }
    }

    pub fn error(err: FlowError) -> Self {
        CheckJsonOutput {
            ok: false,
            diagnostics: Vec::new(),
            errors: flow_error_to_reports(err),
        }
    }

    pub fn into_string(self) -> String {
        to_json(&self)
    }
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SimulateJsonOutput {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counts: Option<StatusCounts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<SimulationReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<JsonDiagnostic>,
}

impl SimulateJsonOutput {
    pub fn from_report(report: SimulationReport) -> Self {
        SimulateJsonOutput {
            ok: !report.has_errors(),
            counts: Some(report.counts()),
            report: Some(report),
            errors: Vec::new(),
        }
    }

    pub fn error(err: FlowError) -> Self {
        SimulateJsonOutput {
            ok: false,
            counts: None,
            report: None,
            errors: flow_error_to_reports(err),
        }
    }

    pub fn into_string(self) -> String {
        to_json(&self)
    }
}

pub fn flow_error_to_reports(err: FlowError) -> Vec<JsonDiagnostic> {
    let display_message = err.to_string();
    let location = err.location().clone();
    vec![JsonDiagnostic::from_location(display_message, location)]
}

/// Produce the same JSON emitted by `crew-flow check --json`.
pub fn check_to_stdout_json(flow_json: &str) -> String {
    match load_graph_from_str(flow_json) {
        Ok(graph) => CheckJsonOutput::from_diagnostics(validate(&graph)).into_string(),
        Err(err) => CheckJsonOutput::error(err).into_string(),
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        format!(
            r#"{{"ok":false,"errors":[{{"message":{}}}]}}"#,
            serde_json::Value::String(format!("output serialization failed: {e}"))
        )
    })
}
