use handlebars::{
    Context, Handlebars, Helper, HelperDef, Output, RenderContext, RenderError, RenderErrorReason,
};
use serde::Serialize;
use serde_json::Value;

use crate::error::{FlowError, FlowErrorLocation, Result};

/// Handlebars registry that renders Python source: no HTML escaping, plus a
/// `py` helper turning any JSON value into a Python literal.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl TemplateRenderer {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(|s| s.to_string());
        handlebars.register_helper("py", Box::new(PyHelper));
        Self { handlebars }
    }

    pub fn register(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| FlowError::Template {
                message: format!("template '{name}' failed to compile: {e}"),
                location: FlowErrorLocation::at_path(format!("templates/{name}")),
            })
    }

    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String> {
        self.handlebars
            .render(name, data)
            .map_err(|e| FlowError::Template {
                message: format!("template '{name}' failed to render: {e}"),
                location: FlowErrorLocation::at_path(format!("templates/{name}")),
            })
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Python literal for a JSON value. Strings use JSON escaping, which Python
/// string literals accept unchanged.
pub fn py_literal(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => py_str(s),
        Value::Array(items) => {
            let inner = items.iter().map(py_literal).collect::<Vec<_>>().join(", ");
            format!("[{inner}]")
        }
        Value::Object(map) => {
            let inner = map
                .iter()
                .map(|(k, v)| format!("{}: {}", py_str(k), py_literal(v)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{{{inner}}}")
        }
    }
}

pub fn py_str(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

struct PyHelper;

impl HelperDef for PyHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        helper: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> std::result::Result<(), RenderError> {
        let value = helper
            .param(0)
            .map(|p| p.value().clone())
            .ok_or_else(|| helper_error("py helper expects 1 parameter"))?;
        out.write(&py_literal(&value))?;
        Ok(())
    }
}

fn helper_error(message: &str) -> RenderError {
    RenderErrorReason::Other(message.to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(template: &str, data: Value) -> String {
        let mut renderer = TemplateRenderer::new();
        renderer.register("t", template).unwrap();
        renderer.render("t", &data).unwrap()
    }

    #[test]
    fn py_helper_quotes_and_escapes_strings() {
        let out = render("x = {{py name}}", json!({ "name": "say \"hi\"\nthen <leave>" }));
        assert_eq!(out, r#"x = "say \"hi\"\nthen <leave>""#);
    }

    #[test]
    fn py_helper_maps_json_scalars() {
        let out = render(
            "{{py a}} {{py b}} {{py c}} {{py d}}",
            json!({ "a": true, "b": false, "c": null, "d": 42 }),
        );
        assert_eq!(out, "True False None 42");
    }

    #[test]
    fn py_literal_handles_nested_values() {
        let value = json!({ "ocr": false, "selectors": [".content", "p"] });
        assert_eq!(
            py_literal(&value),
            r#"{"ocr": False, "selectors": [".content", "p"]}"#
        );
    }

    #[test]
    fn unknown_template_is_an_error() {
        let renderer = TemplateRenderer::new();
        let err = renderer.render("missing", &json!({})).unwrap_err();
        assert!(matches!(err, FlowError::Template { .. }));
    }
}
