use std::path::Path;

use serde_json::{Map, Value};

use crate::error::ComfyError;

/// Node whose `inputs.text` receives the positive prompt.
pub const POSITIVE_NODE_ID: &str = "6";
/// Node whose `inputs.text` receives the negative prompt.
pub const NEGATIVE_NODE_ID: &str = "7";

/// A ComfyUI API-format workflow graph: a JSON object keyed by node id, each
/// node carrying an `inputs` map.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowTemplate {
    graph: Map<String, Value>,
}

impl WorkflowTemplate {
    /// Reads and parses a workflow file.
    ///
    /// # Errors
    ///
    /// Returns [`ComfyError::Template`] if the file cannot be read, is not
    /// JSON, or is not a JSON object.
    pub fn load(path: &Path) -> Result<Self, ComfyError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|e| ComfyError::Template {
            path: display.clone(),
            reason: e.to_string(),
        })?;
        let value: Value = serde_json::from_str(&raw).map_err(|e| ComfyError::Template {
            path: display.clone(),
            reason: e.to_string(),
        })?;
        Self::from_value(value).map_err(|_| ComfyError::Template {
            path: display,
            reason: "top-level value is not an object".to_string(),
        })
    }

    /// Wraps an already-parsed graph.
    ///
    /// # Errors
    ///
    /// Returns [`ComfyError::Template`] if `value` is not a JSON object.
    pub fn from_value(value: Value) -> Result<Self, ComfyError> {
        match value {
            Value::Object(graph) => Ok(Self { graph }),
            _ => Err(ComfyError::Template {
                path: "<inline>".to_string(),
                reason: "top-level value is not an object".to_string(),
            }),
        }
    }

    /// Returns a copy of the graph with both prompt nodes filled in.
    ///
    /// A prompt node that is missing or has no `inputs` object is skipped
    /// with a warning; the rest of the graph is submitted as is.
    #[must_use]
    pub fn render(&self, positive: &str, negative: &str) -> Value {
        let mut graph = self.graph.clone();
        set_text(&mut graph, POSITIVE_NODE_ID, positive);
        set_text(&mut graph, NEGATIVE_NODE_ID, negative);
        Value::Object(graph)
    }
}

fn set_text(graph: &mut Map<String, Value>, node_id: &str, text: &str) {
    match graph
        .get_mut(node_id)
        .and_then(|node| node.get_mut("inputs"))
        .and_then(Value::as_object_mut)
    {
        Some(inputs) => {
            inputs.insert("text".to_string(), Value::String(text.to_string()));
        }
        None => tracing::warn!(node_id, "workflow prompt node not found, leaving it unchanged"),
    }
}
