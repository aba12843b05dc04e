//! The intermediate, generator-agnostic design structure: components,
//! services, models, and routes. Text input produces one via the model;
//! Figma input produces one by walking the document tree.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DesignStructure {
    #[serde(default)]
    pub components: BTreeMap<String, ComponentSpec>,
    #[serde(default)]
    pub services: BTreeMap<String, Value>,
    #[serde(default)]
    pub models: BTreeMap<String, Value>,
    #[serde(default)]
    pub routes: Vec<RouteSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub description: String,
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default, rename = "childComponents")]
    pub child_components: Vec<String>,
    #[serde(default, skip_serializing_if = "StyleHints::is_empty")]
    pub styles: StyleHints,
}

/// Layout hints lifted straight off Figma nodes; absent fields are omitted
/// from the serialized structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleHints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, rename = "backgroundColor", skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Value>,
    #[serde(default, rename = "borderRadius", skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
}

impl StyleHints {
    pub fn is_empty(&self) -> bool {
        self.width.is_none()
            && self.height.is_none()
            && self.background_color.is_none()
            && self.border_radius.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSpec {
    pub path: String,
    pub component: String,
}

/// Walk a Figma file document and derive a design structure: every
/// `COMPONENT` / `INSTANCE` node becomes a component (named by its
/// alphanumeric-filtered node name) and each component gets a route.
pub fn from_figma_document(file: &Value) -> DesignStructure {
    let mut design = DesignStructure::default();
    if let Some(document) = file.get("document") {
        walk_node(document, &mut design);
    }
    design.routes = design
        .components
        .keys()
        .map(|name| RouteSpec {
            path: name.to_lowercase(),
            component: format!("{name}Component"),
        })
        .collect();
    design
}

fn walk_node(node: &Value, design: &mut DesignStructure) {
    let node_type = node.get("type").and_then(Value::as_str);
    if matches!(node_type, Some("COMPONENT") | Some("INSTANCE")) {
        let raw_name = node.get("name").and_then(Value::as_str).unwrap_or("Component");
        let name = sanitize_name(raw_name);
        let description = node
            .get("description")
            .and_then(Value::as_str)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Component from Figma: {raw_name}"));

        let bounds = node.get("absoluteBoundingBox");
        let styles = StyleHints {
            width: bounds.and_then(|b| b.get("width")).and_then(Value::as_f64),
            height: bounds.and_then(|b| b.get("height")).and_then(Value::as_f64),
            background_color: node.get("backgroundColor").cloned(),
            border_radius: node.get("cornerRadius").and_then(Value::as_f64),
        };

        let child_components = node
            .get("children")
            .and_then(Value::as_array)
            .map(|children| {
                children
                    .iter()
                    .filter(|c| {
                        matches!(
                            c.get("type").and_then(Value::as_str),
                            Some("COMPONENT") | Some("INSTANCE")
                        )
                    })
                    .filter_map(|c| c.get("name").and_then(Value::as_str))
                    .map(sanitize_name)
                    .collect()
            })
            .unwrap_or_default();

        design.components.insert(
            name,
            ComponentSpec {
                description,
                properties: Vec::new(),
                child_components,
                styles,
            },
        );
    }

    if let Some(children) = node.get("children").and_then(Value::as_array) {
        for child in children {
            walk_node(child, design);
        }
    }
}

fn sanitize_name(raw: &str) -> String {
    let filtered: String = raw.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    if filtered.is_empty() {
        "Component".to_string()
    } else {
        filtered
    }
}
