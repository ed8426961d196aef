//! Model data structures and their `.mdpa` rendering.

use std::collections::BTreeMap;

use crate::sub_model::SubModel;

/// Named scalar values of one property set, e.g. `DENSITY 7850.0`.
pub type Properties = BTreeMap<String, f64>;

/// A node location. The node id is the key it is stored under.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate
    pub z: f64,
}

impl Node {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// An element: its property set and connectivity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub property_id: i32,
    pub node_ids: Vec<i32>,
}

impl Element {
    pub fn new(property_id: i32, node_ids: Vec<i32>) -> Self {
        Self {
            property_id,
            node_ids,
        }
    }
}

/// A condition (load carrier): its property set and connectivity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub property_id: i32,
    pub node_ids: Vec<i32>,
}

impl Condition {
    pub fn new(property_id: i32, node_ids: Vec<i32>) -> Self {
        Self {
            property_id,
            node_ids,
        }
    }
}

/// Entities grouped by type name, id-ordered within a type.
///
/// Type names keep the order in which they were first inserted so output is
/// stable for a given assembly order.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedBlocks<T> {
    blocks: Vec<(String, BTreeMap<i32, T>)>,
}

impl<T> Default for TypedBlocks<T> {
    fn default() -> Self {
        Self { blocks: Vec::new() }
    }
}

impl<T> TypedBlocks<T> {
    pub(crate) fn insert(&mut self, type_name: &str, id: i32, item: T) {
        match self.blocks.iter_mut().find(|(name, _)| name == type_name) {
            Some((_, items)) => {
                items.insert(id, item);
            }
            None => {
                let mut items = BTreeMap::new();
                items.insert(id, item);
                self.blocks.push((type_name.to_string(), items));
            }
        }
    }

    /// Entities of one type, keyed by id.
    pub fn get(&self, type_name: &str) -> Option<&BTreeMap<i32, T>> {
        self.blocks
            .iter()
            .find(|(name, _)| name == type_name)
            .map(|(_, items)| items)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<i32, T>)> {
        self.blocks.iter().map(|(name, items)| (name.as_str(), items))
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().map(|(name, _)| name.as_str())
    }

    /// Total number of entities across all types.
    pub fn len(&self) -> usize {
        self.blocks.iter().map(|(_, items)| items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Root of the model tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Model {
    properties: BTreeMap<i32, Properties>,
    nodes: BTreeMap<i32, Node>,
    elements: TypedBlocks<Element>,
    conditions: TypedBlocks<Condition>,
    sub_models: Vec<(String, SubModel)>,
}

impl Model {
    pub fn builder() -> ModelBuilder {
        ModelBuilder::new()
    }

    pub fn properties(&self) -> &BTreeMap<i32, Properties> {
        &self.properties
    }

    pub fn nodes(&self) -> &BTreeMap<i32, Node> {
        &self.nodes
    }

    pub fn elements(&self) -> &TypedBlocks<Element> {
        &self.elements
    }

    pub fn conditions(&self) -> &TypedBlocks<Condition> {
        &self.conditions
    }

    /// Sub-models in insertion order.
    pub fn sub_models(&self) -> &[(String, SubModel)] {
        &self.sub_models
    }

    pub fn sub_model(&self, name: &str) -> Option<&SubModel> {
        find_sub_model(&self.sub_models, name)
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
            && self.nodes.is_empty()
            && self.elements.is_empty()
            && self.conditions.is_empty()
            && self.sub_models.is_empty()
    }

    /// Render as `.mdpa` lines.
    ///
    /// Blocks are written in the order properties, nodes, elements,
    /// conditions, sub-models; a blank line separates consecutive blocks and
    /// no blank line trails the last one. An empty model renders as nothing.
    pub fn to_mdpa(&self) -> Vec<String> {
        let mut lines = Vec::new();

        for (id, values) in &self.properties {
            lines.push(format!("Begin Properties {id}"));
            for (key, value) in values {
                lines.push(indent(&format!("{key} {}", format_float(*value)), 1));
            }
            lines.push("End Properties".to_string());
            lines.push(String::new());
        }

        if !self.nodes.is_empty() {
            lines.push("Begin Nodes".to_string());
            for (id, node) in &self.nodes {
                lines.push(indent(
                    &format!(
                        "{id} {} {} {}",
                        format_float(node.x),
                        format_float(node.y),
                        format_float(node.z)
                    ),
                    1,
                ));
            }
            lines.push("End Nodes".to_string());
            lines.push(String::new());
        }

        for (type_name, elements) in self.elements.iter() {
            lines.push(format!("Begin Elements {type_name}"));
            for (id, element) in elements {
                lines.push(indent(&entity_line(*id, element.property_id, &element.node_ids), 1));
            }
            lines.push("End Elements".to_string());
            lines.push(String::new());
        }

        for (type_name, conditions) in self.conditions.iter() {
            lines.push(format!("Begin Conditions {type_name}"));
            for (id, condition) in conditions {
                lines.push(indent(&entity_line(*id, condition.property_id, &condition.node_ids), 1));
            }
            lines.push("End Conditions".to_string());
            lines.push(String::new());
        }

        push_sub_models(&mut lines, &self.sub_models, 0);
        remove_trailing_blank(lines)
    }

    /// Render as `.mdpa` text, one line per row with a final newline.
    pub fn to_mdpa_string(&self) -> String {
        let mut text = String::new();
        for line in self.to_mdpa() {
            text.push_str(&line);
            text.push('\n');
        }
        text
    }
}

/// Assembles a [`Model`]; the model is immutable once built.
#[derive(Debug, Default)]
pub struct ModelBuilder {
    model: Model,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_property(&mut self, id: i32, values: Properties) -> &mut Self {
        self.model.properties.insert(id, values);
        self
    }

    pub fn add_node(&mut self, id: i32, node: Node) -> &mut Self {
        self.model.nodes.insert(id, node);
        self
    }

    pub fn add_element(&mut self, type_name: &str, id: i32, element: Element) -> &mut Self {
        self.model.elements.insert(type_name, id, element);
        self
    }

    pub fn add_condition(&mut self, type_name: &str, id: i32, condition: Condition) -> &mut Self {
        self.model.conditions.insert(type_name, id, condition);
        self
    }

    /// Add a sub-model; a second one under the same name replaces the first in place.
    pub fn add_sub_model(&mut self, name: impl Into<String>, sub_model: SubModel) -> &mut Self {
        upsert_sub_model(&mut self.model.sub_models, name.into(), sub_model);
        self
    }

    pub fn build(self) -> Model {
        self.model
    }
}

pub(crate) fn find_sub_model<'a>(sub_models: &'a [(String, SubModel)], name: &str) -> Option<&'a SubModel> {
    sub_models
        .iter()
        .find(|(candidate, _)| candidate == name)
        .map(|(_, sub_model)| sub_model)
}

pub(crate) fn upsert_sub_model(sub_models: &mut Vec<(String, SubModel)>, name: String, sub_model: SubModel) {
    match sub_models.iter_mut().find(|(candidate, _)| *candidate == name) {
        Some((_, existing)) => *existing = sub_model,
        None => sub_models.push((name, sub_model)),
    }
}

/// Write `Begin SubModelPart` blocks for each sub-model at `layer`.
pub(crate) fn push_sub_models(lines: &mut Vec<String>, sub_models: &[(String, SubModel)], layer: usize) {
    for (name, sub_model) in sub_models {
        lines.push(indent(&format!("Begin SubModelPart {name}"), layer));
        lines.extend(sub_model.to_mdpa(layer + 1));
        lines.push(indent("End SubModelPart", layer));
        lines.push(String::new());
    }
}

pub(crate) fn indent(text: &str, layer: usize) -> String {
    format!("{}{text}", "    ".repeat(layer))
}

pub(crate) fn remove_trailing_blank(mut lines: Vec<String>) -> Vec<String> {
    if lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}

/// Integral values keep a `.0` suffix; everything else uses the shortest exact text.
pub(crate) fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

fn entity_line(id: i32, property_id: i32, node_ids: &[i32]) -> String {
    let mut line = format!("{id} {property_id}");
    for node_id in node_ids {
        line.push_str(&format!(" {node_id}"));
    }
    line
}
