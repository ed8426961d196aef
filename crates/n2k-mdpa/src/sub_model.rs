//! Named groups of model entities.

use crate::model::{find_sub_model, indent, push_sub_models, remove_trailing_blank, upsert_sub_model};

/// A group of entity ids from the enclosing model, possibly with nested groups.
///
/// Built with the consuming `with_*` methods and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubModel {
    properties: Vec<i32>,
    nodes: Vec<i32>,
    elements: Vec<i32>,
    conditions: Vec<i32>,
    sub_models: Vec<(String, SubModel)>,
}

impl SubModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_properties(mut self, ids: Vec<i32>) -> Self {
        self.properties = ids;
        self
    }

    pub fn with_nodes(mut self, ids: Vec<i32>) -> Self {
        self.nodes = ids;
        self
    }

    pub fn with_elements(mut self, ids: Vec<i32>) -> Self {
        self.elements = ids;
        self
    }

    pub fn with_conditions(mut self, ids: Vec<i32>) -> Self {
        self.conditions = ids;
        self
    }

    pub fn with_sub_model(mut self, name: impl Into<String>, sub_model: SubModel) -> Self {
        upsert_sub_model(&mut self.sub_models, name.into(), sub_model);
        self
    }

    pub fn properties(&self) -> &[i32] {
        &self.properties
    }

    pub fn nodes(&self) -> &[i32] {
        &self.nodes
    }

    pub fn elements(&self) -> &[i32] {
        &self.elements
    }

    pub fn conditions(&self) -> &[i32] {
        &self.conditions
    }

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

    /// Render the body of this sub-model with its blocks indented to `layer`.
    ///
    /// The enclosing `Begin SubModelPart` / `End SubModelPart` pair is written
    /// by the parent.
    pub fn to_mdpa(&self, layer: usize) -> Vec<String> {
        let mut lines = Vec::new();
        let id_blocks = [
            ("SubModelPartProperties", &self.properties),
            ("SubModelPartNodes", &self.nodes),
            ("SubModelPartElements", &self.elements),
            ("SubModelPartConditions", &self.conditions),
        ];

        for (section, ids) in id_blocks {
            if ids.is_empty() {
                continue;
            }
            lines.push(indent(&format!("Begin {section}"), layer));
            lines.extend(ids.iter().map(|id| indent(&id.to_string(), layer + 1)));
            lines.push(indent(&format!("End {section}"), layer));
            lines.push(String::new());
        }

        push_sub_models(&mut lines, &self.sub_models, layer);
        remove_trailing_blank(lines)
    }
}
