//! The three artifacts of a Kratos run kept together.

use n2k_mdpa::{Model, from_mdpa};
use tracing::info;

use crate::error::Result;
use crate::materials::{KratosMaterial, materials_from_json, materials_to_json};
use crate::parameters::SimulationParameters;

/// Model, materials and simulation parameters of one analysis.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KratosSimulation {
    pub parameters: SimulationParameters,
    pub model: Model,
    pub materials: Vec<KratosMaterial>,
}

impl KratosSimulation {
    pub fn new(parameters: SimulationParameters, model: Model, materials: Vec<KratosMaterial>) -> Self {
        Self {
            parameters,
            model,
            materials,
        }
    }

    /// Read the three documents from their text.
    pub fn from_parts(mdpa: &str, materials_json: &str, parameters_json: &str) -> Result<Self> {
        let simulation = Self {
            parameters: SimulationParameters::from_json(parameters_json)?,
            model: from_mdpa(mdpa)?,
            materials: materials_from_json(materials_json)?,
        };
        info!(
            nodes = simulation.model.nodes().len(),
            materials = simulation.materials.len(),
            "loaded kratos simulation"
        );
        Ok(simulation)
    }

    pub fn mdpa(&self) -> String {
        self.model.to_mdpa_string()
    }

    pub fn materials_json(&self) -> Result<String> {
        materials_to_json(&self.materials)
    }

    pub fn parameters_json(&self) -> Result<String> {
        self.parameters.to_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IoError;
    use n2k_mdpa::{ModelBuilder, Node};

    #[test]
    fn documents_read_back() {
        let mut builder = ModelBuilder::new();
        builder.add_node(1, Node::new(0.0, 1.0, 2.0));
        let simulation = KratosSimulation::new(SimulationParameters::default(), builder.build(), Vec::new());

        let back = KratosSimulation::from_parts(
            &simulation.mdpa(),
            &simulation.materials_json().expect("materials"),
            &simulation.parameters_json().expect("parameters"),
        )
        .expect("documents should parse");
        assert_eq!(back, simulation);
    }

    #[test]
    fn broken_model_text_surfaces_as_mdpa_error() {
        let err = KratosSimulation::from_parts("Begin Nodes\n", "{}", "{}").expect_err("unterminated");
        assert!(matches!(err, IoError::Mdpa(_)));
    }
}
