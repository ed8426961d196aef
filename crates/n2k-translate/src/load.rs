//! Concentrated point loads.

use n2k_bulk::{BulkDataSection, Force};
use n2k_io::KratosLoad;
use n2k_mdpa::{Condition, SubModel};

use crate::config::AssemblyConfig;

/// Force of magnitude `modulus` along `direction` at one point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Load {
    pub node_id: i32,
    pub modulus: f64,
    pub direction: [f64; 3],
}

impl Load {
    pub fn from_nastran(force: &Force) -> Self {
        Self {
            node_id: force.g,
            modulus: force.f,
            direction: force.direction(),
        }
    }

    pub fn to_nastran(&self, sid: i32) -> Force {
        Force::new(sid, self.node_id, self.modulus, self.direction)
    }

    pub fn to_kratos_condition(&self, node: i32) -> Condition {
        Condition::new(0, vec![node])
    }

    pub fn to_kratos_sub_model(&self, node: i32, condition_id: i32) -> SubModel {
        SubModel::new()
            .with_nodes(vec![node])
            .with_conditions(vec![condition_id])
    }

    /// Point-load process for sub-model `load_<index>`.
    pub fn to_kratos_load(&self, index: i32, config: &AssemblyConfig) -> KratosLoad {
        KratosLoad {
            model_part_name: config.qualified(&format!("load_{index}")),
            modulus: self.modulus,
            direction: self.direction,
            interval: config.interval,
        }
    }

    pub fn from_kratos(node_id: i32, load: &KratosLoad) -> Self {
        Self {
            node_id,
            modulus: load.modulus,
            direction: load.direction,
        }
    }
}

pub fn loads_from(section: &BulkDataSection) -> Vec<Load> {
    section.forces().map(Load::from_nastran).collect()
}
