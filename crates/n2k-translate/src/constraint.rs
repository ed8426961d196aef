//! Single-point constraints.

use n2k_bulk::{BulkDataSection, Spc, component_digits};
use n2k_io::KratosConstraint;
use n2k_mdpa::SubModel;

use crate::config::AssemblyConfig;

/// Fixed degrees of freedom of one point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraint {
    pub node_id: i32,
    /// Fixed translations along X, Y, Z
    pub translation_by_axis: [bool; 3],
    /// Fixed rotations about X, Y, Z
    pub rotation_by_axis: [bool; 3],
}

impl Constraint {
    /// Read components 1..=3 as translations and 4..=6 as rotations. Only the
    /// first grid of the SPC is used.
    pub fn from_nastran(spc: &Spc) -> Self {
        let digits = component_digits(spc.c1);
        let has = |digit: u32| digits.contains(&digit);
        Self {
            node_id: spc.g1,
            translation_by_axis: [has(1), has(2), has(3)],
            rotation_by_axis: [has(4), has(5), has(6)],
        }
    }

    /// Component number listing every fixed degree of freedom, e.g. `135`.
    pub fn components(&self) -> Option<i32> {
        let flags = self.translation_by_axis.iter().chain(self.rotation_by_axis.iter());
        let digits: String = flags
            .zip('1'..='6')
            .filter_map(|(fixed, digit)| fixed.then_some(digit))
            .collect();
        digits.parse().ok()
    }

    /// SPC in set `sid`, or `None` when nothing is fixed.
    pub fn to_nastran(&self, sid: i32) -> Option<Spc> {
        Some(Spc::new(sid, self.node_id, self.components()?))
    }

    pub fn to_kratos_sub_model(&self, node: i32) -> SubModel {
        SubModel::new().with_nodes(vec![node])
    }

    /// Zero-displacement process for sub-model `constraint_<index>`.
    pub fn to_kratos_constraint(&self, index: i32, config: &AssemblyConfig) -> KratosConstraint {
        KratosConstraint {
            model_part_name: config.qualified(&format!("constraint_{index}")),
            constrained_per_axis: self.translation_by_axis,
            value_per_axis: self.translation_by_axis.map(|fixed| fixed.then_some(0.0)),
            interval: config.interval,
        }
    }

    /// Rotations are not carried by the displacement process and come back free.
    pub fn from_kratos(node_id: i32, constraint: &KratosConstraint) -> Self {
        Self {
            node_id,
            translation_by_axis: constraint.constrained_per_axis,
            rotation_by_axis: [false; 3],
        }
    }
}

pub fn constraints_from(section: &BulkDataSection) -> Vec<Constraint> {
    section.spcs().map(Constraint::from_nastran).collect()
}
