//! RBE2 rigid connectors and their master-slave coupling rows.
//!
//! A rigid body moves every slave node with its master:
//! `u_slave = u_master + θ_master × r` with `r = x_slave - x_master`, and
//! `θ_slave = θ_master`. Each constrained degree of freedom of each slave
//! becomes one or more [`CouplingRow`]s.

use std::collections::HashMap;
use std::fmt;

use n2k_bulk::{BulkDataSection, Rbe2};
use n2k_io::Rbe2Process;
use n2k_mdpa::SubModel;
use nalgebra::Vector3;
use tracing::debug;

use crate::config::AssemblyConfig;
use crate::error::{Result, TranslationError};

/// Couplings with a smaller coefficient magnitude are dropped.
pub const COEFFICIENT_TOLERANCE: f64 = 1e-12;

/// Nodal degree of freedom. Bit `i` of an RBE2 mask selects `Dof::ALL[i]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dof {
    DisplacementX,
    DisplacementY,
    DisplacementZ,
    RotationX,
    RotationY,
    RotationZ,
}

impl Dof {
    pub const ALL: [Dof; 6] = [
        Dof::DisplacementX,
        Dof::DisplacementY,
        Dof::DisplacementZ,
        Dof::RotationX,
        Dof::RotationY,
        Dof::RotationZ,
    ];

    pub const ROTATIONS: [Dof; 3] = [Dof::RotationX, Dof::RotationY, Dof::RotationZ];

    /// Solver variable name, e.g. `DISPLACEMENT_X`.
    pub fn variable_name(self) -> &'static str {
        match self {
            Dof::DisplacementX => "DISPLACEMENT_X",
            Dof::DisplacementY => "DISPLACEMENT_Y",
            Dof::DisplacementZ => "DISPLACEMENT_Z",
            Dof::RotationX => "ROTATION_X",
            Dof::RotationY => "ROTATION_Y",
            Dof::RotationZ => "ROTATION_Z",
        }
    }

    pub fn is_translation(self) -> bool {
        matches!(self, Dof::DisplacementX | Dof::DisplacementY | Dof::DisplacementZ)
    }

    /// Axis index 0..=2 (X, Y, Z).
    pub fn axis(self) -> usize {
        match self {
            Dof::DisplacementX | Dof::RotationX => 0,
            Dof::DisplacementY | Dof::RotationY => 1,
            Dof::DisplacementZ | Dof::RotationZ => 2,
        }
    }

    /// Mask bit selecting this degree of freedom.
    pub fn bit(self) -> i32 {
        let position = if self.is_translation() { self.axis() } else { self.axis() + 3 };
        1 << position
    }
}

impl fmt::Display for Dof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.variable_name())
    }
}

/// `slave_dof = Σ coefficient · master_dof + constant`, one term per row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CouplingRow {
    pub master_node: i32,
    pub master_dof: Dof,
    pub slave_node: i32,
    pub slave_dof: Dof,
    pub coefficient: f64,
    pub constant: f64,
}

/// Contribution of master rotation `rotation` to slave translation
/// `translation` for lever arm `r`: component `translation` of `e_rotation × r`.
///
/// Zero when either argument is of the wrong kind.
pub fn lever_coefficient(translation: Dof, rotation: Dof, r: &Vector3<f64>) -> f64 {
    if !translation.is_translation() || rotation.is_translation() {
        return 0.0;
    }
    let unit = Vector3::ith(rotation.axis(), 1.0);
    unit.cross(r)[translation.axis()]
}

/// Rigid element: every independent node follows the dependent node.
///
/// The names follow the element's own vocabulary: `dependent_node` is the
/// RBE2 `GN` grid and acts as master of the coupling, `independent_nodes` are
/// the `GMi` grids and act as slaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rbe2Connector {
    pub dependent_node: i32,
    pub independent_nodes: Vec<i32>,
    /// Constrained degree-of-freedom mask, see [`Dof::bit`]
    pub cm: i32,
}

impl Rbe2Connector {
    pub fn new(dependent_node: i32, independent_nodes: Vec<i32>, cm: i32) -> Self {
        Self {
            dependent_node,
            independent_nodes,
            cm,
        }
    }

    pub fn from_nastran(rbe2: &Rbe2) -> Self {
        Self::new(rbe2.gn, rbe2.gmi.clone(), rbe2.cm)
    }

    pub fn to_nastran(&self, eid: i32) -> Rbe2 {
        Rbe2::new(eid, self.dependent_node, self.cm, self.independent_nodes.clone())
    }

    /// Degrees of freedom selected by `cm`, in [`Dof::ALL`] order.
    pub fn constrained_dofs(&self) -> Vec<Dof> {
        Dof::ALL
            .into_iter()
            .filter(|dof| self.cm & dof.bit() != 0)
            .collect()
    }

    fn record(&self) -> String {
        format!("RBE2 on node {}", self.dependent_node)
    }

    pub fn validate(&self) -> Result<()> {
        if self.independent_nodes.is_empty() {
            return Err(TranslationError::domain(
                self.record(),
                "Independent nodes list cannot be empty.",
            ));
        }
        if self.constrained_dofs().is_empty() {
            return Err(TranslationError::domain(
                self.record(),
                "No constrained DOFs specified in CM bitmask.",
            ));
        }
        Ok(())
    }

    /// Master plus distinct slaves, mapped through `renumber`.
    pub fn to_kratos_sub_model(&self, renumber: impl Fn(i32) -> Result<i32>) -> Result<SubModel> {
        let mut nodes = vec![renumber(self.dependent_node)?];
        for &slave in &self.independent_nodes {
            let node = renumber(slave)?;
            if !nodes.contains(&node) {
                nodes.push(node);
            }
        }
        Ok(SubModel::new().with_nodes(nodes))
    }

    /// Coupling process for sub-model `rbe2_<index>`.
    pub fn to_kratos_process(&self, index: i32, master_node_id: i32, config: &AssemblyConfig) -> Rbe2Process {
        Rbe2Process {
            main_model_part_name: config.model_part_name.clone(),
            model_part_name: format!("rbe2_{index}"),
            master_node_id,
            interval: config.interval,
        }
    }

    /// Expand into coupling rows.
    ///
    /// Per slave and constrained translation: an equality with the master's
    /// same translation, plus lever-arm terms from the master's rotations
    /// when nodes carry rotations. Per constrained rotation (only when nodes
    /// carry rotations): an equality with the master's same rotation. A slave
    /// equal to the master is skipped.
    pub fn coupling_rows(
        &self,
        positions: &HashMap<i32, Vector3<f64>>,
        rotation_dofs: bool,
    ) -> Result<Vec<CouplingRow>> {
        self.validate()?;
        let position = |node: i32| {
            positions
                .get(&node)
                .ok_or_else(|| TranslationError::missing(self.record(), "node", node, "point"))
        };
        let master = self.dependent_node;
        let master_position = position(master)?;
        let dofs = self.constrained_dofs();

        let mut rows = Vec::new();
        for &slave in &self.independent_nodes {
            if slave == master {
                continue;
            }
            let r = position(slave)? - master_position;
            let row = |master_dof: Dof, slave_dof: Dof, coefficient: f64| CouplingRow {
                master_node: master,
                master_dof,
                slave_node: slave,
                slave_dof,
                coefficient,
                constant: 0.0,
            };

            for &dof in &dofs {
                if dof.is_translation() {
                    rows.push(row(dof, dof, 1.0));
                    if rotation_dofs {
                        for rotation in Dof::ROTATIONS {
                            let coefficient = lever_coefficient(dof, rotation, &r);
                            if coefficient.abs() >= COEFFICIENT_TOLERANCE {
                                rows.push(row(rotation, dof, coefficient));
                            }
                        }
                    }
                } else if rotation_dofs {
                    rows.push(row(dof, dof, 1.0));
                }
            }
        }

        debug!(master, rows = rows.len(), "expanded rigid coupling");
        Ok(rows)
    }
}

pub fn rbe2_connectors_from(section: &BulkDataSection) -> Vec<Rbe2Connector> {
    section.rbe2s().map(Rbe2Connector::from_nastran).collect()
}
