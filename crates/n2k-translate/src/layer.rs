//! The joined, integrity-checked view of a model and its assembly into both
//! target formats.

use std::collections::HashMap;

use n2k_bulk::{BulkDataEntry, BulkDataSection};
use n2k_io::{KratosSimulation, SimulationParameters, sub_model_name};
use n2k_mdpa::{Model, Properties, SubModel};
use nalgebra::Vector3;
use tracing::{debug, info};

use crate::config::AssemblyConfig;
use crate::connector::{Truss, connectors_from};
use crate::constraint::{Constraint, constraints_from};
use crate::error::{Result, TranslationError};
use crate::load::{Load, loads_from};
use crate::point::{Point, points_from};
use crate::rigid::{CouplingRow, Dof, Rbe2Connector, rbe2_connectors_from};

/// Set id of emitted FORCE entries.
pub const LOAD_SET_ID: i32 = 1;
/// Set id of emitted SPC entries.
pub const SPC_SET_ID: i32 = 2;

/// Everything a model consists of, with every cross reference resolved.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TranslationLayer {
    pub nodes: Vec<Point>,
    pub connectors: Vec<Truss>,
    pub constraints: Vec<Constraint>,
    pub loads: Vec<Load>,
    pub rigid_connectors: Vec<Rbe2Connector>,
}

/// Maps point ids to consecutive node ids 1..=N in point order.
struct NodeRenumbering {
    ids: HashMap<i32, i32>,
}

impl NodeRenumbering {
    fn new(points: &[Point]) -> Self {
        let ids = points
            .iter()
            .zip(1..)
            .map(|(point, node)| (point.id, node))
            .collect();
        Self { ids }
    }

    fn node(&self, point: i32, record: &str) -> Result<i32> {
        self.ids
            .get(&point)
            .copied()
            .ok_or_else(|| TranslationError::missing(record, "node", point, "point"))
    }
}

impl TranslationLayer {
    /// Join every supported entry of a section.
    pub fn from_nastran(section: &BulkDataSection) -> Result<Self> {
        let layer = Self {
            nodes: points_from(section),
            connectors: connectors_from(section)?,
            constraints: constraints_from(section),
            loads: loads_from(section),
            rigid_connectors: rbe2_connectors_from(section),
        };
        info!(
            nodes = layer.nodes.len(),
            trusses = layer.connectors.len(),
            constraints = layer.constraints.len(),
            loads = layer.loads.len(),
            rigid_connectors = layer.rigid_connectors.len(),
            "joined bulk data"
        );
        Ok(layer)
    }

    /// Assemble the model, materials and process lists.
    ///
    /// Nodes are renumbered 1..=N in point order, so original grid ids are
    /// not kept.
    pub fn to_kratos(&self, config: &AssemblyConfig) -> Result<KratosSimulation> {
        let renumbering = NodeRenumbering::new(&self.nodes);
        let mut builder = Model::builder();
        builder.add_property(0, Properties::new());
        for (point, node) in self.nodes.iter().zip(1..) {
            builder.add_node(node, point.to_kratos());
        }

        let mut materials = Vec::with_capacity(self.connectors.len());
        for (truss, index) in self.connectors.iter().zip(1..) {
            let record = format!("truss {index}");
            let nodes = [
                renumbering.node(truss.first_point, &record)?,
                renumbering.node(truss.second_point, &record)?,
            ];
            builder.add_element(&config.truss_element_type, index, truss.to_kratos_element(nodes));
            builder.add_sub_model(format!("truss_{index}"), truss.to_kratos_sub_model(nodes, index));
            materials.push(truss.to_kratos_material(index, config));
        }

        let mut constraints = Vec::with_capacity(self.constraints.len());
        for (constraint, index) in self.constraints.iter().zip(1..) {
            let node = renumbering.node(constraint.node_id, &format!("constraint {index}"))?;
            builder.add_sub_model(format!("constraint_{index}"), constraint.to_kratos_sub_model(node));
            constraints.push(constraint.to_kratos_constraint(index, config));
        }

        let mut loads = Vec::with_capacity(self.loads.len());
        for (load, index) in self.loads.iter().zip(1..) {
            let node = renumbering.node(load.node_id, &format!("load {index}"))?;
            builder.add_condition(&config.load_condition_type, index, load.to_kratos_condition(node));
            builder.add_sub_model(format!("load_{index}"), load.to_kratos_sub_model(node, index));
            loads.push(load.to_kratos_load(index, config));
        }

        let mut rigid_bodies = Vec::with_capacity(self.rigid_connectors.len());
        for (connector, index) in self.rigid_connectors.iter().zip(1..) {
            connector.validate()?;
            let record = format!("rbe2 {index}");
            let sub_model = connector.to_kratos_sub_model(|point| renumbering.node(point, &record))?;
            let master = renumbering.node(connector.dependent_node, &record)?;
            builder.add_sub_model(format!("rbe2_{index}"), sub_model);
            rigid_bodies.push(connector.to_kratos_process(index, master, config));
        }

        let model = builder.build();
        debug!(
            nodes = model.nodes().len(),
            sub_models = model.sub_models().len(),
            materials = materials.len(),
            "assembled kratos model"
        );
        let parameters = SimulationParameters::new(constraints, loads, rigid_bodies, &config.solver_settings());
        Ok(KratosSimulation::new(parameters, model, materials))
    }

    /// Rebuild from a solver model. Node ids become point ids.
    pub fn from_kratos(simulation: &KratosSimulation, config: &AssemblyConfig) -> Result<Self> {
        let model = &simulation.model;
        let nodes: Vec<Point> = model
            .nodes()
            .iter()
            .map(|(&id, node)| Point::from_kratos(id, node))
            .collect();

        let mut connectors = Vec::new();
        if let Some(elements) = model.elements().get(&config.truss_element_type) {
            for (&id, element) in elements {
                let sub_model = format!("truss_{id}");
                let material = simulation
                    .materials
                    .iter()
                    .find(|material| material.sub_model_name() == sub_model)
                    .ok_or_else(|| {
                        TranslationError::missing(format!("element {id}"), "sub-model", &sub_model, "material")
                    })?;
                connectors.push(Truss::from_kratos(id, element, material)?);
            }
        }

        let first_node = |model_part_name: &str| -> Result<i32> {
            let name = sub_model_name(model_part_name);
            let sub_model = model
                .sub_model(name)
                .ok_or_else(|| TranslationError::missing(model_part_name, "model_part_name", name, "sub-model"))?;
            sub_model
                .nodes()
                .first()
                .copied()
                .ok_or_else(|| TranslationError::domain(model_part_name, "sub-model has no nodes"))
        };

        let parameters = &simulation.parameters;
        let constraints = parameters
            .constraints
            .iter()
            .map(|constraint| Ok(Constraint::from_kratos(first_node(&constraint.model_part_name)?, constraint)))
            .collect::<Result<Vec<_>>>()?;
        let loads = parameters
            .loads
            .iter()
            .map(|load| Ok(Load::from_kratos(first_node(&load.model_part_name)?, load)))
            .collect::<Result<Vec<_>>>()?;

        let mut cm = Dof::DisplacementX.bit() | Dof::DisplacementY.bit() | Dof::DisplacementZ.bit();
        if parameters.rotation_dofs() {
            cm |= Dof::ROTATIONS.iter().fold(0, |mask, dof| mask | dof.bit());
        }
        let mut rigid_connectors = Vec::with_capacity(parameters.rigid_bodies.len());
        for process in &parameters.rigid_bodies {
            let name = sub_model_name(&process.model_part_name);
            let sub_model: &SubModel = model.sub_model(name).ok_or_else(|| {
                TranslationError::missing(&process.model_part_name, "model_part_name", name, "sub-model")
            })?;
            let slaves = sub_model
                .nodes()
                .iter()
                .copied()
                .filter(|&node| node != process.master_node_id)
                .collect();
            rigid_connectors.push(Rbe2Connector::new(process.master_node_id, slaves, cm));
        }

        let layer = Self {
            nodes,
            connectors,
            constraints,
            loads,
            rigid_connectors,
        };
        info!(
            nodes = layer.nodes.len(),
            trusses = layer.connectors.len(),
            constraints = layer.constraints.len(),
            loads = layer.loads.len(),
            "read kratos model"
        );
        Ok(layer)
    }

    /// Bulk data with fresh property, material and element ids.
    ///
    /// Constraints that fix nothing are dropped.
    pub fn to_nastran(&self) -> BulkDataSection {
        let mut crods = Vec::new();
        let mut prods = Vec::new();
        let mut mat1s = Vec::new();
        for (truss, index) in self.connectors.iter().zip(1..) {
            let (crod, prod, mat1) = truss.to_nastran(index);
            crods.push(BulkDataEntry::Crod(crod));
            prods.push(BulkDataEntry::Prod(prod));
            mat1s.push(BulkDataEntry::Mat1(mat1));
        }

        let grids = self.nodes.iter().map(|point| BulkDataEntry::Grid(point.to_nastran()));
        let forces = self.loads.iter().map(|load| BulkDataEntry::Force(load.to_nastran(LOAD_SET_ID)));
        let spcs = self
            .constraints
            .iter()
            .filter_map(|constraint| constraint.to_nastran(SPC_SET_ID))
            .map(BulkDataEntry::Spc);
        let rbe2s = self
            .rigid_connectors
            .iter()
            .zip(1..)
            .map(|(connector, eid)| BulkDataEntry::Rbe2(connector.to_nastran(eid)));

        grids
            .chain(crods)
            .chain(prods)
            .chain(mat1s)
            .chain(forces)
            .chain(spcs)
            .chain(rbe2s)
            .collect()
    }

    /// Coupling rows of every rigid connector, keyed by point ids.
    pub fn coupling_rows(&self, rotation_dofs: bool) -> Result<Vec<CouplingRow>> {
        let positions: HashMap<i32, Vector3<f64>> =
            self.nodes.iter().map(|point| (point.id, point.position())).collect();
        let mut rows = Vec::new();
        for connector in &self.rigid_connectors {
            rows.extend(connector.coupling_rows(&positions, rotation_dofs)?);
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use n2k_bulk::{Crod, Force, Grid, Mat1, Prod, Rbe2, Spc};

    fn rod_section() -> BulkDataSection {
        BulkDataSection::new(vec![
            Grid::new(10, 0.0, 0.0, 0.0).into(),
            Grid::new(20, 1000.0, 0.0, 0.0).into(),
            Crod::new(1, 1, 10, 20).into(),
            Prod::new(1, 1, 350.0).into(),
            Mat1::new(1).with_young_modulus(210000.0).into(),
            Force::new(1, 20, 40000.0, [1.0, 0.0, 0.0]).into(),
            Spc::new(2, 10, 123456).into(),
        ])
    }

    #[test]
    fn renumbers_nodes() {
        let layer = TranslationLayer::from_nastran(&rod_section()).expect("join");
        let simulation = layer.to_kratos(&AssemblyConfig::default()).expect("assemble");
        let model = &simulation.model;

        assert_eq!(model.nodes().keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        let trusses = model.elements().get("TrussLinearElement3D2N").expect("truss block");
        assert_eq!(trusses[&1].node_ids, vec![1, 2]);
        let loads = model.conditions().get("PointLoadCondition2D1N").expect("load block");
        assert_eq!(loads[&1].node_ids, vec![2]);
        assert_eq!(model.sub_model("constraint_1").expect("constraint").nodes(), &[1]);
        assert!(model.properties()[&0].is_empty());
    }

    #[test]
    fn dangling_node_reference() {
        let mut layer = TranslationLayer::from_nastran(&rod_section()).expect("join");
        layer.loads[0].node_id = 99;
        let err = layer.to_kratos(&AssemblyConfig::default()).expect_err("point 99 is unknown");
        assert!(matches!(err, TranslationError::MissingReference { target: "point", .. }));
    }

    #[test]
    fn rigid_connector_without_slaves() {
        let layer = TranslationLayer {
            nodes: vec![Point::new(1, 0.0, 0.0, 0.0)],
            rigid_connectors: vec![Rbe2Connector::new(1, vec![], 0b111)],
            ..Default::default()
        };
        let err = layer.to_kratos(&AssemblyConfig::default()).expect_err("no slaves");
        assert!(matches!(err, TranslationError::Domain { .. }));
    }

    #[test]
    fn kratos_round_trip_keeps_renumbered_ids() {
        let section: BulkDataSection = rod_section()
            .entries()
            .iter()
            .cloned()
            .chain([Grid::new(30, 0.0, 0.0, 5.0).into(), Rbe2::new(7, 20, 0b111, vec![30]).into()])
            .collect();
        let layer = TranslationLayer::from_nastran(&section).expect("join");
        let config = AssemblyConfig::default();
        let simulation = layer.to_kratos(&config).expect("assemble");

        let back = TranslationLayer::from_kratos(&simulation, &config).expect("read back");
        assert_eq!(back.nodes[1], Point::new(2, 1000.0, 0.0, 0.0));
        assert_eq!(
            back.connectors,
            vec![Truss {
                first_point: 1,
                second_point: 2,
                cross_section: 350.0,
                material: Material::new("MAT1_1", Some(210000.0)),
            }]
        );
        assert_eq!(back.loads[0].node_id, 2);
        assert_eq!(back.constraints[0].node_id, 1);
        assert_eq!(back.constraints[0].translation_by_axis, [true; 3]);
        assert_eq!(back.rigid_connectors, vec![Rbe2Connector::new(2, vec![3], 0b111)]);
    }

    #[test]
    fn missing_material_entry() {
        let config = AssemblyConfig::default();
        let mut simulation = TranslationLayer::from_nastran(&rod_section())
            .expect("join")
            .to_kratos(&config)
            .expect("assemble");
        simulation.materials.clear();
        let err = TranslationLayer::from_kratos(&simulation, &config).expect_err("no material");
        assert!(matches!(err, TranslationError::MissingReference { target: "material", .. }));
    }

    #[test]
    fn nastran_emission_order() {
        let layer = TranslationLayer::from_nastran(&rod_section()).expect("join");
        let identifiers: Vec<&str> = layer.to_nastran().entries().iter().map(BulkDataEntry::identifier).collect();
        assert_eq!(identifiers, vec!["GRID", "GRID", "CROD", "PROD", "MAT1", "FORCE", "SPC"]);
    }

    #[test]
    fn coupling_rows_use_point_ids() {
        let layer = TranslationLayer {
            nodes: vec![Point::new(5, 0.0, 0.0, 0.0), Point::new(6, 0.0, 0.0, 2.0)],
            rigid_connectors: vec![Rbe2Connector::new(5, vec![6], 0b1)],
            ..Default::default()
        };
        let rows = layer.coupling_rows(true).expect("rows");
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.master_node == 5 && row.slave_node == 6));
    }
}
