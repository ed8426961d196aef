//! Simulation parameters document.
//!
//! The document is a fixed solver configuration plus three process lists:
//! constraints (`AssignVectorVariableProcess` on `DISPLACEMENT`), loads
//! (`ApplyVectorByDirectionToConditionProcess` on `POINT_LOAD`) and other
//! processes, where rigid couplings (`ImposeRBE2Process`) live. Everything
//! outside the process lists is carried through unchanged.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::error::{IoError, Result};

const CONSTRAINTS_KEY: &str = "constraints_process_list";
const LOADS_KEY: &str = "loads_process_list";
const OTHER_PROCESSES_KEY: &str = "list_other_processes";
const RBE2_PROCESS_NAME: &str = "ImposeRBE2Process";

/// Time window in which a process is active; `end == None` is open-ended.
///
/// Serialized as `[start, end]` with `"End"` standing for an open end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "IntervalWire", try_from = "IntervalWire")]
pub struct ActivationInterval {
    pub start: f64,
    pub end: Option<f64>,
}

impl ActivationInterval {
    pub const fn open_ended(start: f64) -> Self {
        Self { start, end: None }
    }

    pub const fn bounded(start: f64, end: f64) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// Whether `time` lies in `[start, end]`.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && self.end.is_none_or(|end| time <= end)
    }
}

impl Default for ActivationInterval {
    fn default() -> Self {
        Self::open_ended(0.0)
    }
}

#[derive(Serialize, Deserialize)]
struct IntervalWire(f64, IntervalEnd);

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum IntervalEnd {
    Time(f64),
    Keyword(String),
}

impl From<ActivationInterval> for IntervalWire {
    fn from(interval: ActivationInterval) -> Self {
        match interval.end {
            Some(end) => IntervalWire(interval.start, IntervalEnd::Time(end)),
            None => IntervalWire(interval.start, IntervalEnd::Keyword("End".to_string())),
        }
    }
}

impl TryFrom<IntervalWire> for ActivationInterval {
    type Error = String;

    fn try_from(wire: IntervalWire) -> std::result::Result<Self, Self::Error> {
        match wire.1 {
            IntervalEnd::Time(end) => Ok(Self::bounded(wire.0, end)),
            IntervalEnd::Keyword(keyword) if keyword == "End" => Ok(Self::open_ended(wire.0)),
            IntervalEnd::Keyword(keyword) => Err(format!("unknown interval end {keyword:?}")),
        }
    }
}

/// Fixed displacement on the nodes of one sub-model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ConstraintProcess", into = "ConstraintProcess")]
pub struct KratosConstraint {
    pub model_part_name: String,
    pub constrained_per_axis: [bool; 3],
    /// Imposed value per axis; `None` where the axis is free.
    pub value_per_axis: [Option<f64>; 3],
    pub interval: ActivationInterval,
}

#[derive(Serialize, Deserialize)]
struct ConstraintProcess {
    #[serde(default)]
    python_module: String,
    #[serde(default)]
    kratos_module: String,
    #[serde(default)]
    process_name: String,
    #[serde(rename = "Parameters")]
    parameters: ConstraintParameters,
}

#[derive(Serialize, Deserialize)]
struct ConstraintParameters {
    model_part_name: String,
    #[serde(default)]
    variable_name: String,
    #[serde(default)]
    interval: ActivationInterval,
    constrained: [bool; 3],
    value: [Option<f64>; 3],
}

impl From<ConstraintProcess> for KratosConstraint {
    fn from(process: ConstraintProcess) -> Self {
        let parameters = process.parameters;
        Self {
            model_part_name: parameters.model_part_name,
            constrained_per_axis: parameters.constrained,
            value_per_axis: parameters.value,
            interval: parameters.interval,
        }
    }
}

impl From<KratosConstraint> for ConstraintProcess {
    fn from(constraint: KratosConstraint) -> Self {
        Self {
            python_module: "assign_vector_variable_process".to_string(),
            kratos_module: "KratosMultiphysics".to_string(),
            process_name: "AssignVectorVariableProcess".to_string(),
            parameters: ConstraintParameters {
                model_part_name: constraint.model_part_name,
                variable_name: "DISPLACEMENT".to_string(),
                interval: constraint.interval,
                constrained: constraint.constrained_per_axis,
                value: constraint.value_per_axis,
            },
        }
    }
}

/// Point load of magnitude `modulus` along `direction` on one sub-model's conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "LoadProcess", into = "LoadProcess")]
pub struct KratosLoad {
    pub model_part_name: String,
    pub modulus: f64,
    pub direction: [f64; 3],
    pub interval: ActivationInterval,
}

#[derive(Serialize, Deserialize)]
struct LoadProcess {
    #[serde(default)]
    python_module: String,
    #[serde(default)]
    kratos_module: String,
    #[serde(default)]
    check: String,
    #[serde(default)]
    process_name: String,
    #[serde(rename = "Parameters")]
    parameters: LoadParameters,
}

#[derive(Serialize, Deserialize)]
struct LoadParameters {
    model_part_name: String,
    #[serde(default)]
    variable_name: String,
    #[serde(default)]
    interval: ActivationInterval,
    modulus: f64,
    direction: [f64; 3],
}

impl From<LoadProcess> for KratosLoad {
    fn from(process: LoadProcess) -> Self {
        let parameters = process.parameters;
        Self {
            model_part_name: parameters.model_part_name,
            modulus: parameters.modulus,
            direction: parameters.direction,
            interval: parameters.interval,
        }
    }
}

impl From<KratosLoad> for LoadProcess {
    fn from(load: KratosLoad) -> Self {
        Self {
            python_module: "assign_vector_by_direction_to_condition_process".to_string(),
            kratos_module: "KratosMultiphysics".to_string(),
            check: "DirectorVectorNonZero direction".to_string(),
            process_name: "ApplyVectorByDirectionToConditionProcess".to_string(),
            parameters: LoadParameters {
                model_part_name: load.model_part_name,
                variable_name: "POINT_LOAD".to_string(),
                interval: load.interval,
                modulus: load.modulus,
                direction: load.direction,
            },
        }
    }
}

/// Rigid coupling of a sub-model's nodes to its master node.
///
/// The hosting solver expands it into linear master-slave constraints at
/// initialization and activates them while its interval holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Rbe2ProcessEntry", into = "Rbe2ProcessEntry")]
pub struct Rbe2Process {
    pub main_model_part_name: String,
    /// Sub-model holding the master and slave nodes, relative to the main model part
    pub model_part_name: String,
    pub master_node_id: i32,
    pub interval: ActivationInterval,
}

#[derive(Serialize, Deserialize)]
struct Rbe2ProcessEntry {
    #[serde(default)]
    python_module: String,
    #[serde(default)]
    kratos_module: String,
    #[serde(default)]
    process_name: String,
    #[serde(rename = "Parameters")]
    parameters: Rbe2Parameters,
}

#[derive(Serialize, Deserialize)]
struct Rbe2Parameters {
    #[serde(default = "default_main_model_part_name")]
    main_model_part_name: String,
    model_part_name: String,
    master_node_id: i32,
    #[serde(default)]
    interval: ActivationInterval,
}

fn default_main_model_part_name() -> String {
    "Structure".to_string()
}

impl From<Rbe2ProcessEntry> for Rbe2Process {
    fn from(entry: Rbe2ProcessEntry) -> Self {
        let parameters = entry.parameters;
        Self {
            main_model_part_name: parameters.main_model_part_name,
            model_part_name: parameters.model_part_name,
            master_node_id: parameters.master_node_id,
            interval: parameters.interval,
        }
    }
}

impl From<Rbe2Process> for Rbe2ProcessEntry {
    fn from(process: Rbe2Process) -> Self {
        Self {
            python_module: "impose_rbe2_process".to_string(),
            kratos_module: "StructuralMechanicsApplication".to_string(),
            process_name: RBE2_PROCESS_NAME.to_string(),
            parameters: Rbe2Parameters {
                main_model_part_name: process.main_model_part_name,
                model_part_name: process.model_part_name,
                master_node_id: process.master_node_id,
                interval: process.interval,
            },
        }
    }
}

/// The configurable part of the static solver block.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverSettings {
    pub model_part_name: String,
    pub rotation_dofs: bool,
    pub end_time: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            model_part_name: "Structure".to_string(),
            rotation_dofs: false,
            end_time: 1.0,
        }
    }
}

impl SolverSettings {
    /// Full parameters document without the `processes` block.
    pub fn document(&self) -> Value {
        json!({
            "problem_data": {
                "problem_name": self.model_part_name,
                "parallel_type": "OpenMP",
                "echo_level": 1,
                "start_time": 0.0,
                "end_time": self.end_time
            },
            "solver_settings": {
                "time_stepping": {"time_step": 1.1},
                "solver_type": "Static",
                "model_part_name": self.model_part_name,
                "domain_size": 3,
                "echo_level": 0,
                "analysis_type": "linear",
                "model_import_settings": {
                    "input_type": "mdpa",
                    "input_filename": "model"
                },
                "material_import_settings": {
                    "materials_filename": "materials.json"
                },
                "line_search": false,
                "convergence_criterion": "residual_criterion",
                "displacement_relative_tolerance": 0.0001,
                "displacement_absolute_tolerance": 1e-9,
                "residual_relative_tolerance": 0.0001,
                "residual_absolute_tolerance": 1e-9,
                "max_iteration": 10,
                "rotation_dofs": self.rotation_dofs,
                "volumetric_strain_dofs": false
            },
            "output_processes": {
                "vtk_output": [{
                    "python_module": "vtk_output_process",
                    "kratos_module": "KratosMultiphysics",
                    "process_name": "VtkOutputProcess",
                    "Parameters": {
                        "model_part_name": self.model_part_name,
                        "output_control_type": "step",
                        "output_interval": 1,
                        "file_format": "ascii",
                        "output_precision": 7,
                        "output_sub_model_parts": false,
                        "output_path": "vtk_output",
                        "save_output_files_in_folder": true,
                        "nodal_solution_step_data_variables": ["DISPLACEMENT", "REACTION"],
                        "nodal_data_value_variables": [],
                        "element_data_value_variables": [],
                        "condition_data_value_variables": [],
                        "gauss_point_variables_extrapolated_to_nodes": []
                    }
                }]
            },
            "analysis_stage": "KratosMultiphysics.StructuralMechanicsApplication.structural_mechanics_analysis"
        })
    }
}

/// Process lists plus the pass-through solver configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParameters {
    pub constraints: Vec<KratosConstraint>,
    pub loads: Vec<KratosLoad>,
    pub rigid_bodies: Vec<Rbe2Process>,
    /// Entries of `list_other_processes` that are not rigid couplings
    pub other_processes: Vec<Value>,
    settings: Map<String, Value>,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new(), &SolverSettings::default())
    }
}

impl SimulationParameters {
    pub fn new(
        constraints: Vec<KratosConstraint>,
        loads: Vec<KratosLoad>,
        rigid_bodies: Vec<Rbe2Process>,
        solver: &SolverSettings,
    ) -> Self {
        let settings = match solver.document() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            constraints,
            loads,
            rigid_bodies,
            other_processes: Vec::new(),
            settings,
        }
    }

    /// Everything except the `processes` block.
    pub fn settings(&self) -> &Map<String, Value> {
        &self.settings
    }

    fn solver_setting(&self, key: &str) -> Option<&Value> {
        self.settings.get("solver_settings")?.get(key)
    }

    pub fn model_part_name(&self) -> &str {
        self.solver_setting("model_part_name")
            .and_then(Value::as_str)
            .unwrap_or("Structure")
    }

    pub fn rotation_dofs(&self) -> bool {
        self.solver_setting("rotation_dofs")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn to_json_value(&self) -> Result<Value> {
        let mut other = serde_json::to_value(&self.rigid_bodies)?;
        if let Value::Array(items) = &mut other {
            items.extend(self.other_processes.iter().cloned());
        }

        let mut processes = Map::new();
        processes.insert(CONSTRAINTS_KEY.to_string(), serde_json::to_value(&self.constraints)?);
        processes.insert(LOADS_KEY.to_string(), serde_json::to_value(&self.loads)?);
        processes.insert(OTHER_PROCESSES_KEY.to_string(), other);

        let mut document = self.settings.clone();
        document.insert("processes".to_string(), Value::Object(processes));
        Ok(Value::Object(document))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_json_value()?)?)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let Value::Object(mut settings) = serde_json::from_str::<Value>(raw)? else {
            return Err(IoError::InvalidData(
                "simulation parameters must be a JSON object".to_string(),
            ));
        };
        let processes = settings.remove("processes").unwrap_or(Value::Null);

        let constraints: Vec<KratosConstraint> = process_list(&processes, CONSTRAINTS_KEY)?;
        let loads: Vec<KratosLoad> = process_list(&processes, LOADS_KEY)?;
        let mut rigid_bodies: Vec<Rbe2Process> = Vec::new();
        let mut other_processes = Vec::new();
        for process in process_list::<Value>(&processes, OTHER_PROCESSES_KEY)? {
            if process.get("process_name").and_then(Value::as_str) == Some(RBE2_PROCESS_NAME) {
                rigid_bodies.push(serde_json::from_value(process)?);
            } else {
                other_processes.push(process);
            }
        }

        debug!(
            constraints = constraints.len(),
            loads = loads.len(),
            rigid_bodies = rigid_bodies.len(),
            "read simulation parameters"
        );
        Ok(Self {
            constraints,
            loads,
            rigid_bodies,
            other_processes,
            settings,
        })
    }
}

fn process_list<T: DeserializeOwned>(processes: &Value, key: &str) -> Result<Vec<T>> {
    match processes.get(key) {
        Some(list) => Ok(serde_json::from_value(list.clone())?),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constraint() -> KratosConstraint {
        KratosConstraint {
            model_part_name: "Structure.constraint_1".to_string(),
            constrained_per_axis: [true, false, true],
            value_per_axis: [Some(0.0), None, Some(0.0)],
            interval: ActivationInterval::default(),
        }
    }

    fn load() -> KratosLoad {
        KratosLoad {
            model_part_name: "Structure.load_1".to_string(),
            modulus: 40000.0,
            direction: [1.0, 0.0, 0.0],
            interval: ActivationInterval::default(),
        }
    }

    fn rbe2() -> Rbe2Process {
        Rbe2Process {
            main_model_part_name: "Structure".to_string(),
            model_part_name: "rbe2_1".to_string(),
            master_node_id: 3,
            interval: ActivationInterval::default(),
        }
    }

    #[test]
    fn interval_membership() {
        let open = ActivationInterval::default();
        assert!(open.contains(0.0));
        assert!(open.contains(1e30));
        assert!(!open.contains(-0.1));

        let bounded = ActivationInterval::bounded(0.5, 1.0);
        assert!(bounded.contains(1.0));
        assert!(!bounded.contains(1.5));
    }

    #[test]
    fn interval_wire_format() {
        let open = serde_json::to_value(ActivationInterval::default()).expect("serialize");
        assert_eq!(open, json!([0.0, "End"]));

        let bounded: ActivationInterval = serde_json::from_value(json!([0.0, 2.5])).expect("deserialize");
        assert_eq!(bounded, ActivationInterval::bounded(0.0, 2.5));

        assert!(serde_json::from_value::<ActivationInterval>(json!([0.0, "Later"])).is_err());
    }

    #[test]
    fn constraint_process_shape() {
        let value = serde_json::to_value(constraint()).expect("serialize");
        assert_eq!(
            value,
            json!({
                "python_module": "assign_vector_variable_process",
                "kratos_module": "KratosMultiphysics",
                "process_name": "AssignVectorVariableProcess",
                "Parameters": {
                    "model_part_name": "Structure.constraint_1",
                    "variable_name": "DISPLACEMENT",
                    "interval": [0.0, "End"],
                    "constrained": [true, false, true],
                    "value": [0.0, null, 0.0]
                }
            })
        );
    }

    #[test]
    fn load_process_shape() {
        let value = serde_json::to_value(load()).expect("serialize");
        assert_eq!(value["check"], "DirectorVectorNonZero direction");
        assert_eq!(value["process_name"], "ApplyVectorByDirectionToConditionProcess");
        assert_eq!(value["Parameters"]["variable_name"], "POINT_LOAD");
        assert_eq!(value["Parameters"]["modulus"], 40000.0);
        assert_eq!(value["Parameters"]["direction"], json!([1.0, 0.0, 0.0]));
    }

    #[test]
    fn rbe2_process_shape() {
        let value = serde_json::to_value(rbe2()).expect("serialize");
        assert_eq!(
            value,
            json!({
                "python_module": "impose_rbe2_process",
                "kratos_module": "StructuralMechanicsApplication",
                "process_name": "ImposeRBE2Process",
                "Parameters": {
                    "main_model_part_name": "Structure",
                    "model_part_name": "rbe2_1",
                    "master_node_id": 3,
                    "interval": [0.0, "End"]
                }
            })
        );
    }

    #[test]
    fn document_layout() {
        let parameters = SimulationParameters::new(
            vec![constraint()],
            vec![load()],
            vec![rbe2()],
            &SolverSettings::default(),
        );
        let value = parameters.to_json_value().expect("serialize");
        assert_eq!(value["problem_data"]["parallel_type"], "OpenMP");
        assert_eq!(value["solver_settings"]["solver_type"], "Static");
        assert_eq!(value["solver_settings"]["rotation_dofs"], false);
        assert_eq!(
            value["solver_settings"]["material_import_settings"]["materials_filename"],
            "materials.json"
        );
        assert_eq!(
            value["output_processes"]["vtk_output"][0]["Parameters"]["nodal_solution_step_data_variables"],
            json!(["DISPLACEMENT", "REACTION"])
        );
        assert_eq!(
            value["analysis_stage"],
            "KratosMultiphysics.StructuralMechanicsApplication.structural_mechanics_analysis"
        );
        assert_eq!(value["processes"]["constraints_process_list"].as_array().map(Vec::len), Some(1));
        assert_eq!(value["processes"]["loads_process_list"].as_array().map(Vec::len), Some(1));
        assert_eq!(
            value["processes"]["list_other_processes"][0]["process_name"],
            "ImposeRBE2Process"
        );
    }

    #[test]
    fn document_reads_back_and_keeps_foreign_entries() {
        let mut parameters = SimulationParameters::new(
            vec![constraint()],
            vec![load()],
            vec![rbe2()],
            &SolverSettings {
                rotation_dofs: true,
                ..SolverSettings::default()
            },
        );
        parameters
            .other_processes
            .push(json!({"process_name": "SomeOtherProcess", "Parameters": {}}));

        let text = parameters.to_json().expect("serialize");
        let back = SimulationParameters::from_json(&text).expect("deserialize");
        assert_eq!(back, parameters);
        assert!(back.rotation_dofs());
        assert_eq!(back.model_part_name(), "Structure");
    }

    #[test]
    fn non_object_document_is_rejected() {
        assert!(matches!(
            SimulationParameters::from_json("[1, 2]"),
            Err(IoError::InvalidData(_))
        ));
        assert!(matches!(SimulationParameters::from_json("{"), Err(IoError::Json(_))));
    }
}
