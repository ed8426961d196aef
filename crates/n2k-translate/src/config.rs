//! Assembly configuration.

use n2k_io::{ActivationInterval, SolverSettings};

/// Names and switches used when assembling the solver-side model.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyConfig {
    /// Root model part every sub-model is qualified with
    pub model_part_name: String,
    /// Element type for two-node trusses
    pub truss_element_type: String,
    /// Condition type carrying point loads
    pub load_condition_type: String,
    /// Constitutive law assigned to truss materials
    pub truss_constitutive_law: String,
    /// Activation window of every generated process
    pub interval: ActivationInterval,
    /// Whether nodes carry rotational degrees of freedom
    pub rotation_dofs: bool,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            model_part_name: "Structure".to_string(),
            truss_element_type: "TrussLinearElement3D2N".to_string(),
            load_condition_type: "PointLoadCondition2D1N".to_string(),
            truss_constitutive_law: "TrussConstitutiveLaw".to_string(),
            interval: ActivationInterval::default(),
            rotation_dofs: false,
        }
    }
}

impl AssemblyConfig {
    /// Config for models whose nodes carry rotations as well as displacements.
    pub fn with_rotations() -> Self {
        Self {
            rotation_dofs: true,
            ..Default::default()
        }
    }

    /// `<model_part_name>.<sub_model>`
    pub fn qualified(&self, sub_model: &str) -> String {
        format!("{}.{sub_model}", self.model_part_name)
    }

    pub fn solver_settings(&self) -> SolverSettings {
        SolverSettings {
            model_part_name: self.model_part_name.clone(),
            rotation_dofs: self.rotation_dofs,
            ..SolverSettings::default()
        }
    }
}
