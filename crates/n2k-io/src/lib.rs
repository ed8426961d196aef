//! Side documents of a Kratos structural simulation.
//!
//! This crate provides:
//! - **Materials** (`materials.json`): one entry per truss sub-model
//! - **Simulation parameters** (`ProjectParameters.json`): solver settings plus
//!   constraint, load and rigid-coupling process lists
//! - **[`KratosSimulation`]**: the model, materials and parameters as one bundle

pub mod error;
pub mod materials;
pub mod parameters;
pub mod simulation;

pub use error::{IoError, Result};
pub use materials::{KratosMaterial, materials_from_json, materials_to_json, sub_model_name};
pub use parameters::{
    ActivationInterval, KratosConstraint, KratosLoad, Rbe2Process, SimulationParameters,
    SolverSettings,
};
pub use simulation::KratosSimulation;
