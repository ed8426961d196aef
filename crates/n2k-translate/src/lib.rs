//! Translation between Nastran bulk data and Kratos structural models.
//!
//! Bulk data entries are joined once into a [`TranslationLayer`]: points,
//! trusses with their property and material, constraints, loads and rigid
//! connectors. The layer then assembles a [`n2k_io::KratosSimulation`] or
//! writes bulk data back.
//!
//! ```no_run
//! use n2k_bulk::BulkDataSection;
//! use n2k_translate::{AssemblyConfig, TranslationLayer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let deck = std::fs::read_to_string("model.bdf")?;
//! let section = BulkDataSection::parse_str(&deck)?;
//! let simulation = TranslationLayer::from_nastran(&section)?.to_kratos(&AssemblyConfig::default())?;
//! println!("{}", simulation.mdpa());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connector;
pub mod constraint;
pub mod error;
pub mod layer;
pub mod load;
pub mod material;
pub mod point;
pub mod rigid;

pub use config::AssemblyConfig;
pub use connector::{Truss, connectors_from, connectors_from as trusses_from_nastran};
pub use constraint::{Constraint, constraints_from};
pub use error::{Result, TranslationError};
pub use layer::{LOAD_SET_ID, SPC_SET_ID, TranslationLayer};
pub use load::{Load, loads_from};
pub use material::{Material, materials_from};
pub use point::{Point, points_from};
pub use rigid::{COEFFICIENT_TOLERANCE, CouplingRow, Dof, Rbe2Connector, lever_coefficient, rbe2_connectors_from};
