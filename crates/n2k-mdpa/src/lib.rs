//! Hierarchical solver model and its `.mdpa` text representation.
//!
//! A [`Model`] holds numbered properties, nodes, typed elements and typed
//! conditions, plus named [`SubModel`]s that group entities by id. Models are
//! assembled with [`ModelBuilder`] and are read-only afterwards.

pub mod error;
pub mod model;
pub mod reader;
pub mod sub_model;

pub use error::{MdpaError, Result};
pub use model::{Condition, Element, Model, ModelBuilder, Node, Properties, TypedBlocks};
pub use reader::from_mdpa;
pub use sub_model::SubModel;
