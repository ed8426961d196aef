//! Materials document.
//!
//! ```json
//! {"properties": [{"model_part_name": "Structure.truss_1", "properties_id": 0,
//!   "Material": {"name": "MAT1_1", "constitutive_law": {"name": "TrussConstitutiveLaw"},
//!                "Variables": {"YOUNG_MODULUS": 210000.0, "CROSS_AREA": 350.0, "DENSITY": 0.0},
//!                "tables": {}}}]}
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Material assignment for one sub-model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "MaterialEntry", into = "MaterialEntry")]
pub struct KratosMaterial {
    /// Fully qualified sub-model name, e.g. `Structure.truss_1`
    pub model_part_name: String,
    pub properties_id: i32,
    pub material_name: String,
    pub constitutive_law: String,
    /// Scalar material variables such as `YOUNG_MODULUS` and `CROSS_AREA`
    pub variables: BTreeMap<String, f64>,
}

impl KratosMaterial {
    /// Last dotted component of the model part name.
    pub fn sub_model_name(&self) -> &str {
        sub_model_name(&self.model_part_name)
    }

    pub fn variable(&self, name: &str) -> Option<f64> {
        self.variables.get(name).copied()
    }
}

/// `Structure.truss_1` -> `truss_1`
pub fn sub_model_name(model_part_name: &str) -> &str {
    model_part_name.rsplit('.').next().unwrap_or_default()
}

#[derive(Serialize, Deserialize)]
struct MaterialEntry {
    model_part_name: String,
    properties_id: i32,
    #[serde(rename = "Material")]
    material: MaterialBody,
}

#[derive(Serialize, Deserialize)]
struct MaterialBody {
    name: String,
    constitutive_law: NamedLaw,
    #[serde(rename = "Variables")]
    variables: BTreeMap<String, f64>,
    #[serde(default)]
    tables: BTreeMap<String, Value>,
}

#[derive(Serialize, Deserialize)]
struct NamedLaw {
    name: String,
}

impl From<MaterialEntry> for KratosMaterial {
    fn from(entry: MaterialEntry) -> Self {
        Self {
            model_part_name: entry.model_part_name,
            properties_id: entry.properties_id,
            material_name: entry.material.name,
            constitutive_law: entry.material.constitutive_law.name,
            variables: entry.material.variables,
        }
    }
}

impl From<KratosMaterial> for MaterialEntry {
    fn from(material: KratosMaterial) -> Self {
        Self {
            model_part_name: material.model_part_name,
            properties_id: material.properties_id,
            material: MaterialBody {
                name: material.material_name,
                constitutive_law: NamedLaw {
                    name: material.constitutive_law,
                },
                variables: material.variables,
                tables: BTreeMap::new(),
            },
        }
    }
}

#[derive(Serialize)]
struct MaterialsDocumentRef<'a> {
    properties: &'a [KratosMaterial],
}

#[derive(Deserialize)]
struct MaterialsDocument {
    #[serde(default)]
    properties: Vec<KratosMaterial>,
}

pub fn materials_to_json(materials: &[KratosMaterial]) -> Result<String> {
    Ok(serde_json::to_string_pretty(&MaterialsDocumentRef {
        properties: materials,
    })?)
}

pub fn materials_from_json(raw: &str) -> Result<Vec<KratosMaterial>> {
    let document: MaterialsDocument = serde_json::from_str(raw)?;
    Ok(document.properties)
}
