//! Truss materials.

use n2k_bulk::{BulkDataSection, Mat1};
use n2k_io::KratosMaterial;

/// Material carried by a truss. Only the elastic modulus is translated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Material {
    /// Material name, `MAT1_<mid>` when read from bulk data
    pub name: String,
    /// Young's modulus (E)
    pub young_modulus: Option<f64>,
}

impl Material {
    pub fn new(name: impl Into<String>, young_modulus: Option<f64>) -> Self {
        Self {
            name: name.into(),
            young_modulus,
        }
    }

    pub fn from_nastran(mat1: &Mat1) -> Self {
        Self::new(format!("MAT1_{}", mat1.mid), mat1.e)
    }

    pub fn to_nastran(&self, mid: i32) -> Mat1 {
        Mat1 {
            e: self.young_modulus,
            ..Mat1::new(mid)
        }
    }

    pub fn from_kratos(material: &KratosMaterial) -> Self {
        Self::new(material.material_name.clone(), material.variable("YOUNG_MODULUS"))
    }
}

/// MAT1 materials of a section, sorted by material id.
pub fn materials_from(section: &BulkDataSection) -> Vec<Material> {
    let mut mat1s: Vec<&Mat1> = section.mat1s().collect();
    mat1s.sort_by_key(|mat1| mat1.mid);
    mat1s.into_iter().map(Material::from_nastran).collect()
}
