//! Two-node truss connectors.
//!
//! A CROD names a PROD by `pid`, which names a MAT1 by `mid`; a CONROD names
//! its MAT1 directly. Both resolve to one [`Truss`] carrying the area and the
//! material.

use std::collections::{BTreeMap, HashMap};

use n2k_bulk::{BulkDataEntry, BulkDataSection, Conrod, Crod, Mat1, Prod};
use n2k_io::KratosMaterial;
use n2k_mdpa::{Element, SubModel};
use tracing::debug;

use crate::config::AssemblyConfig;
use crate::error::{Result, TranslationError};
use crate::material::Material;

/// Axial member between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct Truss {
    pub first_point: i32,
    pub second_point: i32,
    /// Cross-sectional area
    pub cross_section: f64,
    pub material: Material,
}

impl Truss {
    /// Join a CROD with its PROD and MAT1. Ids must line up.
    pub fn from_nastran(crod: &Crod, prod: &Prod, mat1: &Mat1) -> Result<Self> {
        if crod.pid != Some(prod.pid) {
            return Err(TranslationError::missing(
                format!("CROD {}", crod.eid),
                "pid",
                describe(crod.pid),
                "PROD",
            ));
        }
        if prod.mid != mat1.mid {
            return Err(TranslationError::missing(
                format!("PROD {}", prod.pid),
                "mid",
                prod.mid,
                "MAT1",
            ));
        }
        Ok(Self {
            first_point: crod.g1,
            second_point: crod.g2,
            cross_section: prod.a,
            material: Material::from_nastran(mat1),
        })
    }

    pub fn from_conrod(conrod: &Conrod, mat1: &Mat1) -> Result<Self> {
        if conrod.mid != mat1.mid {
            return Err(TranslationError::missing(
                format!("CONROD {}", conrod.eid),
                "mid",
                conrod.mid,
                "MAT1",
            ));
        }
        Ok(Self {
            first_point: conrod.g1,
            second_point: conrod.g2,
            cross_section: conrod.a,
            material: Material::from_nastran(mat1),
        })
    }

    /// CROD, PROD and MAT1 that describe this truss, all numbered `index`.
    pub fn to_nastran(&self, index: i32) -> (Crod, Prod, Mat1) {
        (
            Crod::new(index, index, self.first_point, self.second_point),
            Prod::new(index, index, self.cross_section),
            self.material.to_nastran(index),
        )
    }

    /// Element on already renumbered node ids.
    pub fn to_kratos_element(&self, nodes: [i32; 2]) -> Element {
        Element::new(0, nodes.to_vec())
    }

    pub fn to_kratos_sub_model(&self, nodes: [i32; 2], element_id: i32) -> SubModel {
        SubModel::new()
            .with_nodes(nodes.to_vec())
            .with_elements(vec![element_id])
    }

    /// Material entry for sub-model `truss_<index>`.
    pub fn to_kratos_material(&self, index: i32, config: &AssemblyConfig) -> KratosMaterial {
        let mut variables = BTreeMap::from([
            ("CROSS_AREA".to_string(), self.cross_section),
            ("DENSITY".to_string(), 0.0),
        ]);
        if let Some(young_modulus) = self.material.young_modulus {
            variables.insert("YOUNG_MODULUS".to_string(), young_modulus);
        }
        KratosMaterial {
            model_part_name: config.qualified(&format!("truss_{index}")),
            properties_id: 0,
            material_name: self.material.name.clone(),
            constitutive_law: config.truss_constitutive_law.clone(),
            variables,
        }
    }

    /// Rebuild from a two-node element and its material entry.
    pub fn from_kratos(id: i32, element: &Element, material: &KratosMaterial) -> Result<Self> {
        let record = format!("element {id}");
        let [first_point, second_point] = element.node_ids[..] else {
            return Err(TranslationError::domain(
                record,
                format!("truss needs 2 nodes, found {}", element.node_ids.len()),
            ));
        };
        let cross_section = material
            .variable("CROSS_AREA")
            .ok_or_else(|| TranslationError::missing(record, "variable", "CROSS_AREA", "material variable"))?;
        Ok(Self {
            first_point,
            second_point,
            cross_section,
            material: Material::from_kratos(material),
        })
    }
}

/// Resolve every CROD and CONROD of a section, in section order.
pub fn connectors_from(section: &BulkDataSection) -> Result<Vec<Truss>> {
    let prods_by_pid: HashMap<i32, &Prod> = section.prods().map(|prod| (prod.pid, prod)).collect();
    let mat1s_by_mid: HashMap<i32, &Mat1> = section.mat1s().map(|mat1| (mat1.mid, mat1)).collect();

    let mut trusses = Vec::new();
    for entry in section.entries() {
        match entry {
            BulkDataEntry::Crod(crod) => {
                let record = format!("CROD {}", crod.eid);
                let pid = crod
                    .pid
                    .ok_or_else(|| TranslationError::missing(&record, "pid", describe(None), "PROD"))?;
                let prod = prods_by_pid
                    .get(&pid)
                    .ok_or_else(|| TranslationError::missing(&record, "pid", pid, "PROD"))?;
                let mat1 = mat1s_by_mid.get(&prod.mid).ok_or_else(|| {
                    TranslationError::missing(format!("PROD {}", prod.pid), "mid", prod.mid, "MAT1")
                })?;
                trusses.push(Truss::from_nastran(crod, prod, mat1)?);
            }
            BulkDataEntry::Conrod(conrod) => {
                let mat1 = mat1s_by_mid.get(&conrod.mid).ok_or_else(|| {
                    TranslationError::missing(format!("CONROD {}", conrod.eid), "mid", conrod.mid, "MAT1")
                })?;
                trusses.push(Truss::from_conrod(conrod, mat1)?);
            }
            _ => {}
        }
    }

    debug!(trusses = trusses.len(), "resolved truss connectors");
    Ok(trusses)
}

fn describe(id: Option<i32>) -> String {
    id.map_or_else(|| "<blank>".to_string(), |id| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(entries: Vec<BulkDataEntry>) -> BulkDataSection {
        BulkDataSection::new(entries)
    }

    #[test]
    fn crod_prod_mat1_join() {
        let section = section(vec![
            Crod::new(1, 1, 1, 2).into(),
            Prod::new(1, 1, 3.0).into(),
            Mat1::new(1).with_young_modulus(7.0).into(),
        ]);
        let trusses = connectors_from(&section).expect("join should succeed");
        assert_eq!(
            trusses,
            vec![Truss {
                first_point: 1,
                second_point: 2,
                cross_section: 3.0,
                material: Material::new("MAT1_1", Some(7.0)),
            }]
        );
    }

    #[test]
    fn conrod_uses_its_own_area() {
        let conrod = Conrod {
            eid: 4,
            g1: 2,
            g2: 3,
            mid: 9,
            a: 1.5,
            j: None,
            c: None,
            nsm: None,
        };
        let section = section(vec![conrod.into(), Mat1::new(9).into()]);
        let trusses = connectors_from(&section).expect("join should succeed");
        assert_eq!(trusses[0].cross_section, 1.5);
        assert_eq!(trusses[0].material.young_modulus, None);
    }

    #[test]
    fn missing_prod() {
        let section = section(vec![Crod::new(1, 5, 1, 2).into(), Mat1::new(1).into()]);
        let err = connectors_from(&section).expect_err("no PROD 5");
        assert!(matches!(err, TranslationError::MissingReference { target: "PROD", .. }));
    }

    #[test]
    fn blank_pid() {
        let crod = Crod {
            pid: None,
            ..Crod::new(1, 1, 1, 2)
        };
        let section = section(vec![crod.into(), Prod::new(1, 1, 1.0).into(), Mat1::new(1).into()]);
        let err = connectors_from(&section).expect_err("blank pid");
        assert!(err.to_string().contains("CROD 1"));
    }

    #[test]
    fn missing_mat1() {
        let section = section(vec![Crod::new(1, 1, 1, 2).into(), Prod::new(1, 8, 1.0).into()]);
        let err = connectors_from(&section).expect_err("no MAT1 8");
        assert!(matches!(err, TranslationError::MissingReference { target: "MAT1", .. }));
    }

    #[test]
    fn mismatched_direct_join() {
        let err = Truss::from_nastran(&Crod::new(1, 2, 1, 2), &Prod::new(1, 1, 1.0), &Mat1::new(1))
            .expect_err("pid mismatch");
        assert!(matches!(err, TranslationError::MissingReference { field: "pid", .. }));
    }

    #[test]
    fn material_entry() {
        let truss = Truss {
            first_point: 1,
            second_point: 2,
            cross_section: 350.0,
            material: Material::new("MAT1_1", Some(210000.0)),
        };
        let material = truss.to_kratos_material(1, &AssemblyConfig::default());
        assert_eq!(material.model_part_name, "Structure.truss_1");
        assert_eq!(material.constitutive_law, "TrussConstitutiveLaw");
        assert_eq!(material.variable("YOUNG_MODULUS"), Some(210000.0));
        assert_eq!(material.variable("CROSS_AREA"), Some(350.0));
        assert_eq!(material.variable("DENSITY"), Some(0.0));

        let element = truss.to_kratos_element([1, 2]);
        assert_eq!(Truss::from_kratos(1, &element, &material).expect("rebuild"), truss);
    }

    #[test]
    fn element_with_wrong_arity() {
        let material = KratosMaterial {
            model_part_name: "Structure.truss_1".to_string(),
            properties_id: 0,
            material_name: "MAT1_1".to_string(),
            constitutive_law: "TrussConstitutiveLaw".to_string(),
            variables: BTreeMap::from([("CROSS_AREA".to_string(), 1.0)]),
        };
        let err = Truss::from_kratos(1, &Element::new(0, vec![1, 2, 3]), &material).expect_err("three nodes");
        assert!(matches!(err, TranslationError::Domain { .. }));
    }
}
