//! Properties of the join stage and the assembly, over generated inputs.

use std::collections::BTreeSet;

use n2k_bulk::{BulkDataEntry, BulkDataSection, Crod, Grid, Mat1, Prod, Rbe2, Spc};
use n2k_translate::{
    AssemblyConfig, Dof, Rbe2Connector, TranslationLayer, Truss, constraints_from, trusses_from_nastran,
};
use proptest::prelude::*;

fn digit_set() -> impl Strategy<Value = BTreeSet<u32>> {
    prop::collection::btree_set(1u32..=6, 1..=6)
}

fn components(digits: &BTreeSet<u32>) -> i32 {
    digits.iter().fold(0, |number, digit| number * 10 + *digit as i32)
}

/// `count` independent CROD/PROD/MAT1 triples over a chain of points.
fn rod_chain(count: i32, area: f64) -> Vec<BulkDataEntry> {
    let mut entries: Vec<BulkDataEntry> = (1..=count + 1)
        .map(|id| Grid::new(id, f64::from(id), 0.0, 0.0).into())
        .collect();
    for id in 1..=count {
        entries.push(Crod::new(id, id + 100, id, id + 1).into());
        entries.push(Prod::new(id + 100, id + 200, area * f64::from(id)).into());
        entries.push(Mat1::new(id + 200).with_young_modulus(1000.0 * f64::from(id)).into());
    }
    entries
}

proptest! {
    #[test]
    fn spc_digits_select_axes(digits in digit_set(), node in 1i32..10_000) {
        let section = BulkDataSection::new(vec![Spc::new(2, node, components(&digits)).into()]);
        let constraint = constraints_from(&section)[0];
        prop_assert_eq!(constraint.node_id, node);
        for axis in 0..3 {
            prop_assert_eq!(constraint.translation_by_axis[axis], digits.contains(&(axis as u32 + 1)));
            prop_assert_eq!(constraint.rotation_by_axis[axis], digits.contains(&(axis as u32 + 4)));
        }
    }

    #[test]
    fn mask_bits_select_dofs(cm in 1i32..64) {
        let connector = Rbe2Connector::from_nastran(&Rbe2::new(1, 1, cm, vec![2]));
        let expected: Vec<Dof> = (0..6)
            .filter(|bit| cm & (1 << bit) != 0)
            .map(|bit| Dof::ALL[bit])
            .collect();
        prop_assert_eq!(connector.constrained_dofs(), expected);
    }

    #[test]
    fn every_triple_becomes_one_truss(count in 1i32..20, area in 0.5f64..500.0) {
        let section = BulkDataSection::new(rod_chain(count, area));
        let trusses = trusses_from_nastran(&section).expect("triples join");
        prop_assert_eq!(trusses.len(), count as usize);

        let crods: Vec<&Crod> = section.crods().collect();
        let prods: Vec<&Prod> = section.prods().collect();
        let mat1s: Vec<&Mat1> = section.mat1s().collect();
        for (index, truss) in trusses.iter().enumerate() {
            let direct = Truss::from_nastran(crods[index], prods[index], mat1s[index]).expect("direct join");
            prop_assert_eq!(truss, &direct);
        }

        let simulation = TranslationLayer::from_nastran(&section)
            .expect("layer joins")
            .to_kratos(&AssemblyConfig::default())
            .expect("model assembles");
        let elements = simulation.model.elements().get("TrussLinearElement3D2N").expect("truss block");
        prop_assert_eq!(elements.len(), count as usize);
        prop_assert_eq!(simulation.materials.len(), count as usize);
        prop_assert_eq!(simulation.model.sub_models().len(), count as usize);
        prop_assert_eq!(simulation.model.nodes().len(), count as usize + 1);
    }
}

#[test]
fn missing_prod_is_reported() {
    let section = BulkDataSection::new(vec![
        Grid::new(1, 0.0, 0.0, 0.0).into(),
        Grid::new(2, 1.0, 0.0, 0.0).into(),
        Crod::new(1, 7, 1, 2).into(),
        Mat1::new(1).into(),
    ]);
    let err = TranslationLayer::from_nastran(&section).expect_err("PROD 7 does not exist");
    assert_eq!(err.to_string(), "CROD 1: pid 7 has no matching PROD");
}

#[test]
fn missing_mat1_is_reported() {
    let section = BulkDataSection::new(vec![Crod::new(1, 1, 1, 2).into(), Prod::new(1, 4, 1.0).into()]);
    let err = TranslationLayer::from_nastran(&section).expect_err("MAT1 4 does not exist");
    assert_eq!(err.to_string(), "PROD 1: mid 4 has no matching MAT1");
}
