//! Grid points.

use n2k_bulk::{BulkDataSection, Grid};
use n2k_mdpa::Node;
use nalgebra::Vector3;

/// A point in the basic coordinate system, keyed by its bulk data id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Grid id
    pub id: i32,
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate
    pub z: f64,
}

impl Point {
    pub fn new(id: i32, x: f64, y: f64, z: f64) -> Self {
        Self { id, x, y, z }
    }

    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    pub fn from_nastran(grid: &Grid) -> Self {
        Self::new(grid.id, grid.x1, grid.x2, grid.x3)
    }

    pub fn to_nastran(&self) -> Grid {
        Grid::new(self.id, self.x, self.y, self.z)
    }

    pub fn from_kratos(id: i32, node: &Node) -> Self {
        Self::new(id, node.x, node.y, node.z)
    }

    pub fn to_kratos(&self) -> Node {
        Node::new(self.x, self.y, self.z)
    }
}

/// Grid points of a section, sorted by id.
pub fn points_from(section: &BulkDataSection) -> Vec<Point> {
    let mut points: Vec<Point> = section.grids().map(Point::from_nastran).collect();
    points.sort_by_key(|point| point.id);
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use n2k_bulk::BulkDataEntry;

    #[test]
    fn sorted_by_id() {
        let section = BulkDataSection::new(vec![
            BulkDataEntry::Grid(Grid::new(5, 1.0, 0.0, 0.0)),
            BulkDataEntry::Grid(Grid::new(2, 0.0, 1.0, 0.0)),
        ]);
        let ids: Vec<i32> = points_from(&section).iter().map(|point| point.id).collect();
        assert_eq!(ids, vec![2, 5]);
    }

    #[test]
    fn conversions() {
        let point = Point::new(3, 1.0, 2.0, 3.0);
        assert_eq!(Point::from_nastran(&point.to_nastran()), point);
        assert_eq!(Point::from_kratos(3, &point.to_kratos()), point);
        assert_eq!(point.position(), Vector3::new(1.0, 2.0, 3.0));
    }
}
