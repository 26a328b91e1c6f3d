//! Axial hex coordinates for zone layout.
//!
//! Zones use pointy-top hexagons addressed by `(q, r)` with the implicit cube
//! coordinate `s = -q - r`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

/// The six axial neighbour offsets.
pub const DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

impl HexCoord {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    pub fn neighbors(&self) -> [HexCoord; 6] {
        DIRECTIONS.map(|(dq, dr)| HexCoord::new(self.q + dq, self.r + dr))
    }

    /// Distance in hex steps.
    pub fn distance(&self, other: &HexCoord) -> i32 {
        ((self.q - other.q).abs() + (self.r - other.r).abs() + (self.s() - other.s()).abs()) / 2
    }

    /// Centre of the hex on a unit-size plane.
    pub fn to_cartesian(&self) -> (f64, f64) {
        let x = 3.0_f64.sqrt() * (self.q as f64 + self.r as f64 / 2.0);
        let y = 1.5 * self.r as f64;
        (x, y)
    }
}

/// All coordinates within `radius` steps of the origin, in row-major order.
pub fn disk(radius: i32) -> Vec<HexCoord> {
    let mut cells = Vec::new();
    for q in -radius..=radius {
        let r_min = (-radius).max(-q - radius);
        let r_max = radius.min(-q + radius);
        for r in r_min..=r_max {
            cells.push(HexCoord::new(q, r));
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disk_has_expected_cell_count() {
        // 3r(r+1) + 1
        assert_eq!(disk(0).len(), 1);
        assert_eq!(disk(1).len(), 7);
        assert_eq!(disk(10).len(), 331);
    }

    #[test]
    fn cube_coordinates_sum_to_zero() {
        for cell in disk(4) {
            assert_eq!(cell.q + cell.r + cell.s(), 0);
            assert!(cell.distance(&HexCoord::new(0, 0)) <= 4);
        }
    }

    #[test]
    fn neighbors_are_one_step_away() {
        let origin = HexCoord::new(2, -1);
        for n in origin.neighbors() {
            assert_eq!(origin.distance(&n), 1);
        }
    }
}
