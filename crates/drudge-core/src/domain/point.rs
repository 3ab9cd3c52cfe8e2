//! Absolute map coordinates and the distance metrics the engine relies on.
//!
//! All distances are Chebyshev ("square") distances: diagonal steps cost the
//! same as orthogonal ones, so "adjacent" means within one tile including
//! diagonals.

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// An absolute position on the map (x east, y south, z up).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Tripoint {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Tripoint {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Chebyshev distance over all three axes.
    pub fn square_dist(self, other: Tripoint) -> i32 {
        let d = self - other;
        d.x.abs().max(d.y.abs()).max(d.z.abs())
    }

    /// Distance used for ordering work by proximity.
    ///
    /// Identical to [`Tripoint::square_dist`]; kept separate so the sort key
    /// can change (e.g. to a trigonometric metric) without touching the
    /// adjacency checks.
    pub fn rl_dist(self, other: Tripoint) -> i32 {
        self.square_dist(other)
    }

    /// True when `other` is this tile or one of its eight neighbours on the same level.
    pub fn is_adjacent_or_at(self, other: Tripoint) -> bool {
        self.z == other.z && self.square_dist(other) <= 1
    }

    /// The eight neighbours on the same z-level, in a fixed order.
    pub fn neighbours(self) -> impl Iterator<Item = Tripoint> {
        const OFFSETS: [(i32, i32); 8] = [
            (0, -1),
            (1, -1),
            (1, 0),
            (1, 1),
            (0, 1),
            (-1, 1),
            (-1, 0),
            (-1, -1),
        ];
        OFFSETS
            .into_iter()
            .map(move |(dx, dy)| Tripoint::new(self.x + dx, self.y + dy, self.z))
    }
}

impl Add for Tripoint {
    type Output = Tripoint;

    fn add(self, rhs: Tripoint) -> Tripoint {
        Tripoint::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Tripoint {
    type Output = Tripoint;

    fn sub(self, rhs: Tripoint) -> Tripoint {
        Tripoint::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl fmt::Display for Tripoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.x, self.y, self.z)
    }
}

/// Compass name of `target` as seen from `origin`.
pub fn direction_name(origin: Tripoint, target: Tripoint) -> &'static str {
    let d = target - origin;
    if d.x == 0 && d.y == 0 {
        return match d.z.signum() {
            1 => "UP",
            -1 => "DOWN",
            _ => "CENTER",
        };
    }

    // Within a 2:1 slope the direction snaps to the axis, otherwise diagonal.
    let (ax, ay) = (d.x.abs(), d.y.abs());
    let horizontal = if ax * 2 < ay { 0 } else { d.x.signum() };
    let vertical = if ay * 2 < ax { 0 } else { d.y.signum() };
    match (horizontal, vertical) {
        (0, -1) => "N",
        (1, -1) => "NE",
        (1, 0) => "E",
        (1, 1) => "SE",
        (0, 1) => "S",
        (-1, 1) => "SW",
        (-1, 0) => "W",
        (-1, -1) => "NW",
        _ => "CENTER",
    }
}

/// Short "distance + direction" label, e.g. `5NE`.
pub fn direction_suffix(origin: Tripoint, target: Tripoint) -> String {
    let dist = origin.rl_dist(target);
    if dist == 0 {
        return String::new();
    }
    format!("{}{}", dist, direction_name(origin, target))
}

/// Stable sort of `points` by distance from `from`.
///
/// Ties keep their incoming order.
pub fn sort_by_distance(points: &mut [Tripoint], from: Tripoint) {
    points.sort_by_key(|p| from.rl_dist(*p));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn square_dist_counts_diagonals_as_one() {
        let a = Tripoint::new(0, 0, 0);
        assert_eq!(a.square_dist(Tripoint::new(3, 1, 0)), 3);
        assert_eq!(a.square_dist(Tripoint::new(-2, -2, 0)), 2);
        assert_eq!(a.square_dist(Tripoint::new(0, 0, 4)), 4);
    }

    #[test]
    fn adjacency_requires_same_level() {
        let a = Tripoint::new(5, 5, 0);
        assert!(a.is_adjacent_or_at(a));
        assert!(a.is_adjacent_or_at(Tripoint::new(6, 4, 0)));
        assert!(!a.is_adjacent_or_at(Tripoint::new(7, 5, 0)));
        assert!(!a.is_adjacent_or_at(Tripoint::new(5, 5, 1)));
    }

    #[test]
    fn neighbours_are_eight_distinct_adjacent_tiles() {
        let a = Tripoint::new(2, 2, 0);
        let n: Vec<_> = a.neighbours().collect();
        assert_eq!(n.len(), 8);
        assert!(n.iter().all(|p| a.square_dist(*p) == 1));
    }

    #[rstest]
    #[case::north(Tripoint::new(0, -4, 0), "N")]
    #[case::north_east(Tripoint::new(3, -3, 0), "NE")]
    #[case::east(Tripoint::new(5, 1, 0), "E")]
    #[case::south(Tripoint::new(1, 6, 0), "S")]
    #[case::south_west(Tripoint::new(-2, 3, 0), "SW")]
    #[case::up(Tripoint::new(0, 0, 1), "UP")]
    fn direction_name_snaps_to_compass(#[case] target: Tripoint, #[case] expected: &str) {
        assert_eq!(direction_name(Tripoint::default(), target), expected);
    }

    #[test]
    fn direction_suffix_prefixes_distance() {
        let origin = Tripoint::new(10, 10, 0);
        assert_eq!(direction_suffix(origin, Tripoint::new(15, 5, 0)), "5NE");
        assert_eq!(direction_suffix(origin, origin), "");
    }

    #[test]
    fn sort_by_distance_is_stable() {
        let from = Tripoint::default();
        let mut points = vec![
            Tripoint::new(3, 0, 0),
            Tripoint::new(0, 1, 0),
            Tripoint::new(1, 0, 0),
            Tripoint::new(5, 0, 0),
        ];
        sort_by_distance(&mut points, from);
        assert_eq!(
            points,
            vec![
                Tripoint::new(0, 1, 0),
                Tripoint::new(1, 0, 0),
                Tripoint::new(3, 0, 0),
                Tripoint::new(5, 0, 0),
            ]
        );
    }
}
