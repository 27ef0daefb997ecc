//! # Cities
//!
//! The immutable problem instance: a set of points in the plane, shared
//! read-only by every restart, and the distance function used everywhere in
//! the solver.
//!
//! Distances are Euclidean, computed in `f32` and truncated to an integer.
//! The same truncation is used while searching for moves and when reporting
//! tour lengths, so rounding noise can never masquerade as an improvement.
//!
//! ## Example
//!
//! ```rust
//! use twoopt::city::{dist, City, Cities};
//!
//! let a = City::new(0.0, 0.0);
//! let b = City::new(3.0, 4.0);
//! assert_eq!(dist(a, b), 5);
//!
//! let cities = Cities::new(vec![a, b, City::new(1.5, 1.5)]).unwrap();
//! assert_eq!(cities.len(), 3);
//! ```

use rand::Rng;

use crate::error::{try_vec_with_capacity, ClimbError, Result};

/// Integer tour and edge lengths.
pub type Length = i64;

/// A point in the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct City {
    pub x: f32,
    pub y: f32,
}

impl City {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for City {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Truncated Euclidean distance between two coordinates.
#[inline(always)]
pub fn dist_xy(ax: f32, ay: f32, bx: f32, by: f32) -> Length {
    let dx = ax - bx;
    let dy = ay - by;
    (dx * dx + dy * dy).sqrt() as Length
}

/// Truncated Euclidean distance between two cities.
#[inline]
pub fn dist(a: City, b: City) -> Length {
    dist_xy(a.x, a.y, b.x, b.y)
}

/// A validated, immutable set of cities.
///
/// Every coordinate is finite. The minimum instance size is enforced by the
/// restart coordinator, not here, so small instances can still be used to
/// drive single restarts directly.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cities {
    points: Vec<City>,
}

impl Cities {
    /// Creates a city set.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::InvalidInput`] if `points` is empty or contains a
    /// non-finite coordinate.
    pub fn new(points: Vec<City>) -> Result<Self> {
        if points.is_empty() {
            return Err(ClimbError::InvalidInput(
                "the instance contains no cities".to_string(),
            ));
        }

        if let Some(index) = points
            .iter()
            .position(|c| !c.x.is_finite() || !c.y.is_finite())
        {
            return Err(ClimbError::InvalidInput(format!(
                "city {} has a non-finite coordinate ({}, {})",
                index, points[index].x, points[index].y
            )));
        }

        Ok(Self { points })
    }

    /// Creates a city set from `(x, y)` pairs.
    pub fn from_coordinates(coordinates: &[(f32, f32)]) -> Result<Self> {
        let mut points = try_vec_with_capacity(coordinates.len(), "city coordinates")?;
        points.extend(coordinates.iter().copied().map(City::from));
        Self::new(points)
    }

    /// Scatters `len` cities uniformly over `[0, extent) x [0, extent)`.
    ///
    /// Pass a seeded generator to get reproducible instances.
    pub fn random_uniform<R: Rng>(len: usize, extent: f32, rng: &mut R) -> Result<Self> {
        if !(extent.is_finite() && extent > 0.0) {
            return Err(ClimbError::InvalidInput(format!(
                "extent must be positive and finite, got {}",
                extent
            )));
        }
        let mut points = try_vec_with_capacity(len, "city coordinates")?;
        points.extend((0..len).map(|_| {
            City::new(rng.gen_range(0.0..extent), rng.gen_range(0.0..extent))
        }));
        Self::new(points)
    }

    /// Places `side * side` cities on an integer grid with unit spacing,
    /// row by row starting at the origin.
    pub fn grid(side: usize) -> Result<Self> {
        let mut points = try_vec_with_capacity(side * side, "city coordinates")?;
        for row in 0..side {
            for col in 0..side {
                points.push(City::new(col as f32, row as f32));
            }
        }
        Self::new(points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<City> {
        self.points.get(index).copied()
    }

    pub fn as_slice(&self) -> &[City] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &City> {
        self.points.iter()
    }
}
