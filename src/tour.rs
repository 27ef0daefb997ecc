//! # Tour
//!
//! A tour is the visiting order of one restart, stored as parallel arrays of
//! x coordinates, y coordinates and city indices. Position `len` is a wrap
//! sentinel that always mirrors position 0, so the closing edge
//! `(len - 1, 0)` is just edge `(len - 1, len)`.
//!
//! The arrays are made of atomic cells so that the workers of a team can
//! share one tour without locks. Within a phase every worker touches a
//! disjoint set of positions, and phases are separated by barriers, so all
//! accesses use relaxed ordering.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::city::{dist_xy, Cities, Length};
use crate::error::{try_vec_with_capacity, ClimbError, Result};
use crate::rng::Lcg;

/// An `f32` stored in an `AtomicU32`.
#[derive(Debug, Default)]
#[repr(transparent)]
pub(crate) struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub(crate) fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    #[inline(always)]
    pub(crate) fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    #[inline(always)]
    pub(crate) fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed)
    }
}

/// The visiting order of one restart.
#[derive(Debug)]
pub struct Tour {
    x: Box<[AtomicF32]>,
    y: Box<[AtomicF32]>,
    city: Box<[AtomicU32]>,
}

impl Tour {
    /// Creates the tour that visits the cities in input order.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::AllocationFailure`] if the buffers cannot be reserved.
    pub fn new(cities: &Cities) -> Result<Self> {
        let len = cities.len();
        let mut x = try_vec_with_capacity(len + 1, "tour x coordinates")?;
        let mut y = try_vec_with_capacity(len + 1, "tour y coordinates")?;
        let mut city = try_vec_with_capacity(len + 1, "tour order")?;

        for (index, c) in cities.iter().enumerate() {
            x.push(AtomicF32::new(c.x));
            y.push(AtomicF32::new(c.y));
            city.push(AtomicU32::new(index as u32));
        }
        let first = cities.as_slice()[0];
        x.push(AtomicF32::new(first.x));
        y.push(AtomicF32::new(first.y));
        city.push(AtomicU32::new(0));

        Ok(Self {
            x: x.into_boxed_slice(),
            y: y.into_boxed_slice(),
            city: city.into_boxed_slice(),
        })
    }

    /// Creates the starting tour of a restart: input order permuted by the
    /// [`Lcg`] stream seeded with `seed`.
    pub fn shuffled(cities: &Cities, seed: u32) -> Result<Self> {
        let mut tour = Self::new(cities)?;
        tour.shuffle(seed);
        Ok(tour)
    }

    /// Creates a tour that visits `cities` in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`ClimbError::InvalidInput`] if `order` is not a permutation of
    /// `0..cities.len()`.
    pub fn from_order(cities: &Cities, order: &[usize]) -> Result<Self> {
        if order.len() != cities.len() || !is_permutation(order.iter().copied(), cities.len()) {
            return Err(ClimbError::InvalidInput(format!(
                "order is not a permutation of {} cities",
                cities.len()
            )));
        }

        let tour = Self::new(cities)?;
        for (pos, &index) in order.iter().chain(order.first()).enumerate() {
            let c = cities.as_slice()[index];
            tour.x[pos].store(c.x);
            tour.y[pos].store(c.y);
            tour.city[pos].store(index as u32, Ordering::Relaxed);
        }
        Ok(tour)
    }

    /// Swaps every position except the first with a position drawn from the
    /// [`Lcg`] stream, then refreshes the sentinel.
    pub fn shuffle(&mut self, seed: u32) {
        let len = self.len();
        if len < 2 {
            return;
        }
        let mut rng = Lcg::new(seed);
        for i in 1..len {
            let j = rng.next_index(len);
            self.swap(i, j);
        }
        self.refresh_sentinel();
    }

    /// Number of cities (the sentinel is not counted).
    pub fn len(&self) -> usize {
        self.city.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline(always)]
    pub(crate) fn x(&self, pos: usize) -> f32 {
        self.x[pos].load()
    }

    #[inline(always)]
    pub(crate) fn y(&self, pos: usize) -> f32 {
        self.y[pos].load()
    }

    /// Index of the city visited at `pos`.
    pub fn city_at(&self, pos: usize) -> usize {
        self.city[pos].load(Ordering::Relaxed) as usize
    }

    /// Exchanges the contents of two positions.
    ///
    /// Callers running on a team must own both positions for the current phase.
    #[inline]
    pub(crate) fn swap(&self, a: usize, b: usize) {
        let (xa, xb) = (self.x[a].load(), self.x[b].load());
        self.x[a].store(xb);
        self.x[b].store(xa);

        let (ya, yb) = (self.y[a].load(), self.y[b].load());
        self.y[a].store(yb);
        self.y[b].store(ya);

        let (ca, cb) = (
            self.city[a].load(Ordering::Relaxed),
            self.city[b].load(Ordering::Relaxed),
        );
        self.city[a].store(cb, Ordering::Relaxed);
        self.city[b].store(ca, Ordering::Relaxed);
    }

    /// Reverses positions `first..=last`.
    pub fn reverse(&mut self, first: usize, last: usize) {
        let (mut a, mut b) = (first, last);
        while a < b {
            self.swap(a, b);
            a += 1;
            b -= 1;
        }
    }

    fn refresh_sentinel(&self) {
        let len = self.len();
        self.x[len].store(self.x[0].load());
        self.y[len].store(self.y[0].load());
        self.city[len].store(self.city[0].load(Ordering::Relaxed), Ordering::Relaxed);
    }

    /// Length of the edge leaving `pos`.
    #[inline]
    pub fn edge(&self, pos: usize) -> Length {
        dist_xy(self.x(pos), self.y(pos), self.x(pos + 1), self.y(pos + 1))
    }

    /// Total length of the closed tour.
    pub fn length(&self) -> Length {
        (0..self.len()).map(|pos| self.edge(pos)).sum()
    }

    /// City indices in visiting order, without the sentinel.
    pub fn order(&self) -> Vec<usize> {
        (0..self.len()).map(|pos| self.city_at(pos)).collect()
    }

    /// Checks that every city appears exactly once and that the sentinel
    /// mirrors the first position.
    pub fn is_permutation(&self) -> bool {
        let len = self.len();
        let sentinel_ok = self.city_at(len) == self.city_at(0)
            && self.x(len) == self.x(0)
            && self.y(len) == self.y(0);
        sentinel_ok && is_permutation((0..len).map(|pos| self.city_at(pos)), len)
    }
}

fn is_permutation(indices: impl Iterator<Item = usize>, len: usize) -> bool {
    let mut seen = vec![false; len];
    let mut count = 0;
    for index in indices {
        if index >= len || seen[index] {
            return false;
        }
        seen[index] = true;
        count += 1;
    }
    count == len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::City;

    fn square(side: f32) -> Cities {
        Cities::new(vec![
            City::new(0.0, 0.0),
            City::new(side, 0.0),
            City::new(side, side),
            City::new(0.0, side),
        ])
        .unwrap()
    }

    #[test]
    fn test_new_keeps_input_order() {
        let cities = Cities::grid(10).unwrap();
        let tour = Tour::new(&cities).unwrap();
        assert_eq!(tour.len(), 100);
        assert_eq!(tour.order(), (0..100).collect::<Vec<_>>());
        assert!(tour.is_permutation());
        assert_eq!(tour.city_at(100), 0);
    }

    #[test]
    fn test_shuffle_is_a_permutation_and_reproducible() {
        let cities = Cities::grid(12).unwrap();
        let a = Tour::shuffled(&cities, 7).unwrap();
        let b = Tour::shuffled(&cities, 7).unwrap();
        let c = Tour::shuffled(&cities, 8).unwrap();

        assert!(a.is_permutation());
        assert_eq!(a.order(), b.order());
        assert_ne!(a.order(), c.order());
        assert_eq!(a.city_at(0), 0);
    }

    #[test]
    fn test_length_of_square() {
        let tour = Tour::new(&square(10.0)).unwrap();
        assert_eq!(tour.length(), 40);

        let crossed = Tour::from_order(&square(10.0), &[0, 2, 1, 3]).unwrap();
        assert_eq!(crossed.length(), 14 + 10 + 14 + 10);
    }

    #[test]
    fn test_from_order_rejects_non_permutations() {
        let cities = square(1.0);
        assert!(Tour::from_order(&cities, &[0, 1, 1, 3]).is_err());
        assert!(Tour::from_order(&cities, &[0, 1, 2]).is_err());
        assert!(Tour::from_order(&cities, &[0, 1, 2, 4]).is_err());
    }

    #[test]
    fn test_reverse_keeps_permutation() {
        let cities = Cities::grid(10).unwrap();
        let mut tour = Tour::shuffled(&cities, 3).unwrap();
        let before = tour.order();

        tour.reverse(5, 42);
        assert!(tour.is_permutation());

        let after = tour.order();
        assert_eq!(&after[..5], &before[..5]);
        assert_eq!(&after[43..], &before[43..]);
        let mut middle = before[5..=42].to_vec();
        middle.reverse();
        assert_eq!(&after[5..=42], middle.as_slice());
    }
}
