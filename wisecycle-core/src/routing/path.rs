use serde::Serialize;

use crate::{Coordinate, Weight};

/// Ordered vertices of a route, origin and destination included
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Path {
    coordinates: Vec<Coordinate>,
    cost: Weight,
}

impl Path {
    pub(crate) fn new(coordinates: Vec<Coordinate>, cost: Weight) -> Self {
        debug_assert!(!coordinates.is_empty());
        Self { coordinates, cost }
    }

    pub(crate) fn trivial(at: Coordinate) -> Self {
        Self::new(vec![at], 0.0)
    }

    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    pub fn into_coordinates(self) -> Vec<Coordinate> {
        self.coordinates
    }

    /// Sum of edge weights along the path
    pub fn cost(&self) -> Weight {
        self.cost
    }

    pub fn vertex_count(&self) -> usize {
        self.coordinates.len()
    }

    /// `true` if origin and destination are the same vertex
    pub fn is_trivial(&self) -> bool {
        self.coordinates.len() == 1
    }

    pub fn origin(&self) -> Option<Coordinate> {
        self.coordinates.first().copied()
    }

    pub fn destination(&self) -> Option<Coordinate> {
        self.coordinates.last().copied()
    }
}
