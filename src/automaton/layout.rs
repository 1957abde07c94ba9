use crate::{automaton::StateId, math::IndexedMap};

/// A position on the drawing canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Describes where the label of an edge sits relative to its endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeAnchor {
    /// A self loop, drawn at `angle` radians around its state.
    Loop {
        /// Angle of the loop.
        angle: f64,
    },
    /// An edge between two distinct states. `parallel` is the relative position along the line
    /// between the states, `perpendicular` the distance from that line.
    Arc {
        /// Relative position along the connecting line.
        parallel: f64,
        /// Offset orthogonal to the connecting line.
        perpendicular: f64,
    },
}

impl EdgeAnchor {
    /// An anchor in the middle of a straight edge.
    pub fn straight() -> Self {
        EdgeAnchor::Arc {
            parallel: 0.5,
            perpendicular: 0.0,
        }
    }
}

/// Positional metadata of an automaton. It has no influence on any algorithm but is kept
/// consistent with the states and transitions by every edit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub(crate) states: IndexedMap<StateId, Point>,
    pub(crate) edges: IndexedMap<(StateId, StateId), EdgeAnchor>,
}

impl Layout {
    /// Returns the position of a state, if it has one.
    pub fn state_position(&self, id: &str) -> Option<Point> {
        self.states.get(id).copied()
    }

    /// Returns the anchor of the edge from `from` to `to`, if it has one.
    pub fn edge_anchor(&self, from: &str, to: &str) -> Option<EdgeAnchor> {
        self.edges
            .get(&(StateId::from(from), StateId::from(to)))
            .copied()
    }

    /// Returns true if no position is stored.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty() && self.edges.is_empty()
    }

    /// Keeps only the metadata of the given states, renaming them through `rename`.
    pub(crate) fn project<F>(&self, rename: F) -> Layout
    where
        F: Fn(&StateId) -> Option<StateId>,
    {
        let states = self
            .states
            .iter()
            .filter_map(|(q, point)| Some((rename(q)?, *point)))
            .collect();
        let edges = self
            .edges
            .iter()
            .filter_map(|((from, to), anchor)| Some(((rename(from)?, rename(to)?), *anchor)))
            .collect();
        Layout { states, edges }
    }
}
