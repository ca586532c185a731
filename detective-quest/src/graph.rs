use serde::{Deserialize, Serialize};
use std::fmt;

/// Nested description of a room layout, as it appears in scenario files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Box<RoomSpec>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Box<RoomSpec>>,
}

impl RoomSpec {
    pub fn leaf(name: &str) -> Self {
        Self {
            name: name.to_string(),
            left: None,
            right: None,
        }
    }

    pub fn with_left(mut self, child: RoomSpec) -> Self {
        self.left = Some(Box::new(child));
        self
    }

    pub fn with_right(mut self, child: RoomSpec) -> Self {
        self.right = Some(Box::new(child));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// Stable handle of a location inside its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocationId(usize);

impl LocationId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Location {
    name: String,
    left: Option<LocationId>,
    right: Option<LocationId>,
}

impl Location {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            left: None,
            right: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_dead_end(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Immutable binary layout of rooms. The root always has id 0.
#[derive(Debug, Clone)]
pub struct LocationGraph {
    locations: Vec<Location>,
}

impl LocationGraph {
    pub fn build(layout: &RoomSpec) -> Self {
        let mut locations = vec![Location::new(&layout.name)];
        let mut pending: Vec<(&RoomSpec, LocationId)> = vec![(layout, LocationId(0))];

        while let Some((spec, id)) = pending.pop() {
            if let Some(left) = spec.left.as_deref() {
                let child = LocationId(locations.len());
                locations.push(Location::new(&left.name));
                locations[id.0].left = Some(child);
                pending.push((left, child));
            }
            if let Some(right) = spec.right.as_deref() {
                let child = LocationId(locations.len());
                locations.push(Location::new(&right.name));
                locations[id.0].right = Some(child);
                pending.push((right, child));
            }
        }

        Self { locations }
    }

    pub fn root(&self) -> LocationId {
        LocationId(0)
    }

    pub fn location(&self, id: LocationId) -> &Location {
        &self.locations[id.0]
    }

    pub fn name(&self, id: LocationId) -> &str {
        &self.locations[id.0].name
    }

    pub fn children(&self, id: LocationId) -> (Option<LocationId>, Option<LocationId>) {
        let location = &self.locations[id.0];
        (location.left, location.right)
    }

    pub fn child(&self, id: LocationId, direction: Direction) -> Option<LocationId> {
        let (left, right) = self.children(id);
        match direction {
            Direction::Left => left,
            Direction::Right => right,
        }
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Number of levels on the longest root-to-leaf path (a lone root has depth 1).
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.root(), 1usize)];
        while let Some((id, level)) = stack.pop() {
            deepest = deepest.max(level);
            let (left, right) = self.children(id);
            stack.extend(left.map(|child| (child, level + 1)));
            stack.extend(right.map(|child| (child, level + 1)));
        }
        deepest
    }

    /// Pre-order walk starting at the root.
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder {
            graph: self,
            stack: vec![self.root()],
        }
    }
}

pub struct PreOrder<'a> {
    graph: &'a LocationGraph,
    stack: Vec<LocationId>,
}

impl Iterator for PreOrder<'_> {
    type Item = LocationId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let (left, right) = self.graph.children(id);
        self.stack.extend(right);
        self.stack.extend(left);
        Some(id)
    }
}
