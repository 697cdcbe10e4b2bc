use crate::generator::generate_edge_rules;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Represents a unique identifier for a tile.
///
/// This is the tile's index in its `TileCatalog`, so two catalog entries with
/// identical names and edges still have distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub usize);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the four sides of a cell.
///
/// Coordinates follow screen conventions: `North` is `y - 1`, `South` is `y + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All directions, in the order propagation visits them.
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// The direction pointing back from a neighbor.
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Unit step `(dx, dy)` for this direction.
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Axis index used by `AdjacencyRules`.
    pub const fn index(self) -> usize {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }
}

/// The four edge labels of a tile.
///
/// Labels are opaque tokens. Two tiles fit together across a border iff the
/// labels on the touching edges are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileEdges {
    pub north: String,
    pub east: String,
    pub south: String,
    pub west: String,
}

impl TileEdges {
    pub fn new(
        north: impl Into<String>,
        east: impl Into<String>,
        south: impl Into<String>,
        west: impl Into<String>,
    ) -> Self {
        Self {
            north: north.into(),
            east: east.into(),
            south: south.into(),
            west: west.into(),
        }
    }

    /// Same label on every side.
    pub fn uniform(label: impl Into<String>) -> Self {
        let label = label.into();
        Self::new(label.clone(), label.clone(), label.clone(), label)
    }

    /// Label on the given side.
    pub fn edge(&self, direction: Direction) -> &str {
        match direction {
            Direction::North => &self.north,
            Direction::East => &self.east,
            Direction::South => &self.south,
            Direction::West => &self.west,
        }
    }
}

/// Input description of a tile, as read from a catalog file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileDefinition {
    /// Display name (the tile "kind"), e.g. `"grass"` or `"horizontal road"`.
    pub name: String,
    /// Relative selection weight. Must be finite and non-negative.
    pub weight: f32,
    pub edges: TileEdges,
}

impl TileDefinition {
    pub fn new(name: impl Into<String>, weight: f32, edges: TileEdges) -> Self {
        Self {
            name: name.into(),
            weight,
            edges,
        }
    }
}

/// A validated catalog entry. Immutable once the catalog is built.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    id: TileId,
    name: String,
    weight: f32,
    edges: TileEdges,
}

impl Tile {
    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn edges(&self) -> &TileEdges {
        &self.edges
    }

    /// Label on the given side.
    pub fn edge(&self, direction: Direction) -> &str {
        self.edges.edge(direction)
    }

    /// Whether `other` may be placed on the `direction` side of `self`.
    pub fn fits(&self, other: &Self, direction: Direction) -> bool {
        self.edge(direction) == other.edge(direction.opposite())
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.id)
    }
}

/// Errors that can occur during TileCatalog creation or validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TileSetError {
    /// The catalog had no tiles.
    #[error("Tile catalog cannot be empty.")]
    Empty,
    /// A weight was negative, NaN or infinite.
    #[error("Tile weights must be finite and non-negative. Found invalid weight at index {0}: {1}")]
    InvalidWeight(usize, String),
}

/// Ordered, non-empty, read-only collection of tiles.
///
/// Duplicate entries are allowed and bias weighted sampling toward that kind.
#[derive(Debug, Clone, PartialEq)]
pub struct TileCatalog {
    tiles: Vec<Tile>,
}

impl TileCatalog {
    /// Creates a new `TileCatalog`, assigning each definition its index as `TileId`.
    ///
    /// # Errors
    ///
    /// Returns `TileSetError::Empty` if `definitions` is empty.
    /// Returns `TileSetError::InvalidWeight` if any weight is negative or not finite.
    pub fn new(definitions: Vec<TileDefinition>) -> Result<Self, TileSetError> {
        if definitions.is_empty() {
            return Err(TileSetError::Empty);
        }
        let mut tiles = Vec::with_capacity(definitions.len());
        for (index, definition) in definitions.into_iter().enumerate() {
            if !definition.weight.is_finite() || definition.weight < 0.0 {
                return Err(TileSetError::InvalidWeight(
                    index,
                    definition.weight.to_string(),
                ));
            }
            tiles.push(Tile {
                id: TileId(index),
                name: definition.name,
                weight: definition.weight,
                edges: definition.edges,
            });
        }
        Ok(Self { tiles })
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Gets the tile for a `TileId`, or `None` if out of range.
    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.0)
    }

    /// Gets the weight for a `TileId`, or `None` if out of range.
    pub fn get_weight(&self, id: TileId) -> Option<f32> {
        self.get(id).map(Tile::weight)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// First tile with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<&Tile> {
        self.tiles.iter().find(|tile| tile.name == name)
    }
}

/// Represents adjacency rules between tiles for the four directions.
///
/// Stored as a flattened boolean vector.
/// Indexing: `axis * num_tiles * num_tiles + tile1.0 * num_tiles + tile2.0`,
/// meaning "`tile2` may sit on the `axis` side of `tile1`".
#[derive(Debug, Clone)]
pub struct AdjacencyRules {
    num_tiles: usize,
    num_axes: usize,
    allowed: Vec<bool>,
}

impl AdjacencyRules {
    /// Creates new `AdjacencyRules` from a pre-flattened vector.
    ///
    /// # Panics
    ///
    /// Panics if the length of `allowed` is not `num_axes * num_tiles * num_tiles`.
    pub fn new(num_tiles: usize, num_axes: usize, allowed: Vec<bool>) -> Self {
        assert_eq!(
            allowed.len(),
            num_axes * num_tiles * num_tiles,
            "Provided 'allowed' vector has incorrect size."
        );
        Self {
            num_tiles,
            num_axes,
            allowed,
        }
    }

    /// Derives the rules from the catalog's edge labels.
    pub fn from_catalog(catalog: &TileCatalog) -> Self {
        let allowed = generate_edge_rules(catalog);
        Self::new(catalog.len(), Direction::ALL.len(), allowed)
    }

    pub fn num_tiles(&self) -> usize {
        self.num_tiles
    }

    pub fn num_axes(&self) -> usize {
        self.num_axes
    }

    /// Checks if `tile2` may be placed on the `direction` side of `tile1`.
    ///
    /// Out-of-range ids are treated as disallowed.
    #[inline]
    pub fn check(&self, tile1: TileId, tile2: TileId, direction: Direction) -> bool {
        if tile1.0 >= self.num_tiles || tile2.0 >= self.num_tiles {
            return false;
        }
        let index = direction.index() * self.num_tiles * self.num_tiles
            + tile1.0 * self.num_tiles
            + tile2.0;
        self.allowed.get(index).copied().unwrap_or(false)
    }
}
