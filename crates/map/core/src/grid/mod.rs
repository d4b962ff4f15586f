//! In-memory grid model used by the editor.
//!
//! A [`Map`] owns a `width x height` grid of [`Cell`]s stored row-major, plus
//! the labels and game objects placed on it. All mutation is bounds-checked:
//! nothing can be placed outside `[0, width) x [0, height)`.

mod common;
mod object;
mod rooms;
mod stats;

use std::collections::BTreeMap;

pub use common::{MapDimensions, Position};
pub use object::{GameObject, GameObjectKind, ObjectCategory, ObjectId};
pub use rooms::{Room, Rooms};
pub use stats::MapStatistics;

use crate::document::{CellRecord, MapDocument};
use crate::error::{GridError, Result};

/// Terrain assigned to every cell of a freshly created map.
pub const DEFAULT_TERRAIN: &str = "grass";

/// Cell tags that block movement and split rooms.
pub const WALL_TERRAINS: [&str; 3] = ["wall", "stone-wall", "wood-wall"];

pub fn is_wall(tag: &str) -> bool {
    WALL_TERRAINS.contains(&tag)
}

/// One grid position: terrain tag plus the object standing on it, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    position: Position,
    terrain: String,
    occupant: Option<ObjectId>,
}

impl Cell {
    fn new(position: Position) -> Self {
        Self {
            position,
            terrain: DEFAULT_TERRAIN.to_owned(),
            occupant: None,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn terrain(&self) -> &str {
        &self.terrain
    }

    pub fn set_terrain(&mut self, terrain: impl Into<String>) {
        self.terrain = terrain.into();
    }

    pub fn occupant(&self) -> Option<ObjectId> {
        self.occupant
    }

    /// Open cells are the ones rooms are made of.
    pub fn is_open(&self) -> bool {
        !is_wall(&self.terrain)
    }
}

/// Free text pinned to a cell.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Label {
    pub text: String,
    pub position: Position,
}

#[derive(Clone, Debug)]
pub struct Map {
    name: String,
    dimensions: MapDimensions,
    cells: Vec<Cell>,
    labels: Vec<Label>,
    objects: BTreeMap<ObjectId, GameObject>,
    next_object_id: u32,
}

impl Map {
    /// Creates a map with every cell set to [`DEFAULT_TERRAIN`] and nothing placed.
    pub fn new(name: impl Into<String>, width: i32, height: i32) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(GridError::InvalidDimension {
                width: width.into(),
                height: height.into(),
            });
        }

        let dimensions = MapDimensions::new(width as u32, height as u32);
        let cells = (0..height)
            .flat_map(|y| (0..width).map(move |x| Cell::new(Position::new(x, y))))
            .collect();

        Ok(Self {
            name: name.into(),
            dimensions,
            cells,
            labels: Vec::new(),
            objects: BTreeMap::new(),
            next_object_id: 0,
        })
    }

    /// Builds the grid model of a stored document.
    ///
    /// Cell tags that name an object (monsters, characters, furniture) become
    /// [`GameObject`]s on a default-terrain cell; every other non-empty tag
    /// becomes the cell's terrain.
    pub fn from_document(document: &MapDocument) -> Result<Self> {
        let size = document.grid_size;
        let mut map = Self::new(
            document.name.clone(),
            i32::try_from(size.width).unwrap_or(i32::MAX),
            i32::try_from(size.height).unwrap_or(i32::MAX),
        )?;

        for record in &document.cells {
            let position = Position::new(record.x, record.y);
            map.check_bounds(position)?;
            if record.is_empty() {
                continue;
            }
            match object_for(record) {
                Some(object) => {
                    map.add_object(object)?;
                }
                None => map.cell_mut(record.x, record.y)?.set_terrain(&record.kind),
            }
        }

        Ok(map)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    pub fn width(&self) -> u32 {
        self.dimensions.width
    }

    pub fn height(&self) -> u32 {
        self.dimensions.height
    }

    pub fn cell(&self, x: i32, y: i32) -> Result<&Cell> {
        let index = self.index(Position::new(x, y))?;
        Ok(&self.cells[index])
    }

    pub fn cell_mut(&mut self, x: i32, y: i32) -> Result<&mut Cell> {
        let index = self.index(Position::new(x, y))?;
        Ok(&mut self.cells[index])
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Placed objects in placement order.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &GameObject)> {
        self.objects.iter().map(|(id, object)| (*id, object))
    }

    pub fn object(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.get(&id)
    }

    /// Places an object at its own position and returns its handle.
    pub fn add_object(&mut self, object: GameObject) -> Result<ObjectId> {
        let index = self.index(object.position)?;

        let id = ObjectId(self.next_object_id);
        self.next_object_id += 1;
        self.cells[index].occupant = Some(id);
        self.objects.insert(id, object);

        Ok(id)
    }

    /// Removes a placed object, handing it back to the caller.
    pub fn remove_object(&mut self, id: ObjectId) -> Result<GameObject> {
        let object = self.objects.remove(&id).ok_or(GridError::NotFound(id))?;

        // Objects are always in bounds, so the index lookup cannot fail here.
        if let Some(index) = self.dimensions.index_of(object.position)
            && self.cells[index].occupant == Some(id)
        {
            self.cells[index].occupant = self
                .objects
                .iter()
                .rev()
                .find(|(_, other)| other.position == object.position)
                .map(|(other_id, _)| *other_id);
        }

        Ok(object)
    }

    pub fn add_label(&mut self, text: impl Into<String>, x: i32, y: i32) -> Result<()> {
        let position = Position::new(x, y);
        self.check_bounds(position)?;
        self.labels.push(Label {
            text: text.into(),
            position,
        });
        Ok(())
    }

    /// Lazily yields the connected regions of open cells.
    pub fn rooms(&self) -> Rooms<'_> {
        Rooms::new(self)
    }

    pub fn statistics(&self) -> MapStatistics {
        MapStatistics::collect(self)
    }

    fn check_bounds(&self, position: Position) -> Result<()> {
        self.index(position).map(|_| ())
    }

    fn index(&self, position: Position) -> Result<usize> {
        self.dimensions
            .index_of(position)
            .ok_or(GridError::OutOfBounds {
                position,
                width: self.dimensions.width,
                height: self.dimensions.height,
            })
    }
}

/// Maps the object-like cell tags of the editor onto game objects.
fn object_for(record: &CellRecord) -> Option<GameObject> {
    let position = Position::new(record.x, record.y);
    let object = match record.kind.as_str() {
        "monster" | "entity" => GameObject::monster(&record.kind, position, 1, "unknown"),
        "player" | "character" => GameObject::character(&record.kind, position, 10),
        "furniture" | "table" | "chair" | "bed" | "chest" => {
            GameObject::furniture(&record.kind, position, 1, 1, "wood")
        }
        _ => return None,
    };
    Some(object)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_map_has_width_times_height_default_cells() {
        let map = Map::new("cave", 7, 4).unwrap();

        assert_eq!(map.cells().count(), 28);
        assert!(map.cells().all(|cell| cell.terrain() == DEFAULT_TERRAIN));
        assert!(map.cells().all(|cell| cell.occupant().is_none()));
        assert_eq!(map.objects().count(), 0);
    }

    #[test]
    fn new_map_rejects_non_positive_dimensions() {
        assert_eq!(
            Map::new("bad", 0, 5).unwrap_err(),
            GridError::InvalidDimension {
                width: 0,
                height: 5
            }
        );
        assert!(Map::new("bad", 3, -1).is_err());
    }

    #[test]
    fn cell_coordinates_match_lookup() {
        let map = Map::new("hall", 5, 3).unwrap();

        for y in 0..3 {
            for x in 0..5 {
                assert_eq!(map.cell(x, y).unwrap().position(), Position::new(x, y));
            }
        }
    }

    #[test]
    fn cell_lookup_outside_grid_fails() {
        let map = Map::new("hall", 5, 3).unwrap();

        for (x, y) in [(-1, 0), (0, -1), (5, 0), (0, 3)] {
            assert!(matches!(
                map.cell(x, y),
                Err(GridError::OutOfBounds { .. })
            ));
        }
    }

    #[test]
    fn add_object_rejects_out_of_bounds_position() {
        let mut map = Map::new("hall", 4, 4).unwrap();
        let goblin = GameObject::monster("goblin", Position::new(4, 1), 2, "goblin");

        assert!(matches!(
            map.add_object(goblin),
            Err(GridError::OutOfBounds { .. })
        ));
        assert_eq!(map.objects().count(), 0);
    }

    #[test]
    fn remove_object_round_trip() {
        let mut map = Map::new("hall", 4, 4).unwrap();
        let chest = GameObject::furniture("chest", Position::new(2, 2), 1, 1, "oak");

        let id = map.add_object(chest.clone()).unwrap();
        assert_eq!(map.cell(2, 2).unwrap().occupant(), Some(id));

        assert_eq!(map.remove_object(id).unwrap(), chest);
        assert_eq!(map.cell(2, 2).unwrap().occupant(), None);
        assert_eq!(map.remove_object(id), Err(GridError::NotFound(id)));
    }

    #[test]
    fn removing_top_object_reveals_the_one_below() {
        let mut map = Map::new("hall", 4, 4).unwrap();
        let spot = Position::new(1, 1);

        let below = map.add_object(GameObject::character("hero", spot, 12)).unwrap();
        let above = map
            .add_object(GameObject::furniture("rug", spot, 1, 1, "wool"))
            .unwrap();

        map.remove_object(above).unwrap();
        assert_eq!(map.cell(1, 1).unwrap().occupant(), Some(below));
    }

    #[test]
    fn labels_are_bounds_checked() {
        let mut map = Map::new("hall", 4, 4).unwrap();

        map.add_label("entrance", 0, 3).unwrap();
        assert!(map.add_label("nowhere", 9, 9).is_err());
        assert_eq!(map.labels().len(), 1);
    }

    #[test]
    fn from_document_places_objects_and_terrain() {
        let document = MapDocument {
            name: "crypt".into(),
            grid_size: MapDimensions::new(5, 5),
            cells: vec![
                CellRecord::new(0, 0, "wall"),
                CellRecord::new(2, 2, "monster"),
                CellRecord::new(3, 3, "chest"),
                CellRecord::new(4, 4, ""),
            ],
            ..MapDocument::default()
        };

        let map = Map::from_document(&document).unwrap();

        assert_eq!(map.cell(0, 0).unwrap().terrain(), "wall");
        assert_eq!(map.cell(4, 4).unwrap().terrain(), DEFAULT_TERRAIN);
        assert_eq!(map.objects().count(), 2);
        assert!(map.cell(2, 2).unwrap().occupant().is_some());
    }

    #[test]
    fn from_document_rejects_cells_outside_grid() {
        let document = MapDocument {
            name: "crypt".into(),
            grid_size: MapDimensions::new(3, 3),
            cells: vec![CellRecord::new(3, 0, "wall")],
            ..MapDocument::default()
        };

        assert!(matches!(
            Map::from_document(&document),
            Err(GridError::OutOfBounds { .. })
        ));
    }
}
