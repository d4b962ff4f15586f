//! Room detection: 4-connected regions of open cells.

use std::collections::VecDeque;

use super::{Map, Position};

/// A connected region of open cells, positions sorted row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Room {
    cells: Vec<Position>,
}

impl Room {
    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, position: Position) -> bool {
        self.cells
            .binary_search_by(|probe| row_major(*probe).cmp(&row_major(position)))
            .is_ok()
    }
}

fn row_major(position: Position) -> (i32, i32) {
    (position.y, position.x)
}

/// Lazy iterator over the rooms of a [`Map`].
///
/// Each call to [`Map::rooms`] starts a fresh scan; regions are discovered
/// in row-major order of their first cell.
pub struct Rooms<'a> {
    map: &'a Map,
    visited: Vec<bool>,
    cursor: usize,
}

impl<'a> Rooms<'a> {
    pub(super) fn new(map: &'a Map) -> Self {
        Self {
            map,
            visited: vec![false; map.cells.len()],
            cursor: 0,
        }
    }

    fn flood(&mut self, start: usize) -> Room {
        let dimensions = self.map.dimensions;
        let mut cells = Vec::new();
        let mut queue = VecDeque::from([start]);
        self.visited[start] = true;

        while let Some(index) = queue.pop_front() {
            let position = self.map.cells[index].position;
            cells.push(position);

            for neighbour in position.neighbours() {
                if let Some(next) = dimensions.index_of(neighbour)
                    && !self.visited[next]
                    && self.map.cells[next].is_open()
                {
                    self.visited[next] = true;
                    queue.push_back(next);
                }
            }
        }

        cells.sort_by_key(|position| row_major(*position));
        Room { cells }
    }
}

impl Iterator for Rooms<'_> {
    type Item = Room;

    fn next(&mut self) -> Option<Room> {
        while self.cursor < self.map.cells.len() {
            let index = self.cursor;
            self.cursor += 1;

            if !self.visited[index] && self.map.cells[index].is_open() {
                return Some(self.flood(index));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_map_is_a_single_room() {
        let map = Map::new("field", 6, 4).unwrap();
        let rooms: Vec<_> = map.rooms().collect();

        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].len(), 24);
    }

    #[test]
    fn wall_line_splits_rooms() {
        let mut map = Map::new("split", 5, 3).unwrap();
        for y in 0..3 {
            map.cell_mut(2, y).unwrap().set_terrain("stone-wall");
        }

        let rooms: Vec<_> = map.rooms().collect();

        assert_eq!(rooms.len(), 2);
        assert!(rooms[0].contains(Position::new(0, 0)));
        assert!(rooms[1].contains(Position::new(4, 2)));
        assert!(!rooms[0].contains(Position::new(2, 1)));
        assert_eq!(rooms[0].len() + rooms[1].len(), 12);
    }

    #[test]
    fn scan_is_restartable() {
        let mut map = Map::new("split", 3, 3).unwrap();
        map.cell_mut(1, 1).unwrap().set_terrain("wall");

        let first: Vec<_> = map.rooms().collect();
        let second: Vec<_> = map.rooms().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn all_wall_map_has_no_rooms() {
        let mut map = Map::new("solid", 2, 2).unwrap();
        for y in 0..2 {
            for x in 0..2 {
                map.cell_mut(x, y).unwrap().set_terrain("wall");
            }
        }

        assert_eq!(map.rooms().next(), None);
    }
}
