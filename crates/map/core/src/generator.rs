//! Random dungeon layout generation.
//!
//! Rooms are carved as walled rectangles with a random floor variant inside,
//! consecutive rooms are linked by L-shaped stone-floor corridors, every room
//! gets a door, and a few furniture pieces and monsters are scattered on
//! floor cells. The output is a pure function of the RNG, so a seeded
//! [`rand::rngs::StdRng`] reproduces the same layout.

use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::difficulty::{DifficultyAssessment, assess};
use crate::document::CellRecord;
use crate::error::{GridError, Result};
use crate::grid::{MapDimensions, Position};

/// Smallest grid that can hold one room with a margin around it.
pub const MIN_GENERATED_SIDE: u32 = 8;

const ROOM_ATTEMPTS: usize = 100;
const WALL_COLOR: &str = "#6b7280";
const DOOR_COLOR: &str = "#92400e";
const CORRIDOR: (&str, &str) = ("stone-floor", "#808080");
const FLOORS: [(&str, &str); 3] = [
    ("floor", "#f3f4f6"),
    ("stone-floor", "#808080"),
    ("wood-floor", "#d2691e"),
];
const DECOR: [(&str, &str, &str); 5] = [
    ("furniture", "#fef3c7", "🍽"),
    ("furniture", "#fef3c7", "🪑"),
    ("furniture", "#fef3c7", "🛏️"),
    ("furniture", "#fef3c7", "📦"),
    ("decoration", "#fff3cd", "🔥"),
];
const MONSTER: (&str, &str, &str) = ("monster", "#fee2e2", "👹");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct RoomRect {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl RoomRect {
    /// Rooms must keep at least one cell of space between them.
    fn overlaps(&self, other: &RoomRect) -> bool {
        !(self.x + self.width + 1 < other.x
            || other.x + other.width + 1 < self.x
            || self.y + self.height + 1 < other.y
            || other.y + other.height + 1 < self.y)
    }

    fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    fn is_border(&self, x: i32, y: i32) -> bool {
        x == self.x || x == self.x + self.width - 1 || y == self.y || y == self.y + self.height - 1
    }

    fn random_interior<R: Rng + ?Sized>(&self, rng: &mut R) -> (i32, i32) {
        (
            self.x + 1 + rng.random_range(0..self.width - 2),
            self.y + 1 + rng.random_range(0..self.height - 2),
        )
    }
}

/// A generated layout, ready to be wrapped into a map document.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedLayout {
    pub grid_size: MapDimensions,
    pub rooms: usize,
    /// Cells sorted row-major.
    pub cells: Vec<CellRecord>,
    pub difficulty: DifficultyAssessment,
}

#[derive(Default)]
struct Canvas {
    cells: BTreeMap<(i32, i32), CellRecord>,
}

impl Canvas {
    fn set(&mut self, x: i32, y: i32, kind: &str, color: &str, icon: &str) {
        self.cells
            .insert((y, x), CellRecord::new(x, y, kind).with_style(color, icon));
    }

    fn kind(&self, x: i32, y: i32) -> Option<&str> {
        self.cells.get(&(y, x)).map(|cell| cell.kind.as_str())
    }

    fn carve(&mut self, x: i32, y: i32) {
        if matches!(self.kind(x, y), None | Some("wall")) {
            self.set(x, y, CORRIDOR.0, CORRIDOR.1, "");
        }
    }

    fn is_floor(&self, x: i32, y: i32) -> bool {
        self.kind(x, y).is_some_and(|kind| kind.contains("floor"))
    }
}

/// Generates a random layout for a `width x height` grid.
pub fn generate<R: Rng + ?Sized>(width: u32, height: u32, rng: &mut R) -> Result<GeneratedLayout> {
    if width < MIN_GENERATED_SIDE || height < MIN_GENERATED_SIDE {
        return Err(GridError::InvalidDimension {
            width: width.into(),
            height: height.into(),
        });
    }
    let grid_size = MapDimensions::new(width, height);
    let (grid_w, grid_h) = (width as i32, height as i32);

    let rooms = place_rooms(grid_w, grid_h, rng);
    let mut canvas = Canvas::default();

    for room in &rooms {
        for x in room.x..room.x + room.width {
            for y in room.y..room.y + room.height {
                if room.is_border(x, y) {
                    canvas.set(x, y, "wall", WALL_COLOR, "");
                } else if let Some((kind, color)) = FLOORS.choose(rng) {
                    canvas.set(x, y, kind, color, "");
                }
            }
        }
    }

    for pair in rooms.windows(2) {
        let (x1, y1) = pair[0].center();
        let (x2, y2) = pair[1].center();
        if rng.random_bool(0.5) {
            horizontal_corridor(&mut canvas, x1, x2, y1);
            vertical_corridor(&mut canvas, y1, y2, x2);
        } else {
            vertical_corridor(&mut canvas, y1, y2, x1);
            horizontal_corridor(&mut canvas, x1, x2, y2);
        }
    }

    for (index, room) in rooms.iter().enumerate() {
        let door = if index == 0 {
            Some(Position::new(room.x + room.width / 2, room.y))
        } else {
            inner_walls(room).choose(rng).copied()
        };
        if let Some(door) = door {
            canvas.set(door.x, door.y, "door", DOOR_COLOR, "");
        }
    }

    for room in &rooms {
        if rng.random_bool(0.7) {
            for _ in 0..rng.random_range(1..=3) {
                let (x, y) = room.random_interior(rng);
                if canvas.is_floor(x, y)
                    && let Some((kind, color, icon)) = DECOR.choose(rng)
                {
                    canvas.set(x, y, kind, color, icon);
                }
            }
        }
    }

    if !rooms.is_empty() {
        for _ in 0..rng.random_range(1..=3) {
            let Some(room) = rooms.choose(rng) else { break };
            let (x, y) = room.random_interior(rng);
            if canvas.is_floor(x, y) {
                canvas.set(x, y, MONSTER.0, MONSTER.1, MONSTER.2);
            }
        }
    }

    let cells: Vec<CellRecord> = canvas
        .cells
        .into_values()
        .filter(|cell| grid_size.contains(Position::new(cell.x, cell.y)))
        .collect();
    let difficulty = assess(&cells, grid_size);

    Ok(GeneratedLayout {
        grid_size,
        rooms: rooms.len(),
        cells,
        difficulty,
    })
}

fn place_rooms<R: Rng + ?Sized>(grid_w: i32, grid_h: i32, rng: &mut R) -> Vec<RoomRect> {
    let target = rng.random_range(4..=8);
    let mut rooms: Vec<RoomRect> = Vec::with_capacity(target);

    for _ in 0..target {
        for _ in 0..ROOM_ATTEMPTS {
            let width = rng.random_range(4..10);
            let height = rng.random_range(4..10);
            let (span_x, span_y) = (grid_w - width - 2, grid_h - height - 2);
            if span_x < 1 || span_y < 1 {
                continue;
            }

            let candidate = RoomRect {
                x: rng.random_range(0..span_x) + 1,
                y: rng.random_range(0..span_y) + 1,
                width,
                height,
            };
            if !rooms.iter().any(|room| room.overlaps(&candidate)) {
                rooms.push(candidate);
                break;
            }
        }
    }

    rooms
}

fn inner_walls(room: &RoomRect) -> Vec<Position> {
    let mut walls = Vec::new();
    for x in room.x + 1..room.x + room.width - 1 {
        walls.push(Position::new(x, room.y));
        walls.push(Position::new(x, room.y + room.height - 1));
    }
    for y in room.y + 1..room.y + room.height - 1 {
        walls.push(Position::new(room.x, y));
        walls.push(Position::new(room.x + room.width - 1, y));
    }
    walls
}

fn horizontal_corridor(canvas: &mut Canvas, x1: i32, x2: i32, y: i32) {
    for x in x1.min(x2)..=x1.max(x2) {
        canvas.carve(x, y);
    }
}

fn vertical_corridor(canvas: &mut Canvas, y1: i32, y2: i32, x: i32) {
    for y in y1.min(y2)..=y1.max(y2) {
        canvas.carve(x, y);
    }
}
