use std::collections::BTreeMap;

use strum::IntoEnumIterator;

use super::{Map, ObjectCategory};

/// Aggregate numbers about a map's layout and contents.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MapStatistics {
    /// Placed objects per category; every category is present, possibly zero.
    pub object_counts: BTreeMap<ObjectCategory, usize>,
    pub total_rooms: usize,
    /// Objects standing inside a room, averaged over rooms (0 without rooms).
    pub avg_objects_per_room: f64,
}

impl MapStatistics {
    pub(super) fn collect(map: &Map) -> Self {
        let mut object_counts: BTreeMap<_, _> = ObjectCategory::iter().map(|c| (c, 0)).collect();
        for (_, object) in map.objects() {
            *object_counts.entry(object.kind.category()).or_default() += 1;
        }

        let mut total_rooms = 0;
        let mut objects_in_rooms = 0;
        for room in map.rooms() {
            total_rooms += 1;
            objects_in_rooms += map
                .objects()
                .filter(|(_, object)| room.contains(object.position))
                .count();
        }

        let avg_objects_per_room = if total_rooms == 0 {
            0.0
        } else {
            objects_in_rooms as f64 / total_rooms as f64
        };

        Self {
            object_counts,
            total_rooms,
            avg_objects_per_room,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GameObject, Position};

    #[test]
    fn counts_objects_and_rooms() {
        let mut map = Map::new("split", 5, 3).unwrap();
        for y in 0..3 {
            map.cell_mut(2, y).unwrap().set_terrain("wall");
        }
        map.add_object(GameObject::monster("rat", Position::new(0, 0), 1, "rat"))
            .unwrap();
        map.add_object(GameObject::monster("bat", Position::new(4, 0), 1, "bat"))
            .unwrap();
        map.add_object(GameObject::character("hero", Position::new(4, 2), 20))
            .unwrap();

        let stats = map.statistics();

        assert_eq!(stats.object_counts[&ObjectCategory::Monster], 2);
        assert_eq!(stats.object_counts[&ObjectCategory::Character], 1);
        assert_eq!(stats.object_counts[&ObjectCategory::Furniture], 0);
        assert_eq!(stats.total_rooms, 2);
        assert!((stats.avg_objects_per_room - 1.5).abs() < f64::EPSILON);
    }
}
