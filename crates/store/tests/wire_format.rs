//! JSON shape of map documents as exchanged with the editor frontend.

use map_core::{CellRecord, Difficulty, MapDimensions, MapDocument};
use serde_json::json;

#[test]
fn decodes_frontend_payload_with_defaults() {
    let document: MapDocument = serde_json::from_value(json!({
        "name": "m1",
        "cells": [{"x": 1, "y": 1, "type": "wall"}]
    }))
    .unwrap();

    assert_eq!(document.name, "m1");
    assert_eq!(document.grid_size, MapDimensions::DEFAULT);
    assert_eq!(document.zoom, 1.0);
    assert_eq!(document.cells[0].kind, "wall");
    assert_eq!(document.cells[0].color, "");
    assert_eq!(document.difficulty, None);
}

#[test]
fn falsy_cell_types_decode_as_empty() {
    let document: MapDocument = serde_json::from_value(json!({
        "name": "m1",
        "cells": [
            {"x": 0, "y": 0, "type": 0},
            {"x": 1, "y": 0, "type": false},
            {"x": 2, "y": 0, "type": null},
            {"x": 3, "y": 0},
            {"x": 4, "y": 0, "type": ""}
        ]
    }))
    .unwrap();

    assert!(document.cells.iter().all(CellRecord::is_empty));
    assert!(document.is_blank());
}

#[test]
fn difficulty_uses_screaming_case() {
    let value = serde_json::to_value(Difficulty::VeryHard).unwrap();
    assert_eq!(value, json!("VERY_HARD"));
    assert_eq!("very_hard".parse::<Difficulty>().unwrap(), Difficulty::VeryHard);
    assert!(serde_json::from_value::<Difficulty>(json!("IMPOSSIBLE")).is_err());
}

#[test]
fn encodes_camel_case_fields() {
    let document = MapDocument::new("m2", MapDimensions::new(4, 3))
        .with_cells(vec![CellRecord::new(0, 0, "door")]);
    let value = serde_json::to_value(&document).unwrap();

    assert_eq!(value["gridSize"], json!({"width": 4, "height": 3}));
    assert_eq!(value["cellCount"], json!(1));
    assert_eq!(value["cells"][0]["type"], json!("door"));
    assert!(value.get("timestamp").is_none());
}
