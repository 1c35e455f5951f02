//! Level-editor export: traced outlines as looping walls and floor shapes.
//!
//! Only the subset of the editor's map document that the generator fills in
//! is modelled here. Coordinates are scaled to world units.

use dungeon_core::{Dungeon, Polygon, Pos, Symbol};
use serde::Serialize;

pub const WORLD_UNITS_PER_CELL: i32 = 256;
const FIRST_WALL_NODE_ID: usize = 22;
const MAP_FORMAT: u32 = 3;
const WALL_TEXTURE: &str = "res://textures/walls/stone.png";
const WALL_COLOR: &str = "ff605f58";

#[derive(Debug, Serialize)]
pub struct EditorMap {
    pub header: EditorHeader,
    pub world: EditorWorld,
}

#[derive(Debug, Serialize)]
pub struct EditorHeader {
    pub creation_build: String,
    pub uses_default_assets: bool,
}

#[derive(Debug, Serialize)]
pub struct EditorWorld {
    pub format: u32,
    pub width: usize,
    pub height: usize,
    pub next_node_id: String,
    pub levels: EditorLevels,
}

#[derive(Debug, Serialize)]
pub struct EditorLevels {
    #[serde(rename = "0")]
    pub ground: EditorLevel,
}

#[derive(Debug, Serialize)]
pub struct EditorLevel {
    pub label: String,
    pub shapes: EditorShapes,
    pub tiles: EditorTiles,
    pub walls: Vec<EditorWall>,
}

#[derive(Debug, Serialize)]
pub struct EditorShapes {
    pub polygons: Vec<String>,
    pub walls: Vec<usize>,
}

#[derive(Debug, Serialize)]
pub struct EditorTiles {
    pub cells: String,
}

#[derive(Debug, Serialize)]
pub struct EditorWall {
    pub points: String,
    pub texture: String,
    pub color: String,
    #[serde(rename = "loop")]
    pub looped: bool,
    #[serde(rename = "type")]
    pub kind: u32,
    pub joint: u32,
    pub normalize_uv: bool,
    pub shadow: bool,
    pub node_id: String,
}

pub fn build_editor_map(dungeon: &Dungeon, polygons: &[Polygon]) -> EditorMap {
    let walls: Vec<EditorWall> = polygons
        .iter()
        .enumerate()
        .map(|(index, polygon)| EditorWall {
            points: vector_array(polygon),
            texture: WALL_TEXTURE.to_string(),
            color: WALL_COLOR.to_string(),
            looped: true,
            kind: 0,
            joint: 1,
            normalize_uv: true,
            shadow: true,
            node_id: (FIRST_WALL_NODE_ID + index).to_string(),
        })
        .collect();

    EditorMap {
        header: EditorHeader {
            creation_build: format!("dungeon-tools {}", env!("CARGO_PKG_VERSION")),
            uses_default_assets: true,
        },
        world: EditorWorld {
            format: MAP_FORMAT,
            width: dungeon.width(),
            height: dungeon.height(),
            next_node_id: (FIRST_WALL_NODE_ID + polygons.len()).to_string(),
            levels: EditorLevels {
                ground: EditorLevel {
                    label: "Ground".to_string(),
                    shapes: EditorShapes {
                        polygons: polygons.iter().map(vector_array).collect(),
                        walls: polygons.iter().map(|polygon| polygon.len() / 2).collect(),
                    },
                    tiles: EditorTiles { cells: floor_mask(dungeon) },
                    walls,
                },
            },
        },
    }
}

fn vector_array(polygon: &Polygon) -> String {
    let coordinates: Vec<String> = polygon
        .points()
        .iter()
        .map(|pos| format!("{}, {}", pos.x * WORLD_UNITS_PER_CELL, pos.y * WORLD_UNITS_PER_CELL))
        .collect();
    format!("PoolVector2Array( {} )", coordinates.join(", "))
}

/// Column-major floor mask: `1` for floor, `-1` for anything else.
fn floor_mask(dungeon: &Dungeon) -> String {
    let grid = dungeon.grid();
    let mut values = Vec::with_capacity(grid.width() * grid.height());
    for x in 0..grid.width() as i32 {
        for y in 0..grid.height() as i32 {
            let floor = grid.symbol_at(Pos { y, x }) == Symbol::Floor;
            values.push(if floor { "1" } else { "-1" });
        }
    }
    format!("PoolIntArray( {} )", values.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon_core::generate;
    use serde_json::Value;

    fn single_room_map() -> (Dungeon, Value) {
        let dungeon = generate(43, 43, 4, 8, 1, 42).expect("one room always fits");
        let polygons = dungeon.trace_polygons().expect("room outline should close");
        let map = build_editor_map(&dungeon, &polygons);
        let json = serde_json::to_value(&map).expect("editor map should serialize");
        (dungeon, json)
    }

    #[test]
    fn walls_are_scaled_looping_outlines() {
        let (dungeon, json) = single_room_map();
        let room = dungeon.structures()[0];
        let wall = &json["world"]["levels"]["0"]["walls"][0];

        let points = wall["points"].as_str().expect("points should be a string");
        let expected_start = format!(
            "PoolVector2Array( {}, {}, ",
            room.top_left.x * WORLD_UNITS_PER_CELL,
            room.top_left.y * WORLD_UNITS_PER_CELL
        );
        assert!(points.starts_with(&expected_start), "{points}");
        assert_eq!(wall["loop"], Value::Bool(true));
        assert_eq!(wall["node_id"], Value::String("22".to_string()));
        assert_eq!(json["world"]["next_node_id"], Value::String("23".to_string()));
    }

    #[test]
    fn shapes_mirror_the_traced_polygons() {
        let (_, json) = single_room_map();
        let shapes = &json["world"]["levels"]["0"]["shapes"];
        assert_eq!(shapes["polygons"].as_array().map(Vec::len), Some(1));
        assert_eq!(shapes["walls"][0], Value::from(2));
    }

    #[test]
    fn floor_mask_covers_every_cell_column_major() {
        let (dungeon, json) = single_room_map();
        let cells = json["world"]["levels"]["0"]["tiles"]["cells"].as_str().expect("cells string");
        let inner = cells
            .strip_prefix("PoolIntArray( ")
            .and_then(|rest| rest.strip_suffix(" )"))
            .expect("pool int array wrapper");
        let values: Vec<&str> = inner.split(", ").collect();
        assert_eq!(values.len(), 43 * 43);

        let room = dungeon.structures()[0];
        let interior_x = room.top_left.x + 1;
        let interior_y = room.top_left.y + 1;
        assert_eq!(values[(interior_x as usize) * 43 + interior_y as usize], "1");
        assert_eq!(values[0], "-1");
        let floors = values.iter().filter(|value| **value == "1").count();
        assert_eq!(floors, (room.width() - 2) * (room.height() - 2));
    }
}
