//! Prompt text and response schemas for the three generation calls.
//!
//! Schemas use the `generateContent` schema dialect (upper-case type names).

use serde_json::{json, Value};

use crate::models::{GameLevel, MarketAnalysis, UNFEASIBLE_MARKER};

/// Reference tile size the prototype's movement constants are tuned for.
pub const BASE_TILE_SIZE: u32 = 32;

/// Fixed colour palette for generated prototypes.
pub mod palette {
    pub const BACKGROUND: &str = "#1a1a2e";
    pub const WALL: &str = "#16213e";
    pub const FLOOR: &str = "#0f3460";
    pub const PLAYER: &str = "#e94560";
    pub const GOAL: &str = "#f5c518";
    pub const ENTITY: &str = "#53d8fb";
}

pub fn market_analysis_prompt(genre: &str) -> String {
    format!(
        "You are a senior games market analyst. Produce a concise market analysis for the \
         \"{genre}\" game genre.\n\
         \n\
         Return a JSON object with three arrays of short strings:\n\
         - \"trends\": current market trends for the genre (3-4 entries)\n\
         - \"mechanics\": core gameplay mechanics players expect or respond well to (3-4 entries)\n\
         - \"monetization\": monetization strategies that work for the genre (3-4 entries)\n\
         \n\
         Each entry should be one sentence. Do not include any text outside the JSON object.",
        genre = genre
    )
}

pub fn market_analysis_schema() -> Value {
    let string_list = json!({"type": "ARRAY", "items": {"type": "STRING"}});
    json!({
        "type": "OBJECT",
        "properties": {
            "trends": string_list,
            "mechanics": string_list,
            "monetization": string_list,
        },
        "required": ["trends", "mechanics", "monetization"]
    })
}

pub fn game_levels_prompt(genre: &str, analysis: &MarketAnalysis) -> String {
    format!(
        "You are an expert level designer for 2D tile-based games. Design exactly two playable \
         levels for a \"{genre}\" game.\n\
         \n\
         Market trends to draw on:\n{trends}\n\
         \n\
         Mechanics to showcase:\n{mechanics}\n\
         \n\
         Requirements for each level:\n\
         - \"tilemap\" is a rectangular grid (rows of single-character strings) between 10x8 and \
         20x15 tiles. Use '#' for walls and '.' for empty space. The outer border must be walls.\n\
         - \"player_start\" and \"goal_position\" are tile coordinates (x = column, y = row) of \
         empty tiles, and they must differ.\n\
         - \"entities\" lists placed objects with a \"type\" and a tile \"position\" on an empty tile.\n\
         - \"solvable_path\" is an ordered list of orthogonally adjacent empty tiles leading from \
         player_start to goal_position, inclusive of both.\n\
         - \"level_description\" briefly explains the level's idea and how it uses the mechanics.\n\
         \n\
         Before returning, validate every level yourself: walk the solvable_path step by step, \
         confirm each step moves exactly one tile horizontally or vertically, that no step lands \
         on a '#' tile, and that the path starts at player_start and ends at goal_position. If \
         any check fails, fix the tilemap or the path and validate again. Summarise the checks \
         you performed in \"validity_check\".\n\
         \n\
         Return a JSON array containing exactly two level objects and nothing else.",
        genre = genre,
        trends = bullet_list(&analysis.trends),
        mechanics = bullet_list(&analysis.mechanics),
    )
}

pub fn game_levels_schema() -> Value {
    let position = json!({
        "type": "OBJECT",
        "properties": {
            "x": {"type": "NUMBER"},
            "y": {"type": "NUMBER"},
        },
        "required": ["x", "y"]
    });

    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "level_description": {"type": "STRING"},
                "tilemap": {
                    "type": "ARRAY",
                    "items": {"type": "ARRAY", "items": {"type": "STRING"}}
                },
                "entities": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "type": {"type": "STRING"},
                            "position": position,
                        },
                        "required": ["type", "position"]
                    }
                },
                "player_start": position,
                "goal_position": position,
                "solvable_path": {"type": "ARRAY", "items": position},
                "validity_check": {"type": "STRING"},
            },
            "required": [
                "level_description",
                "tilemap",
                "entities",
                "player_start",
                "goal_position",
                "solvable_path",
                "validity_check"
            ]
        }
    })
}

pub fn prototype_prompt(level: &GameLevel) -> String {
    let (width, height) = level.dimensions();
    let tilemap = serde_json::to_string(&level.tilemap).unwrap_or_default();
    let entities = serde_json::to_string(&level.entities).unwrap_or_default();

    format!(
        r#"You are an expert HTML5 game developer. Build a playable prototype of the level below.

LEVEL
Description: {description}
Tilemap ({width} columns x {height} rows, '#' = wall, '.' = empty): {tilemap}
Player start (tile x, y): ({start_x}, {start_y})
Goal (tile x, y): ({goal_x}, {goal_y})
Entities: {entities}

OUTPUT FORMAT
- Output ONLY the markup that belongs inside <body>: a single <canvas id="game"></canvas> followed by one <script> element.
- No <html>, <head> or <body> tags, no markdown fences, no commentary.
- If the level cannot be turned into a playable prototype (for example the goal is unreachable), output exactly "{marker}" followed by a one-sentence explanation, and nothing else.

CANVAS AND SCALING
- Size the canvas to the full window and resize it on every window "resize" event.
- Compute tileSize = Math.floor(Math.min(canvas.width / {width}, canvas.height / {height})) so the level keeps its aspect ratio.
- Compute offsetX = (canvas.width - tileSize * {width}) / 2 and offsetY = (canvas.height - tileSize * {height}) / 2 and draw everything translated by these offsets so the level is centred.
- On resize, recompute tileSize and the offsets and keep the player at the same tile-relative position.

COLOURS
- Background {background}, walls {wall}, empty tiles {floor}, player {player}, goal {goal}, entities {entity}.

PLAYER MOVEMENT
- The player is a square of 0.8 * tileSize, starting centred on the start tile.
- Use arrow keys and WASD. Track pressed keys in a Set on keydown/keyup.
- All movement constants are defined for a reference tile size of {base_tile} pixels and multiplied by scale = tileSize / {base_tile}: acceleration 0.5 * scale, friction 0.85, maximum speed 4 * scale.
- Each frame: apply acceleration from pressed keys, apply friction, clamp velocity to the maximum speed, then update the position.

COLLISION
- Resolve collisions AFTER updating the position, separately for the x and y axes.
- Convert the player's bounding box to tile coordinates (subtracting the offsets and dividing by tileSize) and test every overlapped tile.
- When a wall tile overlaps, push the player back to the wall edge on that axis and zero the velocity on that axis.
- Treat everything outside the tilemap as wall.

WIN CONDITION
- When the player's bounding box overlaps the goal tile, stop the game loop and draw "You Win!" centred on the canvas.

Use requestAnimationFrame for the game loop. The script must run as-is inside a sandboxed iframe without external resources."#,
        description = level.level_description,
        width = width,
        height = height,
        tilemap = tilemap,
        start_x = level.player_start.x,
        start_y = level.player_start.y,
        goal_x = level.goal_position.x,
        goal_y = level.goal_position.y,
        entities = entities,
        marker = UNFEASIBLE_MARKER,
        background = palette::BACKGROUND,
        wall = palette::WALL,
        floor = palette::FLOOR,
        player = palette::PLAYER,
        goal = palette::GOAL,
        entity = palette::ENTITY,
        base_tile = BASE_TILE_SIZE,
    )
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}
