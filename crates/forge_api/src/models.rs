//! Data model shared by the client and the application layer.

use serde::{Deserialize, Serialize};

/// Prefix the model uses to refuse a prototype.
pub const UNFEASIBLE_MARKER: &str = "PROTOTYPE_UNFEASIBLE:";

/// Style block placed in front of every generated prototype.
pub const STYLE_PREAMBLE: &str = "<style>body { margin: 0; overflow: hidden; background-color: #1a1a2e; } canvas { display: block; }</style>";

/// Market analysis for a genre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAnalysis {
    pub trends: Vec<String>,
    pub mechanics: Vec<String>,
    pub monetization: Vec<String>,
}

/// Tile or pixel coordinates, depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A placed game object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub kind: String,
    pub position: Position,
}

/// A self-contained level design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameLevel {
    pub level_description: String,
    /// Rows of single-character tiles, `#` wall and `.` empty
    pub tilemap: Vec<Vec<String>>,
    pub entities: Vec<Entity>,
    pub player_start: Position,
    pub goal_position: Position,
    pub solvable_path: Vec<Position>,
    pub validity_check: String,
}

impl GameLevel {
    /// Each tilemap row joined into a single string.
    pub fn tilemap_rows(&self) -> Vec<String> {
        self.tilemap.iter().map(|row| row.concat()).collect()
    }

    /// `(width, height)` in tiles; width is the longest row.
    pub fn dimensions(&self) -> (usize, usize) {
        let width = self.tilemap.iter().map(Vec::len).max().unwrap_or(0);
        (width, self.tilemap.len())
    }
}

/// One level generation call yields exactly two levels.
pub type LevelPair = [GameLevel; 2];

/// Output of prototype generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum PrototypeResult {
    /// Renderable markup, style preamble included
    Html(String),
    /// Explanation of why the level cannot be prototyped
    Text(String),
}

impl PrototypeResult {
    /// Interpret raw model output.
    ///
    /// Output starting with [`UNFEASIBLE_MARKER`] (after trimming) becomes a
    /// `Text` result holding the trimmed remainder; anything else is kept
    /// verbatim behind [`STYLE_PREAMBLE`].
    pub fn from_model_output(raw: &str) -> Self {
        match raw.trim().strip_prefix(UNFEASIBLE_MARKER) {
            Some(reason) => Self::Text(reason.trim().to_string()),
            None => Self::Html(format!("{}{}", STYLE_PREAMBLE, raw)),
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Self::Html(content) | Self::Text(content) => content,
        }
    }

    pub fn is_html(&self) -> bool {
        matches!(self, Self::Html(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_level() -> GameLevel {
        GameLevel {
            level_description: "A short corridor".to_string(),
            tilemap: vec![
                vec!["#".into(), "#".into(), "#".into(), "#".into()],
                vec!["#".into(), ".".into(), ".".into(), "#".into()],
                vec!["#".into(), "#".into(), "#".into()],
            ],
            entities: vec![],
            player_start: Position::new(1.0, 1.0),
            goal_position: Position::new(2.0, 1.0),
            solvable_path: vec![Position::new(1.0, 1.0), Position::new(2.0, 1.0)],
            validity_check: "Adjacent tiles".to_string(),
        }
    }

    #[test]
    fn test_level_helpers() {
        let level = sample_level();
        assert_eq!(level.tilemap_rows(), vec!["####", "#..#", "###"]);
        assert_eq!(level.dimensions(), (4, 3));
    }

    #[test]
    fn test_entity_type_field() {
        let entity: Entity =
            serde_json::from_str(r#"{"type":"coin","position":{"x":3,"y":4}}"#).unwrap();
        assert_eq!(entity.kind, "coin");
        assert_eq!(entity.position, Position::new(3.0, 4.0));
    }

    #[test]
    fn test_unfeasible_output_becomes_text() {
        let result = PrototypeResult::from_model_output("  PROTOTYPE_UNFEASIBLE:   goal unreachable \n");
        assert_eq!(result, PrototypeResult::Text("goal unreachable".to_string()));

        let result = PrototypeResult::from_model_output("PROTOTYPE_UNFEASIBLE:no path");
        assert_eq!(result, PrototypeResult::Text("no path".to_string()));
    }

    #[test]
    fn test_marker_is_case_sensitive() {
        let result = PrototypeResult::from_model_output("prototype_unfeasible: nope");
        assert!(result.is_html());
    }

    #[test]
    fn test_html_output_keeps_original_content() {
        let raw = "\n<canvas id=\"game\"></canvas>\n<script>start();</script>";
        let result = PrototypeResult::from_model_output(raw);
        assert_eq!(result, PrototypeResult::Html(format!("{}{}", STYLE_PREAMBLE, raw)));
    }

    #[test]
    fn test_prototype_wire_format() {
        let value = serde_json::to_value(PrototypeResult::Text("why".into())).unwrap();
        assert_eq!(value, serde_json::json!({"type": "text", "content": "why"}));
    }
}
