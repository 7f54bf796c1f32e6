//! Terminal rendering of pipeline results.

use std::fmt::Write;

use forge_api::{GameLevel, MarketAnalysis, PrototypeResult};

pub fn format_analysis(genre: &str, analysis: &MarketAnalysis) -> String {
    let mut out = format!("📊 Market analysis: {}\n", genre);
    for (title, items) in [
        ("Trends", &analysis.trends),
        ("Core mechanics", &analysis.mechanics),
        ("Monetization", &analysis.monetization),
    ] {
        let _ = writeln!(out, "\n   {}:", title);
        for item in items {
            let _ = writeln!(out, "      - {}", item);
        }
    }
    out
}

/// Render one level with its 1-based number.
pub fn format_level(number: usize, level: &GameLevel) -> String {
    let (width, height) = level.dimensions();
    let mut out = format!(
        "🗺️  Level {}: {}\n   {}x{} tiles, start ({}, {}), goal ({}, {})\n\n",
        number,
        level.level_description,
        width,
        height,
        level.player_start.x,
        level.player_start.y,
        level.goal_position.x,
        level.goal_position.y,
    );
    for row in level.tilemap_rows() {
        let _ = writeln!(out, "      {}", row);
    }
    if !level.entities.is_empty() {
        let _ = writeln!(out, "\n   Entities:");
        for entity in &level.entities {
            let _ = writeln!(
                out,
                "      - {} at ({}, {})",
                entity.kind, entity.position.x, entity.position.y
            );
        }
    }
    let _ = writeln!(out, "\n   Path length: {} steps", level.solvable_path.len());
    let _ = writeln!(out, "   Check: {}", level.validity_check);
    out
}

pub fn format_prototype_summary(result: &PrototypeResult) -> String {
    match result {
        PrototypeResult::Html(markup) => {
            format!("🎮 Prototype generated ({} bytes of HTML)", markup.len())
        }
        PrototypeResult::Text(explanation) => {
            format!("⚠️  Prototype not feasible: {}", explanation)
        }
    }
}
