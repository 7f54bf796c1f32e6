//! End-to-end pipeline scenarios driven through the controller.
//!
//! The model is replaced by a mock transport with scripted replies.

use std::sync::Arc;

use serde_json::{json, Value};

use forge_api::{
    ClientConfig, ErrorKind, ForgeClient, MockReply, MockTransport, PrototypeResult,
    TransportError, STYLE_PREAMBLE,
};
use forge_app::{render_host_page, user_message, KeySelector, PipelineController, Stage};

/// Host where the user already picked a key.
struct SelectedKeyHost;

#[async_trait::async_trait]
impl KeySelector for SelectedKeyHost {
    async fn has_selected_api_key(&self) -> bool {
        true
    }

    async fn open_select_key(&self) -> Option<String> {
        None
    }
}

fn farming_analysis() -> Value {
    json!({
        "trends": [
            "Players seek low-stress, wholesome escapism",
            "Seasonal live events keep communities engaged",
            "Co-op farms are increasingly popular"
        ],
        "mechanics": [
            "Crop growth cycles tied to in-game seasons",
            "Relationship building with villagers",
            "Crafting and farm layout customisation"
        ],
        "monetization": [
            "Premium up-front price",
            "Cosmetic DLC packs",
            "Paid content expansions"
        ]
    })
}

fn farming_level(description: &str) -> Value {
    json!({
        "level_description": description,
        "tilemap": [
            ["#", "#", "#", "#", "#", "#"],
            ["#", ".", ".", "#", ".", "#"],
            ["#", "#", ".", ".", ".", "#"],
            ["#", "#", "#", "#", "#", "#"]
        ],
        "entities": [
            {"type": "turnip", "position": {"x": 2, "y": 1}},
            {"type": "scarecrow", "position": {"x": 4, "y": 1}}
        ],
        "player_start": {"x": 1, "y": 1},
        "goal_position": {"x": 4, "y": 1},
        "solvable_path": [
            {"x": 1, "y": 1}, {"x": 2, "y": 1}, {"x": 2, "y": 2},
            {"x": 3, "y": 2}, {"x": 4, "y": 2}, {"x": 4, "y": 1}
        ],
        "validity_check": "Each step moves one tile onto '.'; path ends at the goal."
    })
}

fn farming_levels() -> Value {
    json!([farming_level("Morning harvest"), farming_level("Barn escape")])
}

async fn controller_with(transport: &MockTransport) -> PipelineController {
    let config = ClientConfig::default().with_api_key("e2e-key");
    let client = ForgeClient::new(Arc::new(transport.clone()), config);
    let mut controller = PipelineController::new(client, Some(Arc::new(SelectedKeyHost)));
    assert!(controller.check_api_key().await);
    controller
}

/// Genre in, analysis and two levels out.
#[tokio::test]
async fn test_cozy_farming_sim_reaches_idea_complete() {
    let transport = MockTransport::new().with_replies(vec![
        MockReply::json(&farming_analysis()),
        MockReply::json(&farming_levels()),
    ]);
    let mut controller = controller_with(&transport).await;

    controller.begin().unwrap();
    let stage = controller.submit_genre("Cozy Farming Sim").await.unwrap();

    assert_eq!(stage, Stage::IdeaComplete);
    assert_eq!(
        controller.state().visited_stages(),
        vec![
            Stage::Hero,
            Stage::AnalysisInput,
            Stage::AnalysisLoading,
            Stage::IdeaLoading,
            Stage::IdeaComplete
        ]
    );

    let analysis = controller.state().analysis().unwrap();
    assert_eq!(analysis.trends.len(), 3);
    assert_eq!(analysis.mechanics.len(), 3);
    assert_eq!(analysis.monetization.len(), 3);

    let levels = controller.state().levels().unwrap();
    assert_eq!(levels.len(), 2);
    assert_eq!(levels[0].level_description, "Morning harvest");
    assert_eq!(levels[1].level_description, "Barn escape");
    assert!(controller.state().error().is_none());

    let calls = transport.get_calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].prompt().contains("Cozy Farming Sim"));
    assert!(calls[1].prompt().contains("Relationship building with villagers"));
}

/// Rate limit at the level step rolls back to genre input.
#[tokio::test]
async fn test_rate_limit_during_idea_generation() {
    let transport = MockTransport::new().with_replies(vec![
        MockReply::json(&farming_analysis()),
        MockReply::failure(TransportError::other("Rate limit exceeded during request")),
    ]);
    let mut controller = controller_with(&transport).await;
    controller.begin().unwrap();

    let stage = controller.submit_genre("Cozy Farming Sim").await.unwrap();

    assert_eq!(stage, Stage::AnalysisInput);
    let error = controller.state().error().unwrap();
    assert_eq!(error.kind, Some(ErrorKind::RateLimit));
    assert_eq!(error.message, user_message(ErrorKind::RateLimit));
    assert!(controller.state().api_key_selected());
    assert!(controller.state().levels().is_none());
    assert!(controller.state().visited_stages().contains(&Stage::IdeaLoading));
}

/// The unfeasible note is a successful prototype, not an error.
#[tokio::test]
async fn test_unfeasible_prototype_completes() {
    let transport = MockTransport::new().with_replies(vec![
        MockReply::json(&farming_analysis()),
        MockReply::json(&farming_levels()),
        MockReply::text("PROTOTYPE_UNFEASIBLE: goal unreachable"),
    ]);
    let mut controller = controller_with(&transport).await;
    controller.begin().unwrap();
    controller.submit_genre("Cozy Farming Sim").await.unwrap();

    let stage = controller.select_level(1).await.unwrap();

    assert_eq!(stage, Stage::PrototypeComplete);
    assert_eq!(
        controller.state().prototype(),
        Some(&PrototypeResult::Text("goal unreachable".to_string()))
    );
    assert!(controller.state().error().is_none());
    assert_eq!(
        controller.state().selected_level().unwrap().level_description,
        "Barn escape"
    );

    let page = render_host_page("Barn escape", controller.state().prototype().unwrap());
    assert!(page.contains("goal unreachable"));
    assert!(!page.contains("<iframe"));
}

/// Full run ending in a sandboxed HTML prototype.
#[tokio::test]
async fn test_full_pipeline_to_html_prototype() {
    let markup = "<canvas id=\"game\"></canvas><script>requestAnimationFrame(loop);</script>";
    let transport = MockTransport::new().with_replies(vec![
        MockReply::json(&farming_analysis()),
        MockReply::json(&farming_levels()),
        MockReply::text(markup),
    ]);
    let mut controller = controller_with(&transport).await;
    controller.begin().unwrap();
    controller.submit_genre("Cozy Farming Sim").await.unwrap();
    controller.select_level(0).await.unwrap();

    assert_eq!(controller.stage(), Stage::PrototypeComplete);
    let prototype = controller.state().prototype().unwrap();
    assert_eq!(prototype, &PrototypeResult::Html(format!("{}{}", STYLE_PREAMBLE, markup)));

    let page = render_host_page("Morning harvest", prototype);
    assert!(page.contains("sandbox=\"allow-scripts\""));

    let prototype_call = &transport.get_calls()[2];
    assert!(!prototype_call.is_schema_constrained());
    assert!(prototype_call.prompt().contains("Morning harvest"));
}

/// Blank genres never leave genre input and never reach the model.
#[tokio::test]
async fn test_blank_genre_is_idempotent() {
    let transport = MockTransport::new().add_reply(MockReply::json(&farming_analysis()));
    let mut controller = controller_with(&transport).await;
    controller.begin().unwrap();

    for _ in 0..3 {
        assert_eq!(controller.submit_genre("    ").await.unwrap(), Stage::AnalysisInput);
    }

    assert_eq!(controller.stage(), Stage::AnalysisInput);
    assert_eq!(transport.call_count(), 0);
    assert!(controller.state().error().is_some());
}

/// A failed run can be retried by resubmitting the genre.
#[tokio::test]
async fn test_retry_after_failure() {
    let transport = MockTransport::new().with_replies(vec![
        MockReply::finished("SAFETY", ""),
        MockReply::json(&farming_analysis()),
        MockReply::json(&farming_levels()),
    ]);
    let mut controller = controller_with(&transport).await;
    controller.begin().unwrap();

    controller.submit_genre("Cozy Farming Sim").await.unwrap();
    assert_eq!(controller.stage(), Stage::AnalysisInput);
    assert_eq!(
        controller.state().error().unwrap().kind,
        Some(ErrorKind::ResponseBlocked)
    );

    controller.submit_genre("Cozy Farming Sim").await.unwrap();
    assert_eq!(controller.stage(), Stage::IdeaComplete);
    assert!(controller.state().error().is_none());
}
