//! Discord credential integration tests
//! Run with: DISCORD_TOKEN=... cargo test --test discord_token_test -- --ignored

use std::sync::Once;

static INIT: Once = Once::new();

const API_BASE: &str = "https://discord.com/api/v10";

fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt::try_init();
    });
}

fn token() -> String {
    std::env::var("DISCORD_TOKEN").expect("DISCORD_TOKEN must be set in environment")
}

/// Bot tokens are three dot-separated segments
#[test]
#[ignore]
fn test_discord_token_format() {
    ensure_init();

    let token = token();
    assert_eq!(token.split('.').count(), 3,
        "DISCORD_TOKEN should have three dot-separated parts");
    assert!(!token.starts_with("Bot "),
        "DISCORD_TOKEN should not include the 'Bot ' prefix");
}

/// The token authenticates against the REST API
#[tokio::test]
#[ignore]
async fn test_discord_token_accepted() {
    ensure_init();

    let response = reqwest::Client::new()
        .get(format!("{}/users/@me", API_BASE))
        .header("Authorization", format!("Bot {}", token()))
        .send()
        .await
        .expect("Should reach the Discord API");

    assert!(response.status().is_success(),
        "Token rejected: {}", response.status());

    let me: serde_json::Value = response.json().await.expect("Should parse JSON");
    assert_eq!(me["bot"], serde_json::Value::Bool(true));
    tracing::info!("Authenticated as {} ({})", me["username"], me["id"]);
}

/// An obviously invalid token is refused with 401
#[tokio::test]
#[ignore]
async fn test_discord_rejects_bad_token() {
    ensure_init();

    let response = reqwest::Client::new()
        .get(format!("{}/users/@me", API_BASE))
        .header("Authorization", "Bot invalid.token.value")
        .send()
        .await
        .expect("Should reach the Discord API");

    assert_eq!(response.status().as_u16(), 401);
}
