//! Offline tests for repolens-db pool configuration and row types.
//! These tests do not require a live database connection.

use repolens_core::{AppConfig, Environment};
use repolens_db::{PageRequest, PoolConfig, ProfileRow};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

fn app_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8080),
        log_level: "info".to_string(),
        cors_origin: "http://localhost:5173".to_string(),
        github_api_url: "https://api.github.com".to_string(),
        github_token: None,
        ollama_url: "http://localhost:11435/api".to_string(),
        ollama_model: "llama3".to_string(),
        comfyui_url: "http://localhost:8189".to_string(),
        comfyui_workflow_path: PathBuf::from("./config/github-profile-workflow.json"),
        ingest_cron: "0 * * * * *".to_string(),
        retention_cron: "0 0 0 * * *".to_string(),
        retention_days: 30,
        http_timeout_secs: 30,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`ProfileRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn profile_row_has_expected_fields() {
    use chrono::Utc;

    let row = ProfileRow {
        id: 1_i64,
        repo_full_name: "acme/widget".to_string(),
        repo_url: "https://github.com/acme/widget".to_string(),
        title: "Widget".to_string(),
        summary: "작은 위젯 라이브러리".to_string(),
        topic: "Rust".to_string(),
        image_url: None,
        created_at: Utc::now(),
    };

    assert_eq!(row.id, 1);
    assert_eq!(row.repo_full_name, "acme/widget");
    assert_eq!(row.topic, "Rust");
    assert!(row.image_url.is_none());
}

#[test]
fn page_request_second_page_offset() {
    let page = PageRequest::new(Some(1), Some(20));
    assert_eq!(page.offset(), 20);
}
