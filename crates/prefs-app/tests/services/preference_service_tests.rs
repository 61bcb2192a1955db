use super::*;
use prefs_contracts::codes;
use prefs_contracts::models::{DEFAULT_BASE_FONT, DEFAULT_FONT_SIZE, DEFAULT_THEME};
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_db_path(prefix: &str) -> std::path::PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    std::env::temp_dir().join(format!("prefs-svc-{prefix}-{}-{now}.db", std::process::id()))
}

async fn setup_service(prefix: &str) -> (PreferenceService, std::path::PathBuf) {
    let path = unique_temp_db_path(prefix);
    let store = db::open_store(path.as_path()).await.expect("open store");
    db::init_store(&store).await.expect("init store");
    (PreferenceService::new(store), path)
}

fn cleanup(path: std::path::PathBuf) {
    let _ = std::fs::remove_file(&path);
    let _ = std::fs::remove_file(path.with_extension("db-wal"));
    let _ = std::fs::remove_file(path.with_extension("db-shm"));
}

fn context() -> RequestContext {
    RequestContext::new(Some("test-request".to_string()), "test")
}

fn full_update() -> PreferenceUpdateInputDto {
    PreferenceUpdateInputDto {
        font_size: Some("20px".to_string()),
        theme: Some("dark".to_string()),
        base_font: Some("Georgia, serif".to_string()),
    }
}

#[tokio::test]
async fn fetch_should_return_defaults_for_seeded_demo() {
    let (service, path) = setup_service("fetch-demo").await;

    let prefs = service.fetch(&context(), "demo").await.expect("fetch demo");
    assert_eq!(prefs.font_size, DEFAULT_FONT_SIZE);
    assert_eq!(prefs.theme, DEFAULT_THEME);
    assert_eq!(prefs.base_font, DEFAULT_BASE_FONT);
    cleanup(path);
}

#[tokio::test]
async fn fetch_should_fail_with_not_found_for_unknown_user() {
    let (service, path) = setup_service("fetch-ghost").await;

    let error = service
        .fetch(&context(), "ghost")
        .await
        .expect_err("ghost must not resolve");
    assert!(error.is_code(codes::USER_NOT_FOUND));
    cleanup(path);
}

#[tokio::test]
async fn update_then_fetch_should_round_trip() {
    let (service, path) = setup_service("round-trip").await;

    let saved = service
        .update(&context(), "demo", &full_update())
        .await
        .expect("update demo");
    let fetched = service.fetch(&context(), "demo").await.expect("fetch demo");

    assert_eq!(saved, fetched);
    assert_eq!(fetched.font_size, "20px");
    assert_eq!(fetched.theme, "dark");
    assert_eq!(fetched.base_font, "Georgia, serif");
    cleanup(path);
}

#[tokio::test]
async fn update_should_reset_omitted_fields() {
    let (service, path) = setup_service("reset").await;
    service
        .update(&context(), "demo", &full_update())
        .await
        .expect("first update");

    let only_theme = PreferenceUpdateInputDto {
        theme: Some("dark".to_string()),
        ..Default::default()
    };
    service
        .update(&context(), "demo", &only_theme)
        .await
        .expect("second update");

    let fetched = service.fetch(&context(), "demo").await.expect("fetch demo");
    assert_eq!(fetched.theme, "dark");
    assert_eq!(fetched.font_size, DEFAULT_FONT_SIZE);
    assert_eq!(fetched.base_font, DEFAULT_BASE_FONT);
    cleanup(path);
}

#[tokio::test]
async fn update_should_not_create_unknown_user() {
    let (service, path) = setup_service("update-ghost").await;

    let error = service
        .update(&context(), "ghost", &full_update())
        .await
        .expect_err("ghost must not be provisioned");
    assert!(error.is_code(codes::USER_NOT_FOUND));

    let conn = service.store().connect().await.expect("connect");
    assert!(
        db::find_user_by_username(&conn, "ghost")
            .await
            .expect("lookup ghost")
            .is_none()
    );
    let mut rows = conn
        .query("SELECT COUNT(*) FROM preferences", ())
        .await
        .expect("count prefs");
    let row = rows.next().await.expect("next row").expect("row missing");
    assert_eq!(row.get::<i64>(0).expect("count"), 1);
    cleanup(path);
}

#[tokio::test]
async fn fetch_should_fall_back_to_defaults_when_preference_row_missing() {
    let (service, path) = setup_service("missing-row").await;
    let conn = service.store().connect().await.expect("connect");
    conn.execute("INSERT INTO users (username) VALUES ('bare')", ())
        .await
        .expect("insert bare user");

    let prefs = service.fetch(&context(), "bare").await.expect("fetch bare");
    assert_eq!(prefs, PreferenceDto::default());

    let saved = service
        .update(&context(), "bare", &full_update())
        .await
        .expect("update bare");
    assert_eq!(service.fetch(&context(), "bare").await.expect("refetch"), saved);
    cleanup(path);
}
