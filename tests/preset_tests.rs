use std::sync::Arc;

use actix_web::{http::StatusCode, test};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

#[macro_use]
mod common;

use common::{TestApp, TestAssertions};
use wardgrid::database::{PresetRepository, SqliteStore, init_database};
use wardgrid::grid::PolicyConfig;

#[actix_web::test]
async fn test_list_starts_with_built_in_default() {
    common::setup_test_env();
    let test_app = TestApp::new();
    let app = init_app!(test_app);

    let req = test::TestRequest::get()
        .uri("/api/v1/presets")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let data = TestAssertions::assert_success_response(&body);
    let presets = data.as_array().unwrap();
    assert_eq!(presets.len(), 1);
    assert_eq!(presets[0]["name"], "default");
    assert_eq!(presets[0]["built_in"], true);
    assert_eq!(presets[0]["policy"]["night_eligible_count"], 15);
}

#[actix_web::test]
async fn test_save_get_apply_and_delete() {
    let test_app = TestApp::new();
    let app = init_app!(test_app);

    let req = test::TestRequest::put()
        .uri("/api/v1/presets/weekend-short")
        .set_json(json!({"required_staff_per_day": 5, "days_off": "9"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/v1/presets/weekend-short")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let preset = TestAssertions::assert_success_response(&body);
    assert_eq!(preset["policy"]["required_staff_per_day"], 5);
    assert_eq!(preset["policy"]["days_off"], 9);
    assert_eq!(preset["policy"]["day_leader_count"], 5);

    let session = test_app.state.roster.create_session().await;
    let req = test::TestRequest::post()
        .uri(&format!(
            "/api/v1/sessions/{}/presets/weekend-short",
            session.id
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let data = TestAssertions::assert_success_response(&body);
    assert_eq!(data["preset"], "weekend-short");
    assert_eq!(data["policy"]["days_off"], 9);

    let req = test::TestRequest::delete()
        .uri("/api/v1/presets/weekend-short")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::delete()
        .uri("/api/v1/presets/weekend-short")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri(&format!(
            "/api/v1/sessions/{}/presets/weekend-short",
            session.id
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_reserved_names_are_rejected() {
    let test_app = TestApp::new();
    let app = init_app!(test_app);

    for name in ["default", "__custom__"] {
        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/presets/{}", name))
            .set_json(json!({"days_off": 3}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", name);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/v1/presets/{}", name))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", name);
    }

    let req = test::TestRequest::get()
        .uri("/api/v1/presets/__custom__")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_presets_survive_a_restart() {
    let temp_dir = TempDir::new().unwrap();
    let database_url = format!("sqlite:{}/presets.db", temp_dir.path().display());

    let policy = PolicyConfig {
        night_leader_count: 2,
        ..PolicyConfig::default()
    };

    {
        let pool = init_database(&database_url).await.unwrap();
        let repo = PresetRepository::new(Arc::new(SqliteStore::new(pool.clone())));
        repo.save("night-heavy", policy).await.unwrap();
        pool.close().await;
    }

    let pool = init_database(&database_url).await.unwrap();
    let repo = PresetRepository::new(Arc::new(SqliteStore::new(pool)));

    let names: Vec<String> = repo
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|preset| preset.name)
        .collect();
    assert_eq!(names, vec!["default".to_string(), "night-heavy".to_string()]);
    assert_eq!(repo.get("night-heavy").await.unwrap().unwrap().policy, policy);
}
