use axum::http::StatusCode;
use axum_test::TestServer;
use mission_control::api::create_router;
use mission_control::db::Database;
use mission_control::models::*;
use serde_json::{json, Value};

fn setup() -> (TestServer, Database) {
    let db = Database::open_memory().expect("Failed to create database");
    db.migrate().expect("Failed to migrate");
    let app = create_router(db.clone());
    (
        TestServer::new(app).expect("Failed to create test server"),
        db,
    )
}

fn create_test_planet(db: &Database, name: &str) -> Planet {
    db.create_planet(CreatePlanetInput {
        name: Some(name.to_string()),
        distance_from_earth: Some("140 million miles".to_string()),
        nearest_star: Some("Sun".to_string()),
        image: Some(format!("https://example.com/{}.png", name)),
    })
    .expect("Failed to create planet")
}

async fn create_test_scientist(server: &TestServer, name: &str) -> Value {
    let response = server
        .post("/scientists")
        .json(&json!({ "name": name, "field_of_study": "CS" }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()
}

fn error_text(response: &axum_test::TestResponse) -> String {
    response.json::<Value>()["error"]
        .as_str()
        .expect("error body missing")
        .to_string()
}

mod root {
    use super::*;

    #[tokio::test]
    async fn home_returns_empty_body() {
        let (server, _db) = setup();

        let response = server.get("/").await;

        response.assert_status_ok();
        assert_eq!(response.text(), "");
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (server, _db) = setup();

        let response = server.get("/health").await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn unknown_routes_use_the_error_shape() {
        let (server, _db) = setup();

        let response = server.get("/galaxies").await;

        response.assert_status_not_found();
        assert_eq!(error_text(&response), "404: Not found");
    }
}

mod scientists {
    use super::*;

    #[tokio::test]
    async fn list_returns_empty_array_when_none_exist() {
        let (server, _db) = setup();

        let response = server.get("/scientists").await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!([]));
    }

    #[tokio::test]
    async fn list_returns_serialized_scientists() {
        let (server, _db) = setup();
        create_test_scientist(&server, "Ada").await;
        create_test_scientist(&server, "Grace").await;

        let response = server.get("/scientists").await;

        response.assert_status_ok();
        let scientists = response.json::<Vec<Value>>();
        assert_eq!(scientists.len(), 2);
        assert_eq!(scientists[0]["name"], "Ada");
        assert_eq!(scientists[0]["missions"], json!([]));
        assert!(scientists[0].get("created_at").is_none());
    }

    #[tokio::test]
    async fn create_assigns_an_id() {
        let (server, _db) = setup();

        let response = server
            .post("/scientists")
            .json(&json!({ "name": "Ada", "field_of_study": "CS" }))
            .await;

        response.assert_status_ok();
        let scientist = response.json::<Value>();
        assert!(scientist["id"].as_i64().unwrap() > 0);
        assert_eq!(scientist["name"], "Ada");
        assert_eq!(scientist["field_of_study"], "CS");
        assert_eq!(scientist["avatar"], Value::Null);
        assert!(scientist.get("updated_at").is_none());
    }

    #[tokio::test]
    async fn create_rejects_missing_name() {
        let (server, db) = setup();

        let response = server
            .post("/scientists")
            .json(&json!({ "field_of_study": "CS" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(error_text(&response), "400: Validation error: Must have name");
        assert!(db.get_all_scientists().unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_rejects_empty_but_accepts_whitespace_only_text() {
        let (server, db) = setup();

        let response = server
            .post("/scientists")
            .json(&json!({ "name": "", "field_of_study": "CS" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(error_text(&response), "400: Validation error: Must have name");

        let response = server
            .post("/scientists")
            .json(&json!({ "name": "   ", "field_of_study": " " }))
            .await;
        response.assert_status_ok();
        let scientist = response.json::<Value>();
        assert_eq!(scientist["name"], "   ");
        assert_eq!(scientist["field_of_study"], " ");
        assert_eq!(db.get_all_scientists().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_rejects_duplicate_name() {
        let (server, db) = setup();
        create_test_scientist(&server, "Ada").await;

        let response = server
            .post("/scientists")
            .json(&json!({ "name": "Ada", "field_of_study": "Math" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(error_text(&response).starts_with("400: "));
        assert_eq!(db.get_all_scientists().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_rejects_malformed_json() {
        let (server, _db) = setup();

        let response = server.post("/scientists").text("{not json").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(error_text(&response).starts_with("400: "));
    }

    #[tokio::test]
    async fn get_returns_the_scientist() {
        let (server, _db) = setup();
        let created = create_test_scientist(&server, "Ada").await;

        let response = server
            .get(&format!("/scientists/{}", created["id"]))
            .await;

        response.assert_status_ok();
        let fetched = response.json::<Value>();
        assert_eq!(fetched["id"], created["id"]);
        assert_eq!(fetched["name"], "Ada");
    }

    #[tokio::test]
    async fn get_returns_not_found_for_nonexistent_scientist() {
        let (server, _db) = setup();

        let response = server.get("/scientists/999").await;

        response.assert_status_not_found();
        assert_eq!(error_text(&response), "404: Scientist not found");
    }

    #[tokio::test]
    async fn get_returns_not_found_for_non_numeric_id() {
        let (server, _db) = setup();

        let response = server.get("/scientists/ada").await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn patch_updates_only_provided_fields() {
        let (server, db) = setup();
        let created = create_test_scientist(&server, "Ada").await;
        let id = created["id"].as_i64().unwrap();

        let response = server
            .patch(&format!("/scientists/{}", id))
            .json(&json!({ "avatar": "x" }))
            .await;

        response.assert_status_ok();
        let updated = response.json::<Value>();
        assert_eq!(updated["name"], "Ada");
        assert_eq!(updated["field_of_study"], "CS");
        assert_eq!(updated["avatar"], "x");

        let stored = db.get_scientist(id).unwrap().unwrap();
        assert!(stored.updated_at.is_some());
    }

    #[tokio::test]
    async fn patch_rejects_empty_name_and_keeps_record() {
        let (server, db) = setup();
        let created = create_test_scientist(&server, "Ada").await;
        let id = created["id"].as_i64().unwrap();

        let response = server
            .patch(&format!("/scientists/{}", id))
            .json(&json!({ "avatar": "x", "name": "" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(error_text(&response), "400: Validation error: Must have name");
        let stored = db.get_scientist(id).unwrap().unwrap();
        assert_eq!(stored.name, "Ada");
        assert!(stored.avatar.is_none());
    }

    #[tokio::test]
    async fn patch_rejects_null_for_required_field() {
        let (server, _db) = setup();
        let created = create_test_scientist(&server, "Ada").await;

        let response = server
            .patch(&format!("/scientists/{}", created["id"]))
            .json(&json!({ "field_of_study": null }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            error_text(&response),
            "400: Validation error: Must have a field of study"
        );
    }

    #[tokio::test]
    async fn patch_rejects_unknown_fields() {
        let (server, db) = setup();
        let created = create_test_scientist(&server, "Ada").await;
        let id = created["id"].as_i64().unwrap();

        let response = server
            .patch(&format!("/scientists/{}", id))
            .json(&json!({ "id": 500 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(db.get_scientist(id).unwrap().is_some());
    }

    #[tokio::test]
    async fn patch_returns_not_found_for_nonexistent_scientist() {
        let (server, _db) = setup();

        let response = server
            .patch("/scientists/999")
            .json(&json!({ "avatar": "x" }))
            .await;

        response.assert_status_not_found();
        assert_eq!(error_text(&response), "404: Scientist not found");
    }

    #[tokio::test]
    async fn delete_removes_the_scientist() {
        let (server, _db) = setup();
        let created = create_test_scientist(&server, "Ada").await;
        let path = format!("/scientists/{}", created["id"]);

        let response = server.delete(&path).await;

        response.assert_status(StatusCode::NO_CONTENT);
        assert_eq!(response.text(), "");
        server.get(&path).await.assert_status_not_found();
    }

    #[tokio::test]
    async fn delete_returns_not_found_for_nonexistent_scientist() {
        let (server, _db) = setup();

        let response = server.delete("/scientists/999").await;

        response.assert_status_not_found();
        assert_eq!(error_text(&response), "404: Scientist not found");
    }

    #[tokio::test]
    async fn delete_cascades_to_missions() {
        let (server, db) = setup();
        let planet = create_test_planet(&db, "Mars");
        let scientist = create_test_scientist(&server, "Ada").await;
        server
            .post("/missions")
            .json(&json!({
                "name": "Ares",
                "scientist_id": scientist["id"],
                "planet_id": planet.id
            }))
            .await
            .assert_status_ok();

        server
            .delete(&format!("/scientists/{}", scientist["id"]))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        assert!(db.get_all_missions().unwrap().is_empty());
    }
}

mod planets {
    use super::*;

    #[tokio::test]
    async fn list_is_shallow() {
        let (server, db) = setup();
        let planet = create_test_planet(&db, "Mars");
        let scientist = create_test_scientist(&server, "Ada").await;
        server
            .post("/missions")
            .json(&json!({
                "name": "Ares",
                "scientist_id": scientist["id"],
                "planet_id": planet.id
            }))
            .await
            .assert_status_ok();

        let response = server.get("/planets").await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>(),
            json!([{
                "id": planet.id,
                "name": "Mars",
                "distance_from_earth": "140 million miles",
                "nearest_star": "Sun",
                "image": "https://example.com/Mars.png"
            }])
        );
    }

    #[tokio::test]
    async fn list_returns_empty_array_when_none_exist() {
        let (server, _db) = setup();

        let response = server.get("/planets").await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!([]));
    }
}

mod missions {
    use super::*;

    #[tokio::test]
    async fn create_links_scientist_and_planet() {
        let (server, db) = setup();
        let planet = create_test_planet(&db, "Mars");
        let scientist = create_test_scientist(&server, "Ada").await;

        let response = server
            .post("/missions")
            .json(&json!({
                "name": "M1",
                "scientist_id": scientist["id"],
                "planet_id": planet.id
            }))
            .await;

        response.assert_status_ok();
        let mission = response.json::<Value>();
        assert!(mission["id"].as_i64().unwrap() > 0);
        assert_eq!(mission["scientist_id"], scientist["id"]);
        assert_eq!(mission["planet_id"], planet.id);
        assert_eq!(mission["scientist"]["name"], "Ada");
        assert_eq!(mission["planet"]["name"], "Mars");
        assert!(mission["scientist"].get("missions").is_none());
        assert!(mission["planet"].get("missions").is_none());
        assert!(mission.get("created_at").is_none());
    }

    #[tokio::test]
    async fn create_rejects_nonexistent_scientist() {
        let (server, db) = setup();
        let planet = create_test_planet(&db, "Mars");

        let response = server
            .post("/missions")
            .json(&json!({ "name": "M1", "scientist_id": 999, "planet_id": planet.id }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(error_text(&response).contains("scientist_id"));
        assert!(db.get_all_missions().unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_rejects_nonexistent_planet() {
        let (server, db) = setup();
        let scientist = create_test_scientist(&server, "Ada").await;

        let response = server
            .post("/missions")
            .json(&json!({ "name": "M1", "scientist_id": scientist["id"], "planet_id": 999 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(error_text(&response).contains("planet_id"));
        assert!(db.get_all_missions().unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_rejects_missing_name() {
        let (server, db) = setup();
        let planet = create_test_planet(&db, "Mars");
        let scientist = create_test_scientist(&server, "Ada").await;

        let response = server
            .post("/missions")
            .json(&json!({ "scientist_id": scientist["id"], "planet_id": planet.id }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(error_text(&response), "400: Validation error: Must have name");
    }
}

mod end_to_end {
    use super::*;

    #[tokio::test]
    async fn scientist_shows_mission_without_re_expanding_the_planet() {
        let (server, db) = setup();
        let planet = create_test_planet(&db, "Mars");

        let scientist = server
            .post("/scientists")
            .json(&json!({ "name": "Ada", "field_of_study": "CS" }))
            .await
            .json::<Value>();

        server
            .post("/missions")
            .json(&json!({
                "name": "M1",
                "scientist_id": scientist["id"],
                "planet_id": planet.id
            }))
            .await
            .assert_status_ok();

        let response = server
            .get(&format!("/scientists/{}", scientist["id"]))
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();

        let missions = body["missions"].as_array().unwrap();
        assert_eq!(missions.len(), 1);
        assert_eq!(missions[0]["name"], "M1");
        assert!(missions[0].get("scientist").is_none());
        assert_eq!(missions[0]["planet"]["name"], "Mars");
        assert!(missions[0]["planet"].get("missions").is_none());

        let planets = body["planets"].as_array().unwrap();
        assert_eq!(planets.len(), 1);
        assert!(planets[0].get("scientists").is_none());
    }
}
