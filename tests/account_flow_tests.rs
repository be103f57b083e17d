//! End-to-end tests for the account API
//!
//! These drive the real router against a file-backed SQLite database:
//! - Register / login / rename scenario
//! - Conflict and not-found handling
//! - Identical 401 bodies for unknown user and wrong password

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use cafe_accounts::db::{Database, init_schema};
use cafe_accounts::{AppState, api};

const PICTURE: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk";

struct TestApp {
    app: Router,
    db: Database,
    _dir: TempDir,
}

impl TestApp {
    async fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("accounts.db");
        let db = Database::connect(path.to_str().unwrap()).await.unwrap();
        init_schema(db.pool()).await.unwrap();

        Self {
            app: api::router(AppState::new(db.clone())),
            db,
            _dir: dir,
        }
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn register(&self, username: &str, password: &str, picture: &str) -> (StatusCode, Value) {
        self.post(
            "/register",
            json!({ "username": username, "password": password, "profilePic": picture }),
        )
        .await
    }

    async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.post("/login", json!({ "username": username, "password": password }))
            .await
    }

    async fn stored_row(&self, username: &str) -> Option<(String, String)> {
        sqlx::query_as("SELECT password, profile_pic_base64 FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(self.db.pool())
            .await
            .unwrap()
    }
}

#[tokio::test]
async fn test_register_login_rename_scenario() {
    let app = TestApp::new().await;

    let (status, _) = app.register("alice", "pw123", PICTURE).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.login("alice", "pw123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "status": "success", "user": { "username": "alice", "profilePic": PICTURE } })
    );

    let (status, _) = app.login("alice", "wrong").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .post(
            "/update-profile",
            json!({ "currentUsername": "alice", "newUsername": "alice2" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "status": "success",
            "message": "Profile updated successfully.",
            "user": { "username": "alice2" }
        })
    );

    let (status, body) = app.login("alice2", "pw123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["profilePic"], PICTURE);

    let (status, _) = app.login("alice", "pw123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app = TestApp::new().await;
    app.register("alice", "pw123", PICTURE).await;

    let (status, body) = app.register("alice", "different", "b3RoZXI=").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body,
        json!({ "status": "error", "message": "Username already in use." })
    );

    let (_, stored_picture) = app.stored_row("alice").await.unwrap();
    assert_eq!(stored_picture, PICTURE);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new().await;
    app.register("alice", "pw123", PICTURE).await;

    let unknown = app.login("nobody", "pw123").await;
    let wrong = app.login("alice", "pw124").await;

    assert_eq!(unknown.0, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown, wrong);
    assert_eq!(
        unknown.1,
        json!({ "status": "error", "message": "Invalid username or password." })
    );
}

#[tokio::test]
async fn test_password_is_not_stored_in_plaintext() {
    let app = TestApp::new().await;

    for (username, password) in [("a", "x"), ("b", "pw123"), ("c", "correct horse battery")] {
        app.register(username, password, PICTURE).await;
        let (stored, _) = app.stored_row(username).await.unwrap();
        assert_ne!(stored, password);
        assert!(stored.starts_with("$2"));
    }
}

#[tokio::test]
async fn test_rename_to_taken_username_leaves_rows_unchanged() {
    let app = TestApp::new().await;
    app.register("alice", "pw123", PICTURE).await;
    app.register("bob", "pw456", "Ym9i").await;

    let alice_before = app.stored_row("alice").await;
    let bob_before = app.stored_row("bob").await;

    let (status, body) = app
        .post(
            "/update-profile",
            json!({ "currentUsername": "alice", "newUsername": "bob", "newProfilePic": "bmV3" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "error");

    assert_eq!(app.stored_row("alice").await, alice_before);
    assert_eq!(app.stored_row("bob").await, bob_before);
}

#[tokio::test]
async fn test_rename_unknown_user_is_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/update-profile",
            json!({ "currentUsername": "ghost", "newUsername": "ghost2" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "status": "error", "message": "User not found." }));
}

#[tokio::test]
async fn test_data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("accounts.db");
    let path = path.to_str().unwrap();

    {
        let db = Database::connect(path).await.unwrap();
        let created = init_schema(db.pool()).await.unwrap();
        assert!(created.created("users"));

        let app = api::router(AppState::new(db.clone()));
        let request = Request::post("/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({ "username": "alice", "password": "pw123", "profilePic": PICTURE })
                    .to_string(),
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        db.pool().close().await;
    }

    let db = Database::connect(path).await.unwrap();
    let again = init_schema(db.pool()).await.unwrap();
    assert!(again.tables_created.is_empty());
    assert!(db.users().get_by_username("alice").await.unwrap().is_some());
}
