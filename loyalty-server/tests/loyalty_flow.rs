//! End-to-end API test: a member's full night out.
//!
//! Drives the assembled router as a tower service: staff sign-up, visit
//! check-in, rank progression, reward redemption, staff code acceptance
//! and the review gate.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use loyalty_server::auth::{JwtConfig, JwtService, hash_password};
use loyalty_server::core::{Config, Server, ServerState};
use loyalty_server::db;
use loyalty_server::db::repository::staff;
use loyalty_server::loyalty::LoyaltyPolicy;
use shared::models::StaffRole;

fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret-integration-test".to_string(),
        staff_expiration_minutes: 60,
        member_expiration_minutes: 60,
        issuer: "loyalty-server".to_string(),
        audience: "loyalty-clients".to_string(),
    }
}

async fn test_app() -> Router {
    let pool = db::connect_memory().await.expect("pool");

    let admin_hash = hash_password("admin-pass").expect("hash");
    staff::create(&pool, "boss", "The Boss", &admin_hash, StaffRole::Admin)
        .await
        .expect("seed admin");
    let staff_hash = hash_password("door-pass").expect("hash");
    staff::create(&pool, "door", "Door Staff", &staff_hash, StaffRole::Staff)
        .await
        .expect("seed staff");

    let jwt = test_jwt_config();
    let state = ServerState {
        config: Config {
            database_path: ":memory:".to_string(),
            http_port: 0,
            environment: "test".to_string(),
            jwt: jwt.clone(),
            policy: LoyaltyPolicy::default(),
        },
        pool,
        jwt_service: Arc::new(JwtService::with_config(jwt)),
    };

    Server::build_router(state)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.expect("request");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    builder.body(Body::empty()).expect("request")
}

fn post(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).expect("encode")))
        .expect("request")
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        post(
            "/api/auth/login",
            None,
            json!({"username": username, "password": password}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().expect("token").to_string()
}

#[tokio::test]
async fn full_member_journey() {
    let app = test_app().await;

    // Health is public
    let (status, body) = send(&app, get("/api/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    // Everything else is not
    let (status, _) = send(&app, get("/api/rewards", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let admin_token = login(&app, "boss", "admin-pass").await;
    let staff_token = login(&app, "door", "door-pass").await;

    // Bad credentials get the unified message
    let (status, body) = send(
        &app,
        post(
            "/api/auth/login",
            None,
            json!({"username": "door", "password": "wrong"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid username or password");

    // Admin sets up the venue: an activity and a reward
    let (status, _) = send(
        &app,
        post(
            "/api/visits/activities",
            Some(&admin_token),
            json!({"name": "Entry", "points": 600}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Plain staff cannot touch the catalog
    let (status, _) = send(
        &app,
        post(
            "/api/rewards",
            Some(&staff_token),
            json!({"title": "Free Drink", "points_required": 400}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, reward) = send(
        &app,
        post(
            "/api/rewards",
            Some(&admin_token),
            json!({"title": "Free Drink", "points_required": 400}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let reward_id = reward["id"].as_i64().expect("reward id");

    // Door staff registers a member and issues their app token
    let (status, member) = send(
        &app,
        post(
            "/api/members",
            Some(&staff_token),
            json!({"name": "Alice", "phone": "5550100"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let member_id = member["id"].as_i64().expect("member id");

    let (status, issued) = send(
        &app,
        post(&format!("/api/members/{member_id}/token"), Some(&staff_token), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let member_token = issued["token"].as_str().expect("member token").to_string();

    // Member shows their QR, staff scans it
    let (status, qr) = send(&app, get("/api/visits/code", Some(&member_token))).await;
    assert_eq!(status, StatusCode::OK);
    let visit_code = qr["code"].as_str().expect("visit code").to_string();

    let (status, accepted) = send(
        &app,
        post(
            "/api/visits/accept",
            Some(&staff_token),
            json!({"code": visit_code, "activity": "Entry"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "visit accept failed: {accepted}");
    assert_eq!(accepted["points_awarded"], 600);

    // Members cannot scan themselves in
    let (status, _) = send(
        &app,
        post(
            "/api/visits/accept",
            Some(&member_token),
            json!({"code": "whatever", "activity": "Entry"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Summary shows the credit and still-Rookie rank
    let (status, summary) = send(
        &app,
        get(&format!("/api/members/{member_id}/summary"), Some(&member_token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["earned_total"], 600);
    assert_eq!(summary["spendable"], 600);
    assert_eq!(summary["rank"]["name"], "Rookie");
    assert_eq!(summary["points_to_next"], 400);

    // Redeem the reward: spends points, mints an active code
    let (status, redemption) = send(
        &app,
        post(&format!("/api/rewards/{reward_id}/redeem"), Some(&member_token), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "redeem failed: {redemption}");
    assert_eq!(redemption["status"], "active");
    let code = redemption["code"].as_str().expect("code").to_string();

    // Second redeem while the first is live is rejected
    let (status, body) = send(
        &app,
        post(&format!("/api/rewards/{reward_id}/redeem"), Some(&member_token), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "E4005");

    // Spending did not touch rank
    let (_, summary) = send(
        &app,
        get(&format!("/api/members/{member_id}/summary"), Some(&member_token)),
    )
    .await;
    assert_eq!(summary["earned_total"], 600);
    assert_eq!(summary["spendable"], 200);

    // Staff accepts the code by its tail, exactly once
    let fragment = &code[code.len() - 3..];
    let (status, accepted) = send(
        &app,
        post(
            "/api/redemptions/accept",
            Some(&staff_token),
            json!({"fragment": fragment}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "accept failed: {accepted}");
    assert_eq!(accepted["status"], "used");

    let (status, body) = send(
        &app,
        post(
            "/api/redemptions/accept",
            Some(&staff_token),
            json!({"fragment": fragment}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "E4003");

    // The member sees the final state in their history
    let (status, mine) = send(&app, get("/api/redemptions/mine", Some(&member_token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine[0]["status"], "used");
    assert_eq!(mine[0]["reward_title"], "Free Drink");

    // Review gate: open after tonight's visit, closed after posting
    let (status, elig) = send(&app, get("/api/reviews/eligibility", Some(&member_token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(elig["can_submit"], true);

    let (status, review) = send(
        &app,
        post(
            "/api/reviews",
            Some(&member_token),
            json!({"mood": 5, "comment": "great night"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(review["mood"], 5);

    let (status, body) = send(
        &app,
        post("/api/reviews", Some(&member_token), json!({"mood": 4})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "E4010");

    let (_, elig) = send(&app, get("/api/reviews/eligibility", Some(&member_token))).await;
    assert_eq!(elig["can_submit"], false);
    assert_eq!(elig["reason"], "already_reviewed");
}

#[tokio::test]
async fn members_cannot_read_each_other() {
    let app = test_app().await;
    let staff_token = login(&app, "door", "door-pass").await;

    let mut tokens = Vec::new();
    let mut ids = Vec::new();
    for name in ["Alice", "Bob"] {
        let (_, member) = send(
            &app,
            post("/api/members", Some(&staff_token), json!({"name": name})),
        )
        .await;
        let id = member["id"].as_i64().expect("id");
        let (_, issued) = send(
            &app,
            post(&format!("/api/members/{id}/token"), Some(&staff_token), json!({})),
        )
        .await;
        ids.push(id);
        tokens.push(issued["token"].as_str().expect("token").to_string());
    }

    let (status, _) = send(
        &app,
        get(&format!("/api/members/{}/summary", ids[1]), Some(&tokens[0])),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Staff can read anyone
    let (status, _) = send(
        &app,
        get(&format!("/api/members/{}/summary", ids[1]), Some(&staff_token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_fragment_reports_not_found() {
    let app = test_app().await;
    let staff_token = login(&app, "door", "door-pass").await;

    let (status, body) = send(
        &app,
        post(
            "/api/redemptions/accept",
            Some(&staff_token),
            json!({"fragment": "ZZZ"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "E4001");
}

#[tokio::test]
async fn database_file_persists_across_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("loyalty.db");
    let path = path.to_str().expect("utf8 path");

    {
        let pool = db::connect(path).await.expect("first open");
        loyalty_server::db::repository::member::create(
            &pool,
            shared::models::MemberCreate {
                name: "Alice".to_string(),
                phone: None,
                email: None,
                card_number: None,
            },
        )
        .await
        .expect("create");
        pool.close().await;
    }

    let pool = db::connect(path).await.expect("reopen");
    let members = loyalty_server::db::repository::member::find_all(&pool)
        .await
        .expect("find");
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].name, "Alice");
}
