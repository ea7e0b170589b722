use std::env;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;
use uuid::Uuid;

fn bearer_token(email: &str) -> String {
    let claims = cleit_backend::middleware::auth::Claims {
        sub: email.to_string(),
        name: Some("Test Student".to_string()),
        exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
    };
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(
            cleit_backend::config::get_config().jwt_secret.as_bytes(),
        ),
    )
    .expect("encode token")
}

async fn body_json(resp: axum::response::Response) -> JsonValue {
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn student_flow_end_to_end() {
    dotenvy::dotenv().ok();
    if env::var("DATABASE_URL").is_err() {
        eprintln!("skipping student_flow_end_to_end: DATABASE_URL not set");
        return;
    }

    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    if env::var("JWT_SECRET").is_err() {
        env::set_var("JWT_SECRET", "test_secret_key");
    }
    env::set_var("PUBLIC_RPS", "100");
    env::set_var("STUDENT_RPS", "100");
    env::set_var("EMAIL_API_KEY", "re_test");
    env::set_var("EMAIL_FROM", "Cleit <connect@example.com>");
    env::set_var("UPLOAD_API_KEY", "upload_key");
    env::set_var("UPLOAD_API_SECRET", "upload_secret");

    let _ = cleit_backend::config::init_config();
    let pool = cleit_backend::database::pool::create_pool()
        .await
        .expect("pool");
    sqlx::migrate!("./migrations").run(&pool).await.expect("migrations");

    let suffix = Uuid::new_v4().simple().to_string();
    let email = format!("student_{}@college.edu", suffix);

    // Signed-up student with an eligible batch.
    let profile_service =
        cleit_backend::services::profile_service::ProfileService::new(pool.clone());
    profile_service
        .register_user(cleit_backend::dto::user_dto::RegisterUserPayload {
            name: "Test Student".into(),
            username: format!("student_{}", suffix),
            college_email: email.clone(),
            password: "correct-horse".into(),
        })
        .await
        .expect("register user");
    profile_service
        .update_profile(
            &email,
            cleit_backend::dto::user_dto::UpdateProfilePayload {
                name: None,
                personal_email: None,
                enrollment_number: None,
                phone: None,
                department: None,
                tenth_percentage: None,
                twelfth_percentage: None,
                college_gpa: None,
                batch_start: Some(2022),
                batch_end: Some(2026),
                linkedin: None,
                github: None,
                leetcode: None,
                resume_url: None,
                status: None,
            },
        )
        .await
        .expect("set batch");

    // One job with a required number field and an open deadline.
    let job_id: Uuid = sqlx::query_scalar(
        "INSERT INTO jobs (company, role, deadline, eligibility, input_fields) \
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind("Acme Corp")
    .bind("SDE Intern")
    .bind(Utc::now() + Duration::days(10))
    .bind(vec!["2022-2026".to_string()])
    .bind(json!([
        {"field_name": "gpa", "type": "number", "required": true}
    ]))
    .fetch_one(&pool)
    .await
    .expect("seed job");

    let test_id: Uuid = sqlx::query_scalar(
        "INSERT INTO tests (title, deadline) VALUES ($1, $2) RETURNING id",
    )
    .bind("Aptitude Screening")
    .bind(Utc::now() + Duration::days(5))
    .fetch_one(&pool)
    .await
    .expect("seed test");

    let closed_test_id: Uuid = sqlx::query_scalar(
        "INSERT INTO tests (title, deadline) VALUES ($1, $2) RETURNING id",
    )
    .bind("Closed Screening")
    .bind(Utc::now() - Duration::days(1))
    .fetch_one(&pool)
    .await
    .expect("seed closed test");

    let app_state = cleit_backend::AppState::new(pool.clone());
    let app = Router::new()
        .route(
            "/api/jobs/:id",
            get(cleit_backend::routes::jobs::get_job)
                .patch(cleit_backend::routes::jobs::apply_to_job)
                .delete(cleit_backend::routes::jobs::withdraw_application),
        )
        .route(
            "/api/tests/:id",
            get(cleit_backend::routes::tests::get_test)
                .patch(cleit_backend::routes::tests::register_for_test)
                .delete(cleit_backend::routes::tests::deregister_from_test),
        )
        .route(
            "/api/user",
            get(cleit_backend::routes::account::get_profile),
        )
        .layer(axum::middleware::from_fn(
            cleit_backend::middleware::auth::require_student_auth,
        ))
        .with_state(app_state);

    let token = bearer_token(&email);

    // No token -> 401.
    let req = Request::builder()
        .method("GET")
        .uri(format!("/api/jobs/{}", job_id))
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Job detail reports the deadline badge and no application yet.
    let req = Request::builder()
        .method("GET")
        .uri(format!("/api/jobs/{}", job_id))
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["job"]["has_applied"], json!(false));
    assert_eq!(body["job"]["deadline_info"]["status"], json!("normal"));

    // Missing required field -> 400.
    let req = Request::builder()
        .method("PATCH")
        .uri(format!("/api/jobs/{}", job_id))
        .header("Authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(
            json!({"email": email, "responses": []}).to_string(),
        ))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Valid application -> roster grows to 1.
    let apply_body = json!({
        "email": email,
        "responses": [{"field_name": "gpa", "value": "8.5"}]
    })
    .to_string();
    let req = Request::builder()
        .method("PATCH")
        .uri(format!("/api/jobs/{}", job_id))
        .header("Authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(apply_body.clone()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["applicant_count"], json!(1));

    // Second submission for the same (job, student) -> 409, roster unchanged.
    let req = Request::builder()
        .method("PATCH")
        .uri(format!("/api/jobs/{}", job_id))
        .header("Authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(apply_body))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // The recorded application round-trips: coerced gpa, pending status.
    let req = Request::builder()
        .method("GET")
        .uri(format!("/api/jobs/{}", job_id))
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["job"]["has_applied"], json!(true));
    assert_eq!(body["job"]["applicant_count"], json!(1));
    let application = &body["job"]["my_application"];
    assert_eq!(application["status"], json!("pending"));
    assert_eq!(application["responses"][0]["field_name"], json!("gpa"));
    assert_eq!(application["responses"][0]["value"], json!(8.5));

    // Withdrawal empties the roster.
    let req = Request::builder()
        .method("DELETE")
        .uri(format!("/api/jobs/{}?email={}", job_id, email))
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["remaining_applicants"], json!(0));

    // Test registration is idempotent: two registers, one roster entry.
    let register_body = json!({"email": email}).to_string();
    for _ in 0..2 {
        let req = Request::builder()
            .method("PATCH")
            .uri(format!("/api/tests/{}", test_id))
            .header("Authorization", format!("Bearer {}", token))
            .header("content-type", "application/json")
            .body(Body::from(register_body.clone()))
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["registrant_count"], json!(1));
    }

    // Deregistering twice is also fine; the second call is a no-op.
    for expected in [0, 0] {
        let req = Request::builder()
            .method("DELETE")
            .uri(format!("/api/tests/{}?email={}", test_id, email))
            .header("Authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["registrant_count"], json!(expected));
    }

    // Registration for a test whose deadline has passed is rejected.
    let req = Request::builder()
        .method("PATCH")
        .uri(format!("/api/tests/{}", closed_test_id))
        .header("Authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(register_body.clone()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(
        body["error"],
        json!("Registration deadline has passed")
    );

    // A student whose batch falls outside the posting's eligibility is
    // turned away at submission, not just by the pure predicate.
    let other_email = format!("senior_{}@college.edu", suffix);
    profile_service
        .register_user(cleit_backend::dto::user_dto::RegisterUserPayload {
            name: "Senior Student".into(),
            username: format!("senior_{}", suffix),
            college_email: other_email.clone(),
            password: "correct-horse".into(),
        })
        .await
        .expect("register second user");
    profile_service
        .update_profile(
            &other_email,
            cleit_backend::dto::user_dto::UpdateProfilePayload {
                name: None,
                personal_email: None,
                enrollment_number: None,
                phone: None,
                department: None,
                tenth_percentage: None,
                twelfth_percentage: None,
                college_gpa: None,
                batch_start: Some(2021),
                batch_end: Some(2025),
                linkedin: None,
                github: None,
                leetcode: None,
                resume_url: None,
                status: None,
            },
        )
        .await
        .expect("set second batch");

    let other_token = bearer_token(&other_email);
    let req = Request::builder()
        .method("PATCH")
        .uri(format!("/api/jobs/{}", job_id))
        .header("Authorization", format!("Bearer {}", other_token))
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "email": other_email,
                "responses": [{"field_name": "gpa", "value": "7.0"}]
            })
            .to_string(),
        ))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body = body_json(resp).await;
    assert_eq!(body["error"], json!("Your batch is not eligible for this job"));

    // Profiles are owner-only.
    let req = Request::builder()
        .method("GET")
        .uri("/api/user?email=someone_else@college.edu")
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Cleanup.
    sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(job_id)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("DELETE FROM tests WHERE id = ANY($1)")
        .bind(vec![test_id, closed_test_id])
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("DELETE FROM users WHERE college_email = ANY($1)")
        .bind(vec![email.clone(), other_email.clone()])
        .execute(&pool)
        .await
        .unwrap();
}
