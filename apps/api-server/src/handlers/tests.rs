use std::sync::Arc;

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::{Value, json};

use async_trait::async_trait;
use scribe_core::domain::{NewUser, User, UserChanges};
use scribe_core::error::RepoError;
use scribe_core::pagination::DeletedFilter;
use scribe_core::ports::{
    AuthError, PasswordService, Repositories, SoftDeleteRepository, TokenService, UserRepository,
};
use scribe_core::services::{CreateUser, Services};
use uuid::Uuid;
use scribe_infra::{InMemoryStore, JwtConfig, JwtTokenService};

use super::configure_routes;
use crate::state::{AppState, Storage};

const PASSWORD: &str = "Str0ng!Pass";

struct PlainPasswords;

impl PasswordService for PlainPasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("plain:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash.strip_prefix("plain:") == Some(password))
    }
}

/// User storage whose connection is down.
struct UnreachableUsers;

fn connection_lost() -> RepoError {
    RepoError::Connection("connection refused".to_string())
}

#[async_trait]
impl SoftDeleteRepository<User> for UnreachableUsers {
    async fn get(&self, _: Uuid, _: bool) -> Result<Option<User>, RepoError> {
        Err(connection_lost())
    }
    async fn list(&self, _: u64, _: u64, _: DeletedFilter) -> Result<Vec<User>, RepoError> {
        Err(connection_lost())
    }
    async fn count(&self, _: DeletedFilter) -> Result<u64, RepoError> {
        Err(connection_lost())
    }
    async fn create(&self, _: NewUser) -> Result<User, RepoError> {
        Err(connection_lost())
    }
    async fn update(&self, _: User, _: UserChanges) -> Result<User, RepoError> {
        Err(connection_lost())
    }
    async fn soft_delete(&self, _: Uuid) -> Result<bool, RepoError> {
        Err(connection_lost())
    }
    async fn restore(&self, _: Uuid) -> Result<Option<User>, RepoError> {
        Err(connection_lost())
    }
    async fn remove(&self, _: Uuid) -> Result<bool, RepoError> {
        Err(connection_lost())
    }
}

#[async_trait]
impl UserRepository for UnreachableUsers {
    async fn find_by_email(&self, _: &str, _: bool) -> Result<Option<User>, RepoError> {
        Err(connection_lost())
    }
}

fn test_tokens() -> JwtTokenService {
    JwtTokenService::new(JwtConfig {
        secret: "test-secret".to_string(),
        ..JwtConfig::default()
    })
}

async fn state() -> AppState {
    let store = InMemoryStore::new();
    let services = Services::new(store.repositories(), Arc::new(PlainPasswords));
    services
        .users
        .create_user(CreateUser {
            email: "admin@example.com".to_string(),
            password: PASSWORD.to_string(),
            full_name: None,
            is_superuser: true,
        })
        .await
        .unwrap();

    AppState::with_services(services, Arc::new(test_tokens()), Storage::InMemory)
}

async fn app() -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(state().await))
            .service(web::scope("/api/v1").configure(configure_routes)),
    )
    .await
}

async fn login<S>(app: &S, email: &str) -> String
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "email": email, "password": PASSWORD }))
        .to_request();
    let body: Value = test::call_and_read_body_json(app, req).await;
    format!("Bearer {}", body["access_token"].as_str().unwrap())
}

async fn signup_and_login<S>(app: &S, email: &str) -> String
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/users/signup")
        .set_json(json!({ "email": email, "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    login(app, email).await
}

async fn send<S>(app: &S, req: test::TestRequest, token: &str) -> ServiceResponse
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    test::call_service(
        app,
        req.insert_header((header::AUTHORIZATION, token)).to_request(),
    )
    .await
}

#[actix_rt::test]
async fn health_reports_in_memory_storage() {
    let app = app().await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "in-memory");
}

#[actix_rt::test]
async fn signup_login_and_read_me() {
    let app = app().await;
    let token = signup_and_login(&app, "alice@example.com").await;

    let resp = send(&app, test::TestRequest::get().uri("/api/v1/users/me"), &token).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let me: Value = test::read_body_json(resp).await;
    assert_eq!(me["email"], "alice@example.com");
    assert_eq!(me["is_superuser"], false);
    assert!(me.get("password_hash").is_none());

    let resp = send(
        &app,
        test::TestRequest::post().uri("/api/v1/login/test-token"),
        &token,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn wrong_password_is_unauthorized() {
    let app = app().await;

    let req = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "email": "admin@example.com", "password": "nope" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn protected_routes_require_a_token() {
    let app = app().await;

    let req = test::TestRequest::get().uri("/api/v1/posts").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 401);

    let resp = send(
        &app,
        test::TestRequest::get().uri("/api/v1/posts"),
        "Bearer not-a-token",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn storage_outage_is_a_server_error_not_a_bad_token() {
    let store = InMemoryStore::new();
    let repos = Repositories {
        users: Arc::new(UnreachableUsers),
        ..store.repositories()
    };
    let services = Services::new(repos, Arc::new(PlainPasswords));
    let tokens = test_tokens();
    let token = tokens
        .generate_token(Uuid::new_v4(), "alice@example.com", vec!["user".to_string()])
        .unwrap();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(AppState::with_services(
                services,
                Arc::new(tokens),
                Storage::InMemory,
            )))
            .service(web::scope("/api/v1").configure(configure_routes)),
    )
    .await;

    let resp = send(
        &app,
        test::TestRequest::get().uri("/api/v1/users/me"),
        &format!("Bearer {token}"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!resp.headers().contains_key(header::WWW_AUTHENTICATE));
}

#[actix_rt::test]
async fn deleted_account_token_stops_working() {
    let app = app().await;
    let token = signup_and_login(&app, "alice@example.com").await;

    let resp = send(&app, test::TestRequest::delete().uri("/api/v1/users/me"), &token).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(&app, test::TestRequest::get().uri("/api/v1/users/me"), &token).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn regular_user_cannot_list_deleted_rows() {
    let app = app().await;
    let token = signup_and_login(&app, "alice@example.com").await;

    let resp = send(
        &app,
        test::TestRequest::get().uri("/api/v1/posts?include_deleted=true"),
        &token,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let admin = login(&app, "admin@example.com").await;
    let resp = send(
        &app,
        test::TestRequest::get().uri("/api/v1/posts?only_deleted=true"),
        &admin,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn tag_writes_need_a_superuser() {
    let app = app().await;
    let token = signup_and_login(&app, "alice@example.com").await;
    let admin = login(&app, "admin@example.com").await;

    let create = || {
        test::TestRequest::post()
            .uri("/api/v1/tags")
            .set_json(json!({ "name": "rust" }))
    };

    let resp = send(&app, create(), &token).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = send(&app, create(), &admin).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = send(&app, create(), &admin).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = send(&app, test::TestRequest::get().uri("/api/v1/tags"), &token).await;
    let page: Value = test::read_body_json(resp).await;
    assert_eq!(page["total_items"], 1);
}

#[actix_rt::test]
async fn invalid_payloads_are_rejected() {
    let app = app().await;
    let token = signup_and_login(&app, "alice@example.com").await;

    // Title too short
    let resp = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts")
            .set_json(json!({ "title": "ab", "content": "long enough content" })),
        &token,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Missing field
    let resp = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts")
            .set_json(json!({ "title": "A title" })),
        &token,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = send(
        &app,
        test::TestRequest::get().uri("/api/v1/posts?page_size=101"),
        &token,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let resp = send(
        &app,
        test::TestRequest::get().uri("/api/v1/posts?page=18446744073709551615&page_size=100"),
        &token,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let resp = send(
        &app,
        test::TestRequest::get().uri("/api/v1/posts/not-a-uuid"),
        &token,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn post_lifecycle_over_http() {
    let app = app().await;
    let alice = signup_and_login(&app, "alice@example.com").await;
    let bob = signup_and_login(&app, "bob@example.com").await;
    let admin = login(&app, "admin@example.com").await;

    let resp = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/tags")
            .set_json(json!({ "name": "rust", "description": "Systems" })),
        &admin,
    )
    .await;
    let tag: Value = test::read_body_json(resp).await;

    let resp = send(
        &app,
        test::TestRequest::post().uri("/api/v1/posts").set_json(json!({
            "title": "Hello world",
            "content": "A first post with enough content",
            "tag_ids": [tag["id"]],
        })),
        &alice,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let post: Value = test::read_body_json(resp).await;
    assert_eq!(post["tags"][0]["name"], "rust");
    assert_eq!(post["author"]["email"], "alice@example.com");
    let post_uri = format!("/api/v1/posts/{}", post["id"].as_str().unwrap());

    let resp = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/comments")
            .set_json(json!({ "post_id": post["id"], "content": "Nice post" })),
        &bob,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Only the owner may edit
    let resp = send(
        &app,
        test::TestRequest::put()
            .uri(&post_uri)
            .set_json(json!({ "title": "Hijacked" })),
        &bob,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = send(&app, test::TestRequest::get().uri(&post_uri), &bob).await;
    let detail: Value = test::read_body_json(resp).await;
    assert_eq!(detail["title"], "Hello world");
    assert_eq!(detail["comments"].as_array().unwrap().len(), 1);

    let resp = send(&app, test::TestRequest::delete().uri(&post_uri), &alice).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(&app, test::TestRequest::get().uri(&post_uri), &alice).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let restore_uri = format!("{post_uri}/restore");
    let resp = send(&app, test::TestRequest::post().uri(&restore_uri), &alice).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = send(&app, test::TestRequest::post().uri(&restore_uri), &admin).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let restored: Value = test::read_body_json(resp).await;
    assert_eq!(restored["is_deleted"], false);
    assert!(restored["deleted_at"].is_null());

    let resp = send(&app, test::TestRequest::get().uri(&post_uri), &bob).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn pagination_envelope_over_http() {
    let app = app().await;
    let alice = signup_and_login(&app, "alice@example.com").await;

    for i in 0..5 {
        let resp = send(
            &app,
            test::TestRequest::post().uri("/api/v1/posts").set_json(json!({
                "title": format!("Post number {i}"),
                "content": "Some content that is long enough",
            })),
            &alice,
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = send(
        &app,
        test::TestRequest::get().uri("/api/v1/posts?page=3&page_size=2"),
        &alice,
    )
    .await;
    let page: Value = test::read_body_json(resp).await;

    assert_eq!(page["items"].as_array().unwrap().len(), 1);
    assert_eq!(page["page"], 3);
    assert_eq!(page["page_size"], 2);
    assert_eq!(page["total_pages"], 3);
    assert_eq!(page["total_items"], 5);
}
