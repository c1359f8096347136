//! API router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::common::ApiResponse;
use super::modules::health::{self, HealthState};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::pos::{self, PosState};
use super::modules::request_id::request_id_middleware;
use super::modules::reviews::{self, ReviewState};
use super::modules::users::{self, UserState};
use crate::application::{PosService, ReviewService, UserService};
use crate::domain::{ApprovalConfig, ReviewStore};

/// Everything the handlers need; each handler extracts its own slice via
/// `FromRef`.
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<dyn ReviewStore>,
    pub reviews: Arc<ReviewService>,
    pub points_of_sale: Arc<PosService>,
    pub users: Arc<UserService>,
    pub started_at: Instant,
}

impl ApiState {
    pub fn new(store: Arc<dyn ReviewStore>, approval: ApprovalConfig) -> Self {
        Self {
            reviews: Arc::new(ReviewService::new(store.clone(), approval)),
            points_of_sale: Arc::new(PosService::new(store.clone())),
            users: Arc::new(UserService::new(store.clone())),
            store,
            started_at: Instant::now(),
        }
    }
}

impl FromRef<ApiState> for ReviewState {
    fn from_ref(s: &ApiState) -> Self {
        ReviewState {
            service: Arc::clone(&s.reviews),
        }
    }
}

impl FromRef<ApiState> for PosState {
    fn from_ref(s: &ApiState) -> Self {
        PosState {
            service: Arc::clone(&s.points_of_sale),
        }
    }
}

impl FromRef<ApiState> for UserState {
    fn from_ref(s: &ApiState) -> Self {
        UserState {
            service: Arc::clone(&s.users),
        }
    }
}

impl FromRef<ApiState> for HealthState {
    fn from_ref(s: &ApiState) -> Self {
        HealthState {
            store: Arc::clone(&s.store),
            started_at: s.started_at,
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        // Reviews
        reviews::list_reviews,
        reviews::get_review,
        reviews::create_review,
        reviews::update_review,
        reviews::delete_review,
        reviews::filter_reviews,
        reviews::approve_review,
        // Points of sale
        pos::list_pos,
        pos::get_pos,
        pos::create_pos,
        pos::update_pos,
        pos::delete_pos,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
    ),
    components(
        schemas(
            ApiResponse<String>,
            health::HealthResponse,
            health::ComponentHealth,
            reviews::ReviewDto,
            reviews::ReviewRequest,
            pos::PosDto,
            pos::PosRequest,
            users::UserDto,
            users::UserRequest,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and storage probe"),
        (name = "Reviews", description = "Reviews of campus points of sale and their approval workflow"),
        (name = "Points of Sale", description = "Cafes, bakeries, cafeterias and vending machines"),
        (name = "Users", description = "Review authors and approvers"),
    ),
    info(
        title = "Campus Reviews API",
        version = "1.0.0",
        description = "REST API for reviewing campus points of sale",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(state: ApiState, prometheus_handle: PrometheusHandle) -> Router {
    let review_routes = Router::new()
        .route(
            "/",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .route("/filter", get(reviews::filter_reviews))
        .route(
            "/{id}",
            get(reviews::get_review)
                .put(reviews::update_review)
                .delete(reviews::delete_review),
        )
        .route("/{id}/approve", post(reviews::approve_review));

    let pos_routes = Router::new()
        .route("/", get(pos::list_pos).post(pos::create_pos))
        .route(
            "/{id}",
            get(pos::get_pos).put(pos::update_pos).delete(pos::delete_pos),
        );

    let user_routes = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        );

    let metrics_routes = Router::new()
        .route("/metrics", get(prometheus_metrics))
        .with_state(MetricsState {
            handle: prometheus_handle,
        });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health::health_check))
        .nest("/api/v1/reviews", review_routes)
        .nest("/api/v1/pos", pos_routes)
        .nest("/api/v1/users", user_routes)
        .with_state(state)
        .merge(metrics_routes)
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::infrastructure::storage::InMemoryStore;

    fn app(min_count: u32) -> Router {
        let store: Arc<dyn ReviewStore> = Arc::new(InMemoryStore::new());
        let handle = PrometheusBuilder::new().build_recorder().handle();
        create_api_router(ApiState::new(store, ApprovalConfig::new(min_count)), handle)
    }

    async fn call(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    /// Creates one point of sale and three users, returning their ids.
    async fn seed(app: &Router) -> (i64, Vec<i64>) {
        let (status, pos) = call(
            app,
            "POST",
            "/api/v1/pos",
            Some(json!({"name": "Mensa", "pos_type": "Cafeteria", "campus": "Altstadt"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let mut users = Vec::new();
        for login in ["u1", "u2", "u3"] {
            let (status, user) = call(
                app,
                "POST",
                "/api/v1/users",
                Some(json!({"login_name": login, "email_address": format!("{login}@uni.de")})),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
            users.push(user["data"]["id"].as_i64().unwrap());
        }
        (pos["data"]["id"].as_i64().unwrap(), users)
    }

    #[tokio::test]
    async fn create_then_duplicate_review() {
        let app = app(2);
        let (pos_id, users) = seed(&app).await;
        let body = json!({"pos_id": pos_id, "author_id": users[0], "review": "Great coffee"});

        let (status, created) = call(&app, "POST", "/api/v1/reviews", Some(body.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["success"], true);
        assert_eq!(created["data"]["approval_count"], 0);
        assert_eq!(created["data"]["approved"], false);

        let (status, dup) = call(&app, "POST", "/api/v1/reviews", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(dup["success"], false);
        assert!(dup["error"].as_str().unwrap().contains("duplicate review"));
    }

    #[tokio::test]
    async fn approval_flow_over_http() {
        let app = app(2);
        let (pos_id, users) = seed(&app).await;
        let (_, created) = call(
            &app,
            "POST",
            "/api/v1/reviews",
            Some(json!({"pos_id": pos_id, "author_id": users[0], "review": "R"})),
        )
        .await;
        let id = created["data"]["id"].as_i64().unwrap();

        let uri = |user: i64| format!("/api/v1/reviews/{id}/approve?user_id={user}");

        let (status, r) = call(&app, "POST", &uri(users[1]), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(r["data"]["approval_count"], 1);
        assert_eq!(r["data"]["approved"], false);

        let (_, r) = call(&app, "POST", &uri(users[2]), None).await;
        assert_eq!(r["data"]["approval_count"], 2);
        assert_eq!(r["data"]["approved"], true);

        let (status, r) = call(&app, "POST", &uri(users[0]), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(r["error"].as_str().unwrap().contains("self-approval forbidden"));

        let (_, approved) = call(
            &app,
            "GET",
            &format!("/api/v1/reviews/filter?pos_id={pos_id}&approved=true"),
            None,
        )
        .await;
        assert_eq!(approved["data"].as_array().unwrap().len(), 1);
        assert_eq!(approved["data"][0]["approval_count"], 2);
    }

    #[tokio::test]
    async fn update_and_delete_review() {
        let app = app(3);
        let (pos_id, users) = seed(&app).await;
        let (_, created) = call(
            &app,
            "POST",
            "/api/v1/reviews",
            Some(json!({"pos_id": pos_id, "author_id": users[0], "review": "draft"})),
        )
        .await;
        let id = created["data"]["id"].as_i64().unwrap();
        let path = format!("/api/v1/reviews/{id}");

        let (status, updated) = call(
            &app,
            "PUT",
            &path,
            Some(json!({"pos_id": pos_id, "author_id": users[0], "review": "final"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["data"]["review"], "final");
        assert_eq!(updated["data"]["id"], id);

        let (status, _) = call(&app, "DELETE", &path, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, missing) = call(&app, "GET", &path, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(missing["success"], false);

        let (status, _) = call(&app, "DELETE", &path, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_references_are_404() {
        let app = app(2);
        let (_, users) = seed(&app).await;

        let (status, _) = call(
            &app,
            "POST",
            "/api/v1/reviews",
            Some(json!({"pos_id": 999, "author_id": users[0], "review": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(
            &app,
            "GET",
            "/api/v1/reviews/filter?pos_id=999&approved=false",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(&app, "POST", "/api/v1/reviews/1/approve?user_id=2", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, list) = call(&app, "GET", "/api/v1/reviews", None).await;
        assert!(list["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_bodies_are_rejected() {
        let app = app(2);
        let (pos_id, users) = seed(&app).await;

        let (status, body) = call(
            &app,
            "POST",
            "/api/v1/reviews",
            Some(json!({"pos_id": pos_id, "author_id": users[0], "review": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("review"));

        let (status, _) = call(
            &app,
            "POST",
            "/api/v1/pos",
            Some(json!({"name": "Kiosk", "pos_type": "Food Truck", "campus": "Altstadt"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(
            &app,
            "POST",
            "/api/v1/users",
            Some(json!({"login_name": "x", "email_address": "not-an-email"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn deleting_pos_removes_its_reviews() {
        let app = app(2);
        let (pos_id, users) = seed(&app).await;
        call(
            &app,
            "POST",
            "/api/v1/reviews",
            Some(json!({"pos_id": pos_id, "author_id": users[0], "review": "bye"})),
        )
        .await;

        let (status, _) = call(&app, "DELETE", &format!("/api/v1/pos/{pos_id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, list) = call(&app, "GET", "/api/v1/reviews", None).await;
        assert!(list["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn health_and_request_id() {
        let app = app(2);
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-request-id"], "abc-123");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let health: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(health["status"], "ok");
        assert_eq!(health["storage"]["status"], "ok");
    }

    #[tokio::test]
    async fn metrics_endpoint_serves_text() {
        let app = app(2);
        let response = app
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
    }
}
