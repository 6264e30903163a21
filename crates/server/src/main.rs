// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod live;
mod session;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
};
use clap::Parser;
use pilot_dispatch_api::{
    ApiError, AssignRequest, AssignmentCandidates, Capabilities, CreatePostRequest,
    CredentialView, DispatchService, LoginRequest, LoginResponse, OrderResponse, RegisterRequest,
    RegisterResponse, ServiceConfig, ShareLocationRequest, SubmitOrderRequest,
    UpdateAvailabilityRequest, translate_domain_error,
};
use pilot_dispatch_audit::{AuditEvent, Cause};
use pilot_dispatch_domain::{
    Account, AccountId, BlogPost, ErrorKind, Notification, NotificationId, OrderId, Permit,
    PilotOrder, Vendor, VendorProfileUpdate, parse_iso_date,
};
use pilot_dispatch_persistence::{
    DEFAULT_NOTIFICATION_CAP, InMemoryStore, PersistenceError, SeedData, StoreConfig,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use time::{Date, OffsetDateTime};
use tracing::{error, info, warn};

use crate::live::live_events_handler;
use crate::session::{OptionalActor, SessionActor};

/// Pilot Dispatch Server - HTTP server for the pilot-car dispatch marketplace
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// JSON seed file. Without it the demo marketplace is loaded.
    #[arg(short, long)]
    seed: Option<PathBuf>,

    /// Start with no accounts, orders, permits or posts
    #[arg(long, conflicts_with = "seed")]
    empty: bool,

    /// Simulated latency applied to every operation, in milliseconds
    #[arg(long, default_value_t = 0)]
    latency_ms: u64,

    /// Notifications kept per user
    #[arg(long, default_value_t = DEFAULT_NOTIFICATION_CAP)]
    notification_cap: usize,

    /// bcrypt cost for stored password hashes
    #[arg(long)]
    bcrypt_cost: Option<u32>,
}

impl Args {
    fn store_config(&self) -> StoreConfig {
        let defaults: StoreConfig = StoreConfig::default();
        StoreConfig {
            notification_cap: self.notification_cap,
            bcrypt_cost: self.bcrypt_cost.unwrap_or(defaults.bcrypt_cost),
        }
    }

    fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            latency: Duration::from_millis(self.latency_ms),
            ..ServiceConfig::default()
        }
    }

    /// Builds the store the flags ask for.
    fn build_store(&self) -> Result<InMemoryStore, PersistenceError> {
        let config: StoreConfig = self.store_config();
        if self.empty {
            info!("Starting with an empty store");
            return Ok(InMemoryStore::new(config));
        }
        let seed: SeedData = match &self.seed {
            Some(path) => {
                info!(path = %path.display(), "Loading seed file");
                SeedData::from_json_file(path)?
            }
            None => {
                info!("Loading demo marketplace");
                SeedData::demo()
            }
        };
        InMemoryStore::from_seed(config, seed)
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The marketplace operations over the in-memory store.
    service: Arc<DispatchService<InMemoryStore>>,
}

/// Query parameters for the loads-by-status endpoint.
#[derive(Debug, Default, Deserialize)]
struct StatusQuery {
    /// Comma-separated status names, e.g. `New,Pending Assignment`.
    #[serde(default)]
    statuses: String,
}

impl StatusQuery {
    fn statuses(&self) -> Vec<String> {
        self.statuses
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}

/// Query parameters for the vendor credentials endpoint.
#[derive(Debug, Default, Deserialize)]
struct CredentialsQuery {
    /// Day to evaluate expiry on (`YYYY-MM-DD`); today if absent.
    #[serde(default)]
    as_of: Option<String>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl HttpError {
    const fn new(status: StatusCode, message: String) -> Self {
        Self { status, message }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err.kind() {
            Some(ErrorKind::NotFound) => StatusCode::NOT_FOUND,
            Some(ErrorKind::Conflict) => StatusCode::CONFLICT,
            Some(ErrorKind::Validation) => StatusCode::BAD_REQUEST,
            None => match err {
                ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
                ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        };
        if status.is_server_error() {
            error!(error = %err, "Internal error");
        } else {
            warn!(status = status.as_u16(), error = %err, "Request rejected");
        }
        Self::new(status, err.to_string())
    }
}

fn http_cause(description: &str) -> Cause {
    Cause::new(String::from("http"), description.to_string())
}

// ============================================================================
// Accounts
// ============================================================================

/// Handler for POST `/accounts` endpoint.
///
/// Anonymous callers may register clients and vendors.
async fn handle_register(
    AxumState(app_state): AxumState<AppState>,
    OptionalActor(actor): OptionalActor,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, HttpError> {
    info!(role = %req.role, "Handling register request");
    let response: RegisterResponse = app_state
        .service
        .register(actor.as_ref(), req, http_cause("Account registration"))
        .await?;
    Ok(Json(response))
}

/// Handler for POST `/login` endpoint.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    Ok(Json(app_state.service.login(req).await?))
}

/// Handler for GET `/accounts` endpoint.
async fn handle_list_accounts(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
) -> Result<Json<Vec<Account>>, HttpError> {
    Ok(Json(app_state.service.list_accounts(&actor).await?))
}

/// Handler for GET `/accounts/{id}` endpoint.
async fn handle_get_account(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(id): Path<String>,
) -> Result<Json<Account>, HttpError> {
    Ok(Json(
        app_state
            .service
            .get_account(&actor, &AccountId::new(&id))
            .await?,
    ))
}

/// Handler for GET `/capabilities` endpoint.
async fn handle_capabilities(SessionActor(actor): SessionActor) -> Json<Capabilities> {
    Json(DispatchService::<InMemoryStore>::capabilities(&actor))
}

// ============================================================================
// Orders
// ============================================================================

/// Handler for POST `/orders` endpoint.
async fn handle_submit_order(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Json(req): Json<SubmitOrderRequest>,
) -> Result<Json<OrderResponse>, HttpError> {
    info!(actor_id = %actor.id, "Handling submit_order request");
    let response: OrderResponse = app_state
        .service
        .submit_order(&actor, req, http_cause("Order submission"))
        .await?;
    Ok(Json(response))
}

/// Handler for GET `/orders` endpoint.
async fn handle_list_orders(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
) -> Result<Json<Vec<PilotOrder>>, HttpError> {
    Ok(Json(app_state.service.list_orders(&actor).await?))
}

/// Handler for GET `/orders/by_status` endpoint.
async fn handle_loads_by_status(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Vec<PilotOrder>>, HttpError> {
    Ok(Json(
        app_state
            .service
            .loads_by_status(&actor, &query.statuses())
            .await?,
    ))
}

/// Handler for GET `/orders/available` endpoint.
async fn handle_available_loads(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
) -> Result<Json<Vec<PilotOrder>>, HttpError> {
    Ok(Json(app_state.service.available_loads(&actor).await?))
}

/// Handler for GET `/orders/{id}` endpoint.
async fn handle_get_order(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(id): Path<String>,
) -> Result<Json<PilotOrder>, HttpError> {
    Ok(Json(
        app_state.service.get_order(&actor, &OrderId::new(&id)).await?,
    ))
}

/// Handler for GET `/orders/{id}/audit` endpoint.
async fn handle_order_audit(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(id): Path<String>,
) -> Result<Json<Vec<AuditEvent>>, HttpError> {
    Ok(Json(
        app_state
            .service
            .order_audit_trail(&actor, &OrderId::new(&id))
            .await?,
    ))
}

/// Handler for POST `/orders/{id}/assign` endpoint.
async fn handle_assign(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(id): Path<String>,
    Json(req): Json<AssignRequest>,
) -> Result<Json<OrderResponse>, HttpError> {
    info!(
        actor_id = %actor.id,
        order_id = %id,
        vendor_id = %req.vendor_id,
        "Handling assign request"
    );
    let response: OrderResponse = app_state
        .service
        .assign(&actor, &OrderId::new(&id), req, http_cause("Vendor assignment"))
        .await?;
    Ok(Json(response))
}

/// Handler for POST `/orders/{id}/approve` endpoint.
async fn handle_approve(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, HttpError> {
    info!(actor_id = %actor.id, order_id = %id, "Handling approve request");
    let response: OrderResponse = app_state
        .service
        .approve(&actor, &OrderId::new(&id), http_cause("Assignment review"))
        .await?;
    Ok(Json(response))
}

/// Handler for POST `/orders/{id}/decline` endpoint.
async fn handle_decline(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, HttpError> {
    info!(actor_id = %actor.id, order_id = %id, "Handling decline request");
    let response: OrderResponse = app_state
        .service
        .decline(&actor, &OrderId::new(&id), http_cause("Assignment review"))
        .await?;
    Ok(Json(response))
}

/// Handler for GET `/clients/{id}/orders` endpoint.
async fn handle_client_orders(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(id): Path<String>,
) -> Result<Json<Vec<PilotOrder>>, HttpError> {
    Ok(Json(
        app_state
            .service
            .orders_for_client(&actor, &AccountId::new(&id))
            .await?,
    ))
}

/// Handler for GET `/dispatchers/{id}/orders` endpoint.
async fn handle_dispatcher_orders(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(id): Path<String>,
) -> Result<Json<Vec<PilotOrder>>, HttpError> {
    Ok(Json(
        app_state
            .service
            .orders_for_dispatcher(&actor, &AccountId::new(&id))
            .await?,
    ))
}

// ============================================================================
// Vendors
// ============================================================================

/// Handler for GET `/vendors` endpoint.
async fn handle_list_vendors(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
) -> Result<Json<Vec<Vendor>>, HttpError> {
    Ok(Json(app_state.service.list_vendors(&actor).await?))
}

/// Handler for GET `/vendors/candidates` endpoint.
async fn handle_candidates(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
) -> Result<Json<AssignmentCandidates>, HttpError> {
    Ok(Json(app_state.service.assignment_candidates(&actor).await?))
}

/// Handler for GET `/vendors/{id}` endpoint.
async fn handle_get_vendor(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(id): Path<String>,
) -> Result<Json<Vendor>, HttpError> {
    Ok(Json(
        app_state
            .service
            .get_vendor(&actor, &AccountId::new(&id))
            .await?,
    ))
}

/// Handler for GET `/vendors/{id}/credentials` endpoint.
async fn handle_vendor_credentials(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(id): Path<String>,
    Query(query): Query<CredentialsQuery>,
) -> Result<Json<Vec<CredentialView>>, HttpError> {
    let as_of: Date = match query.as_of.as_deref() {
        Some(value) => parse_iso_date(value).map_err(translate_domain_error)?,
        None => OffsetDateTime::now_utc().date(),
    };
    Ok(Json(
        app_state
            .service
            .vendor_credentials(&actor, &AccountId::new(&id), as_of)
            .await?,
    ))
}

/// Handler for GET `/vendors/{id}/orders` endpoint.
async fn handle_vendor_orders(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(id): Path<String>,
) -> Result<Json<Vec<PilotOrder>>, HttpError> {
    Ok(Json(
        app_state
            .service
            .orders_for_vendor(&actor, &AccountId::new(&id))
            .await?,
    ))
}

/// Handler for PUT `/vendors/{id}/availability` endpoint.
async fn handle_update_availability(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(id): Path<String>,
    Json(req): Json<UpdateAvailabilityRequest>,
) -> Result<Json<Vendor>, HttpError> {
    info!(
        actor_id = %actor.id,
        vendor_id = %id,
        availability = %req.availability,
        "Handling availability update"
    );
    let vendor: Vendor = app_state
        .service
        .update_availability(
            &actor,
            &AccountId::new(&id),
            req,
            http_cause("Availability update"),
        )
        .await?;
    Ok(Json(vendor))
}

/// Handler for PATCH `/vendors/{id}/profile` endpoint.
async fn handle_update_profile(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(id): Path<String>,
    Json(update): Json<VendorProfileUpdate>,
) -> Result<Json<Vendor>, HttpError> {
    let vendor: Vendor = app_state
        .service
        .update_profile(
            &actor,
            &AccountId::new(&id),
            update,
            http_cause("Profile update"),
        )
        .await?;
    Ok(Json(vendor))
}

/// Handler for PUT `/vendors/{id}/location` endpoint.
async fn handle_share_location(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(id): Path<String>,
    Json(req): Json<ShareLocationRequest>,
) -> Result<Json<Vendor>, HttpError> {
    let vendor: Vendor = app_state
        .service
        .share_location(
            &actor,
            &AccountId::new(&id),
            req,
            http_cause("Location shared"),
        )
        .await?;
    Ok(Json(vendor))
}

/// Handler for DELETE `/vendors/{id}/location` endpoint.
async fn handle_clear_location(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(id): Path<String>,
) -> Result<Json<Vendor>, HttpError> {
    let vendor: Vendor = app_state
        .service
        .clear_location(&actor, &AccountId::new(&id), http_cause("Location cleared"))
        .await?;
    Ok(Json(vendor))
}

// ============================================================================
// Permits, notifications and posts
// ============================================================================

/// Handler for GET `/permits` endpoint.
async fn handle_list_permits(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
) -> Result<Json<Vec<Permit>>, HttpError> {
    Ok(Json(app_state.service.list_permits(&actor).await?))
}

/// Handler for GET `/users/{id}/notifications` endpoint.
async fn handle_notifications(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(id): Path<String>,
) -> Result<Json<Vec<Notification>>, HttpError> {
    Ok(Json(
        app_state
            .service
            .notifications_for_user(&actor, &AccountId::new(&id))
            .await?,
    ))
}

/// Handler for POST `/users/{id}/notifications/read_all` endpoint.
async fn handle_mark_all_read(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(id): Path<String>,
) -> Result<Json<Vec<Notification>>, HttpError> {
    Ok(Json(
        app_state
            .service
            .mark_all_read(&actor, &AccountId::new(&id))
            .await?,
    ))
}

/// Handler for POST `/notifications/{id}/read` endpoint.
async fn handle_mark_read(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(id): Path<String>,
) -> Result<Json<Notification>, HttpError> {
    Ok(Json(
        app_state
            .service
            .mark_read(&actor, &NotificationId::new(&id))
            .await?,
    ))
}

/// Handler for GET `/posts` endpoint. Public.
async fn handle_list_posts(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<BlogPost>>, HttpError> {
    Ok(Json(app_state.service.list_posts().await?))
}

/// Handler for GET `/posts/{slug}` endpoint. Public.
async fn handle_get_post(
    AxumState(app_state): AxumState<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>, HttpError> {
    Ok(Json(app_state.service.get_post(&slug).await?))
}

/// Handler for POST `/posts` endpoint.
async fn handle_create_post(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Json(req): Json<CreatePostRequest>,
) -> Result<Json<BlogPost>, HttpError> {
    let post: BlogPost = app_state
        .service
        .create_post(&actor, req, http_cause("Blog post"))
        .await?;
    Ok(Json(post))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/accounts", post(handle_register).get(handle_list_accounts))
        .route("/accounts/{id}", get(handle_get_account))
        .route("/login", post(handle_login))
        .route("/capabilities", get(handle_capabilities))
        .route("/orders", post(handle_submit_order).get(handle_list_orders))
        .route("/orders/by_status", get(handle_loads_by_status))
        .route("/orders/available", get(handle_available_loads))
        .route("/orders/{id}", get(handle_get_order))
        .route("/orders/{id}/audit", get(handle_order_audit))
        .route("/orders/{id}/assign", post(handle_assign))
        .route("/orders/{id}/approve", post(handle_approve))
        .route("/orders/{id}/decline", post(handle_decline))
        .route("/clients/{id}/orders", get(handle_client_orders))
        .route("/dispatchers/{id}/orders", get(handle_dispatcher_orders))
        .route("/vendors", get(handle_list_vendors))
        .route("/vendors/candidates", get(handle_candidates))
        .route("/vendors/{id}", get(handle_get_vendor))
        .route("/vendors/{id}/orders", get(handle_vendor_orders))
        .route("/vendors/{id}/credentials", get(handle_vendor_credentials))
        .route("/vendors/{id}/availability", put(handle_update_availability))
        .route(
            "/vendors/{id}/profile",
            patch(handle_update_profile),
        )
        .route(
            "/vendors/{id}/location",
            put(handle_share_location).delete(handle_clear_location),
        )
        .route("/permits", get(handle_list_permits))
        .route("/users/{id}/notifications", get(handle_notifications))
        .route(
            "/users/{id}/notifications/read_all",
            post(handle_mark_all_read),
        )
        .route("/notifications/{id}/read", post(handle_mark_read))
        .route("/posts", get(handle_list_posts).post(handle_create_post))
        .route("/posts/{slug}", get(handle_get_post))
        .route("/live", get(live_events_handler))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Pilot Dispatch Server");

    let store: InMemoryStore = args.build_store()?;
    let app_state: AppState = AppState {
        service: Arc::new(DispatchService::new(
            Arc::new(store),
            args.service_config(),
        )),
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use pilot_dispatch_domain::{EscortService, OrderDraft};
    use pilot_dispatch_persistence::DEMO_PASSWORD;
    use serde_json::{Value, json};
    use time::macros::{date, time};
    use tower::ServiceExt;

    /// Helper to create test app state over the demo marketplace.
    fn create_test_app_state() -> AppState {
        let store: InMemoryStore = InMemoryStore::from_seed(
            StoreConfig {
                notification_cap: DEFAULT_NOTIFICATION_CAP,
                bcrypt_cost: 4,
            },
            SeedData::demo(),
        )
        .expect("Failed to seed store");
        AppState {
            service: Arc::new(DispatchService::new(
                Arc::new(store),
                ServiceConfig::default(),
            )),
        }
    }

    fn create_test_submit_body() -> String {
        serde_json::to_string(&SubmitOrderRequest {
            draft: OrderDraft {
                pickup_address: String::from("Beaumont, TX"),
                delivery_address: String::from("Tyler, TX"),
                pickup_date: date!(2026 - 03 - 02),
                pickup_time: time!(7:30),
                services: vec![EscortService::Lead],
                driver_name: String::from("Luis"),
                driver_phone: String::from("555-7788"),
            },
            client_id: None,
        })
        .unwrap()
    }

    /// Sends one request and returns the status and JSON body.
    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        actor: Option<&str>,
        body: Option<String>,
    ) -> (HttpStatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(actor_id) = actor {
            builder = builder.header("X-Actor-Id", actor_id);
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn assign_body(vendor_id: &str) -> Option<String> {
        Some(json!({ "vendor_id": vendor_id }).to_string())
    }

    #[tokio::test]
    async fn test_login_with_demo_password() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) = send(
            &app,
            "POST",
            "/login",
            None,
            Some(json!({ "email": "client@test.com", "password": DEMO_PASSWORD }).to_string()),
        )
        .await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["account"]["id"], "client1");
        assert_eq!(body["account"]["kind"], "client");
        assert_eq!(body["capabilities"]["can_submit_order"], "allowed");
        assert_eq!(body["capabilities"]["can_assign"], "denied");
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_is_401() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) = send(
            &app,
            "POST",
            "/login",
            None,
            Some(json!({ "email": "client@test.com", "password": "nope-nope-1" }).to_string()),
        )
        .await;

        assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], true);
        assert!(body["message"].as_str().unwrap().contains("Invalid email or password"));
    }

    #[tokio::test]
    async fn test_missing_or_unknown_actor_is_401() {
        let app: Router = build_router(create_test_app_state());

        let (missing, body) = send(&app, "GET", "/orders", None, None).await;
        assert_eq!(missing, HttpStatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], true);

        let (unknown, _) = send(&app, "GET", "/orders", Some("ghost"), None).await;
        assert_eq!(unknown, HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_client_listing_all_orders_is_403() {
        let app: Router = build_router(create_test_app_state());

        let (status, _) = send(&app, "GET", "/orders", Some("client1"), None).await;
        assert_eq!(status, HttpStatusCode::FORBIDDEN);

        let (staff, body) = send(&app, "GET", "/orders", Some("admin1"), None).await;
        assert_eq!(staff, HttpStatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_unknown_order_is_404() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) = send(&app, "GET", "/orders/order999", Some("admin1"), None).await;

        assert_eq!(status, HttpStatusCode::NOT_FOUND);
        assert_eq!(body["error"], true);
    }

    #[tokio::test]
    async fn test_submit_assign_approve_over_http() {
        let app: Router = build_router(create_test_app_state());

        let (submitted, body) = send(
            &app,
            "POST",
            "/orders",
            Some("client1"),
            Some(create_test_submit_body()),
        )
        .await;
        assert_eq!(submitted, HttpStatusCode::OK);
        assert_eq!(body["order"]["id"], "order105");
        assert_eq!(body["order"]["status"], "New");

        let (assigned, body) = send(
            &app,
            "POST",
            "/orders/order105/assign",
            Some("admin2"),
            assign_body("vendor1"),
        )
        .await;
        assert_eq!(assigned, HttpStatusCode::OK);
        assert_eq!(body["order"]["status"], "Pending Review");

        let (approved, body) =
            send(&app, "POST", "/orders/order105/approve", Some("admin1"), None).await;
        assert_eq!(approved, HttpStatusCode::OK);
        assert_eq!(body["order"]["status"], "Assigned");
        assert_eq!(body["order"]["assigned_vendor_id"], "vendor1");

        let (_, notifications) = send(
            &app,
            "GET",
            "/users/vendor1/notifications",
            Some("vendor1"),
            None,
        )
        .await;
        let notifications = notifications.as_array().unwrap();
        assert_eq!(notifications.len(), 1);
        assert!(
            notifications[0]["message"]
                .as_str()
                .unwrap()
                .contains("approved and assigned")
        );

        let (_, trail) = send(&app, "GET", "/orders/order105/audit", Some("admin1"), None).await;
        let actions: Vec<&str> = trail
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["action"]["name"].as_str().unwrap())
            .collect();
        assert_eq!(actions, vec!["SubmitOrder", "AssignVendor", "ApproveAssignment"]);
    }

    #[tokio::test]
    async fn test_second_decline_is_409() {
        let app: Router = build_router(create_test_app_state());
        send(
            &app,
            "POST",
            "/orders/order102/assign",
            Some("admin2"),
            assign_body("vendor1"),
        )
        .await;

        let (first, body) =
            send(&app, "POST", "/orders/order102/decline", Some("admin1"), None).await;
        assert_eq!(first, HttpStatusCode::OK);
        assert_eq!(body["order"]["status"], "Pending Assignment");
        assert_eq!(body["order"]["assigned_vendor_id"], Value::Null);

        let (second, body) =
            send(&app, "POST", "/orders/order102/decline", Some("admin1"), None).await;
        assert_eq!(second, HttpStatusCode::CONFLICT);
        assert_eq!(body["error"], true);
    }

    #[tokio::test]
    async fn test_assign_non_vendor_is_400() {
        let app: Router = build_router(create_test_app_state());

        let (status, _) = send(
            &app,
            "POST",
            "/orders/order102/assign",
            Some("admin2"),
            assign_body("client1"),
        )
        .await;

        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_loads_by_status_query() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) = send(
            &app,
            "GET",
            "/orders/by_status?statuses=New,Assigned",
            Some("admin1"),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 3);

        let (invalid, _) = send(
            &app,
            "GET",
            "/orders/by_status?statuses=Lost",
            Some("admin1"),
            None,
        )
        .await;
        assert_eq!(invalid, HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_available_loads_for_vendor() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) = send(&app, "GET", "/orders/available", Some("vendor1"), None).await;

        assert_eq!(status, HttpStatusCode::OK);
        let mut ids: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["id"].as_str().unwrap())
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["order102", "order103", "order104"]);
    }

    #[tokio::test]
    async fn test_available_loads_forbidden_for_client() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) = send(&app, "GET", "/orders/available", Some("client1"), None).await;

        assert_eq!(status, HttpStatusCode::FORBIDDEN);
        assert_eq!(body["error"], true);
    }

    #[tokio::test]
    async fn test_register_over_http() {
        let app: Router = build_router(create_test_app_state());
        let request = |role: &str| {
            Some(
                json!({
                    "name": "Casey Rivera",
                    "email": "casey@rivera.com",
                    "password": "Escort-Lead9",
                    "password_confirmation": "Escort-Lead9",
                    "role": role,
                })
                .to_string(),
            )
        };

        let (staff, _) = send(&app, "POST", "/accounts", None, request("DISPATCHER")).await;
        assert_eq!(staff, HttpStatusCode::FORBIDDEN);

        let (created, body) = send(&app, "POST", "/accounts", None, request("VENDOR")).await;
        assert_eq!(created, HttpStatusCode::OK);
        assert_eq!(body["account"]["id"], "user9");
        assert_eq!(body["account"]["kind"], "vendor");
        assert_eq!(body["account"]["availability"], "Available");

        let (duplicate, _) = send(&app, "POST", "/accounts", None, request("CLIENT")).await;
        assert_eq!(duplicate, HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_vendor_availability_and_location() {
        let app: Router = build_router(create_test_app_state());

        let (denied, _) = send(
            &app,
            "PUT",
            "/vendors/vendor1/availability",
            Some("admin2"),
            Some(json!({ "availability": "OnLoad" }).to_string()),
        )
        .await;
        assert_eq!(denied, HttpStatusCode::FORBIDDEN);

        let (updated, body) = send(
            &app,
            "PUT",
            "/vendors/vendor1/availability",
            Some("vendor1"),
            Some(json!({ "availability": "Unavailable" }).to_string()),
        )
        .await;
        assert_eq!(updated, HttpStatusCode::OK);
        assert_eq!(body["availability"], "Unavailable");

        let (_, candidates) = send(&app, "GET", "/vendors/candidates", Some("admin1"), None).await;
        assert!(candidates["eligible"].as_array().unwrap().is_empty());
        assert_eq!(candidates["all"].as_array().unwrap().len(), 1);

        let (bad, _) = send(
            &app,
            "PUT",
            "/vendors/vendor1/location",
            Some("vendor1"),
            Some(json!({ "lat": 120.0, "lng": 0.0 }).to_string()),
        )
        .await;
        assert_eq!(bad, HttpStatusCode::BAD_REQUEST);

        let (cleared, body) =
            send(&app, "DELETE", "/vendors/vendor1/location", Some("vendor1"), None).await;
        assert_eq!(cleared, HttpStatusCode::OK);
        assert_eq!(body["location"], Value::Null);
    }

    #[tokio::test]
    async fn test_profile_patch() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) = send(
            &app,
            "PATCH",
            "/vendors/vendor1/profile",
            Some("vendor1"),
            Some(json!({ "address": "9 Convoy Ln, Waco, TX" }).to_string()),
        )
        .await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["address"], "9 Convoy Ln, Waco, TX");
        assert_eq!(body["company_name"], "Safe Escorts LLC");
    }

    #[tokio::test]
    async fn test_foreign_notification_is_404() {
        let app: Router = build_router(create_test_app_state());
        send(
            &app,
            "POST",
            "/orders",
            Some("client1"),
            Some(create_test_submit_body()),
        )
        .await;
        let (_, log) = send(
            &app,
            "GET",
            "/users/admin1/notifications",
            Some("admin1"),
            None,
        )
        .await;
        let id: String = log[0]["id"].as_str().unwrap().to_string();

        let (foreign, _) = send(
            &app,
            "POST",
            &format!("/notifications/{id}/read"),
            Some("admin2"),
            None,
        )
        .await;
        assert_eq!(foreign, HttpStatusCode::NOT_FOUND);

        let (own, body) = send(
            &app,
            "POST",
            &format!("/notifications/{id}/read"),
            Some("admin1"),
            None,
        )
        .await;
        assert_eq!(own, HttpStatusCode::OK);
        assert_eq!(body["is_read"], true);

        let (private, _) = send(
            &app,
            "GET",
            "/users/admin1/notifications",
            Some("admin2"),
            None,
        )
        .await;
        assert_eq!(private, HttpStatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_posts_are_public_but_creation_is_not() {
        let app: Router = build_router(create_test_app_state());

        let (listed, body) = send(&app, "GET", "/posts", None, None).await;
        assert_eq!(listed, HttpStatusCode::OK);
        assert_eq!(body[0]["slug"], "what-is-a-pilot-car");

        let (found, _) = send(&app, "GET", "/posts/what-is-a-pilot-car", None, None).await;
        assert_eq!(found, HttpStatusCode::OK);

        let post = Some(json!({ "title": "Night Moves", "content": "Lights on." }).to_string());
        let (denied, _) = send(&app, "POST", "/posts", Some("admin2"), post.clone()).await;
        assert_eq!(denied, HttpStatusCode::FORBIDDEN);

        let (created, body) = send(&app, "POST", "/posts", Some("admin5"), post).await;
        assert_eq!(created, HttpStatusCode::OK);
        assert_eq!(body["slug"], "night-moves");
    }

    #[tokio::test]
    async fn test_vendor_credentials_with_status() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) = send(
            &app,
            "GET",
            "/vendors/vendor1/credentials?as_of=2024-08-20",
            Some("admin2"),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body[0]["credential"]["id"], "cred1");
        assert_eq!(body[0]["status"], "Active");
        assert_eq!(body[1]["status"], "Expired");

        let (bad_date, _) = send(
            &app,
            "GET",
            "/vendors/vendor1/credentials?as_of=yesterday",
            Some("admin2"),
            None,
        )
        .await;
        assert_eq!(bad_date, HttpStatusCode::BAD_REQUEST);

        let (client, _) = send(
            &app,
            "GET",
            "/vendors/vendor1/credentials",
            Some("client1"),
            None,
        )
        .await;
        assert_eq!(client, HttpStatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_permits_by_role() {
        let app: Router = build_router(create_test_app_state());

        let (_, own) = send(&app, "GET", "/permits", Some("client1"), None).await;
        assert_eq!(own.as_array().unwrap().len(), 2);

        let (vendor, _) = send(&app, "GET", "/permits", Some("vendor1"), None).await;
        assert_eq!(vendor, HttpStatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_capabilities_for_caller() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) = send(&app, "GET", "/capabilities", Some("admin6"), None).await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["can_create_staff"], "allowed");
        assert_eq!(body["can_create_post"], "allowed");
    }

    #[tokio::test]
    async fn test_dispatcher_loads() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) =
            send(&app, "GET", "/dispatchers/admin2/orders", Some("admin1"), None).await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["id"], "order104");
    }

    #[test]
    fn test_status_query_splitting() {
        let query: StatusQuery = StatusQuery {
            statuses: String::from("New, Pending Assignment,,"),
        };
        assert_eq!(query.statuses(), vec!["New", "Pending Assignment"]);
        assert!(StatusQuery::default().statuses().is_empty());
    }

    #[test]
    fn test_args_translate_to_configs() {
        let args: Args = Args::parse_from([
            "pilot-dispatch-server",
            "--empty",
            "--latency-ms",
            "250",
            "--notification-cap",
            "10",
            "--bcrypt-cost",
            "5",
        ]);

        assert_eq!(args.store_config().notification_cap, 10);
        assert_eq!(args.store_config().bcrypt_cost, 5);
        assert_eq!(args.service_config().latency, Duration::from_millis(250));
        assert!(args.build_store().is_ok());
    }

    #[test]
    fn test_seed_and_empty_conflict() {
        let result = Args::try_parse_from([
            "pilot-dispatch-server",
            "--empty",
            "--seed",
            "seed.json",
        ]);
        assert!(result.is_err());
    }
}
