// routes.rs - Router assembly
//
// Public routes need nothing. Admin routes are guarded by two layers that
// run in order: bearer token (401) then admin role (403).

use std::any::Any;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, Any as AnyHeader, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::database::models::{Client, Project, Resource};
use crate::error::ApiError;
use crate::handlers::{auth, newsletter, resource, root};
use crate::middleware::{jwt_auth_middleware, require_admin};
use crate::state::AppState;

/// Who may call a group of routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Admin,
}

/// Multipart overhead allowed on top of the image itself.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn app(state: AppState) -> Router {
    let uploads = ServeDir::new(state.uploads.root());
    let cors = cors_layer(&state.config.security);

    Router::new()
        .route("/", get(root::root))
        .route("/health", get(root::health))
        .merge(auth_routes(&state))
        .merge(resource_routes::<Project>(&state, Access::Public))
        .merge(resource_routes::<Project>(&state, Access::Admin))
        .merge(resource_routes::<Client>(&state, Access::Public))
        .merge(resource_routes::<Client>(&state, Access::Admin))
        .merge(newsletter_routes(&state, Access::Public))
        .merge(newsletter_routes(&state, Access::Admin))
        .nest_service("/uploads", uploads)
        .fallback(route_not_found)
        .with_state(state)
        // applied bottom-up: cors sees the request first
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn auth_routes(state: &AppState) -> Router<AppState> {
    let me = Router::new()
        .route("/api/auth/me", get(auth::me_get))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    Router::new()
        .route("/api/auth/login", post(auth::login_post))
        .merge(me)
}

/// `GET /api/{collection}` for the public site, full CRUD under
/// `/api/admin/{collection}` for the dashboard.
pub fn resource_routes<R: Resource>(state: &AppState, access: Access) -> Router<AppState> {
    match access {
        Access::Public => {
            Router::new().route(&format!("/api/{}", R::COLLECTION), get(resource::list::<R>))
        }
        Access::Admin => {
            let base = format!("/api/admin/{}", R::COLLECTION);
            let router = Router::new()
                .route(&base, get(resource::list::<R>).post(resource::create::<R>))
                .route(
                    &format!("{base}/:id"),
                    put(resource::update::<R>).delete(resource::delete::<R>),
                )
                .layer(DefaultBodyLimit::max(
                    state.uploads.max_file_size_bytes() + FORM_OVERHEAD_BYTES,
                ));
            admin_only(router, state)
        }
    }
}

pub fn newsletter_routes(state: &AppState, access: Access) -> Router<AppState> {
    match access {
        Access::Public => Router::new().route("/api/newsletter", post(newsletter::subscribe)),
        Access::Admin => admin_only(
            Router::new().route("/api/admin/newsletter", get(newsletter::list)),
            state,
        ),
    }
}

fn admin_only(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    // the last route_layer added runs first
    router
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(AnyHeader)
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    tracing::error!("Handler panicked: {}", detail);
    ApiError::internal_server_error("Something went wrong!").into_response()
}
