use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::auth::{
    auth_service::AuthService, jwt::TokenIssuer, login_service::LoginService,
    middleware::authenticate,
};
use crate::services::StaffDirectory;
use crate::storage::DbPool;

use super::{
    docs,
    handlers::{
        api_test_handler, append_leave_handler, append_shift_handler, create_staff_handler,
        delete_staff_handler, get_staff_handler, health_handler, list_staff_handler,
        login_handler, patients_handler, update_staff_handler,
    },
};

#[derive(Clone)]
pub struct ApiState {
    pub directory: StaffDirectory,
    pub login: LoginService,
}

/// Build the full application router.
///
/// `cors_origins` empty means any origin is allowed.
pub fn build_router(pool: DbPool, issuer: Arc<TokenIssuer>, cors_origins: &[String]) -> Router {
    let api_state = ApiState {
        directory: StaffDirectory::with_sqlx(pool.clone()),
        login: LoginService::with_sqlx(pool.clone(), issuer.clone()),
    };

    let auth_layer = {
        let auth_service = Arc::new(AuthService::with_sqlx(pool, issuer));
        middleware::from_fn_with_state(auth_service, authenticate)
    };

    let secured_api = Router::new()
        .route("/staff", get(list_staff_handler).post(create_staff_handler))
        .route(
            "/staff/{id}",
            get(get_staff_handler).put(update_staff_handler).delete(delete_staff_handler),
        )
        .route("/staff/{id}/shifts", post(append_shift_handler))
        .route("/staff/{id}/leaves", post(append_leave_handler))
        .route_layer(auth_layer);

    let public_api = Router::new()
        .route("/staff/login", post(login_handler))
        .route("/api/test", get(api_test_handler))
        .route("/api/patients", get(patients_handler))
        .route("/health", get(health_handler));

    public_api
        .merge(secured_api)
        .with_state(api_state)
        .merge(docs::docs_router())
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(parsed))
}
