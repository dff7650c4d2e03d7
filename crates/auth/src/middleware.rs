//! Gate middleware
//!
//! Applied with `axum::middleware::from_fn_with_state(backend, gate_middleware)`
//! around every route. For each request:
//! 1. Skips CORS preflight requests and static assets
//! 2. Evaluates the authorization gate for the path
//! 3. On allow, inserts the resolved `AuthContext` into request extensions
//! 4. Otherwise answers with a 303 redirect to sign-in or the denied view

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, Method},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::backend::AuthBackend;
use crate::classifier::is_static_asset;

pub async fn gate_middleware(
    State(backend): State<AuthBackend>,
    mut req: Request,
    next: Next,
) -> Response {
    if is_preflight_request(req.method(), req.headers()) || is_static_asset(req.uri().path()) {
        return next.run(req).await;
    }

    let path = req.uri().path().to_string();
    let outcome = backend.evaluate(&path, req.headers()).await;

    match outcome.decision.redirect_location(backend.config()) {
        None => {
            if let Some(context) = outcome.context {
                req.extensions_mut().insert(context);
            }
            next.run(req).await
        }
        Some(location) => Redirect::to(&location).into_response(),
    }
}

/// Check if this is a CORS preflight request
fn is_preflight_request(method: &Method, headers: &HeaderMap) -> bool {
    method == Method::OPTIONS
        && headers.contains_key(header::ORIGIN)
        && headers.contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
}
