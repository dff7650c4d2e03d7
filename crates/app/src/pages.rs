//! Dashboard page shells
//!
//! Minimal HTML for the browser-facing routes. Protected pages normally
//! read the `AuthContext` the gate middleware left in the request
//! extensions; [`PageUser`] evaluates the gate itself when the middleware
//! let the request through untouched.

use axum::{
    extract::{FromRequestParts, Path, State},
    http::{request::Parts, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use reportdesk_auth::{sign_in_path, AuthBackend, AuthContext, POST_SIGN_IN_PATH};

const SIGN_OUT_PATH: &str = "/api/auth/sign-out";

/// Create page routes
pub fn routes() -> Router<AuthBackend> {
    Router::new()
        .route("/", get(landing))
        .route("/unauthorized", get(unauthorized))
        .route("/reports", get(reports))
        .route("/reports/{id}", get(report_detail))
        .route("/insights", get(insights))
}

/// Admin context for a protected page
///
/// Page paths that look like static assets (`/reports/chart.png`) skip the
/// middleware, so a missing extension means the gate still has to run.
struct PageUser(AuthContext);

impl FromRequestParts<AuthBackend> for PageUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        backend: &AuthBackend,
    ) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<AuthContext>() {
            return Ok(Self(ctx.clone()));
        }

        let path = parts.uri.path();
        let outcome = backend.evaluate(path, &parts.headers).await;
        match (
            outcome.decision.redirect_location(backend.config()),
            outcome.context,
        ) {
            (None, Some(ctx)) => Ok(Self(ctx)),
            (Some(location), _) => Err(Redirect::to(&location).into_response()),
            (None, None) => {
                Err(Redirect::to(&backend.config().sign_in_url(path)).into_response())
            }
        }
    }
}

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{} | AI Reports</title></head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    ))
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn nav(ctx: &AuthContext) -> String {
    let who = ctx
        .claims
        .as_ref()
        .and_then(|c| c.name().or_else(|| c.email()))
        .or_else(|| ctx.subject())
        .unwrap_or("admin");

    format!(
        "<nav><a href=\"/reports\">Reports</a> <a href=\"/insights\">Insights</a> <span>{}</span> <a href=\"{}\">Sign out</a></nav>",
        escape(who),
        SIGN_OUT_PATH
    )
}

/// GET / - admins go straight to the reports list
async fn landing(State(backend): State<AuthBackend>, headers: HeaderMap) -> Response {
    let ctx = backend.resolve(&headers).await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Session resolution failed on landing page");
        AuthContext::unauthenticated()
    });

    if ctx.is_authenticated && ctx.is_admin() {
        return Redirect::to(POST_SIGN_IN_PATH).into_response();
    }

    let body = if ctx.is_authenticated {
        format!(
            "<h1>AI Reports</h1>\n<p>You do not have access to this dashboard.</p>\n<a href=\"{}\">Sign out</a>",
            SIGN_OUT_PATH
        )
    } else {
        format!(
            "<h1>AI Reports</h1>\n<p>Sign in to access the dashboard</p>\n<a href=\"{}\">Sign in</a>",
            escape(&sign_in_path(POST_SIGN_IN_PATH))
        )
    };

    layout("Welcome", &body).into_response()
}

/// GET /unauthorized
async fn unauthorized() -> Html<String> {
    layout(
        "Access Denied",
        &format!(
            "<h2>Access Denied</h2>\n<a href=\"{}\">Sign out</a>",
            SIGN_OUT_PATH
        ),
    )
}

/// GET /reports
async fn reports(PageUser(ctx): PageUser) -> Html<String> {
    layout(
        "Reports",
        &format!(
            "{}\n<h1>Reports</h1>\n<div id=\"reports\" data-source=\"/api/reports\"></div>",
            nav(&ctx)
        ),
    )
}

/// GET /reports/{id}
async fn report_detail(
    PageUser(ctx): PageUser,
    Path(id): Path<String>,
) -> Html<String> {
    let id = escape(&id);
    layout(
        "Report",
        &format!(
            "{}\n<h1>Report {}</h1>\n<div id=\"report\" data-source=\"/api/reports/{}\"></div>",
            nav(&ctx),
            id,
            id
        ),
    )
}

/// GET /insights
async fn insights(PageUser(ctx): PageUser) -> Html<String> {
    layout(
        "Insights",
        &format!(
            "{}\n<h1>Insights</h1>\n<div id=\"insights\" data-source=\"/api/insights\"></div>",
            nav(&ctx)
        ),
    )
}

/// Fallback for unknown paths
pub async fn not_found() -> (StatusCode, Html<String>) {
    (
        StatusCode::NOT_FOUND,
        layout(
            "Not Found",
            "<h1>404</h1>\n<p>This page could not be found.</p>\n<a href=\"/reports\">Back to reports</a>",
        ),
    )
}
