use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

/// Session key marking an authenticated operator.
pub const SESSION_KEY: &str = "authenticated";

/// Redirect to the login page unless the session carries the marker.
pub async fn require_session(
    session: Session,
    request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let authenticated: Option<bool> = session.get(SESSION_KEY).await.unwrap_or(None);

    if authenticated != Some(true) {
        return Ok(Redirect::to("/login").into_response());
    }

    Ok(next.run(request).await)
}
