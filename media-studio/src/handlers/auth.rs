use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
    Form,
};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tower_sessions::Session;

use crate::middleware::auth::SESSION_KEY;
use crate::AppState;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub user_id: String,
    pub password: String,
}

/// An already-authenticated session skips the login page entirely.
pub async fn login_page(session: Session) -> impl IntoResponse {
    let authenticated: Option<bool> = session.get(SESSION_KEY).await.unwrap_or(None);

    if authenticated == Some(true) {
        return Redirect::to("/image").into_response();
    }

    LoginTemplate { error: None }.into_response()
}

pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Form(payload): Form<LoginRequest>,
) -> impl IntoResponse {
    let auth = &state.settings.auth;
    let valid =
        payload.user_id == auth.user_id && payload.password == *auth.password.expose_secret();

    if !valid {
        tracing::warn!(user_id = %payload.user_id, "login failed, invalid credentials");
        return LoginTemplate {
            error: Some("Invalid user ID or password".to_string()),
        }
        .into_response();
    }

    if let Err(e) = session.insert(SESSION_KEY, true).await {
        tracing::error!("failed to persist session: {}", e);
        return LoginTemplate {
            error: Some("Login failed, please retry".to_string()),
        }
        .into_response();
    }

    tracing::info!(user_id = %payload.user_id, "login successful");
    Redirect::to("/image").into_response()
}

pub async fn logout_handler(session: Session) -> impl IntoResponse {
    tracing::info!("logging out");
    session.clear().await;
    Redirect::to("/login")
}
