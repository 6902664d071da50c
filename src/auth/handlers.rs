use axum::{
    extract::{FromRef, Path, State},
    routing::{delete, get, patch, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{
            AuthResponse, LoginRequest, MessageResponse, RegisterRequest, ResetRequest,
            ResetResponse, SessionResponse, UpdateUserRequest,
        },
        flow,
        jwt::{AuthUser, JwtKeys},
        repo::UserStore,
        repo_types::PublicUser,
        session::{SessionStore, SessionUser},
    },
    errors::AuthError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/reset", post(reset_password))
        .route("/auth/session", get(session))
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/users", get(list_users))
        .route("/users/:email", patch(update_user))
        .route("/users/:email", delete(delete_user))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    payload.email = payload.email.trim().to_lowercase();
    payload.name = payload.name.trim().to_string();

    flow::validate_signup(
        &payload.name,
        &payload.email,
        &payload.password,
        &payload.confirm_password,
    )?;

    let users = UserStore::new(state.store.clone());
    let user = users
        .create_user(&payload.email, &payload.password, &payload.name)
        .await?;

    let token = JwtKeys::from_ref(&state).sign(user.id)?;
    SessionStore::new(state.store.clone())
        .write(&SessionUser::from(&user))
        .await;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(AuthResponse {
        token,
        user,
        message: "Account created successfully! Redirecting...".into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    payload.email = payload.email.trim().to_lowercase();
    flow::validate_login(&payload.email, &payload.password)?;

    let users = UserStore::new(state.store.clone());
    let user = users.authenticate(&payload.email, &payload.password).await?;

    let token = JwtKeys::from_ref(&state).sign(user.id)?;
    SessionStore::new(state.store.clone())
        .write(&SessionUser::from(&user))
        .await;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(AuthResponse {
        token,
        user,
        message: "Login successful! Redirecting...".into(),
    }))
}

#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> Json<MessageResponse> {
    SessionStore::new(state.store.clone()).clear().await;
    Json(MessageResponse {
        message: "Logged out".into(),
    })
}

#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(mut payload): Json<ResetRequest>,
) -> Result<Json<ResetResponse>, AuthError> {
    payload.email = payload.email.trim().to_lowercase();
    if !flow::is_valid_email(&payload.email) {
        return Err(AuthError::Validation(
            "Please enter your email address first".into(),
        ));
    }

    let users = UserStore::new(state.store.clone());
    let temp_password = users.reset_password(&payload.email).await?;

    Ok(Json(ResetResponse {
        message: "Password reset successful".into(),
        temp_password,
    }))
}

/// Reads the persisted session marker. Display-only: this response is not
/// proof of identity.
#[instrument(skip(state))]
pub async fn session(State(state): State<AppState>) -> Json<SessionResponse> {
    let user = SessionStore::new(state.store.clone()).read().await;
    Json(SessionResponse { user })
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, AuthError> {
    let user = UserStore::new(state.store.clone()).get_by_id(user_id).await?;
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> Json<Vec<PublicUser>> {
    Json(UserStore::new(state.store.clone()).list_users().await)
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(email): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<PublicUser>, AuthError> {
    if let Some(password) = payload.password.as_deref() {
        flow::validate_password(password)?;
    }
    let users = UserStore::new(state.store.clone());
    let user = users
        .update_user(
            email.trim().to_lowercase().as_str(),
            payload.name.as_deref(),
            payload.password.as_deref(),
        )
        .await?;
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(email): Path<String>,
) -> Result<Json<MessageResponse>, AuthError> {
    UserStore::new(state.store.clone())
        .delete_user(email.trim().to_lowercase().as_str())
        .await?;
    Ok(Json(MessageResponse {
        message: "User deleted".into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_payload(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Jane".into(),
            email: email.into(),
            password: "eight888".into(),
            confirm_password: "eight888".into(),
        }
    }

    #[tokio::test]
    async fn register_then_login_and_me() {
        let state = AppState::fake();

        let Json(registered) = register(State(state.clone()), Json(register_payload("Jane@Example.com")))
            .await
            .expect("register");
        // Email is normalized before storage.
        assert_eq!(registered.user.email, "jane@example.com");

        let Json(logged_in) = login(
            State(state.clone()),
            Json(LoginRequest {
                email: "jane@example.com".into(),
                password: "eight888".into(),
            }),
        )
        .await
        .expect("login");
        assert_eq!(logged_in.user.name, "Jane");
        assert!(logged_in.user.last_login.is_some());

        // The issued token authenticates the /me lookup.
        let keys = JwtKeys::from_ref(&state);
        let claims = keys.verify(&logged_in.token).expect("token verifies");
        assert_eq!(claims.sub, logged_in.user.id);

        let Json(me) = get_me(State(state.clone()), AuthUser(claims.sub))
            .await
            .expect("me");
        assert_eq!(me.email, "jane@example.com");
    }

    #[tokio::test]
    async fn register_writes_session_marker_and_logout_clears_it() {
        let state = AppState::fake();
        register(State(state.clone()), Json(register_payload("jane@example.com")))
            .await
            .expect("register");

        let Json(session_resp) = session(State(state.clone())).await;
        assert_eq!(session_resp.user.unwrap().email, "jane@example.com");

        logout(State(state.clone())).await;
        let Json(session_resp) = session(State(state)).await;
        assert!(session_resp.user.is_none());
    }

    #[tokio::test]
    async fn duplicate_registration_is_conflict() {
        let state = AppState::fake();
        register(State(state.clone()), Json(register_payload("jane@example.com")))
            .await
            .expect("register");
        let err = register(State(state), Json(register_payload("jane@example.com")))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateUser));
    }

    #[tokio::test]
    async fn short_password_is_rejected_at_submission() {
        let state = AppState::fake();
        let mut payload = register_payload("jane@example.com");
        payload.password = "six666".into();
        payload.confirm_password = "six666".into();
        let err = register(State(state), Json(payload)).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn reset_flow_returns_usable_temp_password() {
        let state = AppState::fake();
        register(State(state.clone()), Json(register_payload("jane@example.com")))
            .await
            .expect("register");

        let Json(reset) = reset_password(
            State(state.clone()),
            Json(ResetRequest {
                email: "jane@example.com".into(),
            }),
        )
        .await
        .expect("reset");

        let err = login(
            State(state.clone()),
            Json(LoginRequest {
                email: "jane@example.com".into(),
                password: "eight888".into(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredential));

        login(
            State(state),
            Json(LoginRequest {
                email: "jane@example.com".into(),
                password: reset.temp_password,
            }),
        )
        .await
        .expect("temp password logs in");
    }
}
