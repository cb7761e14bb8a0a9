use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::auth::dto::{
    AuthResponse, LoginRequest, MeResponse, MessageResponse, PublicUser, RegisterRequest,
};
use crate::auth::extractors::AuthUser;
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::{clear_session_cookie, session_cookie};
use crate::error::{ApiError, ApiJson};
use crate::state::AppState;
use crate::store::{NewUser, StoreError};

#[instrument(skip(state, jar, payload))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), ApiError> {
    payload.validate()?;
    let name = payload.name.unwrap_or_default();
    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    if state.store.find_user_by_email(&email).await?.is_some() {
        warn!(email = %email, "registration with taken email");
        return Err(ApiError::Conflict(
            "User with this email already exists".into(),
        ));
    }

    let password_hash = hash_password(&password)?;
    // A concurrent registration can still win the insert; the store reports
    // that as a uniqueness violation, which maps onto the same 409.
    let user = state
        .store
        .create_user(NewUser {
            name,
            email,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            StoreError::Duplicate => {
                ApiError::Conflict("User with this email already exists".into())
            }
            other => other.into(),
        })?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;
    let jar = jar.add(session_cookie(token, keys.ttl, state.config.is_production()));

    info!(user_id = %user.id, "user registered");
    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            user: PublicUser::from(&user),
        }),
    ))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    payload.validate()?;
    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let Some(user) = state.store.find_user_by_email(&email).await? else {
        warn!(email = %email, "login with unknown email");
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password(&password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;
    let jar = jar.add(session_cookie(token, keys.ttl, state.config.is_production()));

    info!(user_id = %user.id, "user logged in");
    Ok((
        jar,
        Json(AuthResponse {
            user: PublicUser::from(&user),
        }),
    ))
}

#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.add(clear_session_cookie(state.config.is_production()));
    (
        jar,
        Json(MessageResponse {
            message: "Logged out successfully",
        }),
    )
}

#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<MeResponse>, ApiError> {
    let user = state
        .store
        .find_user_by_id(user_id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    Ok(Json(MeResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        created_at: user.created_at,
    }))
}
