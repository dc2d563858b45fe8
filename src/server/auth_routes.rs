use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{Duration, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::auth::TokenPurpose;
use crate::error::Error;
use crate::server::AppState;
use crate::server::dto::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, MessageResponse, RegisterRequest,
    ReferentSignupRequest, ReferentVerifyRequest, ResetPasswordRequest,
};
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::server::validation::{
    normalize_email, validate_email, validate_password, validate_person_name,
};
use crate::types::{PendingReferent, Role, User};

const LOGIN_TTL_DAYS: i64 = 30;
const RESET_TTL_MINUTES: i64 = 30;
const REFERENT_CODE_TTL_MINUTES: i64 = 30;

/// Sent on forgot-password and referent-request regardless of whether the
/// email is known, so the endpoints cannot be used to enumerate accounts.
const GENERIC_RESET_MESSAGE: &str =
    "If the address is registered, an email has been sent with further instructions";

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> impl IntoResponse {
    let email = normalize_email(&req.email);
    validate_email(&email)?;
    validate_password(&req.password)?;
    validate_person_name(&req.first_name, "First name")?;
    validate_person_name(&req.last_name, "Last name")?;

    if state
        .store
        .get_user_by_email(&email)
        .api_err("Failed to check email")?
        .is_some()
    {
        return Err(ApiError::conflict("Email already in use"));
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        email,
        password_hash: state
            .passwords
            .hash(&req.password)
            .api_err("Failed to hash password")?,
        first_name: req.first_name,
        last_name: req.last_name,
        license_type: req.license_type,
        licensed: req.licensed,
        role: Role::User,
        points: 0,
        participations: 0,
        created_at: Utc::now(),
    };

    match state.store.create_user(&user) {
        Ok(()) => {}
        Err(Error::AlreadyExists) => return Err(ApiError::conflict("Email already in use")),
        Err(_) => return Err(ApiError::internal("Failed to create user")),
    }

    let token = state
        .tokens
        .issue(&user.id, None, Duration::days(LOGIN_TTL_DAYS))
        .api_err("Failed to issue token")?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AuthResponse { token, user })),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    let email = normalize_email(&req.email);

    let user = state
        .store
        .get_user_by_email(&email)
        .api_err("Failed to look up user")?
        .ok_or_else(|| ApiError::unauthorized("Incorrect email or password"))?;

    let valid = state
        .passwords
        .verify(&req.password, &user.password_hash)
        .api_err("Failed to verify password")?;
    if !valid {
        return Err(ApiError::unauthorized("Incorrect email or password"));
    }

    let token = state
        .tokens
        .issue(&user.id, None, Duration::days(LOGIN_TTL_DAYS))
        .api_err("Failed to issue token")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(AuthResponse { token, user })))
}

pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ForgotPasswordRequest>,
) -> impl IntoResponse {
    let email = normalize_email(&req.email);

    if let Some(user) = state
        .store
        .get_user_by_email(&email)
        .api_err("Failed to look up user")?
    {
        let token = state
            .tokens
            .issue(
                &user.id,
                Some(TokenPurpose::PasswordReset),
                Duration::minutes(RESET_TTL_MINUTES),
            )
            .api_err("Failed to issue reset token")?;

        let mailer = state.mailer.clone();
        tokio::spawn(async move {
            mailer.send(
                &user.email,
                "Réinitialisation du mot de passe",
                &format!(
                    "Bonjour {},\n\nVoici votre code de réinitialisation, valable {} minutes :\n\n{}\n",
                    user.first_name, RESET_TTL_MINUTES, token
                ),
            );
        });
    }

    Ok::<_, ApiError>(Json(ApiResponse::success(MessageResponse::new(
        GENERIC_RESET_MESSAGE,
    ))))
}

pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResetPasswordRequest>,
) -> impl IntoResponse {
    let claims = state
        .tokens
        .verify(&req.token)
        .map_err(|_| ApiError::bad_request("Invalid or expired reset token"))?;

    if claims.purpose != Some(TokenPurpose::PasswordReset) {
        return Err(ApiError::bad_request("Invalid or expired reset token"));
    }

    validate_password(&req.new_password)?;

    let mut user = state
        .store
        .get_user(&claims.sub)
        .api_err("Failed to load user")?
        .ok_or_else(|| ApiError::bad_request("Invalid or expired reset token"))?;

    user.password_hash = state
        .passwords
        .hash(&req.new_password)
        .api_err("Failed to hash password")?;
    state
        .store
        .update_user(&user)
        .api_err("Failed to update password")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(MessageResponse::new(
        "Password updated",
    ))))
}

pub async fn referent_request(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReferentSignupRequest>,
) -> impl IntoResponse {
    let email = normalize_email(&req.email);
    validate_email(&email)?;
    validate_password(&req.password)?;
    validate_person_name(&req.first_name, "First name")?;
    validate_person_name(&req.last_name, "Last name")?;

    let now = Utc::now();
    let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000u32));

    let pending = PendingReferent {
        email: email.clone(),
        password_hash: state
            .passwords
            .hash(&req.password)
            .api_err("Failed to hash password")?,
        first_name: req.first_name,
        last_name: req.last_name,
        code: code.clone(),
        created_at: now,
        expires_at: now + Duration::minutes(REFERENT_CODE_TTL_MINUTES),
    };

    // Replaces any earlier pending request for this email.
    state
        .store
        .upsert_pending_referent(&pending)
        .api_err("Failed to record request")?;

    let mailer = state.mailer.clone();
    tokio::spawn(async move {
        mailer.send(
            &email,
            "Vérification du compte référent",
            &format!(
                "Bonjour {},\n\nVotre code de vérification, valable {} minutes : {}\n",
                pending.first_name, REFERENT_CODE_TTL_MINUTES, code
            ),
        );
    });

    Ok::<_, ApiError>(Json(ApiResponse::success(MessageResponse::new(
        GENERIC_RESET_MESSAGE,
    ))))
}

pub async fn referent_verify(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReferentVerifyRequest>,
) -> impl IntoResponse {
    let email = normalize_email(&req.email);

    let pending = state
        .store
        .get_pending_referent(&email)
        .api_err("Failed to look up request")?
        .ok_or_else(|| ApiError::bad_request("Invalid or expired verification code"))?;

    if pending.expires_at < Utc::now() {
        let _ = state.store.delete_pending_referent(&email);
        return Err(ApiError::bad_request("Invalid or expired verification code"));
    }

    if pending.code != req.code {
        return Err(ApiError::bad_request("Invalid or expired verification code"));
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        email: pending.email.clone(),
        password_hash: pending.password_hash.clone(),
        first_name: pending.first_name.clone(),
        last_name: pending.last_name.clone(),
        license_type: crate::types::LicenseType::Competition,
        licensed: true,
        role: Role::Referent,
        points: 0,
        participations: 0,
        created_at: Utc::now(),
    };

    match state.store.create_user(&user) {
        Ok(()) => {}
        Err(Error::AlreadyExists) => {
            let _ = state.store.delete_pending_referent(&email);
            return Err(ApiError::conflict("Email already in use"));
        }
        Err(_) => return Err(ApiError::internal("Failed to create user")),
    }

    state
        .store
        .delete_pending_referent(&email)
        .api_err("Failed to consume request")?;

    let token = state
        .tokens
        .issue(&user.id, None, Duration::days(LOGIN_TTL_DAYS))
        .api_err("Failed to issue token")?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AuthResponse { token, user })),
    ))
}
