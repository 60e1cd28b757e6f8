/// Authentication middleware
///
/// Every API request carries a `Caller`: anonymous when no valid token is
/// presented, otherwise the authenticated identity with its admin flag
/// loaded from the database. Handlers that require authentication use the
/// `AuthenticatedUser` extractor, which rejects anonymous callers with 401.
use crate::{error::ServerError, state::AppState};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use chorus_core::{Caller, Identity};

/// Extension type carrying the request's caller
#[derive(Debug, Clone)]
pub struct CallerContext(pub Caller);

/// Extractor for handlers that require an authenticated caller
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub Identity);

/// Middleware that resolves the caller from the Authorization header
///
/// An absent, malformed, or expired token downgrades the request to
/// anonymous rather than rejecting it; public listings stay reachable and
/// per-route guards decide what the caller may do.
pub async fn caller_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    // The request body is not Sync; take the header out before the first
    // await so the future stays Send.
    let auth_header = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    let caller = resolve_caller(&app_state, auth_header.as_deref()).await?;
    request.extensions_mut().insert(CallerContext(caller));
    Ok(next.run(request).await)
}

async fn resolve_caller(
    app_state: &AppState,
    auth_header: Option<&str>,
) -> Result<Caller, ServerError> {
    let Some(auth_header) = auth_header else {
        return Ok(Caller::Anonymous);
    };

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        return Ok(Caller::Anonymous);
    };

    let user_id = match app_state.auth_service.verify_access_token(token) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Token verification failed: {}", e);
            return Ok(Caller::Anonymous);
        }
    };

    // A token may outlive its account; a deleted user is anonymous again
    match chorus_storage::users::get_by_id(&app_state.pool, user_id).await? {
        Some(user) => Ok(Caller::user(user.id, user.is_admin)),
        None => Ok(Caller::Anonymous),
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CallerContext
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerContext>()
            .cloned()
            .ok_or_else(|| ServerError::Internal("Caller middleware not installed".to_string()))
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CallerContext(caller) = CallerContext::from_request_parts(parts, state).await?;
        caller
            .identity()
            .copied()
            .map(AuthenticatedUser)
            .ok_or_else(|| ServerError::Auth("Authentication required".to_string()))
    }
}
