use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use aeroclub_domain::booking::Role;

use crate::error::AppError;

/// Actor identity forwarded by the fronting gateway, which owns
/// authentication. Inside the deployment boundary the headers are trusted;
/// the scheduler only cares who is asking and with which role.
#[derive(Debug, Clone)]
pub struct ActorContext {
    pub actor_id: Uuid,
    pub role: Role,
}

impl<S> FromRequestParts<S> for ActorContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let actor_id = header_value(parts, "x-actor-id")?
            .parse::<Uuid>()
            .map_err(|_| AppError::AuthenticationError("Invalid x-actor-id header".to_string()))?;

        let role = header_value(parts, "x-actor-role")?
            .parse::<Role>()
            .map_err(|_| AppError::AuthenticationError("Invalid x-actor-role header".to_string()))?;

        Ok(Self { actor_id, role })
    }
}

fn header_value<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, AppError> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::AuthenticationError(format!("Missing {} header", name)))
}
