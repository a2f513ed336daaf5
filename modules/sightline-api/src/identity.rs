//! Caller identity resolution. Extract this in handlers; the service layer
//! decides what an absent or under-privileged identity means.
//!
//! Credentials are out of scope here: an upstream gateway is trusted to
//! have authenticated the caller and to pass the user id in a header. This
//! extractor only resolves that id against the user directory.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::warn;

use sightline_common::Identity;

use crate::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The resolved caller, if any. Never rejects: missing or unknown ids
/// resolve to `None` and the permission gate reports `Unauthenticated`.
pub struct MaybeIdentity(pub Option<Identity>);

impl FromRequestParts<Arc<AppState>> for MaybeIdentity {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty());

        let Some(user_id) = header else {
            return Ok(MaybeIdentity(None));
        };

        let identity = match state.users.get(user_id).await {
            Ok(Some(user)) => Some(Identity {
                user_id: user.id,
                role: user.role,
            }),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "identity lookup failed");
                None
            }
        };

        Ok(MaybeIdentity(identity))
    }
}
