// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Caller extraction for the server.
//!
//! There are no session tokens. A caller names its account in the
//! `X-Actor-Id` header and the id is resolved against the store on every
//! request.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use pilot_dispatch_api::AuthenticatedActor;
use tracing::{debug, warn};

use crate::{AppState, HttpError};

/// Header carrying the caller's account id.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Extractor for a caller that must be known.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     SessionActor(actor): SessionActor,
/// ) -> Result<Json<Response>, HttpError> {
///     // actor: AuthenticatedActor
/// }
/// ```
///
/// # Errors
///
/// Rejects with HTTP 401 if the header is missing, not valid UTF-8, or
/// names no account.
pub struct SessionActor(pub AuthenticatedActor);

impl FromRequestParts<AppState> for SessionActor {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let actor_id: &str = actor_header(parts)?.ok_or_else(|| {
            debug!("Missing {ACTOR_HEADER} header");
            SessionError::MissingActorHeader
        })?;
        resolve(state, actor_id).map(Self)
    }
}

/// Extractor for endpoints that anonymous callers may also use.
///
/// A missing header yields `None`; a header naming no account is still
/// rejected.
pub struct OptionalActor(pub Option<AuthenticatedActor>);

impl FromRequestParts<AppState> for OptionalActor {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match actor_header(parts)? {
            Some(actor_id) => resolve(state, actor_id).map(|actor| Self(Some(actor))),
            None => Ok(Self(None)),
        }
    }
}

fn actor_header(parts: &Parts) -> Result<Option<&str>, SessionError> {
    parts
        .headers
        .get(ACTOR_HEADER)
        .map(|value| {
            value.to_str().map_err(|_| {
                warn!("Invalid {ACTOR_HEADER} header encoding");
                SessionError::InvalidActorHeader
            })
        })
        .transpose()
}

fn resolve(state: &AppState, actor_id: &str) -> Result<AuthenticatedActor, SessionError> {
    let actor: AuthenticatedActor = state.service.resolve_actor(actor_id).map_err(|e| {
        warn!(actor_id, error = %e, "Caller resolution failed");
        SessionError::UnknownActor(e.to_string())
    })?;
    debug!(actor_id = %actor.id, role = %actor.role, "Caller resolved");
    Ok(actor)
}

/// Caller extraction errors.
#[derive(Debug)]
pub enum SessionError {
    /// The actor header is missing.
    MissingActorHeader,
    /// The actor header is not valid UTF-8.
    InvalidActorHeader,
    /// The actor header names no account.
    UnknownActor(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let message: String = match self {
            Self::MissingActorHeader => format!("Missing {ACTOR_HEADER} header"),
            Self::InvalidActorHeader => format!("Invalid {ACTOR_HEADER} header"),
            Self::UnknownActor(reason) => reason,
        };
        HttpError::new(StatusCode::UNAUTHORIZED, message).into_response()
    }
}
