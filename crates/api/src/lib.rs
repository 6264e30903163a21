// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! API boundary for the pilot dispatch marketplace.
//!
//! [`DispatchService`] exposes every operation as an `async fn` taking an
//! [`AuthenticatedActor`]. Authorization lives here; the core transitions
//! are role-agnostic. Errors from every layer are translated into
//! [`ApiError`].

mod auth;
mod capabilities;
mod error;
mod handlers;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService};
pub use capabilities::compute_capabilities;
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{DispatchService, ServiceConfig};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    AssignRequest, AssignmentCandidates, Capabilities, Capability, CreatePostRequest,
    CredentialView, LiveEvent, LoginRequest, LoginResponse, OrderResponse, RegisterRequest,
    RegisterResponse, ShareLocationRequest, SubmitOrderRequest, UpdateAvailabilityRequest,
};
