//! Request identity extraction.
//!
//! [`CurrentIdentity`] resolves the session credential through the
//! [`IdentityResolver`](crate::domain::ports::IdentityResolver) port and
//! caches the result in the request extensions, so a handler and any guard
//! that runs before it share one lookup. Denials surface as the standard
//! `401`/`403` error body.

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{DenialReason, Error, Requirement, ResolvedIdentity, authorize};

use super::session::SessionContext;
use super::state::HttpState;

/// Resolve the identity behind `req`.
///
/// The outer error reports infrastructure failures; the inner one is the
/// access decision. A credential naming a deleted account purges the
/// session so the browser stops presenting it.
pub(crate) async fn resolve_identity(
    req: &HttpRequest,
    state: &HttpState,
    session: &SessionContext,
) -> Result<Result<ResolvedIdentity, DenialReason>, Error> {
    if let Some(identity) = req.extensions().get::<ResolvedIdentity>().copied() {
        return Ok(Ok(identity));
    }
    let outcome = state
        .identity
        .resolve(session.user_id())
        .await?
        .into_result();
    match outcome {
        Ok(identity) => {
            req.extensions_mut().insert(identity);
        }
        Err(DenialReason::UnknownUser) => {
            debug!("session names an unknown account; purging");
            session.purge();
        }
        Err(reason) => debug!(?reason, "request identity denied"),
    }
    Ok(outcome)
}

/// The authenticated, active account behind the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentIdentity(pub ResolvedIdentity);

impl CurrentIdentity {
    /// Check a route's capability requirement, returning `403` on failure.
    pub fn require(&self, requirement: Requirement) -> Result<(), Error> {
        authorize(&self.0, requirement).map_err(DenialReason::into_error)
    }

    /// The resolved identity.
    pub fn identity(&self) -> &ResolvedIdentity {
        &self.0
    }
}

impl FromRequest for CurrentIdentity {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        let session = SessionContext::from_request(&req, payload);
        Box::pin(async move {
            let session = session.await?;
            let state = req
                .app_data::<web::Data<HttpState>>()
                .cloned()
                .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let identity = resolve_identity(&req, &state, &session)
                .await?
                .map_err(DenialReason::into_error)?;
            Ok(Self(identity))
        })
    }
}
