use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::{entities::token::Claims, errors::AuthError};

/// Session resolved by `SessionMiddleware`.
///
/// Take `AuthClaims` to require a session (401 otherwise) or
/// `Option<AuthClaims>` where anonymous callers get a narrower view.
#[derive(Debug, Clone)]
pub struct AuthClaims(pub Claims);

impl AuthClaims {
    /// Id of the signed-in user; articles are owned by this value.
    pub fn user_id(&self) -> &str {
        &self.0.sub
    }
}

impl FromRequest for AuthClaims {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let session = req
            .extensions()
            .get::<Claims>()
            .cloned()
            .map(AuthClaims)
            .ok_or_else(|| AuthError::MissingCredentials.into());

        ready(session)
    }
}
