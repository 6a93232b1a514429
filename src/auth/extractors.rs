use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, Error as ActixError, FromRequest, HttpRequest};
use futures::future::{ready, Ready};

use crate::auth::token::{Claims, TokenSigner};
use crate::error::AppError;

/// Verified claims of the bearer token sent with the request.
///
/// Reads `Authorization: Bearer <token>` and checks it with the `TokenSigner`
/// registered as `web::Data`. Adding this extractor to a handler's arguments is all
/// it takes to protect that route.
#[derive(Debug, Clone)]
pub struct BearerClaims(pub Claims);

impl FromRequest for BearerClaims {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req).map_err(Into::into))
    }
}

fn extract(req: &HttpRequest) -> Result<BearerClaims, AppError> {
    let signer = req.app_data::<web::Data<TokenSigner>>().ok_or_else(|| {
        AppError::InternalServerError("TokenSigner is not registered as app data".into())
    })?;

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Missing token".into()))?;

    signer.verify(token.trim()).map(BearerClaims)
}
