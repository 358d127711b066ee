use axum::{
    extract::Request,
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::context::RequestContext;
use crate::http_server::error::ApiError;

/// Requires a bearer token and hands it to the handlers as a
/// [`RequestContext`]. Lookups still running when the client goes away are
/// cancelled along with the request.
pub async fn require_bearer_token(mut request: Request, next: Next) -> Response {
    let token = match bearer_token(&request) {
        Ok(token) => token,
        Err(err) => return err.into_response(),
    };

    let ctx = RequestContext::new(token);
    let _cancel_on_drop = ctx.cancellation().clone().drop_guard();
    request.extensions_mut().insert(ctx);

    next.run(request).await
}

fn bearer_token(request: &Request) -> Result<String, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".into()))?;
    let header = header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Malformed Authorization header".into()))?;

    match header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(ApiError::Unauthorized(
            "Authorization header must be a bearer token".into(),
        )),
    }
}
