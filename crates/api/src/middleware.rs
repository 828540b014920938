use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};

use technia_infra::AccessControl;

use crate::app::errors;
use crate::context::{PrincipalContext, TenantContext};

#[derive(Clone)]
pub struct AuthState {
    pub access: AccessControl,
}

/// HTTP Basic authentication for every protected route.
///
/// A missing, malformed or non-matching header is a 401 with the same generic
/// message, so callers cannot probe which usernames exist.
pub async fn auth_middleware(State(state): State<AuthState>, mut req: Request, next: Next) -> Response {
    let Some((username, password)) = extract_basic(req.headers()) else {
        return errors::unauthorized();
    };

    let principal = match state.access.resolve_identity(&username, &password).await {
        Ok(p) => p,
        Err(e) => return errors::access_error_to_response(e),
    };

    req.extensions_mut()
        .insert(TenantContext::new(principal.tenant_id.clone()));
    req.extensions_mut().insert(PrincipalContext::new(principal));

    next.run(req).await
}

/// Decode `Authorization: Basic base64(username:password)`.
fn extract_basic(headers: &HeaderMap) -> Option<(String, String)> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = header.strip_prefix("Basic ")?.trim();
    let decoded = BASE64.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn decodes_username_and_password() {
        let encoded = BASE64.encode("amina:pa:ss");
        let (u, p) = extract_basic(&headers(&format!("Basic {encoded}"))).unwrap();
        assert_eq!(u, "amina");
        assert_eq!(p, "pa:ss");
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert!(extract_basic(&HeaderMap::new()).is_none());
        assert!(extract_basic(&headers("Bearer abc")).is_none());
        assert!(extract_basic(&headers("Basic !!!")).is_none());
        let no_colon = BASE64.encode("amina");
        assert!(extract_basic(&headers(&format!("Basic {no_colon}"))).is_none());
    }
}
