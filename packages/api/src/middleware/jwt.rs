use axum::{
    body::Body,
    extract::{Request, State},
    http::header::{AUTHORIZATION, COOKIE},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, AuthorizationError},
    permission::{Principal, Role},
    state::AppState,
};

/// Claims carried by the storefront's bearer tokens. Issuance happens in the
/// external auth surface; this service only verifies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub role: Role,
    pub exp: usize,
}

/// Identity attached to every request by the middleware. Handlers decide
/// whether anonymous access is acceptable; the middleware never rejects a
/// request for merely lacking a token.
#[derive(Debug, Clone)]
pub enum AppUser {
    Authenticated(Principal),
    Unauthorized,
}

impl AppUser {
    pub fn principal(&self) -> Result<&Principal, ApiError> {
        match self {
            AppUser::Authenticated(principal) => Ok(principal),
            AppUser::Unauthorized => Err(ApiError::unauthorized("Authentication required")),
        }
    }

    pub fn sub(&self) -> Result<String, ApiError> {
        Ok(self.principal()?.sub.clone())
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, AppUser::Authenticated(p) if p.role.is_admin())
    }
}

pub fn decode_token(secret: &str, token: &str) -> Result<TokenClaims, ApiError> {
    let data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;
    Ok(data.claims)
}

/// Pulls the token out of a `Cookie` header value (`token=<jwt>`).
fn token_from_cookie_header(header: &str) -> Option<&str> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix("token="))
        .filter(|token| !token.is_empty())
}

/// The bearer credential for a request: `Authorization` header first, the
/// `token` cookie as fallback.
fn extract_token(request: &Request) -> Option<String> {
    if let Some(auth_header) = request.headers().get(AUTHORIZATION)
        && let Ok(value) = auth_header.to_str()
    {
        let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
        if !token.is_empty() {
            return Some(token.to_string());
        }
    }

    if let Some(cookie_header) = request.headers().get(COOKIE)
        && let Ok(value) = cookie_header.to_str()
        && let Some(token) = token_from_cookie_header(value)
    {
        return Some(token.trim().to_string());
    }

    None
}

pub async fn jwt_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response<Body>, AuthorizationError> {
    let mut request = request;

    if let Some(token) = extract_token(&request) {
        let claims = state.validate_token(&token)?;
        let user = AppUser::Authenticated(Principal {
            sub: claims.sub,
            role: claims.role,
        });
        request.extensions_mut().insert::<AppUser>(user);
        return Ok(next.run(request).await);
    }

    request
        .extensions_mut()
        .insert::<AppUser>(AppUser::Unauthorized);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn token_for(sub: &str, role: Role, secret: &str) -> String {
        let claims = TokenClaims {
            sub: sub.to_string(),
            role,
            exp: usize::MAX,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn cookie_header_parsing_finds_the_token() {
        assert_eq!(
            token_from_cookie_header("token=abc.def.ghi"),
            Some("abc.def.ghi")
        );
        assert_eq!(
            token_from_cookie_header("theme=dark; token=abc; lang=en"),
            Some("abc")
        );
        assert_eq!(token_from_cookie_header("theme=dark"), None);
        assert_eq!(token_from_cookie_header("token="), None);
    }

    #[test]
    fn decode_roundtrip_preserves_claims() {
        let token = token_for("user-1", Role::Admin, "s3cret");
        let claims = decode_token("s3cret", &token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn decode_rejects_wrong_secret() {
        let token = token_for("user-1", Role::Customer, "s3cret");
        let err = decode_token("other", &token).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn header_takes_precedence_over_cookie() {
        let mut request = axum::http::Request::builder()
            .header(AUTHORIZATION, "Bearer header-token")
            .header(COOKIE, "token=cookie-token")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract_token(&request), Some("header-token".to_string()));

        request.headers_mut().remove(AUTHORIZATION);
        assert_eq!(extract_token(&request), Some("cookie-token".to_string()));
    }

    #[test]
    fn unauthorized_user_has_no_sub() {
        let user = AppUser::Unauthorized;
        assert!(user.sub().is_err());
        assert!(!user.is_admin());
    }
}
