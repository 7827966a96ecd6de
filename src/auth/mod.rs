//! Bearer token authorization for the drink endpoints.
//!
//! Token verification sits behind [`PermissionVerifier`]; the handlers only see the
//! decoded permission set through the [`Authorized`] extractor.

use std::collections::HashSet;
use std::marker::PhantomData;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, StatusCode},
};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::config::AuthConfig;
use crate::errors::AppError;
use crate::AppState;

/// Machine-readable authorization error codes.
pub mod codes {
    pub const HEADER_MISSING: &str = "authorization_header_missing";
    pub const INVALID_HEADER: &str = "invalid_header";
    pub const TOKEN_EXPIRED: &str = "token_expired";
    pub const INVALID_CLAIMS: &str = "invalid_claims";
    pub const UNAUTHORIZED: &str = "unauthorized";
}

/// Failure produced while authorizing a request.
#[derive(Debug, Clone)]
pub struct AuthError {
    pub status: StatusCode,
    pub code: &'static str,
    pub description: String,
}

impl AuthError {
    pub fn new(status: StatusCode, code: &'static str, description: impl Into<String>) -> Self {
        Self {
            status,
            code,
            description: description.into(),
        }
    }

    pub fn forbidden(description: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, codes::UNAUTHORIZED, description)
    }
}

/// Decoded permission set of an authenticated caller.
#[derive(Debug, Clone, Default)]
pub struct Permissions {
    pub subject: Option<String>,
    granted: HashSet<String>,
    unrestricted: bool,
}

impl Permissions {
    pub fn new(subject: Option<String>, granted: impl IntoIterator<Item = String>) -> Self {
        Self {
            subject,
            granted: granted.into_iter().collect(),
            unrestricted: false,
        }
    }

    /// Permission set used when checks are explicitly disabled.
    pub fn unrestricted() -> Self {
        Self {
            unrestricted: true,
            ..Self::default()
        }
    }

    pub fn has(&self, permission: &str) -> bool {
        self.unrestricted || self.granted.contains(permission)
    }
}

/// Turns a raw bearer token into a permission set.
pub trait PermissionVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Permissions, AuthError>;
}

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    permissions: Option<Vec<String>>,
}

/// HS256 JWT verifier reading the `permissions` claim.
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }
}

impl PermissionVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<Permissions, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            tracing::debug!("Token rejected: {}", e);
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::new(
                    StatusCode::UNAUTHORIZED,
                    codes::TOKEN_EXPIRED,
                    "Token expired.",
                ),
                ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => AuthError::new(
                    StatusCode::UNAUTHORIZED,
                    codes::INVALID_CLAIMS,
                    "Incorrect claims. Please, check the audience and issuer.",
                ),
                _ => AuthError::new(
                    StatusCode::BAD_REQUEST,
                    codes::INVALID_HEADER,
                    "Unable to parse authentication token.",
                ),
            }
        })?;

        let permissions = data.claims.permissions.ok_or_else(|| {
            AuthError::new(
                StatusCode::BAD_REQUEST,
                codes::INVALID_CLAIMS,
                "Permissions not included in JWT.",
            )
        })?;

        Ok(Permissions::new(data.claims.sub, permissions))
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AuthError::new(
                StatusCode::UNAUTHORIZED,
                codes::HEADER_MISSING,
                "Authorization header is expected.",
            )
        })?;

    let parts: Vec<&str> = value.split_whitespace().collect();
    match parts.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case("bearer") => Ok(*token),
        [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => Err(AuthError::new(
            StatusCode::UNAUTHORIZED,
            codes::INVALID_HEADER,
            "Authorization header must start with \"Bearer\".",
        )),
        [_] => Err(AuthError::new(
            StatusCode::UNAUTHORIZED,
            codes::INVALID_HEADER,
            "Token not found.",
        )),
        _ => Err(AuthError::new(
            StatusCode::UNAUTHORIZED,
            codes::INVALID_HEADER,
            "Authorization header must be bearer token.",
        )),
    }
}

/// A named permission required by a route.
pub trait Permission {
    const NAME: &'static str;
}

pub struct GetDrinksDetail;
pub struct PostDrinks;
pub struct PatchDrinks;
pub struct DeleteDrinks;

impl Permission for GetDrinksDetail {
    const NAME: &'static str = "get:drinks-detail";
}

impl Permission for PostDrinks {
    const NAME: &'static str = "post:drinks";
}

impl Permission for PatchDrinks {
    const NAME: &'static str = "patch:drinks";
}

impl Permission for DeleteDrinks {
    const NAME: &'static str = "delete:drinks";
}

/// Extractor that only succeeds when the caller holds permission `P`.
///
/// ```ignore
/// pub async fn handler(Authorized { permissions, .. }: Authorized<PostDrinks>) { ... }
/// ```
pub struct Authorized<P> {
    pub permissions: Permissions,
    _permission: PhantomData<P>,
}

impl<P> FromRequestParts<AppState> for Authorized<P>
where
    P: Permission + Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(verifier) = state.verifier.as_ref() else {
            if state.config.auth_disabled {
                return Ok(Self {
                    permissions: Permissions::unrestricted(),
                    _permission: PhantomData,
                });
            }
            tracing::error!(
                permission = P::NAME,
                "Refusing protected request: CLASSROOM_JWT_SECRET is not set"
            );
            return Err(AppError::Config(
                "Token verification is not configured".to_string(),
            ));
        };

        let token = bearer_token(&parts.headers)?;
        let permissions = verifier.verify(token)?;

        if !permissions.has(P::NAME) {
            tracing::info!(
                subject = permissions.subject.as_deref().unwrap_or("-"),
                permission = P::NAME,
                "Permission denied"
            );
            return Err(AuthError::forbidden("Permission not found.").into());
        }

        Ok(Self {
            permissions,
            _permission: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "unit-test-secret";

    fn verifier(audience: Option<&str>) -> JwtVerifier {
        JwtVerifier::new(&AuthConfig {
            jwt_secret: SECRET.to_string(),
            audience: audience.map(str::to_string),
            issuer: None,
        })
    }

    fn token(claims: serde_json::Value) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn exp_in(seconds: i64) -> i64 {
        chrono::Utc::now().timestamp() + seconds
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_ok() {
        let h = headers("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&h).unwrap(), "abc.def.ghi");
        let h = headers("bearer abc");
        assert_eq!(bearer_token(&h).unwrap(), "abc");
    }

    #[test]
    fn test_bearer_token_missing_header() {
        let err = bearer_token(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.code, codes::HEADER_MISSING);
    }

    #[test]
    fn test_bearer_token_malformed() {
        assert_eq!(
            bearer_token(&headers("Basic abc")).unwrap_err().description,
            "Authorization header must start with \"Bearer\"."
        );
        assert_eq!(
            bearer_token(&headers("Bearer")).unwrap_err().description,
            "Token not found."
        );
        assert_eq!(
            bearer_token(&headers("Bearer a b")).unwrap_err().description,
            "Authorization header must be bearer token."
        );
    }

    #[test]
    fn test_verify_reads_permissions() {
        let t = token(json!({
            "sub": "barista|1",
            "exp": exp_in(600),
            "permissions": ["get:drinks-detail", "post:drinks"]
        }));
        let perms = verifier(None).verify(&t).unwrap();
        assert_eq!(perms.subject.as_deref(), Some("barista|1"));
        assert!(perms.has("post:drinks"));
        assert!(!perms.has("delete:drinks"));
    }

    #[test]
    fn test_verify_expired() {
        let t = token(json!({ "exp": exp_in(-3600), "permissions": [] }));
        let err = verifier(None).verify(&t).unwrap_err();
        assert_eq!(err.code, codes::TOKEN_EXPIRED);
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_verify_without_permissions_claim() {
        let t = token(json!({ "exp": exp_in(600) }));
        let err = verifier(None).verify(&t).unwrap_err();
        assert_eq!(err.code, codes::INVALID_CLAIMS);
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_verify_wrong_audience() {
        let t = token(json!({ "exp": exp_in(600), "aud": "other", "permissions": [] }));
        let err = verifier(Some("coffee")).verify(&t).unwrap_err();
        assert_eq!(err.code, codes::INVALID_CLAIMS);
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_verify_garbage_token() {
        let err = verifier(None).verify("not-a-jwt").unwrap_err();
        assert_eq!(err.code, codes::INVALID_HEADER);
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unrestricted_has_everything() {
        assert!(Permissions::unrestricted().has(PatchDrinks::NAME));
        assert!(!Permissions::default().has(PatchDrinks::NAME));
    }
}
