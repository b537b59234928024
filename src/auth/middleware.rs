use actix_web::{HttpMessage, HttpRequest};

use super::jwt::JwtVerifier;
use super::model::{AuthError, Claims};

/// Extract token from Authorization header
fn extract_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Validate token from HttpRequest and return claims.
///
/// The claims are also stored in the request extensions.
pub fn validate_request_token(req: &HttpRequest, verifier: &JwtVerifier) -> Result<Claims, AuthError> {
    let token = extract_token(req).ok_or(AuthError::MissingToken)?;
    let claims = verifier.validate(token)?;
    req.extensions_mut().insert(claims.clone());
    Ok(claims)
}

/// Extension trait for requests to get the caller's claims
pub trait ClaimsExt {
    fn claims(&self) -> Option<Claims>;
}

impl<T: HttpMessage> ClaimsExt for T {
    fn claims(&self) -> Option<Claims> {
        self.extensions().get::<Claims>().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_missing_and_malformed_header() {
        let verifier = JwtVerifier::new("secret");
        let req = TestRequest::default().to_http_request();
        assert!(matches!(
            validate_request_token(&req, &verifier),
            Err(AuthError::MissingToken)
        ));

        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic abc"))
            .to_http_request();
        assert!(matches!(
            validate_request_token(&req, &verifier),
            Err(AuthError::MissingToken)
        ));
    }

    #[test]
    fn test_valid_token_stores_claims() {
        let verifier = JwtVerifier::new("secret");
        let token = verifier.issue("user-1", 60).unwrap();
        let req = TestRequest::default()
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_http_request();
        let claims = validate_request_token(&req, &verifier).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(req.claims().map(|c| c.sub), Some("user-1".to_string()));
    }
}
