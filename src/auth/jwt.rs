use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::model::{AuthError, Claims};

/// HS256 verifier for access tokens signed with the project's JWT secret.
#[derive(Clone)]
pub struct JwtVerifier {
    decoding: DecodingKey,
    encoding: EncodingKey,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            encoding: EncodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Validate and decode a token
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Audience differs per project and is not a trust boundary here.
        validation.validate_aud = false;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::SessionExpired,
                _ => {
                    log::warn!("Token validation failed: {:?}", e);
                    AuthError::InvalidToken
                }
            })
    }

    /// Sign a token for `sub` that expires `ttl_secs` from now (negative for already expired).
    pub fn issue(&self, sub: &str, ttl_secs: i64) -> Result<String, AuthError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: sub.to_string(),
            exp: (now + ttl_secs).max(0) as usize,
            iat: now as usize,
            email: None,
            role: Some("authenticated".to_string()),
            aud: Some("authenticated".to_string()),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(AuthError::Issue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_validate() {
        let verifier = JwtVerifier::new("test-secret");
        let token = verifier.issue("4f1c7e0a-0000-0000-0000-000000000001", 300).unwrap();
        let claims = verifier.validate(&token).unwrap();
        assert_eq!(claims.sub, "4f1c7e0a-0000-0000-0000-000000000001");
        assert!(claims.user_id().is_some());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_is_session_expired() {
        let verifier = JwtVerifier::new("test-secret");
        let token = verifier.issue("user", -3600).unwrap();
        assert!(matches!(verifier.validate(&token), Err(AuthError::SessionExpired)));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = JwtVerifier::new("one").issue("user", 300).unwrap();
        assert!(matches!(
            JwtVerifier::new("two").validate(&token),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(
            JwtVerifier::new("one").validate("invalid.token.here"),
            Err(AuthError::InvalidToken)
        ));
    }
}
