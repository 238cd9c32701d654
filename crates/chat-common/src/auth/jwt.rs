//! JWT utilities for authentication
//!
//! HS256 access tokens whose `sub` claim is the opaque user identity.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Token type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user identity)
    pub sub: String,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token type; tokens minted elsewhere may omit it and count as access tokens
    #[serde(default = "default_token_type")]
    pub token_type: TokenType,
}

fn default_token_type() -> TokenType {
    TokenType::Access
}

impl Claims {
    /// Check if this is an access token
    #[must_use]
    pub fn is_access_token(&self) -> bool {
        self.token_type == TokenType::Access
    }
}

/// JWT service for issuing and verifying tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry: i64,
}

impl JwtService {
    /// Create a new JWT service with the given secret and access token lifetime (seconds)
    #[must_use]
    pub fn new(secret: &str, access_token_expiry: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expiry,
        }
    }

    /// Issue an access token for a user
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue_access_token(&self, user_id: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.access_token_expiry)).timestamp(),
            token_type: TokenType::Access,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to encode JWT")))
    }

    /// Decode and validate a JWT token
    ///
    /// # Errors
    /// Returns an error if the token is invalid or expired
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let validation = Validation::default();

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            }
        })?;

        Ok(token_data.claims)
    }

    /// Verify an access token and return its subject
    ///
    /// # Errors
    /// Returns an error if the token is invalid, expired, not an access token,
    /// or carries an empty subject
    pub fn verify(&self, token: &str) -> Result<String, AppError> {
        let claims = self.decode_token(token)?;

        if !claims.is_access_token() || claims.sub.is_empty() {
            return Err(AppError::InvalidToken);
        }

        Ok(claims.sub)
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_expiry", &self.access_token_expiry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-that-is-long-enough";

    fn create_test_service() -> JwtService {
        JwtService::new(SECRET, 900)
    }

    fn encode_claims(claims: &Claims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let service = create_test_service();

        let token = service.issue_access_token("alice").unwrap();
        assert_eq!(service.verify(&token).unwrap(), "alice");
    }

    #[test]
    fn test_invalid_token() {
        let service = create_test_service();

        let result = service.verify("invalid.token.here");
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_wrong_secret() {
        let token = JwtService::new("another-secret", 900)
            .issue_access_token("alice")
            .unwrap();

        let result = create_test_service().verify(&token);
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_expired_token() {
        let now = Utc::now().timestamp();
        let token = encode_claims(&Claims {
            sub: "alice".to_string(),
            iat: now - 7200,
            exp: now - 3600,
            token_type: TokenType::Access,
        });

        let result = create_test_service().verify(&token);
        assert!(matches!(result, Err(AppError::TokenExpired)));
    }

    #[test]
    fn test_refresh_token_rejected() {
        let now = Utc::now().timestamp();
        let token = encode_claims(&Claims {
            sub: "alice".to_string(),
            iat: now,
            exp: now + 600,
            token_type: TokenType::Refresh,
        });

        let result = create_test_service().verify(&token);
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_token_without_type_is_access() {
        #[derive(Serialize)]
        struct Bare<'a> {
            sub: &'a str,
            exp: i64,
        }

        let token = encode(
            &Header::default(),
            &Bare {
                sub: "bob",
                exp: Utc::now().timestamp() + 600,
            },
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(create_test_service().verify(&token).unwrap(), "bob");
    }
}
