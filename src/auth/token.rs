// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token issuance and validation (HMAC-signed JWT).
//!
//! The signing secret is read once at startup and handed to
//! [`TokenService::new`]. The service is immutable afterwards and is shared
//! between requests behind an `Arc`.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{
    decode, decode_header, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use uuid::Uuid;

use super::claims::{TokenClaims, ValidatedToken};
use super::AuthError;

/// Algorithm used for every token this server issues.
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Clone)]
struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Issues and validates bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    keys: Option<SigningKeys>,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("configured", &self.keys.is_some())
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenService {
    /// Create a token service.
    ///
    /// A missing or empty secret is accepted here; issuing or validating a
    /// token then fails with [`AuthError::MissingSigningKey`].
    pub fn new(secret: Option<&str>, ttl: Duration) -> Self {
        let keys = secret.filter(|s| !s.is_empty()).map(|s| SigningKeys {
            encoding: EncodingKey::from_secret(s.as_bytes()),
            decoding: DecodingKey::from_secret(s.as_bytes()),
        });
        Self { keys, ttl }
    }

    /// Create a token service with the default one hour TTL.
    #[cfg(test)]
    pub(crate) fn with_secret(secret: &str) -> Self {
        Self::new(Some(secret), crate::config::DEFAULT_TOKEN_TTL)
    }

    pub fn is_configured(&self) -> bool {
        self.keys.is_some()
    }

    #[cfg(test)]
    pub(crate) fn ttl(&self) -> Duration {
        self.ttl
    }

    fn keys(&self) -> Result<&SigningKeys, AuthError> {
        self.keys.as_ref().ok_or(AuthError::MissingSigningKey)
    }

    /// Mint a new token for `principal`, valid for the configured TTL.
    pub fn issue(&self, principal: Uuid) -> Result<String, AuthError> {
        let exp = i64::try_from(self.ttl.as_secs())
            .ok()
            .and_then(|ttl| Utc::now().timestamp().checked_add(ttl))
            .ok_or_else(|| {
                AuthError::InternalError(format!("token TTL {:?} is out of range", self.ttl))
            })?;
        let token = self.sign(&TokenClaims::for_principal(principal, exp))?;
        tracing::debug!(%principal, exp, "Issued bearer token");
        Ok(token)
    }

    /// Sign arbitrary claims with the server secret.
    pub fn sign(&self, claims: &TokenClaims) -> Result<String, AuthError> {
        let keys = self.keys()?;
        encode(&Header::new(SIGNING_ALGORITHM), claims, &keys.encoding)
            .map_err(|e| AuthError::InternalError(format!("failed to sign token: {e}")))
    }

    /// Verify algorithm, signature and expiry of a token.
    ///
    /// Only the HMAC family is accepted. Any other algorithm in the header is
    /// rejected before the signature is looked at.
    pub fn validate(&self, token: &str) -> Result<ValidatedToken, AuthError> {
        let keys = self.keys()?;

        let header = decode_header(token).map_err(|_| AuthError::MalformedToken)?;
        if !is_hmac(header.alg) {
            return Err(AuthError::UnsupportedAlgorithm(format!("{:?}", header.alg)));
        }

        let mut validation = Validation::new(header.alg);
        validation.leeway = 0;
        validation.validate_aud = false;

        let data = decode::<TokenClaims>(token, &keys.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidAlgorithm => {
                    AuthError::UnsupportedAlgorithm(format!("{:?}", header.alg))
                }
                ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => {
                    AuthError::InvalidClaims(e.to_string())
                }
                _ => AuthError::MalformedToken,
            }
        })?;

        // A token is dead at its exp instant, not one second after.
        if Utc::now().timestamp() >= data.claims.exp {
            return Err(AuthError::TokenExpired);
        }

        Ok(ValidatedToken {
            raw: token.to_string(),
            claims: data.claims,
        })
    }

    /// Resolve the principal carried by a validated token.
    pub fn extract_principal(token: &ValidatedToken) -> Result<Uuid, AuthError> {
        let raw = token
            .claims
            .principal
            .as_deref()
            .ok_or_else(|| AuthError::InvalidPrincipal("claim is missing".to_string()))?;

        Uuid::parse_str(raw)
            .map_err(|e| AuthError::InvalidPrincipal(format!("failed to parse UUID {raw:?}: {e}")))
    }
}

fn is_hmac(alg: Algorithm) -> bool {
    matches!(alg, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TOKEN_TTL;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    const SECRET: &str = "test-secret-key-that-is-at-least-32-chars";

    fn service() -> TokenService {
        TokenService::with_secret(SECRET)
    }

    fn now() -> i64 {
        Utc::now().timestamp()
    }

    /// Re-assemble a token with a different header, keeping payload and signature.
    fn with_header(token: &str, header_json: &str) -> String {
        let mut parts = token.splitn(3, '.');
        let _ = parts.next();
        let payload = parts.next().unwrap();
        let signature = parts.next().unwrap();
        format!("{}.{payload}.{signature}", URL_SAFE_NO_PAD.encode(header_json))
    }

    #[test]
    fn issued_token_validates_and_yields_principal() {
        let service = service();
        let principal = Uuid::new_v4();

        let token = service.issue(principal).expect("should issue token");
        let validated = service.validate(&token).expect("should validate token");

        assert!(validated.claims.authorized);
        assert_eq!(TokenService::extract_principal(&validated).unwrap(), principal);
        assert_eq!(validated.raw, token);
    }

    #[test]
    fn expiry_is_now_plus_ttl() {
        let service = TokenService::new(Some(SECRET), Duration::from_secs(900));
        let before = now();
        let token = service.issue(Uuid::new_v4()).unwrap();
        let validated = service.validate(&token).unwrap();

        assert!(validated.claims.exp >= before + 900);
        assert!(validated.claims.exp <= now() + 900);
    }

    #[test]
    fn out_of_range_ttl_fails_issue_instead_of_overflowing() {
        for secs in [u64::MAX, i64::MAX as u64] {
            let service = TokenService::new(Some(SECRET), Duration::from_secs(secs));
            assert!(matches!(
                service.issue(Uuid::new_v4()),
                Err(AuthError::InternalError(_))
            ));
        }
    }

    #[test]
    fn expired_token_is_rejected_even_with_valid_signature() {
        let service = service();
        let claims = TokenClaims::for_principal(Uuid::new_v4(), now() - 10);
        let token = service.sign(&claims).unwrap();

        assert!(matches!(service.validate(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn token_expiring_now_is_rejected() {
        let service = service();
        let claims = TokenClaims::for_principal(Uuid::new_v4(), now());
        let token = service.sign(&claims).unwrap();

        assert!(matches!(service.validate(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let issuer = TokenService::with_secret("secret-one-that-is-32-chars-long");
        let verifier = TokenService::with_secret("secret-two-that-is-32-chars-long");

        let token = issuer.issue(Uuid::new_v4()).unwrap();
        assert!(matches!(verifier.validate(&token), Err(AuthError::InvalidSignature)));
    }

    #[test]
    fn non_hmac_header_is_rejected_before_signature_check() {
        let service = service();
        let token = service.issue(Uuid::new_v4()).unwrap();

        // The signature is left untouched, so a signature check would fail
        // with InvalidSignature rather than UnsupportedAlgorithm.
        let forged = with_header(&token, r#"{"alg":"RS256","typ":"JWT"}"#);
        match service.validate(&forged) {
            Err(AuthError::UnsupportedAlgorithm(alg)) => assert_eq!(alg, "RS256"),
            other => panic!("expected UnsupportedAlgorithm, got {other:?}"),
        }

        let forged = with_header(&token, r#"{"alg":"ES256","typ":"JWT"}"#);
        assert!(matches!(
            service.validate(&forged),
            Err(AuthError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn alg_none_is_rejected() {
        let service = service();
        let token = service.issue(Uuid::new_v4()).unwrap();
        let forged = with_header(&token, r#"{"alg":"none","typ":"JWT"}"#);

        assert!(service.validate(&forged).is_err());
    }

    #[test]
    fn other_hmac_strengths_are_accepted() {
        let service = service();
        let claims = TokenClaims::for_principal(Uuid::new_v4(), now() + 60);
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(service.validate(&token).is_ok());
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            service().validate("invalid.token.here"),
            Err(AuthError::MalformedToken)
        ));
        assert!(matches!(service().validate(""), Err(AuthError::MalformedToken)));
    }

    #[test]
    fn missing_principal_fails_extraction_not_validation() {
        let service = service();
        let claims = TokenClaims {
            authorized: true,
            principal: None,
            exp: now() + 60,
        };
        let token = service.sign(&claims).unwrap();

        let validated = service.validate(&token).expect("signature and expiry are fine");
        assert!(matches!(
            TokenService::extract_principal(&validated),
            Err(AuthError::InvalidPrincipal(_))
        ));
    }

    #[test]
    fn malformed_principal_fails_extraction() {
        let service = service();
        let claims = TokenClaims {
            authorized: true,
            principal: Some("not-a-uuid".to_string()),
            exp: now() + 60,
        };
        let validated = service.validate(&service.sign(&claims).unwrap()).unwrap();

        assert!(matches!(
            TokenService::extract_principal(&validated),
            Err(AuthError::InvalidPrincipal(_))
        ));
    }

    #[test]
    fn unconfigured_service_refuses_to_sign_or_verify() {
        let service = TokenService::new(None, DEFAULT_TOKEN_TTL);
        assert!(!service.is_configured());
        assert!(matches!(
            service.issue(Uuid::new_v4()),
            Err(AuthError::MissingSigningKey)
        ));
        assert!(matches!(
            service.validate("a.b.c"),
            Err(AuthError::MissingSigningKey)
        ));

        let empty = TokenService::new(Some(""), DEFAULT_TOKEN_TTL);
        assert!(!empty.is_configured());
    }
}
