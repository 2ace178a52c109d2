//! Pure JWT claim inspection.
//!
//! The client holds no signing key: claims are inspected to drive UI state
//! (expiry, role gating), never trusted for authorization - the backend
//! enforces authenticity on every call. Signature validation is therefore
//! disabled and only the claim payload is read.

use std::collections::HashSet;

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Claim carrying the user's role memberships
const GROUPS_CLAIM: &str = "groups";

#[derive(Error, Debug)]
#[error("Malformed token: {0}")]
pub struct DecodeError(#[from] jsonwebtoken::errors::Error);

#[derive(Debug, Deserialize)]
struct RawClaims {
    exp: i64,
    #[serde(default)]
    groups: Vec<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Claims extracted from an access token. Derived on demand, never stored.
#[derive(Debug, Clone)]
pub struct DecodedToken {
    /// Expiry as unix seconds
    pub expires_at: i64,
    /// Raw role strings from the groups claim (may validly be empty)
    pub groups: Vec<String>,
    /// Remaining claims, untyped
    pub claims: Map<String, Value>,
}

impl DecodedToken {
    /// Role memberships mapped onto the closed role set; unknown group
    /// strings are dropped.
    pub fn roles(&self) -> HashSet<Role> {
        self.groups
            .iter()
            .filter_map(|g| match Role::from_group(g) {
                Role::Unknown => None,
                role => Some(role),
            })
            .collect()
    }
}

/// Role memberships a credential may carry. A user may hold several; no
/// precedence between them is implied anywhere in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Doctor,
    Staff,
    Patient,
    Unknown,
}

impl Role {
    pub fn from_group(group: &str) -> Self {
        match group {
            "doctor" => Role::Doctor,
            "staff" => Role::Staff,
            "patient" => Role::Patient,
            _ => Role::Unknown,
        }
    }
}

/// Decode a token's claims without verifying its signature.
///
/// Fails on malformed input, a missing expiry claim, or a non-numeric
/// expiry. A missing groups claim is not an error - a token may validly
/// carry zero roles.
pub fn decode(token: &str) -> Result<DecodedToken, DecodeError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    // Expiry is checked by `is_valid` against a caller-supplied clock so an
    // expired token still yields its claims.
    validation.validate_exp = false;
    validation.validate_aud = false;

    let data = jsonwebtoken::decode::<RawClaims>(token, &DecodingKey::from_secret(&[]), &validation)?;

    let mut claims = data.claims.extra;
    claims.remove(GROUPS_CLAIM);
    Ok(DecodedToken {
        expires_at: data.claims.exp,
        groups: data.claims.groups,
        claims,
    })
}

/// True iff the token decodes and expires strictly after `now` (unix
/// seconds). A token expiring exactly at `now` is already expired; a token
/// that fails to decode is invalid, never "valid forever".
pub fn is_valid(token: &str, now: i64) -> bool {
    match decode(token) {
        Ok(decoded) => decoded.expires_at > now,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    use super::*;

    fn make_token(claims: &Value) -> String {
        encode(&Header::default(), claims, &EncodingKey::from_secret(b"test"))
            .expect("Failed to encode test token")
    }

    #[test]
    fn decodes_expiry_and_groups() {
        let token = make_token(&json!({
            "exp": 2_000_000_000i64,
            "groups": ["doctor", "staff"],
            "sub": "RSSMRA80A01H501U",
        }));

        let decoded = decode(&token).unwrap();
        assert_eq!(decoded.expires_at, 2_000_000_000);
        assert_eq!(decoded.groups, vec!["doctor", "staff"]);
        assert_eq!(decoded.claims["sub"], json!("RSSMRA80A01H501U"));
    }

    #[test]
    fn missing_groups_claim_is_empty_set() {
        let token = make_token(&json!({ "exp": 2_000_000_000i64 }));
        let decoded = decode(&token).unwrap();
        assert!(decoded.groups.is_empty());
        assert!(decoded.roles().is_empty());
    }

    #[test]
    fn missing_expiry_claim_is_an_error() {
        let token = make_token(&json!({ "groups": ["doctor"] }));
        assert!(decode(&token).is_err());
    }

    #[test]
    fn non_numeric_expiry_is_an_error() {
        let token = make_token(&json!({ "exp": "tomorrow" }));
        assert!(decode(&token).is_err());
    }

    #[test]
    fn malformed_strings_fail_decode_and_validity() {
        for garbage in ["", "not-a-jwt", "a.b", "a.b.c", "!!!.???.###"] {
            assert!(decode(garbage).is_err(), "decoded: {garbage:?}");
            assert!(!is_valid(garbage, 0));
        }
    }

    #[test]
    fn expiry_boundary_is_strict() {
        let now = 1_700_000_000i64;
        let at = |exp: i64| make_token(&json!({ "exp": exp }));

        assert!(is_valid(&at(now + 1), now));
        assert!(!is_valid(&at(now), now), "exp == now must count as expired");
        assert!(!is_valid(&at(now - 1), now));
        assert!(!is_valid(&at(0), now));
        assert!(!is_valid(&at(-1), now));
    }

    #[test]
    fn expired_token_still_exposes_roles() {
        // Decode and expiry are independent checks
        let now = 1_700_000_000i64;
        let token = make_token(&json!({ "exp": now - 1, "groups": ["doctor", "staff"] }));

        assert!(!is_valid(&token, now));
        let roles = decode(&token).unwrap().roles();
        assert_eq!(roles, HashSet::from([Role::Doctor, Role::Staff]));
    }

    #[test]
    fn unknown_group_strings_are_ignored() {
        let token = make_token(&json!({
            "exp": 2_000_000_000i64,
            "groups": ["doctor", "janitor", ""],
        }));
        let roles = decode(&token).unwrap().roles();
        assert_eq!(roles, HashSet::from([Role::Doctor]));
    }
}
