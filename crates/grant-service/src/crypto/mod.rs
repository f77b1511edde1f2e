//! Canonical token encoding and HMAC signing.
//!
//! A grant token is a version prefix followed by a base64 envelope:
//!
//! ```text
//! token     = "001" || base64url_no_pad( signature || canonical )
//! signature = HMAC-SHA256( secret, canonical )          32 bytes
//! canonical = u16le(len(app_id))       || app_id utf-8
//!          || u16le(len(channel_name)) || channel_name utf-8
//!          || u32le(subject_uid)
//!          || u16le(privilege_count)
//!          || for each privilege, ascending by wire id:
//!                 u16le(wire_id) || u32le(expiry_unix_secs)
//! ```
//!
//! Field order and widths are fixed: verification reproduces the exact
//! byte sequence from the token's cleartext fields before checking the
//! signature, so any drift between the two encoders breaks every token.
//!
//! # Security Properties
//!
//! - The channel name and subject uid are inside the signed payload, so a
//!   token cannot be replayed against another channel or participant.
//! - Signatures are compared in constant time via [`ring::hmac::verify`].
//! - Verification re-encodes the decoded claims rather than trusting the
//!   transmitted bytes; a non-canonical encoding fails the signature check.
//! - Tokens beyond [`MAX_TOKEN_SIZE_BYTES`] are rejected before any base64
//!   or cryptographic work.

use crate::errors::GrantError;
use crate::models::{GrantClaims, Privilege, Verdict};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use ring::hmac;
use secrecy::{ExposeSecret, SecretString};
use std::collections::BTreeMap;

/// Version prefix of the token envelope.
pub const TOKEN_VERSION: &str = "001";

/// Maximum accepted token length in bytes.
///
/// A well-formed token is a few hundred bytes; anything larger is rejected
/// before decoding so oversized inputs cannot burn CPU or memory.
pub const MAX_TOKEN_SIZE_BYTES: usize = 4096;

/// HMAC-SHA256 output length.
const SIGNATURE_LEN: usize = 32;

/// Reduce claims to their canonical byte sequence.
///
/// # Errors
///
/// Returns `InvalidInput` if a string field exceeds the u16 length prefix.
pub fn canonical_bytes(claims: &GrantClaims) -> Result<Vec<u8>, GrantError> {
    let mut buf = Vec::with_capacity(
        4 + claims.app_id.len() + claims.channel_name.len() + 2 + 4 + claims.privileges.len() * 6,
    );

    push_str_field(&mut buf, &claims.app_id, "app_id")?;
    push_str_field(&mut buf, &claims.channel_name, "channel_name")?;
    buf.extend_from_slice(&claims.subject_uid.to_le_bytes());

    let count = u16::try_from(claims.privileges.len())
        .map_err(|_| GrantError::InvalidInput("too many privileges".to_string()))?;
    buf.extend_from_slice(&count.to_le_bytes());

    // BTreeMap iterates in Privilege order, which matches wire id order.
    for (privilege, expiry) in &claims.privileges {
        buf.extend_from_slice(&privilege.wire_id().to_le_bytes());
        buf.extend_from_slice(&expiry.to_le_bytes());
    }

    Ok(buf)
}

fn push_str_field(buf: &mut Vec<u8>, field: &str, name: &'static str) -> Result<(), GrantError> {
    let len = u16::try_from(field.len())
        .map_err(|_| GrantError::InvalidInput(format!("{name} exceeds {} bytes", u16::MAX)))?;
    buf.extend_from_slice(&len.to_le_bytes());
    buf.extend_from_slice(field.as_bytes());
    Ok(())
}

/// Sign claims and package them into an opaque token string.
///
/// # Errors
///
/// Returns `SigningFailure` if the secret is empty, or `InvalidInput` if
/// the claims cannot be canonically encoded.
pub fn sign_claims(claims: &GrantClaims, secret: &SecretString) -> Result<String, GrantError> {
    let secret_bytes = secret.expose_secret().as_bytes();
    if secret_bytes.is_empty() {
        return Err(GrantError::SigningFailure(
            "signing secret is empty".to_string(),
        ));
    }

    let canonical = canonical_bytes(claims)?;
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret_bytes);
    let tag = hmac::sign(&key, &canonical);

    let mut envelope = Vec::with_capacity(SIGNATURE_LEN + canonical.len());
    envelope.extend_from_slice(tag.as_ref());
    envelope.extend_from_slice(&canonical);

    Ok(format!("{TOKEN_VERSION}{}", URL_SAFE_NO_PAD.encode(envelope)))
}

/// A token split back into its transmitted signature and cleartext claims.
pub(crate) struct DecodedToken {
    pub signature: Vec<u8>,
    pub claims: GrantClaims,
}

/// Decode a token envelope without verifying it.
///
/// Returns `None` for any malformed input: wrong version, bad base64, a
/// truncated field, an unknown privilege id, or trailing bytes.
pub(crate) fn decode_token(token: &str) -> Option<DecodedToken> {
    if token.len() > MAX_TOKEN_SIZE_BYTES {
        return None;
    }

    let encoded = token.strip_prefix(TOKEN_VERSION)?;
    let envelope = URL_SAFE_NO_PAD.decode(encoded).ok()?;

    let signature = envelope.get(..SIGNATURE_LEN)?.to_vec();
    let canonical = envelope.get(SIGNATURE_LEN..)?;

    let mut pos = 0usize;
    let app_id = read_str(canonical, &mut pos)?;
    let channel_name = read_str(canonical, &mut pos)?;
    let subject_uid = read_u32(canonical, &mut pos)?;

    let count = read_u16(canonical, &mut pos)?;
    let mut privileges = BTreeMap::new();
    for _ in 0..count {
        let kind = Privilege::from_wire_id(read_u16(canonical, &mut pos)?)?;
        let expiry = read_u32(canonical, &mut pos)?;
        privileges.insert(kind, expiry);
    }

    if pos != canonical.len() {
        return None;
    }

    Some(DecodedToken {
        signature,
        claims: GrantClaims {
            app_id,
            channel_name,
            subject_uid,
            privileges,
        },
    })
}

/// Verify a token against a required privilege at time `now` (unix seconds).
///
/// The canonical bytes are recomputed from the decoded cleartext fields and
/// the signature compared in constant time. A malformed token verifies as
/// [`Verdict::BadSignature`]; a privilege the grant never carried verifies
/// as [`Verdict::Expired`] (absent is treated as expiry 0).
#[must_use]
pub fn verify_token(token: &str, required: Privilege, secret: &SecretString, now: i64) -> Verdict {
    let Some(decoded) = decode_token(token) else {
        return Verdict::BadSignature;
    };

    let Ok(canonical) = canonical_bytes(&decoded.claims) else {
        return Verdict::BadSignature;
    };

    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.expose_secret().as_bytes());
    if hmac::verify(&key, &canonical, &decoded.signature).is_err() {
        return Verdict::BadSignature;
    }

    let expiry = decoded
        .claims
        .privileges
        .get(&required)
        .copied()
        .unwrap_or(0);

    if i64::from(expiry) <= now {
        Verdict::Expired
    } else {
        Verdict::Valid
    }
}

fn read_u16(buf: &[u8], pos: &mut usize) -> Option<u16> {
    let bytes = buf.get(*pos..pos.checked_add(2)?)?;
    *pos += 2;
    Some(u16::from_le_bytes(bytes.try_into().ok()?))
}

fn read_u32(buf: &[u8], pos: &mut usize) -> Option<u32> {
    let bytes = buf.get(*pos..pos.checked_add(4)?)?;
    *pos += 4;
    Some(u32::from_le_bytes(bytes.try_into().ok()?))
}

fn read_str(buf: &[u8], pos: &mut usize) -> Option<String> {
    let len = usize::from(read_u16(buf, pos)?);
    let bytes = buf.get(*pos..pos.checked_add(len)?)?;
    *pos += len;
    String::from_utf8(bytes.to_vec()).ok()
}
