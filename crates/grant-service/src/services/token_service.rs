//! Grant issuance and verification.

use crate::config::GrantConfig;
use crate::crypto;
use crate::errors::GrantError;
use crate::models::{GrantClaims, GrantRequest, IssuedGrant, Privilege, Role, Verdict};
use crate::observability::metrics::{record_grant_issued, record_token_verification};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Issues channel grants for a single tenant.
///
/// The issuer holds no state beyond its configuration; every call is
/// independent and the type is freely shareable across threads.
pub struct GrantIssuer {
    config: GrantConfig,
}

impl GrantIssuer {
    #[must_use]
    pub fn new(config: GrantConfig) -> Self {
        Self { config }
    }

    /// Issue a grant valid from now.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty channel name or non-positive
    /// TTL, and `SigningFailure` if the signing secret is unusable.
    pub fn issue(&self, request: &GrantRequest) -> Result<IssuedGrant, GrantError> {
        self.issue_at(request, Utc::now())
    }

    /// Issue a grant using an explicit clock.
    ///
    /// For a fixed `now`, issuance is fully deterministic: the same request
    /// always produces byte-identical tokens.
    ///
    /// # Errors
    ///
    /// Same conditions as [`GrantIssuer::issue`].
    #[instrument(skip_all, fields(channel = %request.channel_name))]
    pub fn issue_at(
        &self,
        request: &GrantRequest,
        now: DateTime<Utc>,
    ) -> Result<IssuedGrant, GrantError> {
        let result = self.build_grant(request, now);

        match &result {
            Ok(grant) => {
                record_grant_issued("success");
                debug!(
                    target: "grant.issuer",
                    channel = %grant.channel_name,
                    subject_uid = grant.subject_uid,
                    expires_at = grant.expires_at,
                    "issued channel grant"
                );
            }
            Err(err) => {
                record_grant_issued("error");
                debug!(
                    target: "grant.issuer",
                    code = err.code(),
                    "grant issuance rejected"
                );
            }
        }

        result
    }

    /// Verify a token against a required privilege using this issuer's
    /// secret.
    #[must_use]
    pub fn verify(&self, token: &str, required: Privilege, now: DateTime<Utc>) -> Verdict {
        let verdict =
            crypto::verify_token(token, required, &self.config.signing_secret, now.timestamp());
        record_token_verification(verdict.as_str());
        verdict
    }

    fn build_grant(
        &self,
        request: &GrantRequest,
        now: DateTime<Utc>,
    ) -> Result<IssuedGrant, GrantError> {
        if request.channel_name.is_empty() {
            return Err(GrantError::InvalidInput(
                "channel_name is required".to_string(),
            ));
        }

        let ttl_secs = request.ttl_secs.unwrap_or(self.config.token_ttl_secs);
        if ttl_secs == 0 {
            return Err(GrantError::InvalidInput(
                "ttl_secs must be positive".to_string(),
            ));
        }
        let ttl = i64::try_from(ttl_secs)
            .map_err(|_| GrantError::InvalidInput("ttl_secs out of range".to_string()))?;

        let subject_uid = request.subject_uid.unwrap_or(0);
        let role = request
            .role
            .as_deref()
            .map_or(Role::Subscriber, Role::from_request);

        let expires_at = now.timestamp().saturating_add(ttl);
        let expiry = u32::try_from(expires_at)
            .map_err(|_| GrantError::InvalidInput("expiry timestamp out of range".to_string()))?;

        let privileges: BTreeMap<Privilege, u32> = role
            .privileges()
            .iter()
            .map(|privilege| (*privilege, expiry))
            .collect();

        let claims = GrantClaims {
            app_id: self.config.app_id.clone(),
            channel_name: request.channel_name.clone(),
            subject_uid,
            privileges,
        };

        let token = crypto::sign_claims(&claims, &self.config.signing_secret)?;

        Ok(IssuedGrant {
            token,
            app_id: self.config.app_id.clone(),
            channel_name: request.channel_name.clone(),
            subject_uid,
            expires_at,
        })
    }
}
