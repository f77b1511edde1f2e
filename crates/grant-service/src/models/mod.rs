//! Grant service models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A capability carried by a channel grant, each with its own expiry.
///
/// Declaration order matches wire id order, so `BTreeMap<Privilege, _>`
/// iteration yields ascending wire ids; the canonical encoding relies on
/// this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Privilege {
    /// Join the channel as a participant.
    JoinChannel,

    /// Publish an audio stream into the channel.
    PublishAudioStream,

    /// Publish a video stream into the channel.
    PublishVideoStream,

    /// Publish a data stream into the channel.
    PublishDataStream,
}

impl Privilege {
    /// Every privilege kind, in wire id order.
    pub const ALL: [Privilege; 4] = [
        Privilege::JoinChannel,
        Privilege::PublishAudioStream,
        Privilege::PublishVideoStream,
        Privilege::PublishDataStream,
    ];

    /// Fixed id used in the canonical token encoding.
    #[must_use]
    pub fn wire_id(self) -> u16 {
        match self {
            Privilege::JoinChannel => 1,
            Privilege::PublishAudioStream => 2,
            Privilege::PublishVideoStream => 3,
            Privilege::PublishDataStream => 4,
        }
    }

    /// Inverse of [`Privilege::wire_id`]. Unknown ids decode to `None`.
    #[must_use]
    pub fn from_wire_id(id: u16) -> Option<Self> {
        match id {
            1 => Some(Privilege::JoinChannel),
            2 => Some(Privilege::PublishAudioStream),
            3 => Some(Privilege::PublishVideoStream),
            4 => Some(Privilege::PublishDataStream),
            _ => None,
        }
    }

    /// Returns the string representation of the privilege.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Privilege::JoinChannel => "join_channel",
            Privilege::PublishAudioStream => "publish_audio_stream",
            Privilege::PublishVideoStream => "publish_video_stream",
            Privilege::PublishDataStream => "publish_data_stream",
        }
    }
}

/// A named bundle of privileges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// May join and publish audio, video, and data streams.
    Publisher,

    /// May join only.
    Subscriber,
}

impl Role {
    /// Parse a caller-supplied role string.
    ///
    /// Anything other than `"publisher"` degrades to [`Role::Subscriber`],
    /// the least-privileged role.
    #[must_use]
    pub fn from_request(value: &str) -> Self {
        if value == "publisher" {
            Role::Publisher
        } else {
            Role::Subscriber
        }
    }

    /// The privileges this role grants.
    #[must_use]
    pub fn privileges(self) -> &'static [Privilege] {
        match self {
            Role::Publisher => &Privilege::ALL,
            Role::Subscriber => &[Privilege::JoinChannel],
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Publisher => "publisher",
            Role::Subscriber => "subscriber",
        }
    }
}

/// Cleartext fields of a channel grant.
///
/// These are exactly the fields covered by the signature; issuance and
/// verification both reduce them to the same canonical byte sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantClaims {
    /// Issuing tenant.
    pub app_id: String,

    /// Scope of the grant.
    pub channel_name: String,

    /// Joining participant; 0 means "assign on join".
    pub subject_uid: u32,

    /// Privilege kind → absolute expiry (unix seconds).
    pub privileges: BTreeMap<Privilege, u32>,
}

/// Parameters for issuing a grant.
#[derive(Debug, Clone, Deserialize)]
pub struct GrantRequest {
    /// Channel the grant is scoped to. Required, non-empty.
    pub channel_name: String,

    /// Participant uid; defaults to 0 (assign on join).
    #[serde(default)]
    pub subject_uid: Option<u32>,

    /// Requested role string; unknown values degrade to subscriber.
    #[serde(default)]
    pub role: Option<String>,

    /// Validity window in seconds; defaults to the configured TTL.
    #[serde(default)]
    pub ttl_secs: Option<u64>,
}

/// A freshly issued grant, echoing the bound fields for convenience.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedGrant {
    /// Opaque signed token.
    pub token: String,

    /// Issuing tenant.
    pub app_id: String,

    /// Channel the grant is scoped to.
    pub channel_name: String,

    /// Participant uid bound into the token.
    pub subject_uid: u32,

    /// Cleartext expiry (unix seconds) of every granted privilege.
    pub expires_at: i64,
}

/// Outcome of verifying a token against a required privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Signature matches and the required privilege has not expired.
    Valid,

    /// Signature matches but the required privilege is past its expiry
    /// (or was never granted).
    Expired,

    /// The recomputed signature does not match, or the token is malformed.
    BadSignature,
}

impl Verdict {
    /// Returns the string representation of the verdict.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Valid => "valid",
            Verdict::Expired => "expired",
            Verdict::BadSignature => "bad_signature",
        }
    }
}
