//! Inquiry review status.

use serde::{Deserialize, Serialize};

/// Review status of a wholesale inquiry.
///
/// The only legal transition is `Pending` -> `Approved`. Stored in the
/// `wholesale.inquiry_status` enum column; queries cast it to text and go
/// through [`std::str::FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InquiryStatus {
    /// Submitted, awaiting review.
    #[default]
    Pending,
    /// Approved; the customer has been provisioned remotely.
    Approved,
}

/// Error returned when parsing an unknown status string.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid inquiry status: {0}")]
pub struct InquiryStatusError(pub String);

impl InquiryStatus {
    /// Wire/database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
        }
    }

    /// Whether an approval may still be applied.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Whether moving from `self` to `next` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!((self, next), (Self::Pending, Self::Approved))
    }
}

impl std::fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InquiryStatus {
    type Err = InquiryStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "APPROVED" => Ok(Self::Approved),
            _ => Err(InquiryStatusError(s.to_owned())),
        }
    }
}
