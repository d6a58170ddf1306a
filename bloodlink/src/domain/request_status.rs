use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Donation-request status.
///
/// `Pending` is the initial state; a committing donor moves a request to
/// `InProgress`; `Done` and `Canceled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    InProgress,
    Done,
    Canceled,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::InProgress => "inprogress",
            RequestStatus::Done => "done",
            RequestStatus::Canceled => "canceled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Done | RequestStatus::Canceled)
    }

    /// Parse a listing filter value. `"all"` (and the empty string) is the
    /// no-filter sentinel and maps to `None`; it is not a fifth status.
    pub fn parse_filter(value: &str) -> Result<Option<Self>> {
        match value {
            "" | "all" => Ok(None),
            other => other.parse().map(Some),
        }
    }
}

impl FromStr for RequestStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "pending" => Ok(RequestStatus::Pending),
            "inprogress" => Ok(RequestStatus::InProgress),
            "done" => Ok(RequestStatus::Done),
            "canceled" => Ok(RequestStatus::Canceled),
            other => Err(Error::ParsingError(format!(
                "{} is not a request status",
                other
            ))),
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
