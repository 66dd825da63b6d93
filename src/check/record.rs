//! Wire representation of check results.
//!
//! Consumers expect `status` to be either an integer HTTP code or one of a
//! few literal labels, so the internal variant is projected on the way out:
//!
//! | StatusClass          | `status`                  | `matched`  |
//! |----------------------|---------------------------|------------|
//! | `Healthy`            | `200`                     | -          |
//! | `HttpError { code }` | `code`                    | -          |
//! | `SoftDown { .. }`    | `"inactive (HTML match)"` | pattern    |
//! | `Unreachable`        | `"offline"`               | -          |
//! | `Unresolvable`       | `"unresolvable"`          | -          |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{CheckResult, StatusClass};

pub const OFFLINE_LABEL: &str = "offline";
pub const INACTIVE_LABEL: &str = "inactive (HTML match)";
pub const UNRESOLVABLE_LABEL: &str = "unresolvable";

/// Flat record as written to `/status` and the snapshot file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub url: String,
    pub status: WireStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireStatus {
    Code(u16),
    Label(String),
}

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("unknown status label: {0}")]
    UnknownLabel(String),
}

impl From<CheckResult> for StatusRecord {
    fn from(result: CheckResult) -> Self {
        let (status, matched) = match result.status {
            StatusClass::Healthy => (WireStatus::Code(200), None),
            StatusClass::HttpError { code } => (WireStatus::Code(code), None),
            StatusClass::SoftDown { matched_pattern } => (
                WireStatus::Label(INACTIVE_LABEL.to_string()),
                Some(matched_pattern),
            ),
            StatusClass::Unreachable => (WireStatus::Label(OFFLINE_LABEL.to_string()), None),
            StatusClass::Unresolvable => {
                (WireStatus::Label(UNRESOLVABLE_LABEL.to_string()), None)
            }
        };

        StatusRecord {
            url: result.target,
            status,
            matched,
        }
    }
}

impl TryFrom<StatusRecord> for CheckResult {
    type Error = RecordError;

    fn try_from(record: StatusRecord) -> Result<Self, Self::Error> {
        let status = match record.status {
            WireStatus::Code(200) => StatusClass::Healthy,
            WireStatus::Code(code) => StatusClass::HttpError { code },
            WireStatus::Label(label) => match label.as_str() {
                OFFLINE_LABEL => StatusClass::Unreachable,
                UNRESOLVABLE_LABEL => StatusClass::Unresolvable,
                INACTIVE_LABEL => StatusClass::SoftDown {
                    matched_pattern: record.matched.unwrap_or_default(),
                },
                _ => return Err(RecordError::UnknownLabel(label)),
            },
        };

        Ok(CheckResult {
            target: record.url,
            status,
        })
    }
}
