//! Firmware, diagnostics and publish-firmware status records

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::support::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FirmwareStatus {
    Downloaded,
    DownloadFailed,
    Downloading,
    Idle,
    InstallationFailed,
    Installing,
    Installed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticsStatus {
    Idle,
    Uploaded,
    UploadFailed,
    Uploading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PublishFirmwareStatus {
    Idle,
    DownloadScheduled,
    Downloading,
    Downloaded,
    Published,
    DownloadFailed,
    DownloadPaused,
    InvalidChecksum,
    ChecksumVerified,
    PublishFailed,
}

/// Latest status reported by a station and when it was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRecord<S> {
    pub status: S,
    pub updated_at: DateTime<Utc>,
}

impl<S> StatusRecord<S> {
    pub fn now(status: S) -> Self {
        Self {
            status,
            updated_at: Utc::now(),
        }
    }
}

fn parse_wire_enum<T: DeserializeOwned>(kind: &str, value: &str) -> Result<T, DomainError> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| DomainError::Validation(format!("unknown {} '{}'", kind, value)))
}

impl FromStr for FirmwareStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_wire_enum("firmware status", s)
    }
}

impl FromStr for DiagnosticsStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_wire_enum("diagnostics status", s)
    }
}

impl FromStr for PublishFirmwareStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_wire_enum("publish firmware status", s)
    }
}
