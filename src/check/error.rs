use thiserror::Error;

use crate::snmp::SessionError;

/// Every way a check can fail. All of them are reported as CRITICAL.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("target unit must be specified.")]
    MissingTarget,

    #[error("target must be an IP address.")]
    InvalidTarget(String),

    #[error("failed to connect to tempager.")]
    Connection(#[source] SessionError),

    #[error("failed to gather oids.")]
    Read(#[source] SessionError),

    #[error("failed to read location.")]
    LocationType,

    #[error("failed to read internal temperature.")]
    InternalTempType,

    #[error("failed to read external temperature.")]
    ExternalTempType,
}

impl From<SessionError> for CheckError {
    fn from(e: SessionError) -> Self {
        if e.is_connection_failure() {
            CheckError::Connection(e)
        } else {
            CheckError::Read(e)
        }
    }
}
