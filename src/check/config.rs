use std::{net::IpAddr, time::Duration};

use crate::{
    check::{CheckError, Thresholds},
    snmp::{DEFAULT_PORT, SessionOptions},
};

#[derive(Debug, Clone, PartialEq)]
pub struct CheckConfiguration {
    pub target: String,

    pub community: String,

    pub thresholds: Thresholds,

    pub port: u16,

    pub timeout: Duration,

    pub retries: u32,
}

impl Default for CheckConfiguration {
    fn default() -> Self {
        let session = SessionOptions::default();

        Self {
            target: String::new(),
            community: session.community,
            thresholds: Thresholds::default(),
            port: DEFAULT_PORT,
            timeout: session.timeout,
            retries: session.retries,
        }
    }
}

impl CheckConfiguration {
    pub fn validate(&self) -> Result<IpAddr, CheckError> {
        if self.target.is_empty() {
            return Err(CheckError::MissingTarget);
        }

        self.target
            .parse()
            .map_err(|_| CheckError::InvalidTarget(self.target.clone()))
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            community: self.community.clone(),
            timeout: self.timeout,
            retries: self.retries,
        }
    }
}
