use std::{
    io,
    net::{Ipv4Addr, Ipv6Addr, SocketAddr},
    time::Duration,
};

use anyhow::anyhow;
use rand::Rng as _;
use thiserror::Error;
use tokio::{net::UdpSocket, time::timeout};
use tracing::{debug, trace, warn};

use crate::snmp::{ErrorStatus, Message, Oid, Pdu, PduType, VarBind};

pub const DEFAULT_PORT: u16 = 161;

const MAX_DATAGRAM_SIZE: usize = 65_535;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub community: String,

    pub timeout: Duration,

    pub retries: u32,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            community: "public".to_string(),
            timeout: Duration::from_secs(2),
            retries: 3,
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to open UDP socket to {target}")]
    Connect {
        target: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("agent {target} is unreachable")]
    Unreachable {
        target: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("no response from {target} after {attempts} attempt(s)")]
    Timeout { target: SocketAddr, attempts: u32 },

    #[error("failed to send request to {target}")]
    Send {
        target: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("failed to receive response from {target}")]
    Receive {
        target: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("malformed response from {target}: {reason:#}")]
    Malformed {
        target: SocketAddr,
        reason: anyhow::Error,
    },

    #[error("agent {target} returned {status} at index {index}")]
    ErrorStatus {
        target: SocketAddr,
        status: ErrorStatus,
        index: i64,
    },

    #[error("agent {target} returned {actual} varbind(s), expected {expected}")]
    VarBindCount {
        target: SocketAddr,
        expected: usize,
        actual: usize,
    },

    #[error("agent {target} returned {actual} for varbind {index}, expected {expected}")]
    UnexpectedOid {
        target: SocketAddr,
        index: usize,
        expected: Oid,
        actual: Oid,
    },
}

impl SessionError {
    /// Whether the agent could not be reached at all, as opposed to answering badly.
    pub fn is_connection_failure(&self) -> bool {
        matches!(
            self,
            SessionError::Connect { .. }
                | SessionError::Unreachable { .. }
                | SessionError::Timeout { .. }
        )
    }
}

/// The socket is released when the session is closed or dropped.
#[derive(Debug)]
pub struct Session {
    socket: UdpSocket,
    target: SocketAddr,
    options: SessionOptions,
}

impl Session {
    pub async fn connect(target: SocketAddr, options: SessionOptions) -> Result<Self, SessionError> {
        let local: SocketAddr = match target {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };

        let socket = UdpSocket::bind(local)
            .await
            .map_err(|source| SessionError::Connect { target, source })?;
        socket
            .connect(target)
            .await
            .map_err(|source| SessionError::Connect { target, source })?;

        debug!("Opened SNMP session to {target}");

        Ok(Self {
            socket,
            target,
            options,
        })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    pub async fn get<const N: usize>(
        &mut self,
        oids: &[Oid; N],
    ) -> Result<[VarBind; N], SessionError> {
        let request_id = rand::thread_rng().gen_range(1..=i32::MAX);
        let request = Message::get_request(&self.options.community, request_id, oids).encode();
        let attempts = self.options.retries.saturating_add(1);
        let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];

        for attempt in 1..=attempts {
            debug!(
                "Sending GetRequest {request_id} to {} (attempt {attempt}/{attempts})",
                self.target
            );
            self.socket
                .send(&request)
                .await
                .map_err(|source| self.io_error(source, false))?;

            match timeout(self.options.timeout, self.receive(request_id, &mut buf)).await {
                Ok(pdu) => return self.check_response(pdu?, oids),
                Err(_) => warn!(
                    "Timeout waiting for response to GetRequest {request_id} from {}",
                    self.target
                ),
            }
        }

        Err(SessionError::Timeout {
            target: self.target,
            attempts,
        })
    }

    pub fn close(self) {
        debug!("Closed SNMP session to {}", self.target);
    }

    async fn receive(&self, request_id: i32, buf: &mut [u8]) -> Result<Pdu, SessionError> {
        loop {
            let len = self
                .socket
                .recv(buf)
                .await
                .map_err(|source| self.io_error(source, true))?;
            trace!("Received {len} bytes from {}", self.target);

            let message = Message::decode(&buf[..len]).map_err(|reason| SessionError::Malformed {
                target: self.target,
                reason,
            })?;

            // Late answers to an earlier transmission are not ours to consume.
            if message.pdu.request_id != request_id {
                debug!(
                    "Skipping response {} while waiting for {request_id}",
                    message.pdu.request_id
                );
                continue;
            }

            if message.pdu.r#type != PduType::GetResponse {
                return Err(SessionError::Malformed {
                    target: self.target,
                    reason: anyhow!("unexpected PDU type: {:?}", message.pdu.r#type),
                });
            }

            return Ok(message.pdu);
        }
    }

    fn check_response<const N: usize>(
        &self,
        pdu: Pdu,
        oids: &[Oid; N],
    ) -> Result<[VarBind; N], SessionError> {
        if pdu.error_status != ErrorStatus::NoError {
            return Err(SessionError::ErrorStatus {
                target: self.target,
                status: pdu.error_status,
                index: pdu.error_index,
            });
        }

        let varbinds: [VarBind; N] =
            pdu.varbinds
                .try_into()
                .map_err(|varbinds: Vec<VarBind>| SessionError::VarBindCount {
                    target: self.target,
                    expected: N,
                    actual: varbinds.len(),
                })?;

        for (i, (varbind, oid)) in varbinds.iter().zip(oids).enumerate() {
            if varbind.oid != *oid {
                return Err(SessionError::UnexpectedOid {
                    target: self.target,
                    index: i + 1,
                    expected: oid.clone(),
                    actual: varbind.oid.clone(),
                });
            }
        }

        Ok(varbinds)
    }

    fn io_error(&self, source: io::Error, receiving: bool) -> SessionError {
        let target = self.target;
        match source.kind() {
            io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::NetworkUnreachable
            | io::ErrorKind::HostUnreachable => SessionError::Unreachable { target, source },
            _ if receiving => SessionError::Receive { target, source },
            _ => SessionError::Send { target, source },
        }
    }
}
