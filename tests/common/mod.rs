use std::net::SocketAddr;

use check_tempager_3e_temperature::snmp::{ErrorStatus, Message, Pdu, PduType, Value, VarBind};
use tokio::{net::UdpSocket, task::JoinHandle};

/// A single-shot SNMP agent on localhost.
pub struct FakeAgent {
    pub addr: SocketAddr,

    handle: JoinHandle<Message>,
}

impl FakeAgent {
    /// Answers the first GetRequest it receives with `values`, one per requested OID.
    pub async fn answering(values: Vec<Value>) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let mut buf = vec![0u8; 1500];
            let (len, peer) = socket.recv_from(&mut buf).await.unwrap();
            let request = Message::decode(&buf[..len]).unwrap();

            let response = Message {
                community: request.community.clone(),
                pdu: Pdu {
                    r#type: PduType::GetResponse,
                    request_id: request.pdu.request_id,
                    error_status: ErrorStatus::NoError,
                    error_index: 0,
                    varbinds: request
                        .pdu
                        .varbinds
                        .iter()
                        .zip(values)
                        .map(|(v, value)| VarBind {
                            oid: v.oid.clone(),
                            value,
                        })
                        .collect(),
                },
            };
            socket.send_to(&response.encode(), peer).await.unwrap();

            request
        });

        Self { addr, handle }
    }

    /// Returns the request the agent answered.
    pub async fn request(self) -> Message {
        self.handle.await.unwrap()
    }
}

/// A bound socket that never answers.
pub async fn silent_agent() -> (UdpSocket, SocketAddr) {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap();
    (socket, addr)
}
