use std::fmt;

use anyhow::{Context as _, Result, bail};

use crate::snmp::{
    Oid, Value,
    ber::{
        Reader, TAG_INTEGER, TAG_OBJECT_IDENTIFIER, TAG_OCTET_STRING, TAG_SEQUENCE, encode_integer,
        encode_tlv,
    },
};

pub const VERSION_1: i64 = 0;

const TAG_GET_REQUEST: u8 = 0xa0;
const TAG_GET_RESPONSE: u8 = 0xa2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PduType {
    GetRequest,
    GetResponse,
}

impl PduType {
    fn tag(&self) -> u8 {
        match self {
            PduType::GetRequest => TAG_GET_REQUEST,
            PduType::GetResponse => TAG_GET_RESPONSE,
        }
    }

    fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            TAG_GET_REQUEST => Ok(PduType::GetRequest),
            TAG_GET_RESPONSE => Ok(PduType::GetResponse),
            _ => bail!("unsupported PDU type: 0x{tag:02x}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStatus {
    NoError,
    TooBig,
    NoSuchName,
    BadValue,
    ReadOnly,
    GenErr,
    Other(i64),
}

impl ErrorStatus {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => ErrorStatus::NoError,
            1 => ErrorStatus::TooBig,
            2 => ErrorStatus::NoSuchName,
            3 => ErrorStatus::BadValue,
            4 => ErrorStatus::ReadOnly,
            5 => ErrorStatus::GenErr,
            other => ErrorStatus::Other(other),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            ErrorStatus::NoError => 0,
            ErrorStatus::TooBig => 1,
            ErrorStatus::NoSuchName => 2,
            ErrorStatus::BadValue => 3,
            ErrorStatus::ReadOnly => 4,
            ErrorStatus::GenErr => 5,
            ErrorStatus::Other(code) => *code,
        }
    }
}

impl fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorStatus::NoError => f.write_str("noError"),
            ErrorStatus::TooBig => f.write_str("tooBig"),
            ErrorStatus::NoSuchName => f.write_str("noSuchName"),
            ErrorStatus::BadValue => f.write_str("badValue"),
            ErrorStatus::ReadOnly => f.write_str("readOnly"),
            ErrorStatus::GenErr => f.write_str("genErr"),
            ErrorStatus::Other(code) => write!(f, "error status {code}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarBind {
    pub oid: Oid,

    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pdu {
    pub r#type: PduType,

    pub request_id: i32,

    pub error_status: ErrorStatus,

    /// 1-based index of the varbind that caused `error_status`, 0 when there is none.
    pub error_index: i64,

    pub varbinds: Vec<VarBind>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub community: Vec<u8>,

    pub pdu: Pdu,
}

impl Message {
    pub fn get_request(community: &str, request_id: i32, oids: &[Oid]) -> Self {
        Self {
            community: community.as_bytes().to_vec(),
            pdu: Pdu {
                r#type: PduType::GetRequest,
                request_id,
                error_status: ErrorStatus::NoError,
                error_index: 0,
                varbinds: oids
                    .iter()
                    .map(|oid| VarBind {
                        oid: oid.clone(),
                        value: Value::Null,
                    })
                    .collect(),
            },
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut varbinds = Vec::new();
        for varbind in &self.pdu.varbinds {
            let mut content = Vec::new();
            encode_tlv(
                &mut content,
                TAG_OBJECT_IDENTIFIER,
                &varbind.oid.encode_content(),
            );
            varbind.value.encode(&mut content);
            encode_tlv(&mut varbinds, TAG_SEQUENCE, &content);
        }

        let mut pdu = Vec::new();
        encode_integer(&mut pdu, TAG_INTEGER, self.pdu.request_id as i64);
        encode_integer(&mut pdu, TAG_INTEGER, self.pdu.error_status.code());
        encode_integer(&mut pdu, TAG_INTEGER, self.pdu.error_index);
        encode_tlv(&mut pdu, TAG_SEQUENCE, &varbinds);

        let mut message = Vec::new();
        encode_integer(&mut message, TAG_INTEGER, VERSION_1);
        encode_tlv(&mut message, TAG_OCTET_STRING, &self.community);
        encode_tlv(&mut message, self.pdu.r#type.tag(), &pdu);

        let mut buf = Vec::with_capacity(message.len() + 4);
        encode_tlv(&mut buf, TAG_SEQUENCE, &message);
        buf
    }

    pub fn decode(datagram: &[u8]) -> Result<Self> {
        let mut outer = Reader::new(datagram);
        let content = outer
            .expect(TAG_SEQUENCE)
            .context("failed to decode message")?;
        outer.finish().context("unexpected data after message")?;

        let mut reader = Reader::new(content);

        let version = reader
            .read_integer()
            .context("failed to decode version")?;
        if version != VERSION_1 {
            bail!("unsupported SNMP version: {version}");
        }

        let community = reader
            .expect(TAG_OCTET_STRING)
            .context("failed to decode community")?
            .to_vec();

        let (tag, content) = reader.read_tlv().context("failed to decode PDU")?;
        let r#type = PduType::from_tag(tag)?;
        let pdu = decode_pdu(r#type, content).context("failed to decode PDU")?;

        reader.finish().context("unexpected data after PDU")?;

        Ok(Self { community, pdu })
    }
}

fn decode_pdu(r#type: PduType, content: &[u8]) -> Result<Pdu> {
    let mut reader = Reader::new(content);

    let request_id = reader
        .read_integer()
        .context("failed to decode request id")?;
    let request_id =
        i32::try_from(request_id).context("request id out of range for 32 bits")?;
    let error_status = reader
        .read_integer()
        .context("failed to decode error status")?;
    let error_index = reader
        .read_integer()
        .context("failed to decode error index")?;

    let list = reader
        .expect(TAG_SEQUENCE)
        .context("failed to decode varbind list")?;
    reader.finish()?;

    let mut list = Reader::new(list);
    let mut varbinds = Vec::new();
    while !list.is_empty() {
        let varbind = decode_varbind(&mut list)
            .with_context(|| format!("failed to decode varbind {}", varbinds.len() + 1))?;
        varbinds.push(varbind);
    }

    Ok(Pdu {
        r#type,
        request_id,
        error_status: ErrorStatus::from_code(error_status),
        error_index,
        varbinds,
    })
}

fn decode_varbind(list: &mut Reader<'_>) -> Result<VarBind> {
    let mut reader = Reader::new(list.expect(TAG_SEQUENCE)?);

    let oid = Oid::decode_content(reader.expect(TAG_OBJECT_IDENTIFIER)?)
        .context("failed to decode name")?;

    let (tag, content) = reader.read_tlv()?;
    let value = Value::decode(tag, content).context("failed to decode value")?;

    reader.finish()?;

    Ok(VarBind { oid, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCATION_REQUEST: [u8; 40] = [
        0x30, 0x26, 0x02, 0x01, 0x00, 0x04, 0x06, 0x70, 0x75, 0x62, 0x6c, 0x69, 0x63, 0xa0, 0x19,
        0x02, 0x01, 0x01, 0x02, 0x01, 0x00, 0x02, 0x01, 0x00, 0x30, 0x0e, 0x30, 0x0c, 0x06, 0x08,
        0x2b, 0x06, 0x01, 0x02, 0x01, 0x01, 0x06, 0x00, 0x05, 0x00,
    ];

    fn location_oid() -> Oid {
        ".1.3.6.1.2.1.1.6.0".parse().unwrap()
    }

    #[test]
    fn encodes_get_request() {
        let message = Message::get_request("public", 1, &[location_oid()]);
        assert_eq!(message.encode(), LOCATION_REQUEST);
    }

    #[test]
    fn decodes_get_response() {
        let temperature: Oid = ".1.3.6.1.4.1.20916.1.7.1.2.1.1.0".parse().unwrap();
        let response = Message {
            community: b"public".to_vec(),
            pdu: Pdu {
                r#type: PduType::GetResponse,
                request_id: 0x1234_5678,
                error_status: ErrorStatus::NoError,
                error_index: 0,
                varbinds: vec![
                    VarBind {
                        oid: location_oid(),
                        value: Value::OctetString(vec![b'x'; 150]),
                    },
                    VarBind {
                        oid: temperature.clone(),
                        value: Value::Integer(-250),
                    },
                ],
            },
        };

        let decoded = Message::decode(&response.encode()).unwrap();
        assert_eq!(decoded, response);
        assert_eq!(decoded.pdu.varbinds[1].value, Value::Integer(-250));
    }

    #[test]
    fn rejects_other_versions_and_trailing_data() {
        let mut v2c = LOCATION_REQUEST;
        v2c[4] = 0x01;
        let err = Message::decode(&v2c).unwrap_err();
        assert_eq!(err.to_string(), "unsupported SNMP version: 1");

        let mut trailing = LOCATION_REQUEST.to_vec();
        trailing.push(0x00);
        assert!(Message::decode(&trailing).is_err());
    }

    #[test]
    fn names_the_failing_varbind() {
        let mut truncated = LOCATION_REQUEST;
        // Declare the NULL value as one octet long.
        truncated[39] = 0x01;
        let err = Message::decode(&truncated).unwrap_err();
        assert!(format!("{err:#}").contains("failed to decode varbind 1"), "{err:#}");
    }

    #[test]
    fn error_status_codes() {
        assert_eq!(ErrorStatus::from_code(2), ErrorStatus::NoSuchName);
        assert_eq!(ErrorStatus::from_code(17), ErrorStatus::Other(17));
        assert_eq!(ErrorStatus::NoSuchName.to_string(), "noSuchName");
    }
}
