use anyhow::{Context as _, Result, bail};

use crate::snmp::{
    Oid,
    ber::{
        TAG_INTEGER, TAG_NULL, TAG_OBJECT_IDENTIFIER, TAG_OCTET_STRING, decode_integer,
        decode_unsigned, encode_integer, encode_tlv, encode_unsigned,
    },
};

const TAG_IP_ADDRESS: u8 = 0x40;
const TAG_COUNTER32: u8 = 0x41;
const TAG_GAUGE32: u8 = 0x42;
const TAG_TIME_TICKS: u8 = 0x43;
const TAG_OPAQUE: u8 = 0x44;
const TAG_COUNTER64: u8 = 0x46;
const TAG_NO_SUCH_OBJECT: u8 = 0x80;
const TAG_NO_SUCH_INSTANCE: u8 = 0x81;
const TAG_END_OF_MIB_VIEW: u8 = 0x82;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Integer(i64),
    OctetString(Vec<u8>),
    Null,
    ObjectIdentifier(Oid),
    IpAddress([u8; 4]),
    Counter32(u32),
    Gauge32(u32),
    TimeTicks(u32),
    Opaque(Vec<u8>),
    Counter64(u64),
    NoSuchObject,
    NoSuchInstance,
    EndOfMibView,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::OctetString(_) => "OCTET STRING",
            Value::Null => "NULL",
            Value::ObjectIdentifier(_) => "OBJECT IDENTIFIER",
            Value::IpAddress(_) => "IpAddress",
            Value::Counter32(_) => "Counter32",
            Value::Gauge32(_) => "Gauge32",
            Value::TimeTicks(_) => "TimeTicks",
            Value::Opaque(_) => "Opaque",
            Value::Counter64(_) => "Counter64",
            Value::NoSuchObject => "noSuchObject",
            Value::NoSuchInstance => "noSuchInstance",
            Value::EndOfMibView => "endOfMibView",
        }
    }

    pub(crate) fn encode(&self, buf: &mut Vec<u8>) {
        match self {
            Value::Integer(v) => encode_integer(buf, TAG_INTEGER, *v),
            Value::OctetString(v) => encode_tlv(buf, TAG_OCTET_STRING, v),
            Value::Null => encode_tlv(buf, TAG_NULL, &[]),
            Value::ObjectIdentifier(oid) => {
                encode_tlv(buf, TAG_OBJECT_IDENTIFIER, &oid.encode_content())
            }
            Value::IpAddress(v) => encode_tlv(buf, TAG_IP_ADDRESS, v),
            Value::Counter32(v) => encode_unsigned(buf, TAG_COUNTER32, *v as u64),
            Value::Gauge32(v) => encode_unsigned(buf, TAG_GAUGE32, *v as u64),
            Value::TimeTicks(v) => encode_unsigned(buf, TAG_TIME_TICKS, *v as u64),
            Value::Opaque(v) => encode_tlv(buf, TAG_OPAQUE, v),
            Value::Counter64(v) => encode_unsigned(buf, TAG_COUNTER64, *v),
            Value::NoSuchObject => encode_tlv(buf, TAG_NO_SUCH_OBJECT, &[]),
            Value::NoSuchInstance => encode_tlv(buf, TAG_NO_SUCH_INSTANCE, &[]),
            Value::EndOfMibView => encode_tlv(buf, TAG_END_OF_MIB_VIEW, &[]),
        }
    }

    pub(crate) fn decode(tag: u8, content: &[u8]) -> Result<Self> {
        match tag {
            TAG_INTEGER => Ok(Value::Integer(decode_integer(content)?)),
            TAG_OCTET_STRING => Ok(Value::OctetString(content.to_vec())),
            TAG_NULL => Ok(Value::Null),
            TAG_OBJECT_IDENTIFIER => Ok(Value::ObjectIdentifier(Oid::decode_content(content)?)),
            TAG_IP_ADDRESS => {
                let octets: [u8; 4] = content.try_into().with_context(|| {
                    format!(
                        "IpAddress has wrong length: expected 4 octets, got {}",
                        content.len()
                    )
                })?;
                Ok(Value::IpAddress(octets))
            }
            TAG_COUNTER32 => Ok(Value::Counter32(decode_u32(content)?)),
            TAG_GAUGE32 => Ok(Value::Gauge32(decode_u32(content)?)),
            TAG_TIME_TICKS => Ok(Value::TimeTicks(decode_u32(content)?)),
            TAG_OPAQUE => Ok(Value::Opaque(content.to_vec())),
            TAG_COUNTER64 => Ok(Value::Counter64(decode_unsigned(content)?)),
            TAG_NO_SUCH_OBJECT => Ok(Value::NoSuchObject),
            TAG_NO_SUCH_INSTANCE => Ok(Value::NoSuchInstance),
            TAG_END_OF_MIB_VIEW => Ok(Value::EndOfMibView),
            _ => bail!("unknown value type: 0x{tag:02x}"),
        }
    }
}

fn decode_u32(content: &[u8]) -> Result<u32> {
    let v = decode_unsigned(content)?;
    u32::try_from(v).with_context(|| format!("value out of range for 32 bits: {v}"))
}
