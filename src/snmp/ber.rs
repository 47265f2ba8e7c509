use anyhow::{Context as _, Result, bail};

pub const TAG_INTEGER: u8 = 0x02;
pub const TAG_OCTET_STRING: u8 = 0x04;
pub const TAG_NULL: u8 = 0x05;
pub const TAG_OBJECT_IDENTIFIER: u8 = 0x06;
pub const TAG_SEQUENCE: u8 = 0x30;

// Lengths above 4 octets would describe datagrams far beyond the UDP limit.
const MAX_LENGTH_OCTETS: usize = 4;

pub fn encode_tlv(buf: &mut Vec<u8>, tag: u8, content: &[u8]) {
    buf.push(tag);
    encode_length(buf, content.len());
    buf.extend_from_slice(content);
}

pub fn encode_length(buf: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        buf.push(len as u8);
        return;
    }

    let bytes = len.to_be_bytes();
    let leading_zeros = bytes.iter().take_while(|&&b| b == 0).count();
    let significant = &bytes[leading_zeros..];

    buf.push(0x80 | significant.len() as u8);
    buf.extend_from_slice(significant);
}

pub fn encode_integer(buf: &mut Vec<u8>, tag: u8, v: i64) {
    let bytes = v.to_be_bytes();

    let mut start = 0;
    while start < bytes.len() - 1 {
        let (b, next) = (bytes[start], bytes[start + 1]);
        let redundant = (b == 0x00 && next & 0x80 == 0) || (b == 0xff && next & 0x80 != 0);
        if !redundant {
            break;
        }
        start += 1;
    }

    encode_tlv(buf, tag, &bytes[start..]);
}

pub fn encode_unsigned(buf: &mut Vec<u8>, tag: u8, v: u64) {
    let mut bytes = vec![0x00];
    bytes.extend_from_slice(&v.to_be_bytes());

    let mut start = 0;
    while start < bytes.len() - 1 && bytes[start] == 0x00 && bytes[start + 1] & 0x80 == 0 {
        start += 1;
    }

    encode_tlv(buf, tag, &bytes[start..]);
}

pub fn decode_integer(content: &[u8]) -> Result<i64> {
    if content.is_empty() {
        bail!("integer has no content octets");
    }

    if content.len() > 8 {
        bail!(
            "integer too long: expected at most 8 octets, got {}",
            content.len()
        );
    }

    let sign = if content[0] & 0x80 != 0 { -1i64 } else { 0i64 };

    Ok(content.iter().fold(sign, |acc, &b| (acc << 8) | b as i64))
}

/// Decodes an unsigned application integer.
///
/// Some agents drop the leading zero octet on values with the high bit set, so the content is
/// read as a plain magnitude instead of being rejected as negative.
pub fn decode_unsigned(content: &[u8]) -> Result<u64> {
    if content.is_empty() {
        bail!("unsigned integer has no content octets");
    }

    let leading_zeros = content
        .iter()
        .take(content.len() - 1)
        .take_while(|&&b| b == 0)
        .count();
    let significant = &content[leading_zeros..];

    if significant.len() > 8 {
        bail!(
            "unsigned integer too long: expected at most 8 significant octets, got {}",
            significant.len()
        );
    }

    Ok(significant.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64))
}

fn decode_length(buf: &[u8]) -> Result<(usize, &[u8])> {
    let Some((&first, rest)) = buf.split_first() else {
        bail!("unexpected end of input: expected a length");
    };

    if first & 0x80 == 0 {
        return Ok((first as usize, rest));
    }

    let octets = (first & 0x7f) as usize;
    if octets == 0 {
        bail!("indefinite length is not supported");
    }

    if octets > MAX_LENGTH_OCTETS {
        bail!("length too long: expected at most {MAX_LENGTH_OCTETS} octets, got {octets}");
    }

    if rest.len() < octets {
        bail!(
            "length truncated: expected {octets} octets, got {}",
            rest.len()
        );
    }

    let (octets, rest) = rest.split_at(octets);
    let len = octets.iter().fold(0usize, |acc, &b| (acc << 8) | b as usize);

    Ok((len, rest))
}

#[derive(Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn read_tlv(&mut self) -> Result<(u8, &'a [u8])> {
        let Some((&tag, rest)) = self.buf.split_first() else {
            bail!("unexpected end of input: expected a tag");
        };

        let (len, rest) = decode_length(rest).context("failed to decode length")?;
        if rest.len() < len {
            bail!(
                "value truncated: expected {len} octets, got {}",
                rest.len()
            );
        }

        let (content, rest) = rest.split_at(len);
        self.buf = rest;

        Ok((tag, content))
    }

    pub fn expect(&mut self, tag: u8) -> Result<&'a [u8]> {
        let (actual, content) = self.read_tlv()?;
        if actual != tag {
            bail!("unexpected tag: expected 0x{tag:02x}, got 0x{actual:02x}");
        }

        Ok(content)
    }

    pub fn read_integer(&mut self) -> Result<i64> {
        decode_integer(self.expect(TAG_INTEGER)?)
    }

    pub fn finish(&self) -> Result<()> {
        if !self.buf.is_empty() {
            bail!("{} trailing octets", self.buf.len());
        }

        Ok(())
    }
}
