use std::{fmt, str::FromStr};

use anyhow::{Context as _, Error, Result, bail};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Oid(Vec<u32>);

impl Oid {
    pub fn new(arcs: Vec<u32>) -> Result<Self> {
        validate_arcs(&arcs)?;
        Ok(Self(arcs))
    }

    /// Only use this for compile-time constants known to be valid.
    pub fn new_unchecked(arcs: &[u32]) -> Self {
        Self(arcs.to_vec())
    }

    pub fn arcs(&self) -> &[u32] {
        &self.0
    }

    pub(crate) fn encode_content(&self) -> Vec<u8> {
        let mut buf = Vec::new();

        let (first, rest) = match self.0.as_slice() {
            [a, b, rest @ ..] => (*a as u64 * 40 + *b as u64, rest),
            [a] => (*a as u64 * 40, &[][..]),
            [] => (0, &[][..]),
        };

        encode_subidentifier(&mut buf, first);
        for &arc in rest {
            encode_subidentifier(&mut buf, arc as u64);
        }

        buf
    }

    pub(crate) fn decode_content(content: &[u8]) -> Result<Self> {
        if content.is_empty() {
            bail!("object identifier has no content octets");
        }

        let mut subidentifiers = Vec::new();
        let mut acc = 0u64;
        let mut pending = false;
        for &b in content {
            if acc > u64::MAX >> 7 {
                bail!("object identifier sub-identifier overflows");
            }

            acc = (acc << 7) | (b & 0x7f) as u64;
            pending = b & 0x80 != 0;
            if !pending {
                subidentifiers.push(acc);
                acc = 0;
            }
        }

        if pending {
            bail!("object identifier truncated inside a sub-identifier");
        }

        let first = subidentifiers[0];
        let (a, b) = match first {
            0..40 => (0, first),
            40..80 => (1, first - 40),
            _ => (2, first - 80),
        };

        let mut arcs = Vec::with_capacity(subidentifiers.len() + 1);
        arcs.push(a);
        arcs.push(u32::try_from(b).context("object identifier arc out of range")?);
        for &s in &subidentifiers[1..] {
            arcs.push(u32::try_from(s).context("object identifier arc out of range")?);
        }

        Ok(Self(arcs))
    }
}

impl FromStr for Oid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dotted = s.strip_prefix('.').unwrap_or(s);
        if dotted.is_empty() {
            bail!("empty object identifier");
        }

        let arcs = dotted
            .split('.')
            .map(|arc| {
                arc.parse::<u32>()
                    .with_context(|| format!("invalid object identifier arc: {arc:?}"))
            })
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("failed to parse object identifier: {s}"))?;

        Self::new(arcs).with_context(|| format!("invalid object identifier: {s}"))
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for arc in &self.0 {
            write!(f, ".{arc}")?;
        }

        Ok(())
    }
}

fn validate_arcs(arcs: &[u32]) -> Result<()> {
    let [first, second, ..] = arcs else {
        bail!(
            "object identifier needs at least 2 arcs, got {}",
            arcs.len()
        );
    };

    if *first > 2 {
        bail!("first arc out of range: expected 0-2, got {first}");
    }

    if *first < 2 && *second > 39 {
        bail!("second arc out of range: expected 0-39, got {second}");
    }

    Ok(())
}

fn encode_subidentifier(buf: &mut Vec<u8>, mut v: u64) {
    let mut groups = vec![(v & 0x7f) as u8];
    v >>= 7;
    while v > 0 {
        groups.push((v & 0x7f) as u8 | 0x80);
        v >>= 7;
    }

    buf.extend(groups.iter().rev());
}
