use std::net::Ipv4Addr;

use super::{class::RecordClass, record_type::RecordType};

/// A resource record as found in the answer, authority and additional sections.
///
/// `data` holds the raw `RDATA`. Its wire length (`RDLENGTH`) is always derived from
/// `data.len()` when serializing, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: String,
    pub r#type: RecordType,
    pub class: RecordClass,
    pub ttl: u32,
    pub data: Vec<u8>,
}

impl ResourceRecord {
    pub fn new(
        name: impl Into<String>,
        r#type: RecordType,
        class: RecordClass,
        ttl: u32,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            r#type,
            class,
            ttl,
            data: data.into(),
        }
    }

    /// An `A` record in the `IN` class.
    pub fn a(name: impl Into<String>, ttl: u32, ipv4: Ipv4Addr) -> Self {
        Self::new(name, RecordType::A, RecordClass::IN, ttl, ipv4.octets())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The address of an `A` record, `None` for any other type or a malformed `RDATA`.
    // A https://datatracker.ietf.org/doc/html/rfc1035#section-3.4.1
    pub fn ipv4(&self) -> Option<Ipv4Addr> {
        if self.r#type != RecordType::A {
            return None;
        }
        let octets: [u8; 4] = self.data.as_slice().try_into().ok()?;
        Some(octets.into())
    }
}
