use std::{fmt, str::FromStr};

#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
/// All record types a question or resource record can carry.
///
/// The record type determines how the `RDATA` field of a resource record is to be read.
/// This crate only interprets `RDATA` for `A` records; everything else travels as opaque
/// bytes, so an unrecognised type is not an error and round-trips through `Unknown`.
///
/// Questions may use `QTYPE`s (`AXFR`, `ANY`, ...) which never occur on answers. Both are
/// modelled in one enum since the wire format is the same 16 bit integer.
pub enum RecordType {
    // RFC 1035 defines
    // - 16 TYPEs, see https://datatracker.ietf.org/doc/html/rfc1035#section-3.2.2
    A,     // 1 a host address
    NS,    // 2 an authoritative name server
    MD,    // 3 a mail destination (Obsolete - use MX)
    MF,    // 4 a mail forwarder (Obsolete - use MX)
    CNAME, // 5 the canonical name for an alias
    SOA,   // 6 marks the start of a zone of authority
    MB,    // 7 a mailbox domain name (EXPERIMENTAL)
    MG,    // 8 a mail group member (EXPERIMENTAL)
    MR,    // 9 a mail rename domain name (EXPERIMENTAL)
    NULL,  // 10 a null RR (EXPERIMENTAL)
    WKS,   // 11 a well known service description
    PTR,   // 12 a domain name pointer
    HINFO, // 13 host information
    MINFO, // 14 mailbox or mail list information
    MX,    // 15 mail exchange
    TXT,   // 16 text strings
    // - 4 QTYPEs, see https://datatracker.ietf.org/doc/html/rfc1035#section-3.2.3
    AXFR,  // 252 A request for a transfer of an entire zone
    MAILB, // 253 A request for mailbox-related records (MB, MG or MR)
    MAILA, // 254 A request for mail agent RRs (Obsolete - see MX)
    ANY,   // 255 A request for all records
    // Pseudo RR type
    OPT, // 41 EDNS, see https://datatracker.ietf.org/doc/html/rfc6891
    // Later Extensions
    AAAA,  // 28 IPv6 host address, see https://datatracker.ietf.org/doc/html/rfc3596#section-2.1
    HTTPS, // 65 see https://datatracker.ietf.org/doc/rfc9460/
    // Fallback
    Unknown(u16),
}

impl From<u16> for RecordType {
    fn from(input: u16) -> Self {
        match input {
            // TYPE
            1 => Self::A,
            2 => Self::NS,
            3 => Self::MD,
            4 => Self::MF,
            5 => Self::CNAME,
            6 => Self::SOA,
            7 => Self::MB,
            8 => Self::MG,
            9 => Self::MR,
            10 => Self::NULL,
            11 => Self::WKS,
            12 => Self::PTR,
            13 => Self::HINFO,
            14 => Self::MINFO,
            15 => Self::MX,
            16 => Self::TXT,
            // QTYPE
            252 => Self::AXFR,
            253 => Self::MAILB,
            254 => Self::MAILA,
            255 => Self::ANY,
            // Other
            41 => Self::OPT,
            // Extensions
            28 => Self::AAAA,
            65 => Self::HTTPS,
            _ => Self::Unknown(input),
        }
    }
}

impl From<RecordType> for u16 {
    fn from(value: RecordType) -> Self {
        match value {
            RecordType::A => 1,
            RecordType::NS => 2,
            RecordType::MD => 3,
            RecordType::MF => 4,
            RecordType::CNAME => 5,
            RecordType::SOA => 6,
            RecordType::MB => 7,
            RecordType::MG => 8,
            RecordType::MR => 9,
            RecordType::NULL => 10,
            RecordType::WKS => 11,
            RecordType::PTR => 12,
            RecordType::HINFO => 13,
            RecordType::MINFO => 14,
            RecordType::MX => 15,
            RecordType::TXT => 16,
            RecordType::OPT => 41,
            RecordType::AAAA => 28,
            RecordType::HTTPS => 65,
            RecordType::AXFR => 252,
            RecordType::MAILB => 253,
            RecordType::MAILA => 254,
            RecordType::ANY => 255,
            RecordType::Unknown(n) => n,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(n) => write!(f, "TYPE{n}"),
            other => write!(f, "{other:?}"),
        }
    }
}

impl FromStr for RecordType {
    type Err = String;

    /// Accepts mnemonics (`"A"`, `"mx"`) and the generic `TYPE<n>` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        if let Some(n) = upper.strip_prefix("TYPE") {
            return n
                .parse::<u16>()
                .map(RecordType::from)
                .map_err(|_| format!("invalid record type {s:?}"));
        }

        let known = [
            Self::A,
            Self::NS,
            Self::MD,
            Self::MF,
            Self::CNAME,
            Self::SOA,
            Self::MB,
            Self::MG,
            Self::MR,
            Self::NULL,
            Self::WKS,
            Self::PTR,
            Self::HINFO,
            Self::MINFO,
            Self::MX,
            Self::TXT,
            Self::AXFR,
            Self::MAILB,
            Self::MAILA,
            Self::ANY,
            Self::OPT,
            Self::AAAA,
            Self::HTTPS,
        ];
        known
            .into_iter()
            .find(|t| t.to_string() == upper)
            .ok_or_else(|| format!("unknown record type {s:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::RecordType;

    #[test]
    fn test_unknown_types_are_preserved() {
        let t = RecordType::from(4242);
        assert_eq!(t, RecordType::Unknown(4242));
        assert_eq!(u16::from(t), 4242);
    }

    #[test]
    fn test_parse_mnemonics() {
        assert_eq!("a".parse::<RecordType>(), Ok(RecordType::A));
        assert_eq!("AAAA".parse::<RecordType>(), Ok(RecordType::AAAA));
        assert_eq!("TYPE15".parse::<RecordType>(), Ok(RecordType::MX));
        assert!("BOGUS".parse::<RecordType>().is_err());
    }
}
