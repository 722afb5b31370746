use crate::{error::FormatError, parse::parser::DnsParser};

/// Size of the fixed header at the start of every DNS message.
pub const HEADER_SIZE: usize = 12;

// Header section format https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.1
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct Header {
    pub request_id: u16,
    pub flags: Flags,
    pub question_count: u16,
    pub answer_count: u16,
    pub authority_count: u16,
    pub additional_count: u16,
}

impl Header {
    pub fn parse(buf: &[u8]) -> Result<Self, FormatError> {
        DnsParser::new(buf).parse_header()
    }
}

impl From<&Header> for [u8; HEADER_SIZE] {
    fn from(header: &Header) -> Self {
        let raw_flags: u16 = header.flags.clone().into();
        let mut out = [0u8; HEADER_SIZE];
        out[0..2].copy_from_slice(&header.request_id.to_be_bytes());
        out[2..4].copy_from_slice(&raw_flags.to_be_bytes());
        out[4..6].copy_from_slice(&header.question_count.to_be_bytes());
        out[6..8].copy_from_slice(&header.answer_count.to_be_bytes());
        out[8..10].copy_from_slice(&header.authority_count.to_be_bytes());
        out[10..12].copy_from_slice(&header.additional_count.to_be_bytes());
        out
    }
}

impl From<Header> for [u8; HEADER_SIZE] {
    fn from(header: Header) -> Self {
        (&header).into()
    }
}

/// The second 16 bit word of the header.
///
/// ```text
///   15 14 13 12 11 10  9  8  7  6  5  4  3  2  1  0
/// | QR|   OPCODE  | AA| TC| RD| RA|   Z    |   RCODE   |
/// ```
///
/// `z` is reserved and always written as zero, whatever the struct holds.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct Flags {
    pub response: bool,
    pub opcode: u8,
    pub authoritative_answer: bool,
    pub truncation: bool,
    pub recursion_desired: bool,
    pub recursion_available: bool,
    pub z: u8,
    pub response_code: u8,
}

impl From<u16> for Flags {
    fn from(input: u16) -> Self {
        Self {
            response: (input >> 15 & 1) > 0,
            opcode: (input >> 11 & 0xF) as u8,
            authoritative_answer: (input >> 10 & 1) > 0,
            truncation: (input >> 9 & 1) > 0,
            recursion_desired: (input >> 8 & 1) > 0,
            recursion_available: (input >> 7 & 1) > 0,
            z: (input >> 4 & 0x7) as u8,
            response_code: (input & 0xF) as u8,
        }
    }
}

impl From<Flags> for u16 {
    fn from(flags: Flags) -> Self {
        let mut value = 0u16;
        value |= u16::from(flags.response) << 15;
        value |= (flags.opcode as u16 & 0xF) << 11;
        value |= u16::from(flags.authoritative_answer) << 10;
        value |= u16::from(flags.truncation) << 9;
        value |= u16::from(flags.recursion_desired) << 8;
        value |= u16::from(flags.recursion_available) << 7;
        value |= flags.response_code as u16 & 0xF;
        value
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{Flags, Header, HEADER_SIZE};
    use crate::error::FormatError;

    #[test]
    fn test_conversion_flags() {
        let raw = 0x8100_u16; // response & recursive resolution desired flags set
        let flags = Flags::from(raw);
        assert_eq!(
            flags,
            Flags {
                response: true,
                recursion_desired: true,
                ..Default::default()
            }
        );

        let encoded: u16 = flags.into();
        assert_eq!(raw, encoded);
    }

    #[test]
    fn test_flag_bit_layout() {
        let flags = Flags {
            response: true,
            opcode: 0b1010,
            authoritative_answer: true,
            truncation: false,
            recursion_desired: true,
            recursion_available: true,
            z: 0,
            response_code: 0b0101,
        };
        let header = Header {
            flags,
            ..Default::default()
        };
        let bytes: [u8; HEADER_SIZE] = header.into();
        assert_eq!(bytes[2], 0b1_1010_1_0_1);
        assert_eq!(bytes[3], 0b1_000_0101);
    }

    #[test]
    fn test_reserved_bits_serialize_as_zero() {
        let header = Header {
            flags: Flags {
                z: 0b111,
                ..Default::default()
            },
            ..Default::default()
        };
        let bytes: [u8; HEADER_SIZE] = header.into();
        assert_eq!(bytes[3], 0);
    }

    #[test]
    fn test_conversion_header() {
        let header = Header {
            flags: Flags::from(0x8100_u16),
            question_count: 1,
            answer_count: 1,
            authority_count: 2,
            additional_count: 3,
            request_id: 1234,
        };

        let serialized_header: [u8; HEADER_SIZE] = (&header).into();
        assert_eq!(
            &serialized_header[4..],
            &[0, 1, 0, 1, 0, 2, 0, 3],
            "counts are written in QD, AN, NS, AR order"
        );
        assert_eq!(header, Header::parse(&serialized_header).unwrap());
    }

    #[test]
    fn test_parse_short_header() {
        let err = Header::parse(&[0x04, 0xD2, 0x01]).unwrap_err();
        assert!(matches!(err, FormatError::Truncated { .. }));
    }

    proptest! {
        #[test]
        fn header_roundtrip(
            request_id: u16,
            response: bool,
            opcode in 0u8..16,
            authoritative_answer: bool,
            truncation: bool,
            recursion_desired: bool,
            recursion_available: bool,
            response_code in 0u8..16,
            counts: [u16; 4],
        ) {
            let header = Header {
                request_id,
                flags: Flags {
                    response,
                    opcode,
                    authoritative_answer,
                    truncation,
                    recursion_desired,
                    recursion_available,
                    z: 0,
                    response_code,
                },
                question_count: counts[0],
                answer_count: counts[1],
                authority_count: counts[2],
                additional_count: counts[3],
            };
            let bytes: [u8; HEADER_SIZE] = (&header).into();
            prop_assert_eq!(Header::parse(&bytes).unwrap(), header);
        }
    }
}
