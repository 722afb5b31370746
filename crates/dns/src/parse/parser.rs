use crate::{
    error::FormatError,
    protocol::{
        class::RecordClass,
        header::{Flags, Header},
        packet::DnsPacket,
        question::Question,
        record_type::RecordType,
        resource_record::ResourceRecord,
    },
    serialize::MAX_NAME_LENGTH,
};

/// A bounds checked cursor over an immutable DNS message.
///
/// `buf` must start with the message header, since compression pointers are offsets from
/// there. Every read that would leave the buffer fails with [`FormatError::Truncated`].
#[derive(Debug)]
pub struct DnsParser<'a> {
    pub buf: &'a [u8],
    position: usize,
}

pub trait Collate {
    fn collate(self) -> usize;
}

impl<'a> Collate for &'a [u8] {
    /// Folds `&[u8]` into a single usize, so it only makes sense for slices up to 8 bytes
    fn collate(self: &'a [u8]) -> usize {
        self.iter()
            .fold(0usize, |acc, byte| acc << 8 | *byte as usize)
    }
}

impl<const N: usize> Collate for [u8; N] {
    /// Folds `[u8; N]` into a single usize, so it only makes sense for `N` <= 8
    fn collate(self: [u8; N]) -> usize {
        self.iter()
            .fold(0usize, |acc, byte| acc << 8 | *byte as usize)
    }
}

fn truncated(buf: &[u8], offset: usize, needed: usize) -> FormatError {
    FormatError::Truncated {
        offset,
        needed,
        available: buf.len().saturating_sub(offset),
    }
}

/// Appends `label` in presentation form. Printable ASCII is kept, `.` and `\` are escaped with a
/// backslash and every other byte becomes `\DDD`, so any label survives the trip back to the wire.
// https://datatracker.ietf.org/doc/html/rfc1035#section-5.1
fn push_label(name: &mut String, label: &[u8]) {
    for &byte in label {
        match byte {
            b'.' | b'\\' => {
                name.push('\\');
                name.push(byte as char);
            }
            0x21..=0x7E => name.push(byte as char),
            _ => name.push_str(&format!("\\{byte:03}")),
        }
    }
}

/// Decodes the domain name starting at `start` in `buf`, where `buf[0]` sits at offset `base`
/// of the whole message (`base` is 0 when `buf` is the whole message).
///
/// Returns the dotted name in presentation form (`\DDD` escapes for unprintable bytes), with a
/// trailing dot unless it is the root name, and the number of bytes the name occupies at `start`.
/// Once a compression pointer has been followed nothing more is counted: the pointer's own two
/// bytes are the last counted unit.
///
/// Every pointer has to target an offset before the label run it was found in, which also
/// rules out pointing forward or at itself. Since the targets strictly decrease, decoding
/// always terminates.
// https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.4
pub fn decode_domain_name(
    buf: &[u8],
    start: usize,
    base: usize,
) -> Result<(String, usize), FormatError> {
    let mut name = String::new();
    // wire length of the labels read so far, without the root label
    let mut wire_len = 0;
    let mut cursor = start;
    let mut consumed = 0;
    let mut jumped = false;
    // absolute offset where the current run of labels began
    let mut run_start = start + base;

    loop {
        let len = *buf.get(cursor).ok_or_else(|| truncated(buf, cursor, 1))?;
        match len >> 6 {
            0b11 => {
                let raw = buf
                    .get(cursor..cursor + 2)
                    .ok_or_else(|| truncated(buf, cursor, 2))?;
                let target = raw.collate() & 0x3FFF;
                if target >= run_start || target < base {
                    return Err(FormatError::InvalidPointer {
                        position: cursor + base,
                        target,
                    });
                }
                if !jumped {
                    consumed += 2;
                    jumped = true;
                }
                run_start = target;
                cursor = target - base;
            }
            0b00 if len == 0 => {
                if !jumped {
                    consumed += 1;
                }
                break;
            }
            0b00 => {
                let len = len as usize;
                let label = buf
                    .get(cursor + 1..cursor + 1 + len)
                    .ok_or_else(|| truncated(buf, cursor + 1, len))?;
                wire_len += 1 + len;
                if wire_len + 1 > MAX_NAME_LENGTH {
                    return Err(FormatError::NameTooLong);
                }
                push_label(&mut name, label);
                name.push('.');
                if !jumped {
                    consumed += 1 + len;
                }
                cursor += 1 + len;
            }
            _ => return Err(FormatError::ReservedLabelType(cursor + base)),
        }
    }

    Ok((name, consumed))
}

impl<'a> DnsParser<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    fn peek(&self, n: usize) -> Result<&'a [u8], FormatError> {
        self.buf
            .get(self.position..self.position + n)
            .ok_or_else(|| truncated(self.buf, self.position, n))
    }

    fn advance(&mut self, n: usize) -> Result<&'a [u8], FormatError> {
        let out = self.peek(n)?;
        self.position += n;
        Ok(out)
    }

    fn advance_n<const N: usize>(&mut self) -> Result<[u8; N], FormatError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.advance(N)?);
        Ok(out)
    }

    fn parse_domain_name(&mut self) -> Result<String, FormatError> {
        let (name, consumed) = decode_domain_name(self.buf, self.position, 0)?;
        self.position += consumed;
        Ok(name)
    }

    pub fn parse_header(&mut self) -> Result<Header, FormatError> {
        Ok(Header {
            request_id: self.advance_n::<2>()?.collate() as u16,
            flags: Flags::from(self.advance_n::<2>()?.collate() as u16),
            question_count: self.advance_n::<2>()?.collate() as u16,
            answer_count: self.advance_n::<2>()?.collate() as u16,
            authority_count: self.advance_n::<2>()?.collate() as u16,
            additional_count: self.advance_n::<2>()?.collate() as u16,
        })
    }

    // Question section format https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.2
    pub fn parse_question(&mut self) -> Result<Question, FormatError> {
        Ok(Question {
            domain_name: self.parse_domain_name()?,
            r#type: RecordType::from(self.advance_n::<2>()?.collate() as u16),
            class: RecordClass::from(self.advance_n::<2>()?.collate() as u16),
        })
    }

    // Resource section format https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.3
    pub fn parse_resource_record(&mut self) -> Result<ResourceRecord, FormatError> {
        let name = self.parse_domain_name()?;
        let r#type = RecordType::from(self.advance_n::<2>()?.collate() as u16);
        let class = RecordClass::from(self.advance_n::<2>()?.collate() as u16);
        let ttl = self.advance_n::<4>()?.collate() as u32;
        let len = self.advance_n::<2>()?.collate();
        let data = self.advance(len)?.to_vec();

        Ok(ResourceRecord {
            name,
            r#type,
            class,
            ttl,
            data,
        })
    }

    fn parse_resource_records(&mut self, count: u16) -> Result<Vec<ResourceRecord>, FormatError> {
        (0..count).map(|_| self.parse_resource_record()).collect()
    }

    /// Parses a whole message. Bytes after the last section are ignored.
    pub fn parse(&mut self) -> Result<DnsPacket, FormatError> {
        self.position = 0;
        let header = self.parse_header()?;

        let questions = (0..header.question_count)
            .map(|_| self.parse_question())
            .collect::<Result<Vec<_>, _>>()?;
        let answers = self.parse_resource_records(header.answer_count)?;
        let authorities = self.parse_resource_records(header.authority_count)?;
        let additionals = self.parse_resource_records(header.additional_count)?;

        Ok(DnsPacket::from_sections(
            header,
            questions,
            answers,
            authorities,
            additionals,
        ))
    }
}
