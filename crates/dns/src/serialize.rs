use bytes::{BufMut, BytesMut};

use crate::{
    error::FormatError,
    protocol::{
        header::{Flags, Header, HEADER_SIZE},
        packet::DnsPacket,
        question::Question,
        resource_record::ResourceRecord,
        response_code::ResponseCode,
    },
};

pub const MAX_LABEL_LENGTH: usize = 63;
pub const MAX_NAME_LENGTH: usize = 255;

/// Encodes `domain_name` as a sequence of length prefixed labels terminated by the root label.
/// A trailing dot is optional, `""` and `"."` both encode the root name. Backslash escapes
/// (`\.`, `\\`, `\DDD`) put arbitrary bytes into a label.
pub fn encode_domain_name(domain_name: &str) -> Result<Vec<u8>, FormatError> {
    let mut encoded = BytesMut::with_capacity(domain_name.len() + 2);
    put_domain_name(&mut encoded, domain_name)?;
    Ok(encoded.to_vec())
}

// https://datatracker.ietf.org/doc/html/rfc1035#section-5.1
fn unescape(bytes: &mut impl Iterator<Item = u8>, domain_name: &str) -> Result<u8, FormatError> {
    let invalid = || FormatError::InvalidEscape(domain_name.to_string());
    let first = bytes.next().ok_or_else(invalid)?;
    if !first.is_ascii_digit() {
        return Ok(first);
    }

    let mut value = u16::from(first - b'0');
    for _ in 0..2 {
        let digit = bytes.next().filter(u8::is_ascii_digit).ok_or_else(invalid)?;
        value = value * 10 + u16::from(digit - b'0');
    }
    u8::try_from(value).map_err(|_| invalid())
}

fn split_labels(domain_name: &str) -> Result<Vec<Vec<u8>>, FormatError> {
    let mut labels = Vec::new();
    if domain_name == "." {
        return Ok(labels);
    }

    let mut label = Vec::new();
    let mut bytes = domain_name.bytes();
    while let Some(byte) = bytes.next() {
        match byte {
            b'.' => labels.push(std::mem::take(&mut label)),
            b'\\' => label.push(unescape(&mut bytes, domain_name)?),
            _ => label.push(byte),
        }
    }
    // no trailing dot
    if !label.is_empty() {
        labels.push(label);
    }
    Ok(labels)
}

// Names are always written uncompressed.
fn put_domain_name(buf: &mut BytesMut, domain_name: &str) -> Result<(), FormatError> {
    let start = buf.len();
    for label in split_labels(domain_name)? {
        if label.is_empty() {
            return Err(FormatError::EmptyLabel(domain_name.to_string()));
        }
        if label.len() > MAX_LABEL_LENGTH {
            return Err(FormatError::LabelTooLong(
                String::from_utf8_lossy(&label).into_owned(),
            ));
        }
        buf.put_u8(label.len() as u8);
        buf.put_slice(&label);
    }
    buf.put_u8(0);

    if buf.len() - start > MAX_NAME_LENGTH {
        return Err(FormatError::NameTooLong);
    }
    Ok(())
}

fn put_question(buf: &mut BytesMut, question: &Question) -> Result<(), FormatError> {
    put_domain_name(buf, &question.domain_name)?;
    buf.put_u16(question.r#type.into());
    buf.put_u16(question.class.into());
    Ok(())
}

fn put_resource_record(buf: &mut BytesMut, record: &ResourceRecord) -> Result<(), FormatError> {
    let len = u16::try_from(record.len()).map_err(|_| FormatError::RdataTooLong(record.len()))?;
    put_domain_name(buf, &record.name)?;
    buf.put_u16(record.r#type.into());
    buf.put_u16(record.class.into());
    buf.put_u32(record.ttl);
    buf.put_u16(len);
    buf.put_slice(&record.data);
    Ok(())
}

pub fn serialize_question(question: &Question) -> Result<Vec<u8>, FormatError> {
    let mut buf = BytesMut::with_capacity(question.domain_name.len() + 6);
    put_question(&mut buf, question)?;
    Ok(buf.to_vec())
}

pub fn serialize_resource_record(record: &ResourceRecord) -> Result<Vec<u8>, FormatError> {
    let mut buf = BytesMut::with_capacity(record.name.len() + 12 + record.len());
    put_resource_record(&mut buf, record)?;
    Ok(buf.to_vec())
}

fn section_count(len: usize) -> Result<u16, FormatError> {
    u16::try_from(len).map_err(|_| FormatError::TooManyRecords(len))
}

/// Header, then questions, answers, authorities and additionals in list order.
pub fn serialize_packet(packet: &DnsPacket) -> Result<Vec<u8>, FormatError> {
    let mut header = packet.header().clone();
    header.question_count = section_count(packet.questions().len())?;
    header.answer_count = section_count(packet.answers().len())?;
    header.authority_count = section_count(packet.authorities().len())?;
    header.additional_count = section_count(packet.additionals().len())?;

    let mut buf = BytesMut::with_capacity(512);
    let raw_header: [u8; HEADER_SIZE] = header.into();
    buf.put_slice(&raw_header);

    for question in packet.questions() {
        put_question(&mut buf, question)?;
    }
    for record in packet
        .answers()
        .iter()
        .chain(packet.authorities())
        .chain(packet.additionals())
    {
        put_resource_record(&mut buf, record)?;
    }

    Ok(buf.to_vec())
}

/// A bare, header only response to `request`. Used when the request cannot be answered
/// properly, e.g. because everything after its header is garbage.
pub fn generate_error_response(
    request: &Header,
    response_code: ResponseCode,
) -> [u8; HEADER_SIZE] {
    let flags = Flags {
        response: true,
        opcode: request.flags.opcode,
        recursion_desired: request.flags.recursion_desired,
        response_code: response_code.into(),
        ..Flags::default()
    };

    let header = Header {
        request_id: request.request_id,
        flags,
        ..Header::default()
    };

    header.into()
}
