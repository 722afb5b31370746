use super::{
    class::RecordClass,
    header::{Flags, Header},
    question::Question,
    record_type::RecordType,
    resource_record::ResourceRecord,
    response_code::ResponseCode,
};
use crate::{error::FormatError, parse::parser::DnsParser, serialize::serialize_packet};

/// A whole DNS message.
///
/// The section counts in the header always match the section lengths: sections are only
/// extended through the `add_*` methods, which bump the matching count.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DnsPacket {
    header: Header,
    questions: Vec<Question>,
    answers: Vec<ResourceRecord>,
    authorities: Vec<ResourceRecord>,
    additionals: Vec<ResourceRecord>,
}

impl DnsPacket {
    pub fn new(request_id: u16) -> Self {
        Self {
            header: Header {
                request_id,
                ..Header::default()
            },
            ..Self::default()
        }
    }

    pub(crate) fn from_sections(
        header: Header,
        questions: Vec<Question>,
        answers: Vec<ResourceRecord>,
        authorities: Vec<ResourceRecord>,
        additionals: Vec<ResourceRecord>,
    ) -> Self {
        Self {
            header,
            questions,
            answers,
            authorities,
            additionals,
        }
    }

    /// An empty query carrying over id, opcode and recursion desired from `request`.
    pub fn new_query(request: &DnsPacket) -> Self {
        Self {
            header: Header {
                request_id: request.header.request_id,
                flags: Flags {
                    opcode: request.header.flags.opcode,
                    recursion_desired: request.header.flags.recursion_desired,
                    ..Flags::default()
                },
                ..Header::default()
            },
            ..Self::default()
        }
    }

    /// An empty response to `request`. Only standard queries (opcode 0) are supported, any
    /// other opcode is answered with `NOTIMP`.
    pub fn new_response(request: &DnsPacket) -> Self {
        let mut response = Self::new_query(request);
        response.header.flags.response = true;
        let response_code = if request.header.flags.opcode == 0 {
            ResponseCode::NOERROR
        } else {
            ResponseCode::NOTIMP
        };
        response.set_response_code(response_code);
        response
    }

    /// Parses all four sections. Authority and additional records are held to the same rules
    /// as answers, so a malformed record in either fails the whole message even when the
    /// caller only looks at questions and answers.
    pub fn parse(buf: &[u8]) -> Result<Self, FormatError> {
        DnsParser::new(buf).parse()
    }

    pub fn serialize(&self) -> Result<Vec<u8>, FormatError> {
        serialize_packet(self)
    }

    pub fn add_question(
        &mut self,
        domain_name: impl Into<String>,
        r#type: RecordType,
        class: RecordClass,
    ) {
        self.questions
            .push(Question::new(domain_name, r#type, class));
        self.header.question_count = self.header.question_count.saturating_add(1);
    }

    pub fn add_resource_record(
        &mut self,
        name: impl Into<String>,
        r#type: RecordType,
        class: RecordClass,
        ttl: u32,
        data: impl Into<Vec<u8>>,
    ) {
        self.answers
            .push(ResourceRecord::new(name, r#type, class, ttl, data));
        self.header.answer_count = self.header.answer_count.saturating_add(1);
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn request_id(&self) -> u16 {
        self.header.request_id
    }

    pub fn is_response(&self) -> bool {
        self.header.flags.response
    }

    pub fn response_code(&self) -> ResponseCode {
        self.header.flags.response_code.into()
    }

    pub fn set_response_code(&mut self, response_code: ResponseCode) {
        self.header.flags.response_code = response_code.into();
    }

    pub fn set_recursion_desired(&mut self, recursion_desired: bool) {
        self.header.flags.recursion_desired = recursion_desired;
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[ResourceRecord] {
        &self.answers
    }

    pub fn authorities(&self) -> &[ResourceRecord] {
        &self.authorities
    }

    pub fn additionals(&self) -> &[ResourceRecord] {
        &self.additionals
    }
}
