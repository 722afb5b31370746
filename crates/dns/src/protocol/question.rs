use super::{class::RecordClass, record_type::RecordType};
use crate::serialize::encode_domain_name;

// Question section format https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.2
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub domain_name: String,
    pub r#type: RecordType,
    pub class: RecordClass,
}

impl Question {
    pub fn new(domain_name: impl Into<String>, r#type: RecordType, class: RecordClass) -> Self {
        Self {
            domain_name: domain_name.into(),
            r#type,
            class,
        }
    }

    /// Whether `other` asks the same thing. Names are compared in wire form and ignoring ASCII
    /// case, so `"Example.com"` matches `"example.com."`. A name that cannot be encoded matches
    /// nothing.
    pub fn matches(&self, other: &Question) -> bool {
        if self.r#type != other.r#type || self.class != other.class {
            return false;
        }
        match (
            encode_domain_name(&self.domain_name),
            encode_domain_name(&other.domain_name),
        ) {
            (Ok(ours), Ok(theirs)) => ours.eq_ignore_ascii_case(&theirs),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Question;
    use crate::protocol::{class::RecordClass, record_type::RecordType};

    #[test]
    fn test_matches_ignores_case_and_trailing_dot() {
        let sent = Question::new("codecrafters.io", RecordType::A, RecordClass::IN);
        let echoed = Question::new("CodeCrafters.IO.", RecordType::A, RecordClass::IN);
        assert!(sent.matches(&echoed));
        assert!(echoed.matches(&sent));
    }

    #[test]
    fn test_matches_compares_type_class_and_name() {
        let sent = Question::new("a.example.", RecordType::A, RecordClass::IN);
        assert!(!sent.matches(&Question::new("b.example.", RecordType::A, RecordClass::IN)));
        assert!(!sent.matches(&Question::new("a.example.", RecordType::AAAA, RecordClass::IN)));
        assert!(!sent.matches(&Question::new("a.example.", RecordType::A, RecordClass::CH)));
        assert!(!sent.matches(&Question::new("a..example.", RecordType::A, RecordClass::IN)));
    }
}
