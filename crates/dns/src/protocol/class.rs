/// CLASS and QCLASS values, see https://datatracker.ietf.org/doc/html/rfc1035#section-3.2.4
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum RecordClass {
    IN, // 1 the Internet
    CS, // 2 the CSNET class (Obsolete - used only for examples in some obsolete RFCs)
    CH, // 3 the CHAOS class
    HS, // 4 Hesiod [Dyer 87]
    // QCLASS
    ANY, // 255 any class
    Unknown(u16),
}

impl From<u16> for RecordClass {
    fn from(input: u16) -> Self {
        match input {
            1 => Self::IN,
            2 => Self::CS,
            3 => Self::CH,
            4 => Self::HS,
            255 => Self::ANY,
            _ => Self::Unknown(input),
        }
    }
}

impl From<RecordClass> for u16 {
    fn from(value: RecordClass) -> Self {
        match value {
            RecordClass::IN => 1,
            RecordClass::CS => 2,
            RecordClass::CH => 3,
            RecordClass::HS => 4,
            RecordClass::ANY => 255,
            RecordClass::Unknown(n) => n,
        }
    }
}
