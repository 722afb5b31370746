//! A small DNS message codec plus a forwarding resolver built on top of it.
//!
//! [`protocol`] holds the message model, [`parse`] and [`serialize`] move it from and to the
//! wire, and [`resolver`] relays client queries to an upstream server.

pub mod error;
pub mod parse;
pub mod protocol;
pub mod resolver;
pub mod serialize;

pub use error::{DnsError, FormatError};
pub use protocol::packet::DnsPacket;
