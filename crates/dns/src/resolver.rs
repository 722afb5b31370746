use std::{
    io,
    net::{Ipv4Addr, SocketAddr, UdpSocket},
};

use tracing::{debug, error, info, info_span, warn};

use crate::{
    error::{DnsError, Result},
    protocol::{
        class::RecordClass, header::Header, packet::DnsPacket, record_type::RecordType,
        response_code::ResponseCode,
    },
    serialize::generate_error_response,
};

/// Receive buffer size, large enough for anything an upstream answers over UDP.
pub const MAX_DATAGRAM_SIZE: usize = 4096;

const DEFAULT_ID: u16 = 1337;

/// Datagram primitives the resolver needs from a socket.
pub trait Transport {
    fn send_to(&self, buf: &[u8], addr: SocketAddr) -> io::Result<usize>;
    fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)>;
}

impl Transport for UdpSocket {
    fn send_to(&self, buf: &[u8], addr: SocketAddr) -> io::Result<usize> {
        UdpSocket::send_to(self, buf, addr)
    }

    fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        UdpSocket::recv_from(self, buf)
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send_to(&self, buf: &[u8], addr: SocketAddr) -> io::Result<usize> {
        (**self).send_to(buf, addr)
    }

    fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        (**self).recv_from(buf)
    }
}

/// Turns a request into the response sent back to the client.
pub trait Resolve {
    fn resolve(&self, request: &DnsPacket) -> Result<DnsPacket>;
}

/// Relays queries to an upstream resolver, one question per upstream query, and merges the
/// replies into a single response.
///
/// Upstreams are not required to support more than one question per query, so a request with
/// `n` questions turns into `n` sequential round trips.
#[derive(Debug)]
pub struct Forwarder<T> {
    upstream: T,
    upstream_addr: SocketAddr,
}

impl<T: Transport> Forwarder<T> {
    pub fn new(upstream: T, upstream_addr: SocketAddr) -> Self {
        Self {
            upstream,
            upstream_addr,
        }
    }

    pub fn upstream_addr(&self) -> SocketAddr {
        self.upstream_addr
    }

    /// Sends `query` upstream and blocks until its reply arrives.
    ///
    /// Datagrams from other peers, runts without a full header, replies carrying another id
    /// and replies to other questions are discarded. Queries sharing an id are only told
    /// apart by their question section.
    pub fn exchange(&self, query: &DnsPacket) -> Result<DnsPacket> {
        let bytes = query.serialize()?;
        self.upstream.send_to(&bytes, self.upstream_addr)?;

        let mut buf = [0u8; MAX_DATAGRAM_SIZE];
        loop {
            let (len, sender) = self.upstream.recv_from(&mut buf)?;
            let datagram = &buf[..len];

            if sender != self.upstream_addr {
                warn!("Discarding {len} bytes from unexpected peer {sender}");
                continue;
            }

            let header = match Header::parse(datagram) {
                Ok(header) => header,
                Err(e) => {
                    warn!("Discarding {len} bytes from {sender}: {e}");
                    continue;
                }
            };
            if header.request_id != query.request_id() {
                debug!(
                    "Discarding stale reply {} while waiting for {}",
                    header.request_id,
                    query.request_id()
                );
                continue;
            }

            let reply = DnsPacket::parse(datagram)?;
            if !reply.is_response() {
                return Err(DnsError::UnexpectedReply(reply.request_id()));
            }
            if !answers_questions(query, &reply) {
                debug!(
                    "Discarding reply {} to other questions {:?}",
                    reply.request_id(),
                    reply.questions()
                );
                continue;
            }
            return Ok(reply);
        }
    }
}

impl<T: Transport> Resolve for Forwarder<T> {
    fn resolve(&self, request: &DnsPacket) -> Result<DnsPacket> {
        let mut response = DnsPacket::new_response(request);

        for question in request.questions() {
            let mut query = DnsPacket::new_query(request);
            query.add_question(question.domain_name.clone(), question.r#type, question.class);

            debug!(
                "Forwarding {} {} to {}",
                question.r#type, question.domain_name, self.upstream_addr
            );
            let reply = self.exchange(&query)?;

            for q in reply.questions() {
                response.add_question(q.domain_name.clone(), q.r#type, q.class);
            }
            for answer in reply.answers() {
                response.add_resource_record(
                    answer.name.clone(),
                    answer.r#type,
                    answer.class,
                    answer.ttl,
                    answer.data.clone(),
                );
            }
        }

        Ok(response)
    }
}

// Upstreams echo the question section, so the reply has to carry exactly what was sent.
fn answers_questions(query: &DnsPacket, reply: &DnsPacket) -> bool {
    query.questions().len() == reply.questions().len()
        && query
            .questions()
            .iter()
            .zip(reply.questions())
            .all(|(sent, echoed)| sent.matches(echoed))
}

/// Answers every question itself with the same `A` record, without asking anyone.
#[derive(Debug, Clone)]
pub struct StaticResolver {
    pub ttl: u32,
    pub address: Ipv4Addr,
}

impl Default for StaticResolver {
    fn default() -> Self {
        Self {
            ttl: 60,
            address: Ipv4Addr::new(8, 8, 8, 8),
        }
    }
}

impl Resolve for StaticResolver {
    fn resolve(&self, request: &DnsPacket) -> Result<DnsPacket> {
        let mut response = DnsPacket::new_response(request);
        for question in request.questions() {
            response.add_question(question.domain_name.clone(), question.r#type, question.class);
        }
        for question in request.questions() {
            response.add_resource_record(
                question.domain_name.clone(),
                RecordType::A,
                RecordClass::IN,
                self.ttl,
                self.address.octets(),
            );
        }
        Ok(response)
    }
}

/// Looks up `domain` at `server` with a single recursive query.
pub fn query<T: Transport>(
    transport: T,
    server: SocketAddr,
    domain: &str,
    record_type: RecordType,
) -> Result<DnsPacket> {
    let mut request = DnsPacket::new(DEFAULT_ID);
    request.set_recursion_desired(true);
    request.add_question(domain, record_type, RecordClass::IN);

    Forwarder::new(transport, server).exchange(&request)
}

/// Serves client datagrams one at a time: parse, resolve, serialize, reply.
///
/// Nothing is processed concurrently. While a request waits on the resolver no other
/// client is served.
#[derive(Debug)]
pub struct Server<R, T = UdpSocket> {
    client: T,
    resolver: R,
}

impl<R: Resolve, T: Transport> Server<R, T> {
    pub fn new(client: T, resolver: R) -> Self {
        Self { client, resolver }
    }

    pub fn run(&self) {
        let mut buf = [0u8; MAX_DATAGRAM_SIZE];
        loop {
            if let Err(e) = self.serve_one(&mut buf) {
                error!("Failed to serve request: {e}");
            }
        }
    }

    /// Waits for one client datagram and answers it.
    pub fn serve_one(&self, buf: &mut [u8]) -> Result<()> {
        let (len, sender) = self.client.recv_from(buf)?;
        let span = info_span!("request", %sender);
        let _enter = span.enter();

        if let Some(response) = self.handle_datagram(&buf[..len]) {
            self.client.send_to(&response, sender)?;
        }
        Ok(())
    }

    /// Runs one request through the resolver and returns the datagram to send back, if any.
    ///
    /// A request that cannot be parsed is answered with `FORMERR` as long as its header is
    /// readable, and dropped otherwise. A failing resolver results in `SERVFAIL`.
    pub fn handle_datagram(&self, datagram: &[u8]) -> Option<Vec<u8>> {
        let request = match DnsPacket::parse(datagram) {
            Ok(request) => request,
            Err(e) => {
                return match Header::parse(datagram) {
                    Ok(header) => {
                        warn!("Malformed request {}: {e}", header.request_id);
                        Some(generate_error_response(&header, ResponseCode::FORMERR).to_vec())
                    }
                    Err(_) => {
                        warn!("Dropping {} byte datagram: {e}", datagram.len());
                        None
                    }
                };
            }
        };

        let response = self.resolver.resolve(&request).unwrap_or_else(|e| {
            warn!("Could not resolve request {}: {e}", request.request_id());
            server_failure(&request)
        });

        match response.serialize() {
            Ok(bytes) => {
                info!(
                    "Answered request {} with {} questions, {} answers [{:?}]",
                    response.request_id(),
                    response.questions().len(),
                    response.answers().len(),
                    response.response_code(),
                );
                Some(bytes)
            }
            Err(e) => {
                error!("Could not serialize response {}: {e}", response.request_id());
                Some(generate_error_response(request.header(), ResponseCode::SERVFAIL).to_vec())
            }
        }
    }
}

/// The response for a request the resolver gave up on: its questions and no answers.
fn server_failure(request: &DnsPacket) -> DnsPacket {
    let mut response = DnsPacket::new_response(request);
    for question in request.questions() {
        response.add_question(question.domain_name.clone(), question.r#type, question.class);
    }
    response.set_response_code(ResponseCode::SERVFAIL);
    response
}
