use std::{
    net::{Ipv4Addr, SocketAddr, UdpSocket},
    thread,
    time::Duration,
};

use dns::{
    protocol::{class::RecordClass, record_type::RecordType, response_code::ResponseCode},
    resolver::{Forwarder, Server},
    DnsPacket,
};

const TIMEOUT: Duration = Duration::from_secs(5);

fn bind() -> UdpSocket {
    let socket = UdpSocket::bind(("127.0.0.1", 0)).unwrap();
    socket.set_read_timeout(Some(TIMEOUT)).unwrap();
    socket
}

/// An upstream that answers every question with `A 8.8.8.8`, TTL 60, and stops once it has
/// been idle for a while.
fn spawn_stub_upstream() -> SocketAddr {
    let socket = bind();
    let addr = socket.local_addr().unwrap();

    thread::spawn(move || {
        let mut buf = [0u8; 512];
        while let Ok((len, sender)) = socket.recv_from(&mut buf) {
            let query = DnsPacket::parse(&buf[..len]).unwrap();
            assert_eq!(query.questions().len(), 1, "upstream only gets single questions");

            let mut reply = DnsPacket::new_response(&query);
            for question in query.questions() {
                reply.add_question(question.domain_name.clone(), question.r#type, question.class);
                reply.add_resource_record(
                    question.domain_name.clone(),
                    RecordType::A,
                    RecordClass::IN,
                    60,
                    Ipv4Addr::new(8, 8, 8, 8).octets(),
                );
            }
            socket
                .send_to(&reply.serialize().unwrap(), sender)
                .unwrap();
        }
    });

    addr
}

/// Starts a forwarding server in the background that handles `requests` datagrams.
fn spawn_server(upstream: SocketAddr, requests: usize) -> SocketAddr {
    let client_socket = bind();
    let addr = client_socket.local_addr().unwrap();
    let server = Server::new(client_socket, Forwarder::new(bind(), upstream));

    thread::spawn(move || {
        let mut buf = [0u8; 512];
        for _ in 0..requests {
            server.serve_one(&mut buf).unwrap();
        }
    });

    addr
}

fn ask(server: SocketAddr, request: &[u8]) -> Vec<u8> {
    let client = bind();
    client.send_to(request, server).unwrap();
    let mut buf = [0u8; 512];
    let (len, sender) = client.recv_from(&mut buf).unwrap();
    assert_eq!(sender, server);
    buf[..len].to_vec()
}

#[test]
fn test_forward_single_question() {
    let server = spawn_server(spawn_stub_upstream(), 1);

    let mut request = vec![
        0x04, 0xD2, // id 1234
        0x01, 0x00, // standard query, RD set
        0x00, 0x01, // one question
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ];
    request.extend(b"\x0ccodecrafters\x02io\x00");
    request.extend([0x00, 0x01, 0x00, 0x01]);

    let response = ask(server, &request);

    assert_eq!(&response[0..2], &[0x04, 0xD2]);
    assert_eq!(response[2] & 0x80, 0x80, "QR set");
    assert_eq!(response[3] & 0x0F, 0, "RCODE NOERROR");
    assert_eq!(&response[4..8], &[0, 1, 0, 1], "one question, one answer");

    let parsed = DnsPacket::parse(&response).unwrap();
    assert_eq!(parsed.questions()[0].domain_name, "codecrafters.io.");
    assert_eq!(parsed.answers()[0].ttl, 60);
    assert_eq!(parsed.answers()[0].data, vec![8, 8, 8, 8]);
    assert_eq!(&response[response.len() - 4..], &[8, 8, 8, 8]);
}

#[test]
fn test_forward_compressed_questions() {
    let server = spawn_server(spawn_stub_upstream(), 1);

    let mut request = vec![
        0xAB, 0xCD, 0x01, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ];
    // 12: abc.longassdomainname.com
    request.extend(b"\x03abc\x11longassdomainname\x03com\x00");
    request.extend([0x00, 0x01, 0x00, 0x01]);
    // def + pointer to longassdomainname.com at 16
    request.extend(b"\x03def\xc0\x10");
    request.extend([0x00, 0x01, 0x00, 0x01]);

    let response = DnsPacket::parse(&ask(server, &request)).unwrap();

    assert_eq!(response.request_id(), 0xABCD);
    assert_eq!(response.response_code(), ResponseCode::NOERROR);
    let names: Vec<_> = response
        .questions()
        .iter()
        .map(|q| q.domain_name.as_str())
        .collect();
    assert_eq!(
        names,
        ["abc.longassdomainname.com.", "def.longassdomainname.com."]
    );
    let answer_names: Vec<_> = response.answers().iter().map(|a| a.name.as_str()).collect();
    assert_eq!(answer_names, names);
}

#[test]
fn test_unreachable_upstream_answers_servfail() {
    // bound but never answering
    let silent = UdpSocket::bind(("127.0.0.1", 0)).unwrap();
    let upstream = silent.local_addr().unwrap();

    let client_socket = bind();
    let addr = client_socket.local_addr().unwrap();
    let upstream_socket = bind();
    upstream_socket
        .set_read_timeout(Some(Duration::from_millis(200)))
        .unwrap();
    let server = Server::new(client_socket, Forwarder::new(upstream_socket, upstream));
    thread::spawn(move || {
        let mut buf = [0u8; 512];
        server.serve_one(&mut buf).unwrap();
    });

    let mut request = DnsPacket::new(7);
    request.add_question("example.com", RecordType::A, RecordClass::IN);
    let response = DnsPacket::parse(&ask(addr, &request.serialize().unwrap())).unwrap();

    assert_eq!(response.request_id(), 7);
    assert_eq!(response.response_code(), ResponseCode::SERVFAIL);
    assert_eq!(response.questions().len(), 1);
    assert!(response.answers().is_empty());
    drop(silent);
}
