use std::{
    net::{SocketAddr, ToSocketAddrs, UdpSocket},
    time::Duration,
};

use anyhow::Context;
use clap::Parser;
use dns::{protocol::record_type::RecordType, resolver::query};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct ClientArgs {
    /// Domain to resolve
    domain: String,

    /// DNS server to ask, as `host:port`
    #[arg(default_value_t = String::from("1.1.1.1:53"))]
    dns_server: String,

    /// Record type to ask for
    #[arg(short = 't', long = "type", default_value_t = RecordType::A)]
    record_type: RecordType,
}

fn main() -> anyhow::Result<()> {
    let args = ClientArgs::parse();
    let server: SocketAddr = args
        .dns_server
        .to_socket_addrs()?
        .next()
        .with_context(|| format!("{:?} did not resolve to any address", args.dns_server))?;

    println!(
        "Resolving {} {} via DNS {server}\n\n",
        args.record_type, args.domain
    );

    let local: SocketAddr = if server.is_ipv4() {
        ([0, 0, 0, 0], 0).into()
    } else {
        ([0u16; 8], 0).into()
    };
    let socket = UdpSocket::bind(local)?;
    socket.set_read_timeout(Some(Duration::from_secs(5)))?;

    let reply = query(&socket, server, &args.domain, args.record_type)
        .context("Error resolving DNS records")?;

    println!("{:?}", reply.response_code());
    for answer in reply.answers() {
        match answer.ipv4() {
            Some(ipv4) => println!("{}\t{}\t{}\t{ipv4}", answer.name, answer.ttl, answer.r#type),
            None => println!(
                "{}\t{}\t{}\t{} bytes: {:02x?}",
                answer.name,
                answer.ttl,
                answer.r#type,
                answer.len(),
                answer.data
            ),
        }
    }

    Ok(())
}
