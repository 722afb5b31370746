mod cli;

use std::{
    net::{SocketAddr, ToSocketAddrs, UdpSocket},
    time::Duration,
};

use anyhow::Context;
use cli::ServerArgs;
use dns::resolver::{Forwarder, Server, StaticResolver};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let server_args = ServerArgs::from_env();
    init_logging(&server_args);

    let client_socket = UdpSocket::bind((server_args.bind_address.as_str(), server_args.port))
        .with_context(|| {
            format!(
                "Could not bind to {}:{}",
                server_args.bind_address, server_args.port
            )
        })?;

    info!(
        "Started DNS forwarder on {} [resolver={:?}]",
        client_socket.local_addr()?,
        server_args.resolver
    );

    match &server_args.resolver {
        Some(resolver) => {
            let upstream_addr = resolve_upstream(resolver)?;
            let upstream_socket = bind_upstream_socket(&upstream_addr, server_args.timeout_ms)?;
            Server::new(client_socket, Forwarder::new(upstream_socket, upstream_addr)).run();
        }
        None => {
            let resolver = StaticResolver::default();
            info!(
                "No resolver given, answering with {} [ttl={}s]",
                resolver.address, resolver.ttl
            );
            Server::new(client_socket, resolver).run();
        }
    }

    Ok(())
}

fn init_logging(server_args: &ServerArgs) {
    let filter = if server_args.quiet {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&server_args.log_level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn resolve_upstream(resolver: &str) -> anyhow::Result<SocketAddr> {
    resolver
        .to_socket_addrs()
        .with_context(|| format!("Invalid resolver address {resolver:?}"))?
        .next()
        .with_context(|| format!("Resolver {resolver:?} did not resolve to any address"))
}

fn bind_upstream_socket(upstream: &SocketAddr, timeout_ms: Option<u64>) -> anyhow::Result<UdpSocket> {
    let local: SocketAddr = if upstream.is_ipv4() {
        ([0, 0, 0, 0], 0).into()
    } else {
        ([0u16; 8], 0).into()
    };
    let socket = UdpSocket::bind(local).context("Could not bind upstream socket")?;

    let timeout = timeout_ms.filter(|ms| *ms > 0).map(Duration::from_millis);
    socket.set_read_timeout(timeout)?;
    info!("Forwarding to {upstream} [timeout={timeout:?}]");

    Ok(socket)
}
