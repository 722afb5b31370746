use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct ServerArgs {
    /// DNS server to forward to, as `host:port`
    /// Without one, every question is answered locally with a fixed A record
    #[arg(short, long)]
    pub resolver: Option<String>,

    /// Address to listen on
    #[arg(short, long, default_value_t = String::from("127.0.0.1"))]
    pub bind_address: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 2053)]
    pub port: u16,

    /// How long to wait for an upstream reply before answering with SERVFAIL, waits forever if unset
    #[arg(short, long)]
    pub timeout_ms: Option<u64>,

    /// Log level, overridden by `RUST_LOG`
    #[arg(short, long, default_value_t = String::from("info"))]
    pub log_level: String,

    /// Whether to disable logging
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}

impl ServerArgs {
    pub fn from_env() -> Self {
        Self::parse()
    }
}
