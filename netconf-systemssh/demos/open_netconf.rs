//! Open a NETCONF session through the system ssh client and print the
//! start of the server's capabilities.
//!
//! # Prerequisites
//!
//! - OpenSSH client on `$PATH`
//! - A NETCONF server (usually port 830) accepting password logins
//!
//! # Usage
//!
//! ```bash
//! cargo run --example open_netconf -- --host 192.168.1.1 --user admin --password admin
//! ```

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use netconf_systemssh::{NetconfSystemSshTransport, SystemSshConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (set RUST_LOG=debug to see every read during login)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = SystemSshConfig::new(&args.host)
        .port(args.port)
        .username(&args.user)
        .strict_key(!args.insecure)
        .timeout_ops(Duration::from_secs(args.timeout));

    if let Some(password) = &args.password {
        config = config.password(password);
    }
    if let Some(key) = &args.key {
        config = config.private_key(key);
    }

    let mut transport = NetconfSystemSshTransport::new(config);
    println!("Spawning: {}", transport.open_cmd().join(" "));

    let greeting = transport.open_netconf().await?;
    println!("Authenticated, server greeting starts with:");
    println!("{}", "-".repeat(50));
    println!("{}", String::from_utf8_lossy(&greeting));
    println!("{}", "-".repeat(50));

    transport.close().await?;
    println!("Done!");

    Ok(())
}

/// Simple argument parser (avoiding external dependencies)
struct Args {
    host: String,
    port: u16,
    user: String,
    password: Option<String>,
    key: Option<PathBuf>,
    insecure: bool,
    timeout: u64,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut parsed = Self {
            host: "localhost".to_string(),
            port: 830,
            user: env::var("USER").unwrap_or_else(|_| "root".to_string()),
            password: None,
            key: None,
            insecure: false,
            timeout: 30,
        };

        let mut i = 1;
        while i < args.len() {
            let value = args.get(i + 1).cloned();
            match args[i].as_str() {
                "--host" | "-h" => parsed.host = value.unwrap_or(parsed.host),
                "--port" | "-p" => {
                    parsed.port = value.and_then(|v| v.parse().ok()).unwrap_or(830)
                }
                "--user" | "-u" => parsed.user = value.unwrap_or(parsed.user),
                "--password" | "-P" => parsed.password = value,
                "--key" | "-k" => parsed.key = value.map(PathBuf::from),
                "--timeout" | "-t" => {
                    parsed.timeout = value.and_then(|v| v.parse().ok()).unwrap_or(30)
                }
                "--insecure" => {
                    parsed.insecure = true;
                    i += 1;
                    continue;
                }
                "--help" => {
                    Self::print_help();
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown argument: {}", other);
                    i += 1;
                    continue;
                }
            }
            i += 2;
        }

        parsed
    }

    fn print_help() {
        println!(
            r#"netconf-systemssh open_netconf example

USAGE:
    cargo run --example open_netconf -- [OPTIONS]

OPTIONS:
    -h, --host <HOST>        Target host [default: localhost]
    -p, --port <PORT>        NETCONF port [default: 830]
    -u, --user <USER>        Username [default: $USER]
    -P, --password <PASS>    Password typed at the ssh prompt
    -k, --key <PATH>         Path to SSH private key
    -t, --timeout <SECS>     Login timeout [default: 30]
    --insecure               Disable strict host key checking
    --help                   Print this help message
"#
        );
    }
}
