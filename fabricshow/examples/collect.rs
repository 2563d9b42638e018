//! Collect alias-enriched port reports for one fabric
//!
//! Reads the fabric inventory, logs into every switch of the requested
//! fabric and writes `zoneshow.<fabric>`, `aliases.<fabric>` and one
//! `switchshow.<switch>` file per switch.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example collect -- --fabric fabric_a --user admin --password secret
//! ```
//!
//! With SSH key and JSON on stdout:
//! ```bash
//! cargo run --example collect -- --fabric fabric_a --user admin --key ~/.ssh/id_rsa --json
//! ```

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use fabricshow::inventory::DEFAULT_INVENTORY;
use fabricshow::platform::brocade;
use fabricshow::report::write_fabric_report;
use fabricshow::{Inventory, SessionBuilder, SshConnector, collect_fabric};

/// Environment variable consulted when no `--password` is given.
const PASSWORD_ENV: &str = "FABRICSHOW_PASSWORD";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let Some(fabric) = &args.fabric else {
        eprintln!("Error: --fabric is required");
        Args::print_help();
        std::process::exit(1);
    };

    let inventory = Inventory::from_path(&args.config)?;
    let hosts = match inventory.fabric(fabric) {
        Ok(hosts) => hosts,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!(
                "Known fabrics: {}",
                inventory.fabric_names().collect::<Vec<_>>().join(", ")
            );
            std::process::exit(1);
        }
    };

    let mut template = SessionBuilder::new(&hosts[0])
        .port(args.port)
        .username(&args.user)
        .platform(brocade::platform())
        .timeout(Duration::from_secs(args.timeout));

    if let Some(password) = args.password.clone().or_else(|| env::var(PASSWORD_ENV).ok()) {
        template = template.password(password);
    } else if let Some(key_path) = &args.key {
        template = template.private_key(key_path);
    } else {
        eprintln!("Error: Must provide --password, --key or {}", PASSWORD_ENV);
        std::process::exit(1);
    }

    let connector = SshConnector::new(template);
    let report = collect_fabric(&connector, fabric, hosts, &brocade::platform()).await;

    let written = write_fabric_report(&args.out, &report).await?;
    for path in &written {
        println!("wrote {}", path.display());
    }

    if args.json {
        let switches: Vec<_> = report
            .switches
            .iter()
            .map(|s| match &s.outcome {
                Ok(table) => serde_json::json!({
                    "switch": s.name,
                    "records": table.records,
                    "anomalies": table.anomalies,
                }),
                Err(e) => serde_json::json!({
                    "switch": s.name,
                    "error": e.to_string(),
                }),
            })
            .collect();
        let doc = serde_json::json!({
            "fabric": report.fabric,
            "aliases": report.zones.records,
            "switches": switches,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    }

    let failed = report.switches.iter().filter(|s| !s.is_success()).count();
    let anomalies = report.anomalies().count();
    println!(
        "{}: {} switch(es), {} failed, {} anomal{}",
        report.fabric,
        report.switches.len(),
        failed,
        anomalies,
        if anomalies == 1 { "y" } else { "ies" }
    );

    Ok(())
}

/// Simple argument parser (avoiding external dependencies)
struct Args {
    config: PathBuf,
    fabric: Option<String>,
    user: String,
    password: Option<String>,
    key: Option<PathBuf>,
    port: u16,
    timeout: u64,
    out: PathBuf,
    json: bool,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut config = PathBuf::from(DEFAULT_INVENTORY);
        let mut fabric = None;
        let mut user = env::var("USER").unwrap_or_else(|_| "admin".to_string());
        let mut password = None;
        let mut key = None;
        let mut port = 22u16;
        let mut timeout = 30u64;
        let mut out = PathBuf::from(".");
        let mut json = false;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--config" | "-c" => {
                    i += 1;
                    if i < args.len() {
                        config = PathBuf::from(&args[i]);
                    }
                }
                "--fabric" | "-f" => {
                    i += 1;
                    if i < args.len() {
                        fabric = Some(args[i].clone());
                    }
                }
                "--user" | "-u" => {
                    i += 1;
                    if i < args.len() {
                        user = args[i].clone();
                    }
                }
                "--password" | "-P" => {
                    i += 1;
                    if i < args.len() {
                        password = Some(args[i].clone());
                    }
                }
                "--key" | "-k" => {
                    i += 1;
                    if i < args.len() {
                        key = Some(PathBuf::from(&args[i]));
                    }
                }
                "--port" | "-p" => {
                    i += 1;
                    if i < args.len() {
                        port = args[i].parse().unwrap_or(22);
                    }
                }
                "--timeout" | "-t" => {
                    i += 1;
                    if i < args.len() {
                        timeout = args[i].parse().unwrap_or(30);
                    }
                }
                "--out" | "-o" => {
                    i += 1;
                    if i < args.len() {
                        out = PathBuf::from(&args[i]);
                    }
                }
                "--json" => json = true,
                "--help" | "-h" => {
                    Self::print_help();
                    std::process::exit(0);
                }
                _ => {
                    eprintln!("Unknown argument: {}", args[i]);
                }
            }
            i += 1;
        }

        Self {
            config,
            fabric,
            user,
            password,
            key,
            port,
            timeout,
            out,
            json,
        }
    }

    fn print_help() {
        println!(
            r#"fabricshow collect example

USAGE:
    cargo run --example collect -- --fabric <NAME> [OPTIONS]

OPTIONS:
    -f, --fabric <NAME>      Fabric to collect (as named in the inventory)
    -c, --config <PATH>      Inventory file [default: fabricshow.conf]
    -u, --user <USER>        Switch username [default: $USER]
    -P, --password <PASS>    Password [default: $FABRICSHOW_PASSWORD]
    -k, --key <PATH>         Path to SSH private key
    -p, --port <PORT>        SSH port [default: 22]
    -t, --timeout <SECS>     Per-command timeout [default: 30]
    -o, --out <DIR>          Report directory [default: .]
    --json                   Also print the reports as JSON
    -h, --help               Print this help message

INVENTORY:
    # host                  fabric
    san-a1.example.com  =>  fabric_a
    san-a2.example.com  =>  fabric_a
"#
        );
    }
}
