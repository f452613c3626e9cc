//! CLI probe for the redirect service.
//!
//! Runs the same resolution logic as `GET /r/{code}` from the command line,
//! without starting the HTTP server.
//!
//! # Usage
//!
//! ```bash
//! # Resolve a short code as an anonymous client
//! cargo run --bin probe -- lookup abc123
//!
//! # Resolve it as if requested through a CDN
//! cargo run --bin probe -- lookup abc123 --forwarded-for "1.2.3.4, 10.0.0.1" --user-agent "Mozilla/5.0"
//!
//! # Check backend reachability
//! cargo run --bin probe -- health
//!
//! # Show effective configuration
//! cargo run --bin probe -- config
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see [`utm_redirect::config`].

use utm_redirect::config::{self, Config, mask_connection_string};
use utm_redirect::domain::{ClientMetadata, Resolution};
use utm_redirect::server::build_state;

use anyhow::Result;
use axum::http::HeaderValue;
use clap::{Args, Parser, Subcommand};
use colored::*;

/// CLI tool for probing the utm-redirect backend.
#[derive(Parser)]
#[command(name = "probe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Resolve a short code through the backend
    Lookup {
        /// Short code to resolve
        code: String,

        #[command(flatten)]
        client: ClientArgs,
    },

    /// Check backend reachability
    Health,

    /// Print the effective configuration
    Config,
}

/// Simulated client headers.
#[derive(Args)]
struct ClientArgs {
    /// Value sent as `user-agent`
    #[arg(long)]
    user_agent: Option<String>,

    /// Value sent as `referer`
    #[arg(long)]
    referer: Option<String>,

    /// Incoming `x-forwarded-for` chain
    #[arg(long)]
    forwarded_for: Option<String>,

    /// Incoming `x-real-ip`
    #[arg(long)]
    real_ip: Option<String>,

    /// Incoming `cf-connecting-ip`
    #[arg(long)]
    cf_connecting_ip: Option<String>,
}

impl From<ClientArgs> for ClientMetadata {
    fn from(args: ClientArgs) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
        let header = |v: Option<String>| non_empty(v).and_then(|s| HeaderValue::from_str(&s).ok());
        Self {
            user_agent: header(args.user_agent),
            referer: header(args.referer),
            forwarded_for: non_empty(args.forwarded_for),
            real_ip: non_empty(args.real_ip),
            cf_connecting_ip: non_empty(args.cf_connecting_ip),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    match cli.command {
        Commands::Lookup { code, client } => lookup(&config, &code, client.into()).await?,
        Commands::Health => health(&config).await?,
        Commands::Config => print_config(&config),
    }

    Ok(())
}

/// Resolves `code` and prints the outbound headers and the outcome.
async fn lookup(config: &Config, code: &str, client: ClientMetadata) -> Result<()> {
    let state = build_state(config)?;

    println!("{}", "🔎 Lookup".bright_blue().bold());
    println!("  Code:      {}", code.cyan());
    println!(
        "  Client IP: {}",
        client.client_ip().unwrap_or("-").bright_white()
    );
    println!();
    println!("{}", "Outbound headers:".bright_white().bold());
    for (name, value) in client.outbound_headers().iter() {
        println!(
            "  {}: {}",
            name.as_str().bright_cyan(),
            value.to_str().unwrap_or("<binary>")
        );
    }
    println!();

    match state.redirect_service.resolve(code, &client).await {
        Ok(Resolution::Found(location)) => {
            println!("{} {}", "✅ 302 →".green().bold(), location.bright_yellow());
            Ok(())
        }
        Ok(Resolution::Permanent(location)) => {
            println!(
                "{} {} {}",
                "✅ 308 →".green().bold(),
                location.bright_yellow(),
                "(static)".dimmed()
            );
            Ok(())
        }
        Err(e) => {
            println!(
                "{} {}",
                format!("❌ {}", e.status_code()).red().bold(),
                e.to_string().red()
            );
            Err(anyhow::anyhow!("Lookup failed: {}", e))
        }
    }
}

/// Checks backend reachability.
async fn health(config: &Config) -> Result<()> {
    let state = build_state(config)?;

    print!(
        "Backend {} ... ",
        mask_connection_string(&config.backend_url).cyan()
    );

    if state.redirect_service.backend_healthy().await {
        println!("{}", "OK".green().bold());
        Ok(())
    } else {
        println!("{}", "UNREACHABLE".red().bold());
        anyhow::bail!("Backend is unreachable")
    }
}

/// Prints the configuration with credentials masked.
fn print_config(config: &Config) {
    println!("{}", "⚙️  Configuration".bright_blue().bold());
    println!("  Listen:          {}", config.listen_addr);
    println!(
        "  Backend:         {}",
        mask_connection_string(&config.backend_url)
    );
    println!("  Backend timeout: {}s", config.backend_timeout_secs);
    if config.is_rate_limited() {
        println!(
            "  Rate limit:      {}/s, burst {}",
            config.rate_limit_per_second, config.rate_limit_burst
        );
    } else {
        println!("  Rate limit:      {}", "disabled".dimmed());
    }

    if config.static_redirects.is_empty() {
        println!("  Static redirects: {}", "none".dimmed());
    } else {
        println!("  Static redirects:");
        let mut entries: Vec<_> = config.static_redirects.iter().collect();
        entries.sort();
        for (code, target) in entries {
            println!("    {} → {}", code.cyan(), target);
        }
    }
}
