//! minipaste server entrypoint.

use minipaste_core::config::env_flag_enabled;
use minipaste_server::{config::Config, db::Database, resolve_bind_address, serve_router, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CliFlags {
    help: bool,
    purge_expired: bool,
}

fn parse_cli_flags(args: &[String]) -> anyhow::Result<CliFlags> {
    let mut flags = CliFlags::default();
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => flags.help = true,
            "--purge-expired" => flags.purge_expired = true,
            value if value.starts_with('-') => {
                anyhow::bail!(
                    "Unknown option: '{}'. Use --help to see supported options.",
                    value
                );
            }
            value => {
                anyhow::bail!(
                    "Unexpected positional argument: '{}'. Use --help to see supported options.",
                    value
                );
            }
        }
    }
    Ok(flags)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "minipaste=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let cli_flags = parse_cli_flags(&args)?;

    if cli_flags.help {
        print_help();
        return Ok(());
    }

    let config = Config::from_env();
    let database = Database::new(&config.db_path)?;

    if cli_flags.purge_expired {
        let removed = database.purge_expired(chrono::Utc::now())?;
        println!("Removed {} expired pastes", removed);
        return Ok(());
    }

    if config.auth_enabled() {
        tracing::info!(
            "Basic auth enabled for static and admin pages ({} users)",
            config.basic_auth.len()
        );
    } else {
        tracing::warn!("BASIC_AUTH is not set - admin page is publicly readable");
    }

    let allow_public = env_flag_enabled("ALLOW_PUBLIC_ACCESS");
    let bind_addr = resolve_bind_address(&config, allow_public);
    let state = AppState::new(config, database);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("minipaste running at http://{}", bind_addr);

    serve_router(listener, state, shutdown_signal()).await?;
    tracing::info!("Server stopped");

    Ok(())
}

fn print_help() {
    println!("minipaste server\n");
    println!("Usage: minipaste [OPTIONS]\n");
    println!("Options:");
    println!("  --purge-expired   Delete expired pastes and exit");
    println!("  --help            Show this help message");
    println!("\nEnvironment variables:");
    println!("  DB_PATH                Database directory (default: ~/.cache/minipaste/db)");
    println!(
        "  PORT                   Server port (default: {})",
        minipaste_server::DEFAULT_PORT
    );
    println!("  BIND                   Override bind address (e.g. 0.0.0.0:8080)");
    println!("  ALLOW_PUBLIC_ACCESS    Permit binding to non-loopback addresses");
    println!("  BASE_URL               Public base URL used in page links");
    println!("  REPO                   Source repository link on the index page");
    println!("  FAVICON                Redirect target for /favicon.ico");
    println!("  TOS_MAINTAINER         Maintainer named in the terms page");
    println!("  TOS_MAIL               Contact address in the terms page");
    println!("  CACHE_STATIC_PAGE_AGE  max-age for static pages, in seconds");
    println!("  CACHE_PASTE_AGE        max-age for paste reads, in seconds");
    println!("  BASIC_AUTH             user:pass[,user:pass...] gating static/admin pages");
    println!("  HIGHLIGHT_THEME        syntect theme for ?lang= views");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down gracefully...");
}

#[cfg(test)]
mod tests {
    use super::{parse_cli_flags, CliFlags};

    fn args(values: &[&str]) -> Vec<String> {
        std::iter::once("minipaste")
            .chain(values.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn parse_cli_flags_rejects_unknown_and_positional_arguments() {
        let cases = [
            (args(&["--purge-expird"]), "Unknown option"),
            (args(&["serve"]), "Unexpected positional argument"),
        ];

        for (args, expected_fragment) in cases {
            let err = parse_cli_flags(&args).expect_err("invalid args should be rejected");
            assert!(err.to_string().contains(expected_fragment));
        }
    }

    #[test]
    fn parse_cli_flags_accepts_supported_options() {
        let flags = parse_cli_flags(&args(&["--purge-expired", "-h"])).expect("known options");
        assert_eq!(
            flags,
            CliFlags {
                help: true,
                purge_expired: true,
            }
        );
        assert_eq!(parse_cli_flags(&args(&[])).expect("no options"), CliFlags::default());
    }
}
