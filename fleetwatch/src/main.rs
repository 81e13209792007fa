//! Entry point for the fleetwatch daemon. Loads config, starts the poller and
//! serves the manual trigger.

use anyhow::Context;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fleetwatch::config::load_config;
use fleetwatch::http::build_router;
use fleetwatch::notifier::{LogNotifier, Notifier, TelegramNotifier};
use fleetwatch::policy::Monitor;
use fleetwatch::runner::ShellRunner;
use fleetwatch::scheduler::spawn_scheduler;
use fleetwatch::state::AppState;

struct ParsedArgs {
    config: Option<PathBuf>,
    port: Option<u16>,
}

fn usage(prog: &str) -> String {
    format!("Usage: {prog} [--config PATH|-c PATH] [--port PORT|-p PORT]")
}

fn missing_value(prog: &str, flag: &str) -> String {
    format!("Missing value for '{flag}'. {}", usage(prog))
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, String> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "fleetwatch".into());
    let mut config: Option<PathBuf> = None;
    let mut port: Option<String> = None;

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(usage(&prog)),
            "--config" | "-c" => {
                let v = it.next().ok_or_else(|| missing_value(&prog, &arg))?;
                config = Some(PathBuf::from(v));
            }
            "--port" | "-p" => {
                port = Some(it.next().ok_or_else(|| missing_value(&prog, &arg))?);
            }
            _ if arg.starts_with("--config=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        config = Some(PathBuf::from(v));
                    }
                }
            }
            _ if arg.starts_with("--port=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    port = Some(v.to_string());
                }
            }
            _ => return Err(format!("Unexpected argument '{arg}'. {}", usage(&prog))),
        }
    }

    let port = match port {
        Some(p) => Some(
            p.parse::<u16>()
                .map_err(|_| format!("Invalid port '{p}'. {}", usage(&prog)))?,
        ),
        None => None,
    };
    Ok(ParsedArgs { config, port })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let parsed = match parse_args(env::args()) {
        Ok(v) => v,
        Err(msg) if msg.starts_with("Usage:") => {
            println!("{msg}");
            return Ok(());
        }
        Err(msg) => anyhow::bail!(msg),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let (path, cfg) = load_config(parsed.config.as_deref())
        .await
        .context("error reading config file")?;
    info!(
        config = %path.display(),
        hosts = cfg.hosts.len(),
        scope = ?cfg.snapshot_scope,
        "configuration loaded"
    );

    let notifier: Arc<dyn Notifier> = if cfg.telegram_bot_token.is_empty() {
        warn!("telegramBotToken not set; alerts will only be logged");
        Arc::new(LogNotifier)
    } else {
        Arc::new(TelegramNotifier::new(
            &cfg.telegram_bot_token,
            cfg.telegram_chat_id,
        ))
    };
    let runner = Arc::new(ShellRunner::new(cfg.command_timeout()));

    let port = parsed.port.unwrap_or(cfg.listen_port);
    let period = cfg.poll_interval();
    let monitor = Arc::new(Monitor::new(cfg, runner, notifier));

    let _poller = spawn_scheduler(monitor.clone(), period);

    let app = build_router(AppState::new(monitor));
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("fleetwatch listening on http://{addr}/checkhealth");
    axum::serve(listener, app).await.context("http server failed")?;
    Ok(())
}
