mod args;

use anyhow::{Context, Result, anyhow};
use args::CommandLineArgs;
use colored::Colorize;
use httpscript::{Method, Profile, Session, profile::DEFAULT_INI_SECTION};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt::time::ChronoLocal};

fn main() -> ExitCode {
    let cmd_args = CommandLineArgs::get();
    init_tracing_subscriber(cmd_args.verbose());

    match run(&cmd_args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

/// Sends one request and reports whether it came back 2xx.
fn run(cmd_args: &CommandLineArgs) -> Result<bool> {
    let method = Method::from_bytes(cmd_args.method().to_uppercase().as_bytes())
        .map_err(|_| anyhow!("invalid HTTP method: {}", cmd_args.method()))?;

    let profile = Profile::load(cmd_args.config(), cmd_args.profile())
        .with_context(|| format!("failed to load profile from {}", cmd_args.config()))?;
    if profile.is_none() && cmd_args.profile() != DEFAULT_INI_SECTION {
        anyhow::bail!(
            "profile '{}' not found in {}",
            cmd_args.profile(),
            cmd_args.config()
        );
    }

    let mut builder = Session::builder().color(cmd_args.color());
    if let Some(profile) = &profile {
        builder = builder.profile(profile);
    }
    if let Some(base_url) = cmd_args.base_url() {
        builder = builder.base_url(base_url.as_str());
    }
    if let Some(secs) = cmd_args.timeout() {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    if cmd_args.insecure() {
        builder = builder.insecure(true);
    }
    if let Some(ca_cert) = cmd_args.ca_cert() {
        builder = builder.ca_cert(ca_cert.as_str());
    }
    let mut session = builder.build().context("failed to set up session")?;

    session.send(
        method,
        cmd_args.url(),
        cmd_args.data(),
        &cmd_args.params(),
    )?;

    for path in cmd_args.extract() {
        println!("{}", session.value(path).as_str());
    }

    Ok(session.succeeded())
}

fn init_tracing_subscriber(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(format!(
        "{}_LOG_LEVEL",
        env!("CARGO_PKG_NAME").to_uppercase()
    ))
    .unwrap_or_else(|_| EnvFilter::new(default_level))
    .add_directive("reqwest=warn".parse().unwrap())
    .add_directive("hyper=warn".parse().unwrap())
    .add_directive("hyper_util=warn".parse().unwrap())
    .add_directive("rustls=warn".parse().unwrap());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_timer(ChronoLocal::rfc_3339())
        .init();
}
