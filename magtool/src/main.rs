use std::{fmt::Display, io};

use anyhow::{bail, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{filter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use args::{Args, Command};
use config::Plan;

mod args;
mod commands;
mod config;

fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG takes over completely when it is set.
    let env = EnvFilter::try_from_default_env().ok();
    let targets = env.is_none().then(|| {
        let level = args.log_level();
        filter::Targets::new()
            .with_target("magtool", level)
            .with_target("conversion", level)
            .with_target("magnitude", level)
    });
    tracing_subscriber::registry()
        .with(env)
        .with(targets)
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    match &args.command {
        Command::Inspect { magnitude } => emit(args.json, &commands::inspect(magnitude))?,
        Command::Plan { conversion } => {
            let report = commands::plan(conversion.from, conversion.to, &conversion.magnitude)?;
            emit(args.json, &report)?;
        }
        Command::Convert { conversion, values } => {
            let report =
                commands::convert(conversion.from, conversion.to, &conversion.magnitude, values)?;
            emit(args.json, &report)?;
        }
        Command::Check { plan } => {
            let report = commands::check(&Plan::load(plan)?)?;
            emit(args.json, &report)?;
            if report.failed > 0 {
                bail!("{} case(s) failed", report.failed);
            }
        }
    }

    Ok(())
}

fn emit<T: Serialize + Display>(json: bool, report: &T) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}
