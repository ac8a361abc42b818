use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use magnitude::Magnitude;
use rep::RepKind;
use tracing::level_filters::LevelFilter;

#[derive(Debug, Parser)]
/// Exact magnitudes and the numeric conversions built from them.
pub struct Args {
    #[arg(short, long, action = ArgAction::Count, global = true)]
    /// Log what the synthesizer does. Repeat for more detail. Ignored when
    /// RUST_LOG is set.
    pub verbose: u8,
    #[arg(long, global = true)]
    /// Print results as JSON.
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the canonical form of a magnitude and its value in every scalar
    /// type.
    Inspect {
        #[arg(allow_hyphen_values = true)]
        /// A magnitude such as `360`, `-1/13` or `pi / 180`.
        magnitude: Magnitude,
    },
    /// Show the operations a conversion is made of and which inputs it can
    /// take without overflowing.
    Plan {
        #[command(flatten)]
        conversion: ConversionArgs,
    },
    /// Run values through a conversion.
    Convert {
        #[command(flatten)]
        conversion: ConversionArgs,

        #[arg(required = true, allow_hyphen_values = true)]
        /// Values of the source type. Complex values are written `re,im`.
        values: Vec<String>,
    },
    /// Run every case of a TOML plan, failing if any expectation is not met.
    Check {
        /// Path to the plan file.
        plan: PathBuf,
    },
}

#[derive(Debug, clap::Args)]
pub struct ConversionArgs {
    #[arg(long)]
    /// Source representation, e.g. `u16` or `complex<f32>`.
    pub from: RepKind,
    #[arg(long)]
    /// Destination representation.
    pub to: RepKind,
    #[arg(allow_hyphen_values = true)]
    /// Factor applied during the conversion.
    pub magnitude: Magnitude,
}

impl Args {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use magnitude::mag;
    use rep::{RepKind, ScalarKind};

    use super::{Args, Command};

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_negative_magnitudes_and_values() {
        let args = Args::try_parse_from([
            "magtool", "convert", "--from", "i32", "--to", "complex<f64>", "-1/13", "-26", "13",
        ])
        .unwrap();

        let Command::Convert { conversion, values } = args.command else {
            panic!("expected convert");
        };
        assert_eq!(conversion.from, RepKind::Real(ScalarKind::I32));
        assert_eq!(conversion.to, RepKind::Complex(ScalarKind::F64));
        assert_eq!(conversion.magnitude, -(mag(1) / mag(13)));
        assert_eq!(values, ["-26", "13"]);
    }

    #[test]
    fn verbosity() {
        let args = Args::try_parse_from(["magtool", "-vv", "inspect", "12"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert!(!args.json);
    }
}
