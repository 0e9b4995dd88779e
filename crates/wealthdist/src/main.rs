use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod logging;
mod report;

#[derive(Parser, Debug)]
#[command(name = "wealthdist")]
#[command(about = "Wealth-distribution statistics from household survey microdata")]
struct Cli {
    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the aggregation and distribution pipeline over a survey extract
    Analyze {
        /// Survey summary extract (CSV)
        survey: PathBuf,

        /// Interview answer table (CSV); derived from --interview when the
        /// file does not exist yet
        #[arg(long, default_value = "ccbal_answer.csv")]
        answers: PathBuf,

        /// Full interview file the answer table can be derived from
        #[arg(long)]
        interview: Option<PathBuf>,

        /// Directory the Lorenz tables and results file are written to
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Use the wealth measure that also nets out non-vehicle
        /// installment debt
        #[arg(long)]
        include_installment: bool,
    },
    /// Rescale a freshly downloaded extract into the archived
    /// currency-year convention
    Rescale {
        /// Extract in current dollars (CSV)
        input: PathBuf,
        /// Where to write the rescaled extract
        output: PathBuf,
    },
    /// Compare summary statistics across two vintages of the same extract
    Compare {
        /// Extract already in the archived convention
        reference: PathBuf,
        /// Extract to check against it
        candidate: PathBuf,

        /// Interview answer table (CSV)
        #[arg(long, default_value = "ccbal_answer.csv")]
        answers: PathBuf,
    },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    logging::init(&cli.log_level);

    match cli.command {
        Command::Analyze {
            survey,
            answers,
            interview,
            out_dir,
            include_installment,
        } => commands::analyze(
            &survey,
            &answers,
            interview.as_deref(),
            &out_dir,
            include_installment,
        ),
        Command::Rescale { input, output } => commands::rescale(&input, &output),
        Command::Compare {
            reference,
            candidate,
            answers,
        } => commands::compare(&reference, &candidate, &answers),
    }
}
