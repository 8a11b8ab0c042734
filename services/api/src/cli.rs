use crate::demo::{print_offers, print_schedule, run_demo, DemoArgs, OffersArgs, ScheduleArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use loan_pipeline::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Loan Pipeline",
    about = "Run the loan pipeline service or price loans from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the four pre-scoring offers for an amount and term
    Offers(OffersArgs),
    /// Print the annuity payment schedule for a principal
    Schedule(ScheduleArgs),
    /// Walk one application through the whole pipeline against in-memory storage
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Offers(args) => print_offers(args),
        Command::Schedule(args) => print_schedule(args),
        Command::Demo(args) => run_demo(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::try_parse_from(["loan-pipeline-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_schedule_arguments() {
        let cli = Cli::try_parse_from([
            "loan-pipeline-api",
            "schedule",
            "--amount",
            "100000",
            "--term",
            "12",
            "--rate",
            "12",
            "--issue-date",
            "2025-01-31",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Schedule(args)) => {
                assert_eq!(args.term, 12);
                assert_eq!(args.amount.to_string(), "100000");
                assert_eq!(
                    args.issue_date.map(|date| date.to_string()),
                    Some("2025-01-31".to_string())
                );
            }
            other => panic!("expected schedule command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_amounts() {
        assert!(Cli::try_parse_from([
            "loan-pipeline-api",
            "offers",
            "--amount",
            "lots",
            "--term",
            "12",
        ])
        .is_err());
    }
}
