use anyhow::Result;
use clap::Parser;
use turtle_flatten_cli::{Command, TurtleFlattenCli, convert_file, csv_file, stats_file};

#[tokio::main]
pub async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = TurtleFlattenCli::parse();
    match cli.command {
        Command::Convert(args) => {
            let report = convert_file(&args).await?;
            if report.diagnostics > 0 {
                eprintln!(
                    "{} problems were skipped, see the log for details",
                    report.diagnostics
                );
            }
            println!("{} lines written to {}", report.lines, report.output.display());
            if let Some(stats) = report.stats {
                println!("{stats}");
            }
        }
        Command::Csv(args) => {
            let records = csv_file(&args).await?;
            println!("{records} records written to {}", args.output.display());
        }
        Command::Stats(args) => {
            println!("{}", stats_file(&args).await?);
        }
    }
    Ok(())
}
