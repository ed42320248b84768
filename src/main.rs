use clap::Parser;

use cluster_guard::cli::{Cli, Commands};
use cluster_guard::commands;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            format,
            output_records,
            output_flags,
            options,
        } => commands::analyze(
            &input,
            &format,
            output_records.as_deref(),
            output_flags.as_deref(),
            &options,
        ),
        Commands::ListClusters {
            input,
            format,
            options,
        } => commands::list_clusters(&input, &format, &options),
        Commands::Extract {
            input,
            output,
            label,
            options,
        } => commands::extract_cluster(&input, &output, label, &options),
    }
}
