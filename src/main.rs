use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use posematch::config::ScoringParams;
use posematch::PmResult;
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about = "Offline tools for pose motion-matching", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON scoring profile; explicit flags override its values.
    #[arg(global = true, long)]
    profile: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Summarize a reference file.
    Inspect(cmd::inspect::InspectArgs),
    /// Build a reference file from a recorded landmark stream.
    Extract(cmd::extract::ExtractArgs),
    /// Score recordings against a reference.
    Replay(cmd::replay::ReplayArgs),
}

fn resolve_params(
    profile: Option<&str>,
    cli_params: &ScoringParams,
    sub_matches: Option<&ArgMatches>,
) -> PmResult<ScoringParams> {
    let params = match (profile, sub_matches) {
        (Some(path), Some(sub)) => {
            info!("⚖️  Loading scoring profile from: {}", path);
            let mut file_params =
                ScoringParams::load_from_file(path).map_err(posematch::PoseMatchError::Validation)?;
            file_params.merge_from_cli(cli_params, sub);
            file_params
        }
        _ => cli_params.clone(),
    };
    params.validate().map_err(posematch::PoseMatchError::Validation)?;
    Ok(params)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());
    let sub_matches = matches.subcommand().map(|(_, m)| m);

    let cli_params = match &cli.command {
        Commands::Inspect(args) => &args.params,
        Commands::Extract(args) => &args.params,
        Commands::Replay(args) => &args.params,
    };

    let params = resolve_params(cli.profile.as_deref(), cli_params, sub_matches).unwrap_or_else(|e| {
        error!("{}", e);
        process::exit(1);
    });

    let result = match cli.command {
        Commands::Inspect(args) => cmd::inspect::run(&args, &params),
        Commands::Extract(args) => cmd::extract::run(&args, &params),
        Commands::Replay(args) => cmd::replay::run(&args, &params),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}
