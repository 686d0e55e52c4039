use crate::reports;
use clap::Args;
use posematch::config::ScoringParams;
use posematch::features::feature_len;
use posematch::recording::{load_recording, replay, ReplayStats};
use posematch::reference::ReferenceSequence;
use posematch::{PmResult, Session};
use rayon::prelude::*;
use std::path::Path;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    /// Reference pose file (.json or .csv)
    #[arg(short, long)]
    pub reference: String,

    /// One or more recorded landmark streams (JSON lines)
    #[arg(long, num_args = 1.., required = true)]
    pub recording: Vec<String>,

    /// Print results as JSON instead of a table
    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[command(flatten)]
    pub params: ScoringParams,
}

fn replay_one(path: &str, reference: &ReferenceSequence, params: &ScoringParams) -> PmResult<ReplayStats> {
    let frames = load_recording(path)?;
    let song = Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(path);

    let mut session = Session::new(params.clone())?;
    session.install_reference(song, reference.clone())?;
    Ok(replay(&mut session, &frames))
}

pub fn run(args: &ReplayArgs, params: &ScoringParams) -> PmResult<()> {
    let reference = ReferenceSequence::load(&args.reference, feature_len(params.joint_set))?;
    info!(
        "🎬 Replaying {} recording(s) with {}",
        args.recording.len(),
        params.strategy
    );

    // Sessions share nothing, so recordings replay in parallel
    let results = args
        .recording
        .par_iter()
        .map(|path| replay_one(path, &reference, params).map(|stats| (path.clone(), stats)))
        .collect::<PmResult<Vec<_>>>()?;

    if args.json {
        let by_recording: serde_json::Map<String, serde_json::Value> = results
            .iter()
            .map(|(path, stats)| -> PmResult<(String, serde_json::Value)> {
                Ok((path.clone(), serde_json::to_value(stats)?))
            })
            .collect::<PmResult<_>>()?;
        println!("{}", serde_json::to_string_pretty(&by_recording)?);
    } else {
        reports::print_replay_report(&results);
    }
    Ok(())
}
