use clap::Args;
use posematch::config::ScoringParams;
use posematch::features::FeatureExtractor;
use posematch::recording::{extract_reference, load_recording};
use posematch::PmResult;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Recorded landmark stream (JSON lines)
    #[arg(long)]
    pub recording: String,

    /// Where to write the reference JSON
    #[arg(short, long)]
    pub output: String,

    #[command(flatten)]
    pub params: ScoringParams,
}

pub fn run(args: &ExtractArgs, params: &ScoringParams) -> PmResult<()> {
    let frames = load_recording(&args.recording)?;
    let missing = frames.iter().filter(|f| f.landmarks.is_none()).count();
    info!(
        "📂 {} frames from {} ({} without a pose)",
        frames.len(),
        args.recording,
        missing
    );

    let reference = extract_reference(&frames, FeatureExtractor::new(params.joint_set))?;
    reference.save_json(&args.output)?;

    println!(
        "✅ Wrote {} frames x {} angles to {}",
        reference.len(),
        reference.feature_len(),
        args.output
    );
    Ok(())
}
