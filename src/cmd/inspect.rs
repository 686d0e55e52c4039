use crate::reports;
use clap::Args;
use posematch::config::ScoringParams;
use posematch::features::feature_len;
use posematch::reference::ReferenceSequence;
use posematch::PmResult;

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Reference pose file (.json or .csv)
    #[arg(short, long)]
    pub reference: String,

    #[command(flatten)]
    pub params: ScoringParams,
}

pub fn run(args: &InspectArgs, params: &ScoringParams) -> PmResult<()> {
    let reference = ReferenceSequence::load(&args.reference, feature_len(params.joint_set))?;

    println!("\n🔎 === REFERENCE: {} === 🔎", args.reference);
    println!(
        "{} frames x {} angles ({} joints)",
        reference.len(),
        reference.feature_len(),
        params.joint_set
    );
    reports::print_reference_summary(&reference, params.joint_set);
    Ok(())
}
