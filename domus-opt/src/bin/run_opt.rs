use anyhow::{bail, Result};
use clap::Parser;
use domus_core::record::LogRecorder;
use domus_gym::{ActionStrategy, ContinuousAct, DomusEnv, DomusLumpedConfig, FullAct, LumpedCabin};
use domus_opt::{
    Artifacts, Loss, RandomSearch, SearchConfig, SearchLoop, SearchSpace, SEARCHED_FEATURES,
};
use domus_policy::MlpAgent;
use log::info;
use std::path::PathBuf;

/// Search the optional cabin features with the best energy and comfort trade-off
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Algorithm used to learn the controller
    #[arg(short, long)]
    algo: String,

    /// Environment (DomusContEnv-v0, DomusFullEnv-v0)
    #[arg(short, long)]
    env: String,

    /// Suffix on environment for run
    #[arg(short, long)]
    run_number: String,

    /// Number of timesteps to fine-tune each candidate
    #[arg(short, long, default_value_t = 10000)]
    timesteps: usize,

    /// Folder containing the learned model
    #[arg(short = 'f', long)]
    exp_folder: PathBuf,

    /// Where to write the checkpoint to, or take it from with --restart
    #[arg(short, long)]
    checkpoint: Option<PathBuf>,

    /// Resume from the checkpoint
    #[arg(short = 'x', long, default_value_t = false)]
    restart: bool,

    /// Number of new evaluations
    #[arg(short, long, default_value_t = 100)]
    n_calls: usize,

    /// Random seed
    #[arg(short, long, default_value_t = 42)]
    seed: i64,

    /// Where to write the results
    outputfile: PathBuf,
}

fn optimise<A>(args: &Args) -> Result<()>
where
    A: ActionStrategy,
{
    let artifacts = Artifacts::locate(&args.exp_folder, &args.algo, &args.env, &args.run_number)?;
    info!("Baseline model: {:?}", artifacts.model_file);

    let recorder = Box::new(LogRecorder::new("candidate"));
    let mut loss = Loss::<A, LumpedCabin, MlpAgent<DomusEnv<A, LumpedCabin>>>::new(
        DomusLumpedConfig::default(),
        artifacts,
        args.timesteps,
        args.seed,
        recorder,
    )?;

    let config = SearchConfig::new(&args.outputfile)
        .n_calls(args.n_calls)
        .checkpoint(args.checkpoint.clone())
        .restart(args.restart);
    let minimizer = RandomSearch::new(args.seed as u64);
    let space = SearchSpace::binary(SEARCHED_FEATURES.len());
    let mut search = SearchLoop::new(config, minimizer, space);
    let mut recorder = LogRecorder::new("search");
    let res = search.run(|x| loss.eval(x), &mut recorder)?;

    info!("optimisation results: {:?} -> {}", res.x, res.fun);
    info!("wrote results to {:?}", args.outputfile);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match args.env.as_str() {
        "DomusContEnv-v0" => optimise::<ContinuousAct>(&args),
        "DomusFullEnv-v0" => optimise::<FullAct>(&args),
        env => bail!("Unsupported environment {}", env),
    }
}
