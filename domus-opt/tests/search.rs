use anyhow::Result;
use domus_core::{error::DomusError, record::BufferedRecorder};
use domus_opt::{checkpoint, RandomSearch, SearchConfig, SearchLoop, SearchSpace, SearchState};
use std::path::Path;
use tempdir::TempDir;
use test_log::test;

fn objective(x: &[i64]) -> f64 {
    x.iter().enumerate().map(|(i, &b)| (i as f64 + 1.0) * (1 - b) as f64).sum()
}

fn search(dir: &Path, n_calls: usize, restart: bool) -> SearchLoop<RandomSearch> {
    let config = SearchConfig::new(dir.join("result.bin"))
        .n_calls(n_calls)
        .checkpoint(Some(dir.join("checkpoint.bin")))
        .restart(restart);
    SearchLoop::new(config, RandomSearch::new(1), SearchSpace::binary(4))
}

#[test]
fn test_search_writes_checkpoint_and_result() -> Result<()> {
    let dir = TempDir::new("domus_search")?;
    let mut search = search(dir.path(), 3, false);
    assert_eq!(search.state(), SearchState::Init);
    let mut recorder = BufferedRecorder::new();
    let res = search.run(|x| Ok(objective(x)), &mut recorder)?;

    assert_eq!(search.state(), SearchState::Done);
    assert_eq!(res.len(), 3);
    assert_eq!(recorder.len(), 3);
    assert_eq!(checkpoint::load(dir.path().join("checkpoint.bin"))?, res);
    assert_eq!(checkpoint::load(dir.path().join("result.bin"))?, res);
    let last = recorder.iter().last().unwrap();
    assert_eq!(last.get_scalar("n_evals")?, 3.0);
    assert_eq!(last.get_scalar("best_loss")?, res.fun as f32);
    Ok(())
}

#[test]
fn test_restart_reuses_history() -> Result<()> {
    let dir = TempDir::new("domus_search")?;
    let first = search(dir.path(), 3, false).run(|x| Ok(objective(x)), &mut BufferedRecorder::new())?;

    let mut calls = vec![];
    let mut search = search(dir.path(), 2, true);
    let res = search.run(
        |x| {
            calls.push(x.to_vec());
            Ok(objective(x))
        },
        &mut BufferedRecorder::new(),
    )?;

    assert_eq!(calls.len(), 2);
    assert_eq!(res.len(), 5);
    assert_eq!(res.x_iters[..3], first.x_iters[..]);
    assert_eq!(res.func_vals[..3], first.func_vals[..]);
    assert!(calls.iter().all(|x| !first.visited(x)));
    assert!(res.fun <= first.fun);
    Ok(())
}

#[test]
fn test_restart_without_checkpoint_is_fatal() -> Result<()> {
    let dir = TempDir::new("domus_search")?;
    let mut search = search(dir.path(), 2, true);
    let err = search
        .run(|x| Ok(objective(x)), &mut BufferedRecorder::new())
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DomusError>(),
        Some(DomusError::MissingArtifact(_))
    ));
    assert_eq!(search.state(), SearchState::Restart);
    assert!(!dir.path().join("result.bin").exists());
    Ok(())
}

#[test]
fn test_objective_error_stops_search() -> Result<()> {
    let dir = TempDir::new("domus_search")?;
    let mut search = search(dir.path(), 4, false);
    let mut n = 0;
    let res = search.run(
        |x| {
            n += 1;
            if n == 2 {
                anyhow::bail!("training failed");
            }
            Ok(objective(x))
        },
        &mut BufferedRecorder::new(),
    );
    assert!(res.is_err());
    assert_eq!(checkpoint::load(dir.path().join("checkpoint.bin"))?.len(), 1);
    Ok(())
}

#[test]
fn test_state_transitions() -> Result<()> {
    use SearchState::*;
    let dir = TempDir::new("domus_search")?;

    let mut lp = search(dir.path(), 2, false);
    lp.run(|x| Ok(objective(x)), &mut BufferedRecorder::new())?;
    assert_eq!(
        lp.transitions(),
        vec![Init, Evaluating, Checkpointed, Evaluating, Checkpointed, Done]
    );

    let mut lp = search(dir.path(), 1, true);
    lp.run(|x| Ok(objective(x)), &mut BufferedRecorder::new())?;
    assert_eq!(
        lp.transitions(),
        vec![Init, Restart, Evaluating, Checkpointed, Done]
    );

    let mut lp = search(dir.path(), 0, false);
    lp.run(|x| Ok(objective(x)), &mut BufferedRecorder::new())?;
    assert_eq!(lp.transitions(), vec![Init, Evaluating, Done]);
    Ok(())
}
