//! Lane Runner entry point
//!
//! Natively this is a headless driver: it plays seeded autopilot runs at a
//! fixed timestep and logs how each one went. The browser build starts from
//! `platform::web` instead.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;

    use lane_runner::consts::SIM_DT;
    use lane_runner::persistence::{BestScoreStore, JsonFileStore, MemoryStore};
    use lane_runner::session::{LogPresenter, Presenter, Session};
    use lane_runner::sim::{GameEvent, RunPhase, autopilot};
    use lane_runner::{Tuning, platform};

    #[derive(Parser)]
    #[command(name = "lane-runner")]
    #[command(about = "Play seeded autopilot runs of the three-lane runner", long_about = None)]
    struct Cli {
        /// Seed for the first run (random when omitted); later runs use seed + n
        #[arg(long)]
        seed: Option<u64>,

        /// Number of runs to play
        #[arg(long, default_value_t = 1)]
        runs: u32,

        /// Tuning JSON file (defaults when omitted)
        #[arg(long)]
        tuning: Option<PathBuf>,

        /// Best-score JSON file (kept in memory when omitted)
        #[arg(long)]
        best_file: Option<PathBuf>,

        /// Stop a run that survives this long (simulated seconds)
        #[arg(long, default_value_t = 120.0)]
        max_seconds: f32,
    }

    /// Outcome of one autopilot run
    #[derive(Debug)]
    struct RunReport {
        seed: u64,
        score: u64,
        best: u64,
        seconds: f32,
        tokens: u32,
        crashed: bool,
    }

    fn play<S: BestScoreStore>(session: &mut Session<S>, seed: u64, max_seconds: f32) -> RunReport {
        let max_steps = (max_seconds.max(0.0) / SIM_DT).ceil() as u64;
        let mut tokens = 0;
        let mut steps = 0;
        let mut presenter = |event: &GameEvent| {
            if matches!(event, GameEvent::TokenCollected { .. }) {
                tokens += 1;
            }
            LogPresenter.present(event);
        };

        while steps < max_steps {
            if let Some(action) = autopilot::decide(session.state()) {
                session.action(action);
            }
            session.tick(SIM_DT, &mut presenter);
            steps += 1;
            if session.phase() == RunPhase::Ended {
                break;
            }
        }

        RunReport {
            seed,
            score: session.score(),
            best: session.best(),
            seconds: steps as f32 * SIM_DT,
            tokens,
            crashed: session.phase() == RunPhase::Ended,
        }
    }

    fn run_all<S: BestScoreStore>(cli: &Cli, store: S, tuning: Tuning) -> S {
        let first_seed = platform::resolve_seed(cli.seed);
        let mut session = Session::new(store, first_seed, tuning.clone());
        for n in 0..cli.runs {
            let seed = first_seed.wrapping_add(u64::from(n));
            if n > 0 {
                // The best is already known; only the first session reads the store
                let best = session.best();
                let store = session.into_store();
                session = Session::with_best(store, seed, tuning.clone(), best);
            }
            let report = play(&mut session, seed, cli.max_seconds);
            log::info!(
                "Run {}/{} seed {}: score {} best {} after {:.1}s, {} tokens{}",
                n + 1,
                cli.runs,
                report.seed,
                report.score,
                report.best,
                report.seconds,
                report.tokens,
                if report.crashed { "" } else { " (time limit)" }
            );
        }
        session.into_store()
    }

    pub fn main() -> Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        let cli = Cli::parse();

        let tuning = match &cli.tuning {
            Some(path) => Tuning::load(path)
                .with_context(|| format!("loading tuning from {}", path.display()))?,
            None => Tuning::default(),
        };

        match &cli.best_file {
            Some(path) => {
                run_all(&cli, JsonFileStore::new(path), tuning);
            }
            None => {
                let store = run_all(&cli, MemoryStore::default(), tuning);
                log::info!("Session best {} ({} saves)", store.best(), store.writes());
            }
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    headless::main()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
