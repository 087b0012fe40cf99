//! Not The Player entry point
//!
//! Native: a headless runner that plays seeded sessions with the autopilot
//! bot and reports how badly the game treated it. The browser build starts
//! from `web::wasm_start` instead.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::fs;
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::{Parser, ValueEnum};
    use serde::Serialize;

    use not_the_player::persistence::FileStore;
    use not_the_player::sim::{
        GameEvent, GameSession, SessionConfig, SessionPhase, TickInput, tick,
    };
    use not_the_player::{Settings, Tuning, load_high_score, persist_high_score};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    enum Report {
        Console,
        Json,
    }

    #[derive(Debug, Parser)]
    #[command(name = "not-the-player", version)]
    #[command(about = "Headless runs of an endless runner that sabotages its own player")]
    struct Args {
        /// Seed of the first run; later runs use seed + 1, seed + 2, ...
        #[arg(long, default_value_t = 1337)]
        seed: u64,

        /// Number of runs
        #[arg(long, default_value_t = 1)]
        runs: u32,

        /// Streamer mode (overrides saved settings)
        #[arg(long)]
        streamer: bool,

        /// Starting chaos 0.0-1.0 (overrides saved settings)
        #[arg(long)]
        chaos: Option<f32>,

        /// Give up on a run after this much simulated time (ms)
        #[arg(long, default_value_t = 300_000.0)]
        max_ms: f64,

        /// Simulated frame length (ms)
        #[arg(long, default_value_t = 1000.0 / 60.0)]
        frame_ms: f32,

        /// Let the bot steer; without it the player never presses anything
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        autopilot: bool,

        /// JSON tuning file; missing fields keep their defaults
        #[arg(long)]
        tuning: Option<PathBuf>,

        /// Where settings and the high score are kept
        #[arg(long, default_value = ".not-the-player")]
        store_dir: PathBuf,

        /// Output report format
        #[arg(long, value_enum, default_value_t = Report::Console)]
        report: Report,
    }

    /// Outcome of one headless run
    #[derive(Debug, Serialize)]
    struct RunReport {
        seed: u64,
        /// None if the run hit the time limit
        reason: Option<String>,
        score: u32,
        high_score: u32,
        survived_ms: f64,
        final_chaos: f32,
        presses_ignored: u32,
        presses_reversed: u32,
        decoys_popped: u32,
        disruptions: u32,
        insult: Option<String>,
        achievement: Option<String>,
    }

    fn load_tuning(path: Option<&PathBuf>) -> Result<Tuning> {
        let Some(path) = path else {
            return Ok(Tuning::default());
        };
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading tuning file {}", path.display()))?;
        Tuning::from_json(&json).with_context(|| format!("invalid tuning in {}", path.display()))
    }

    fn session_config(args: &Args, settings: &Settings) -> SessionConfig {
        let mut config = settings.session_config();
        config.streamer_mode |= args.streamer;
        if let Some(chaos) = args.chaos {
            config.starting_chaos = chaos;
        }
        config
    }

    fn play(
        seed: u64,
        config: SessionConfig,
        tuning: &Tuning,
        store: &mut FileStore,
        args: &Args,
    ) -> Result<RunReport> {
        let high_score = load_high_score(&*store);
        let mut session = GameSession::new(seed, config, tuning.clone(), high_score)
            .context("building session")?;
        session.start();

        let input = TickInput {
            presses: Vec::new(),
            autopilot: args.autopilot,
        };
        let mut report = RunReport {
            seed,
            reason: None,
            score: 0,
            high_score,
            survived_ms: 0.0,
            final_chaos: 0.0,
            presses_ignored: 0,
            presses_reversed: 0,
            decoys_popped: 0,
            disruptions: 0,
            insult: None,
            achievement: None,
        };

        while session.is_running() && session.clock_ms() < args.max_ms {
            tick(&mut session, &input, args.frame_ms);
            for event in session.drain_events() {
                match event {
                    GameEvent::InputIgnored => report.presses_ignored += 1,
                    GameEvent::Moved { reversed: true, .. } => report.presses_reversed += 1,
                    GameEvent::DecoyPopped { .. } => report.decoys_popped += 1,
                    GameEvent::Disruption { .. } => report.disruptions += 1,
                    _ => {}
                }
            }
        }

        report.score = session.score().current;
        report.survived_ms = session.clock_ms();
        report.final_chaos = session.chaos();
        // Only a death counts; a run cut off by the time limit isn't saved
        if session.phase() == SessionPhase::Dead {
            report.high_score = persist_high_score(store, report.score);
        }
        if let Some(summary) = session.summary() {
            report.reason = Some(summary.reason.clone());
            report.insult = Some(summary.insult.clone());
            report.achievement = summary.achievement.clone();
        }
        Ok(report)
    }

    fn print_console(report: &RunReport) {
        println!("── seed {} ──", report.seed);
        match &report.reason {
            Some(reason) => println!("  {reason} after {:.1}s", report.survived_ms / 1000.0),
            None => println!("  Survived {:.1}s (time limit)", report.survived_ms / 1000.0),
        }
        println!("  Score {}   High score {}", report.score, report.high_score);
        println!(
            "  Chaos {:.2}   Ignored {}   Reversed {}   Decoys {}   Disruptions {}",
            report.final_chaos,
            report.presses_ignored,
            report.presses_reversed,
            report.decoys_popped,
            report.disruptions
        );
        if let Some(insult) = &report.insult {
            println!("  \"{insult}\"");
        }
        if let Some(achievement) = &report.achievement {
            println!("  🏆 {achievement}");
        }
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let args = Args::parse();

        let tuning = load_tuning(args.tuning.as_ref())?;
        let mut store = FileStore::new(&args.store_dir);
        let settings = Settings::load(&store);
        let config = session_config(&args, &settings);
        log::info!(
            "Not The Player (native) - {} run(s) from seed {}",
            args.runs,
            args.seed
        );

        let mut reports = Vec::with_capacity(args.runs as usize);
        for i in 0..args.runs {
            let report = play(
                args.seed.wrapping_add(u64::from(i)),
                config,
                &tuning,
                &mut store,
                &args,
            )?;
            if args.report == Report::Console {
                print_console(&report);
            }
            reports.push(report);
        }

        if args.report == Report::Json {
            let json = serde_json::to_string_pretty(&reports).context("serializing run reports")?;
            println!("{json}");
        }
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use not_the_player::highscores::HIGH_SCORE_KEY;
        use not_the_player::persistence::KeyValueStore;

        #[test]
        fn test_timed_out_run_is_not_saved() {
            let dir = std::env::temp_dir().join(format!(
                "not-the-player-main-{}",
                std::process::id()
            ));
            let _ = fs::remove_dir_all(&dir);
            let dir_arg = dir.to_string_lossy().into_owned();
            // Too short for the first obstacle to reach the player
            let args = Args::parse_from([
                "not-the-player",
                "--max-ms",
                "3000",
                "--store-dir",
                dir_arg.as_str(),
            ]);
            let mut store = FileStore::new(&args.store_dir);

            let report = play(
                args.seed,
                SessionConfig::default(),
                &Tuning::default(),
                &mut store,
                &args,
            )
            .unwrap();
            assert!(report.reason.is_none());
            assert!(report.score > 0);
            assert_eq!(report.high_score, 0);
            assert_eq!(store.get(HIGH_SCORE_KEY).unwrap(), None);

            let _ = fs::remove_dir_all(&dir);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_start, this is just to satisfy the compiler
}
