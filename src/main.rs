//! Line Trace native tool
//!
//! Generates daily paths and replays rounds with the autopilot, for checking
//! puzzles outside the app.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::process;

    use clap::{Parser, Subcommand};
    use line_trace::consts::SIM_DT;
    use line_trace::sim::{Autopilot, SessionPhase};
    use line_trace::{CompletionLog, Difficulty, FixedSeed, Settings, TraceError, TraceGame};

    #[derive(Parser)]
    #[command(name = "line-trace", about = "Daily line-tracing puzzle tools")]
    struct Cli {
        /// Output as JSON instead of human-readable text.
        #[arg(long, global = true)]
        json: bool,

        #[command(subcommand)]
        command: Command,
    }

    #[derive(Subcommand)]
    enum Command {
        /// Generate the path for a seed and print it.
        Generate {
            #[arg(long, default_value_t = 42)]
            seed: u32,

            /// Canvas width in pixels.
            #[arg(short = 'W', long, default_value_t = 400.0)]
            width: f64,

            /// Canvas height in pixels.
            #[arg(short = 'H', long, default_value_t = 800.0)]
            height: f64,
        },
        /// Play a round with the autopilot and report the outcome.
        Replay {
            #[arg(long, default_value_t = 42)]
            seed: u32,

            #[arg(short = 'W', long, default_value_t = 400.0)]
            width: f64,

            #[arg(short = 'H', long, default_value_t = 800.0)]
            height: f64,

            /// Difficulty (easy, medium, hard); overrides the settings file.
            #[arg(short, long)]
            difficulty: Option<String>,

            /// Settings JSON file.
            #[arg(long)]
            settings: Option<PathBuf>,
        },
    }

    /// Process exit codes
    pub(crate) fn exit_code(err: &TraceError) -> i32 {
        match err {
            TraceError::InvalidCanvas { .. } | TraceError::EmptyPath => 10,
            TraceError::NoActiveSession => 11,
            TraceError::Settings(_) => 12,
            TraceError::Output(_) => 13,
        }
    }

    fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, TraceError> {
        serde_json::to_string_pretty(value).map_err(TraceError::Output)
    }

    fn load_settings(path: Option<&PathBuf>) -> Result<Settings, TraceError> {
        match path {
            Some(path) => match std::fs::read_to_string(path) {
                Ok(json) => Settings::from_json(&json),
                Err(e) => {
                    log::warn!("Cannot read {}: {}, using defaults", path.display(), e);
                    Ok(Settings::default())
                }
            },
            None => Ok(Settings::load()),
        }
    }

    fn run(cli: Cli) -> Result<(), TraceError> {
        match cli.command {
            Command::Generate {
                seed,
                width,
                height,
            } => {
                let mut game: TraceGame<()> = TraceGame::default();
                let path = game.generate_from(&FixedSeed(seed), width, height)?;
                if cli.json {
                    println!("{}", to_json(&*path)?);
                } else {
                    println!("seed:       {}", path.seed);
                    println!("canvas:     {}x{}", path.width, path.height);
                    println!("segments:   {}", path.segments.len());
                    println!("length:     {:.1} px", path.total_length);
                    println!("start:      ({:.1}, {:.1})", path.start().x, path.start().y);
                    println!(
                        "player:     ({:.1}, {:.1})",
                        path.starting_point.x, path.starting_point.y
                    );
                    println!("finish:     ({:.1}, {:.1})", path.end_line.x, path.end_line.y);
                }
            }
            Command::Replay {
                seed,
                width,
                height,
                difficulty,
                settings,
            } => {
                let mut settings = load_settings(settings.as_ref())?;
                if let Some(name) = difficulty {
                    match Difficulty::from_str(&name) {
                        Some(d) => settings.difficulty = d,
                        None => log::warn!(
                            "Unknown difficulty '{}', keeping {}",
                            name,
                            settings.difficulty.as_str()
                        ),
                    }
                }

                let mut game = TraceGame::new(CompletionLog::new());
                game.generate_from(&FixedSeed(seed), width, height)?;
                game.start_session(settings.effective_profile())?;

                let mut pilot = None;
                while game.phase() != Some(SessionPhase::Ended) {
                    game.tick(SIM_DT)?;
                    let Some(session) = game.session() else {
                        return Err(TraceError::NoActiveSession);
                    };
                    let pilot = pilot.get_or_insert_with(|| Autopilot::for_session(session));
                    for point in pilot.pending(session) {
                        if !game.append_trail_point(point)? {
                            break;
                        }
                    }
                }

                let Some(outcome) = game.sink().entries.last() else {
                    return Err(TraceError::NoActiveSession);
                };
                if cli.json {
                    println!("{}", to_json(outcome)?);
                } else {
                    println!(
                        "{} ({}) after {:.2}s on {}",
                        if outcome.won { "WON" } else { "LOST" },
                        outcome.reason.as_str(),
                        outcome.elapsed_secs,
                        settings.difficulty.as_str()
                    );
                }
            }
        }
        Ok(())
    }

    pub fn main() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        if let Err(e) = run(Cli::parse()) {
            eprintln!("error: {e}");
            process::exit(exit_code(&e));
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::main();
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::native::exit_code;
    use line_trace::TraceError;

    #[test]
    fn output_errors_have_their_own_exit_code() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        assert_eq!(exit_code(&TraceError::Output(json_err)), 13);
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        assert_eq!(exit_code(&TraceError::Settings(json_err)), 12);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web builds enter through `line_trace::web`
}
