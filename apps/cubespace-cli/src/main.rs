mod config;

use anyhow::Context;
use clap::{Parser, Subcommand};
use config::CubespaceConfig;
use cubespace_animate::{CubeRig, RigEvent};
use cubespace_input::{Action, KeyBindings};
use cubespace_kernel::{FaceletState, apply_sequence, parse_sequence, parse_sequence_lenient};
use cubespace_render::{InstanceRenderer, NetTextRenderer, RenderView, Renderer};
use cubespace_service::{HttpSolverService, SolverService, request_solution, run_scramble};
use cubespace_tools::CubeInspector;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cubespace", about = "Drive a 3x3x3 cube from the command line")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON config file (lattice, animation, service sections)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the solver service base URL
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and effective configuration
    Info,
    /// Apply a move sequence to a solved cube and print the result
    Apply {
        /// Moves, e.g. "R U R' U'"
        moves: String,
        /// Reject unknown tokens instead of skipping them
        #[arg(long)]
        strict: bool,
    },
    /// Check a cube entered as six 9-letter face strings (Up, Left, Front, Right, Back, Down)
    Check {
        #[arg(required = true, num_args = 6, value_names = ["UP", "LEFT", "FRONT", "RIGHT", "BACK", "DOWN"])]
        faces: Vec<String>,
    },
    /// Animate a sequence frame by frame on a headless rig
    Play {
        moves: String,
        /// Play the sequence this many times
        #[arg(short, long, default_value = "1")]
        repeat: usize,
        /// Print a status line every N frames (0 = never)
        #[arg(long, default_value = "0")]
        every: u64,
        /// Give up after this many frames
        #[arg(long, default_value = "100000")]
        max_frames: usize,
    },
    /// Print key bindings, or feed a string of keystrokes to a rig
    Keys {
        /// Keystrokes to feed, e.g. "ruRU"
        input: Option<String>,
    },
    /// Fetch a scramble from the solver service and play it
    Scramble,
    /// Ask the solver service to solve the cube after the given moves
    Solve {
        /// Moves applied to a solved cube before asking
        #[arg(default_value = "")]
        moves: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = CubespaceConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.url {
        config.service.base_url = url;
    }

    match cli.command {
        Commands::Info => {
            println!("cubespace-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Apply { moves, strict } => {
            let moves = if strict {
                parse_sequence(&moves).context("parsing moves")?
            } else {
                parse_sequence_lenient(&moves)
            };
            let mut state = FaceletState::solved();
            apply_sequence(&mut state, &moves);
            print_state(&state);
        }
        Commands::Check { faces } => {
            let faces: [&str; 6] = std::array::from_fn(|i| faces[i].as_str());
            let state = FaceletState::from_face_strings(faces).context("reading faces")?;
            println!("{state}");
            match state.validate() {
                Err(err) => println!("This is not a valid cube configuration: {err}"),
                Ok(()) if state.is_solved() => println!("The cube is already solved!"),
                Ok(()) => match state.to_solver_string() {
                    Ok(s) => println!("Solver string: {s}"),
                    Err(err) => println!("Cannot build solver string: {err}"),
                },
            }
        }
        Commands::Play {
            moves,
            repeat,
            every,
            max_frames,
        } => {
            let moves = parse_sequence_lenient(&moves);
            let mut rig = CubeRig::new(config.lattice, config.animation);
            let renderer = NetTextRenderer::new();
            let view = RenderView::default();
            let mut frames = 0;
            for _ in 0..repeat {
                for mv in &moves {
                    rig.request(*mv)?;
                    frames += drive(&mut rig, max_frames.saturating_sub(frames), every);
                }
            }
            let frame = InstanceRenderer::new().render(&rig, &view);
            let completed = rig
                .drain_events()
                .iter()
                .filter(|e| matches!(e, RigEvent::TurnCompleted { .. }))
                .count();
            print!("{}", renderer.render(&rig, &view));
            println!();
            println!("{}", CubeInspector::summary(&rig));
            println!(
                "Played {completed} turns in {frames} frames ({} instance bytes per frame)",
                frame.instance_bytes().len()
            );
        }
        Commands::Keys { input: None } => {
            let bindings = KeyBindings::default();
            for (key, action) in bindings.iter() {
                let label = if key == ' ' { "space".to_string() } else { key.to_string() };
                println!("{label:>6}  {}", describe(action));
            }
            println!("buttons: {}", KeyBindings::button_tokens().join(" "));
        }
        Commands::Keys { input: Some(input) } => {
            let bindings = KeyBindings::default();
            let mut rig = CubeRig::new(config.lattice, config.animation);
            let mut service: Option<HttpSolverService> = None;
            for key in input.chars() {
                let action = bindings.action_for_key(key);
                tracing::debug!(?key, action = %describe(action), "key");
                match action {
                    Action::Turn(mv) => {
                        if let Err(err) = rig.request(mv) {
                            println!("{mv}: {err}");
                        }
                    }
                    Action::Cancel => rig.cancel(),
                    Action::Reset => rig.reset(),
                    Action::ToggleSpin => {
                        let enabled = rig.spin().is_enabled();
                        rig.set_spin_enabled(!enabled);
                    }
                    Action::Scramble | Action::Solve => {
                        rig.run_until_idle(usize::MAX);
                        if service.is_none() {
                            service = Some(HttpSolverService::new(config.service.clone())?);
                        }
                        if let Some(service) = service.as_ref() {
                            service_action(action, service, &mut rig);
                        }
                    }
                    Action::Noop => {}
                }
                // One frame per keystroke, like a user typing during the animation.
                rig.tick();
            }
            rig.run_until_idle(usize::MAX);
            print_state(rig.state());
        }
        Commands::Scramble => {
            let service = HttpSolverService::new(config.service.clone())?;
            let mut rig = CubeRig::new(config.lattice, config.animation);
            let scramble = run_scramble(&service, &mut rig).context("scramble failed")?;
            println!("Scramble: {}", scramble.text);
            rig.run_until_idle(usize::MAX);
            print_state(rig.state());
        }
        Commands::Solve { moves } => {
            let service = HttpSolverService::new(config.service.clone())?;
            let mut rig = CubeRig::new(config.lattice, config.animation);
            rig.request_sequence(&parse_sequence_lenient(&moves))?;
            rig.run_until_idle(usize::MAX);
            println!("{}", rig.state());
            let solution = request_solution(&service, &rig).context("solve failed")?;
            println!("Solution: {solution}");
        }
    }

    Ok(())
}

/// Tick until the rig is idle, printing a status line every `every` frames.
fn drive(rig: &mut CubeRig, max_frames: usize, every: u64) -> usize {
    let mut frames = 0;
    while !rig.is_idle() && frames < max_frames {
        rig.tick();
        frames += 1;
        if every > 0 && rig.frame() % every == 0 {
            println!("{}", CubeInspector::summary(rig));
        }
    }
    frames
}

fn service_action(action: Action, service: &dyn SolverService, rig: &mut CubeRig) {
    match action {
        Action::Scramble => match run_scramble(service, rig) {
            Ok(scramble) => println!("Scramble: {}", scramble.text),
            Err(err) => println!("Error fetching scramble: {err}"),
        },
        Action::Solve => match request_solution(service, rig) {
            Ok(solution) => println!("Solution: {solution}"),
            Err(err) => println!("Error solving cube: {err}"),
        },
        _ => {}
    }
}

fn describe(action: Action) -> String {
    match action {
        Action::Turn(mv) => format!("turn {mv}"),
        Action::Cancel => "cancel turn".to_string(),
        Action::Reset => "reset".to_string(),
        Action::Scramble => "scramble".to_string(),
        Action::Solve => "solve".to_string(),
        Action::ToggleSpin => "toggle spin".to_string(),
        Action::Noop => "nothing".to_string(),
    }
}

fn print_state(state: &FaceletState) {
    println!("{state}");
    println!("Solved: {}", state.is_solved());
    match state.to_solver_string() {
        Ok(s) => println!("Solver string: {s}"),
        Err(err) => println!("Solver string unavailable: {err}"),
    }
}
