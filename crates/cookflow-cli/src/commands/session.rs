use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Subcommand;
use cookflow_core::{
    parse_voice_command, Command, Config, CookingSession, Gesture, GestureReading, Phase,
    RecipeFile, SessionOutcome, SessionSnapshot, TickClock, TimelineEvent, TimelineSnapshot,
    TransitionRecord,
};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

#[derive(Subcommand)]
pub enum SessionAction {
    /// Cook through a recipe, reading commands from stdin.
    ///
    /// Each line is one of: a command (start, pause, resume, next, prev,
    /// exit), `gesture <name> [confidence]`, `voice <phrase>`, `tick`,
    /// `status`, or any phrase the voice table recognizes. Output is one
    /// JSON object per line.
    Run {
        /// Path to a recipe TOML file
        recipe: PathBuf,
        /// Override the tick interval in milliseconds
        #[arg(long)]
        tick_ms: Option<u64>,
        /// Start cooking as soon as the recipe is loaded
        #[arg(long)]
        autostart: bool,
    },
}

#[derive(Serialize)]
#[serde(tag = "stream", rename_all = "snake_case")]
enum Line<'a> {
    Transition(&'a TransitionRecord),
    Timeline(&'a TimelineEvent),
    Snapshot {
        session: SessionSnapshot,
        timeline: TimelineSnapshot,
    },
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SessionAction::Run {
            recipe,
            tick_ms,
            autostart,
        } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(run_session(&recipe, tick_ms, autostart))
        }
    }
}

async fn run_session(
    path: &Path,
    tick_ms: Option<u64>,
    autostart: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let recipe = RecipeFile::from_path(path)?;
    let mut session = CookingSession::new(&config);
    print_outcome(&session.load(&recipe))?;
    if autostart {
        print_outcome(&session.handle(Command::Start.event()))?;
    }

    let period = tick_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.tick_interval());
    let mut clock = TickClock::new(period);
    sync_clock(&session, &mut clock);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                dispatch(&mut session, line.trim())?;
            }
            _ = clock.next_tick() => {
                print_outcome(&session.tick())?;
            }
        }
        sync_clock(&session, &mut clock);
        if matches!(session.phase(), Phase::Complete | Phase::Idle) {
            break;
        }
    }

    print_snapshot(&session)?;
    Ok(())
}

/// One armed interval while the engine runs; none otherwise.
fn sync_clock(session: &CookingSession, clock: &mut TickClock) {
    let running = session.engine().is_running();
    if running && !clock.is_armed() {
        clock.arm();
    } else if !running && clock.is_armed() {
        clock.disarm();
    }
}

fn dispatch(session: &mut CookingSession, line: &str) -> Result<(), Box<dyn std::error::Error>> {
    if line.is_empty() {
        return Ok(());
    }
    let (head, rest) = line.split_once(' ').unwrap_or((line, ""));
    let outcome = match head {
        "gesture" => {
            let mut parts = rest.split_whitespace();
            let gesture: Gesture = parts.next().unwrap_or_default().parse()?;
            let confidence = match parts.next() {
                Some(c) => c.parse::<f32>()?,
                None => 1.0,
            };
            session.handle_gesture(GestureReading {
                gesture,
                confidence,
            })
        }
        "voice" => session.handle_voice(rest),
        "tick" => session.tick(),
        "status" => return print_snapshot(session),
        _ => match line.parse::<Command>() {
            Ok(command) => session.handle(command.event()),
            Err(_) if parse_voice_command(line).is_some() => session.handle_voice(line),
            Err(e) => {
                warn!("{e}");
                SessionOutcome::default()
            }
        },
    };
    print_outcome(&outcome)
}

fn print_outcome(outcome: &SessionOutcome) -> Result<(), Box<dyn std::error::Error>> {
    for record in &outcome.transitions {
        println!("{}", serde_json::to_string(&Line::Transition(record))?);
    }
    for event in &outcome.events {
        println!("{}", serde_json::to_string(&Line::Timeline(event))?);
    }
    Ok(())
}

fn print_snapshot(session: &CookingSession) -> Result<(), Box<dyn std::error::Error>> {
    let line = Line::Snapshot {
        session: session.machine().snapshot(),
        timeline: session.engine().snapshot(),
    };
    println!("{}", serde_json::to_string(&line)?);
    Ok(())
}
