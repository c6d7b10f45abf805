use std::io::BufRead;
use std::time::Duration;

use clap::Args;
use emom_core::storage::Database;
use emom_core::{Config, Event, IntervalTicker, Phase, Variant, WorkoutRunner};
use tokio::sync::mpsc;

use crate::terminal::{redraw, status_line, InhibitWake, TerminalCues};

#[derive(Args)]
pub struct RunArgs {
    /// Workout variant (EMOM, E2MOM, E3MOM, E5MOM); defaults to the configured one
    #[arg(long, short)]
    variant: Option<Variant>,
    /// Number of rounds; defaults to the configured one
    #[arg(long, short)]
    rounds: Option<u32>,
    /// Tick period in milliseconds
    #[arg(long, default_value_t = 1000, hide = true)]
    tick_ms: u64,
}

/// Line commands typed while a workout runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Pause,
    Resume,
    Toggle,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "p" | "pause" => Some(Command::Pause),
            "r" | "resume" => Some(Command::Resume),
            "" => Some(Command::Toggle),
            "q" | "quit" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// How the foreground session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Finished,
    Stopped,
}

/// Read stdin on a plain thread; blocking reads must not hold the runtime
/// open once the workout is over.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn apply_command(runner: &mut WorkoutRunner, command: Command) -> Vec<Event> {
    match command {
        Command::Pause => runner.pause(),
        Command::Resume => runner.resume(),
        Command::Toggle if runner.phase() == Phase::Paused => runner.resume(),
        Command::Toggle => runner.pause(),
        Command::Quit => runner.quit(),
    }
}

fn announce(events: &[Event]) {
    for event in events {
        match event {
            Event::RoundStarted {
                round,
                target_rounds,
            } => println!("\n>> Round {round}/{target_rounds}"),
            Event::TimerPaused { .. } => println!("\n|| Paused (r to resume, q to quit)"),
            Event::TimerResumed { .. } => println!("\n>> Resumed"),
            _ => {}
        }
    }
}

async fn drive(runner: &mut WorkoutRunner, period: Duration) -> Outcome {
    let mut ticker = IntervalTicker::new(period);
    let mut commands = spawn_stdin_reader();
    let mut stdin_open = true;

    announce(&runner.start());
    ticker.sync(runner.is_ticking());
    redraw(&status_line(&runner.snapshot()));

    while runner.phase() != Phase::Idle {
        // Commands win over a tick that is ready at the same moment.
        let events = tokio::select! {
            biased;
            line = commands.recv(), if stdin_open => match line {
                Some(line) => match Command::parse(&line) {
                    Some(command) => apply_command(runner, command),
                    None => {
                        println!("\n?? Unknown command '{}' (p, r, q)", line.trim());
                        Vec::new()
                    }
                },
                None => {
                    stdin_open = false;
                    if runner.phase() == Phase::Paused {
                        // Nothing can resume a paused workout any more.
                        runner.quit()
                    } else {
                        tracing::debug!("stdin closed; workout continues");
                        Vec::new()
                    }
                }
            },
            _ = ticker.tick() => runner.tick(),
        };
        ticker.sync(runner.is_ticking());
        announce(&events);
        if runner.phase() != Phase::Idle {
            redraw(&status_line(&runner.snapshot()));
        }
    }
    println!();

    if runner.acknowledge_finished() {
        Outcome::Finished
    } else {
        Outcome::Stopped
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let workout = config.workout_config(args.variant, args.rounds)?;
    let db = Database::open()?;

    let mut runner =
        WorkoutRunner::new(workout, Box::new(db)).with_cues(TerminalCues::new(&config.cues));
    if config.keep_awake {
        runner = runner.with_wake(InhibitWake::default());
    }

    println!("Hello, {}!", config.user_name);
    println!("{}", emom_core::facts::pick_fact(&mut rand::thread_rng()));
    println!(
        "{} x{} ({} min). Enter toggles pause, q quits.",
        workout.variant(),
        workout.target_rounds(),
        workout.target_minutes()
    );

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let period = Duration::from_millis(args.tick_ms.max(1));
    let outcome = rt.block_on(drive(&mut runner, period));

    match outcome {
        Outcome::Finished => println!(
            "Great work {}! Workout completed: {} minutes",
            config.user_name,
            workout.target_minutes()
        ),
        Outcome::Stopped => println!("Workout stopped."),
    }
    Ok(())
}
