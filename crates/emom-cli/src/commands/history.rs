use clap::Subcommand;
use emom_core::storage::Database;
use emom_core::{SessionLog, SessionStatus};

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List logged workouts, most recent first
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Totals across all logged workouts
    Summary,
    /// Delete every logged workout
    Clear,
}

pub fn run(action: HistoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = Database::open()?;

    match action {
        HistoryAction::List { json } => {
            let records = db.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if records.is_empty() {
                println!("No workouts logged yet.");
            } else {
                for r in records {
                    let status = match r.status {
                        SessionStatus::Completed => "COMPLETED",
                        SessionStatus::Interrupted => "INTERRUPTED",
                    };
                    println!(
                        "{:<12} {} {}  {:<11} {}/{} min",
                        r.title, r.date, r.start_time, status, r.actual_minutes, r.target_minutes
                    );
                }
            }
        }
        HistoryAction::Summary => {
            let summary = db.summary()?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        HistoryAction::Clear => {
            db.clear()?;
            println!("history cleared");
        }
    }
    Ok(())
}
