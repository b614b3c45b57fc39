// report.rs — Report subcommands: submit, list, categories.

use clap::Subcommand;
use paw_core::{AnimalId, PawConfig, ReportCategory, ReportIntake};

use super::{display_time, event_dispatcher, open_store, truncate};

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Flag a welfare or content problem.
    Submit {
        /// Category key or label (see `paw report categories`).
        #[arg(long)]
        category: String,
        /// Optional free-text detail.
        #[arg(long, default_value = "")]
        detail: String,
        /// Animal the report is about. Omit for a general report.
        #[arg(long)]
        animal: Option<AnimalId>,
    },
    /// List filed reports, oldest first.
    List {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Show the accepted report categories.
    Categories,
}

pub fn execute(cmd: &ReportCommands, config: &PawConfig) -> anyhow::Result<()> {
    match cmd {
        ReportCommands::Submit {
            category,
            detail,
            animal,
        } => {
            let intake = ReportIntake::new(open_store(config)?).with_events(event_dispatcher(config));
            let report = intake.submit(category, detail, *animal)?;
            println!("Filed report {} ({})", report.id, report.category.label());
            Ok(())
        }
        ReportCommands::List { json } => {
            let reports = ReportIntake::new(open_store(config)?).list_reports()?;

            if *json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
                return Ok(());
            }

            if reports.is_empty() {
                println!("No reports filed.");
                return Ok(());
            }

            println!("{:<18} {:<16} {:<8} {}", "WHEN", "CATEGORY", "ANIMAL", "DETAIL");
            println!("{}", "-".repeat(72));
            for r in &reports {
                println!(
                    "{:<18} {:<16} {:<8} {}",
                    display_time(&r.timestamp),
                    r.category.label(),
                    r.animal_id.map(|id| id.to_string()).unwrap_or_else(|| "-".into()),
                    truncate(&r.detail, 30),
                );
            }
            println!("\n{} report(s) total.", reports.len());
            Ok(())
        }
        ReportCommands::Categories => {
            for c in ReportCategory::ALL {
                println!("{:<24} {}", c.key(), c.label());
            }
            Ok(())
        }
    }
}
