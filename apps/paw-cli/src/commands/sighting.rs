// sighting.rs — Sighting subcommands: submit.

use clap::Subcommand;
use paw_core::{AnimalRegistry, PawConfig, Selection, SightingIntake};

use super::{display_time, event_dispatcher, open_store};

#[derive(Subcommand)]
pub enum SightingCommands {
    /// Record that you met an animal.
    Submit {
        /// Who you met: a name from `paw animal options` or an animal id.
        #[arg(long, required_unless_present = "new_profile")]
        animal: Option<String>,
        /// The animal isn't registered yet. Requires --photo.
        #[arg(long, conflicts_with = "animal")]
        new_profile: bool,
        /// Where: a preset spot (e.g., "图书馆草坪") or any free-text place.
        #[arg(long)]
        location: String,
        /// What happened, at most 200 characters.
        #[arg(long, default_value = "")]
        note: String,
        /// Photo reference (path or upload key).
        #[arg(long)]
        photo: Option<String>,
    },
}

pub fn execute(cmd: &SightingCommands, config: &PawConfig) -> anyhow::Result<()> {
    match cmd {
        SightingCommands::Submit {
            animal,
            new_profile,
            location,
            note,
            photo,
        } => {
            let store = open_store(config)?;
            let events = event_dispatcher(config);
            let registry = AnimalRegistry::new(store.clone());
            let intake = SightingIntake::new(store)
                .with_locations(config.locations.clone())
                .with_events(events);

            let selection = match animal {
                Some(choice) if !*new_profile => registry.resolve_selection(choice)?,
                _ => Selection::NewProfile,
            };

            let sighting = intake.submit(selection, location, note, photo.as_deref())?;

            println!("Recorded sighting {}", sighting.id);
            println!("  Animal:   {}", sighting.animal);
            println!("  Where:    {}", sighting.location_label);
            println!("  When:     {}", display_time(&sighting.timestamp));
            if sighting.animal.is_pending() {
                println!();
                println!("A curator will review the new profile before it appears in the list.");
            }
            Ok(())
        }
    }
}
