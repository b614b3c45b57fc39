// animal.rs — Animal subcommands: list, show, add, options.

use clap::Subcommand;
use paw_core::{AnimalId, AnimalRegistry, PawConfig, SterilizationStatus, TimelineQuery};
use paw_records::{Animal, NewAnimal};

use super::{display_time, event_dispatcher, open_store, truncate};

#[derive(Subcommand)]
pub enum AnimalCommands {
    /// List registered animals.
    List {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Show one animal's profile and latest sighting.
    Show {
        /// Animal id.
        id: AnimalId,
    },
    /// Register a new animal profile.
    Add {
        /// Display name (e.g., "大黄").
        name: String,
        /// Species or coat (e.g., "橘猫").
        #[arg(long, default_value = "")]
        species: String,
        /// Temperament (e.g., "亲人、贪吃").
        #[arg(long, default_value = "")]
        traits: String,
        /// Sterilization status: unknown, sterilized, not_sterilized (or 已绝育/未绝育).
        #[arg(long, default_value = "unknown")]
        status: SterilizationStatus,
        #[arg(long, default_value = "")]
        description: String,
        /// Photo reference for the profile.
        #[arg(long)]
        photo: Option<String>,
    },
    /// Show the choices offered by the sighting form.
    Options,
}

pub fn execute(cmd: &AnimalCommands, config: &PawConfig) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let registry = AnimalRegistry::new(store.clone()).with_events(event_dispatcher(config));

    match cmd {
        AnimalCommands::List { json } => list_animals(&registry, *json),
        AnimalCommands::Show { id } => show_animal(&registry, &TimelineQuery::new(store), *id),
        AnimalCommands::Add {
            name,
            species,
            traits,
            status,
            description,
            photo,
        } => {
            let mut new = NewAnimal::new(name.as_str())
                .with_species(species.as_str())
                .with_traits(traits.as_str())
                .with_status(*status)
                .with_description(description.as_str());
            if let Some(photo) = photo {
                new = new.with_photo(photo.as_str());
            }
            let animal = registry.register_animal(new)?;
            println!("Registered #{}: {}", animal.id, animal.name);
            Ok(())
        }
        AnimalCommands::Options => {
            let options = registry.selection_options()?;
            for (i, label) in options.labels().enumerate() {
                println!("{:>3}. {}", i + 1, label);
            }
            Ok(())
        }
    }
}

fn list_animals(registry: &AnimalRegistry, json: bool) -> anyhow::Result<()> {
    let animals = registry.list_animals()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&animals)?);
        return Ok(());
    }

    if animals.is_empty() {
        println!("No animals registered. Try `paw seed`.");
        return Ok(());
    }

    println!("{:<6} {:<12} {:<10} {:<8} {}", "ID", "NAME", "SPECIES", "STATUS", "TRAITS");
    println!("{}", "-".repeat(60));
    for a in &animals {
        println!(
            "{:<6} {:<12} {:<10} {:<8} {}",
            a.id,
            truncate(&a.name, 10),
            truncate(&a.species_tag, 8),
            a.sterilization_status.label(),
            truncate(&a.traits, 20),
        );
    }
    println!("\n{} animal(s) total.", animals.len());

    Ok(())
}

fn show_animal(
    registry: &AnimalRegistry,
    timeline: &TimelineQuery,
    id: AnimalId,
) -> anyhow::Result<()> {
    let animal = registry.get_animal(id)?;
    let sightings = timeline.get_timeline(id)?;

    print_profile(&animal);
    match sightings.latest() {
        Some(s) => println!(
            "Last seen: {} at {} ({} sighting(s))",
            display_time(&s.timestamp),
            s.location_label,
            sightings.len()
        ),
        None => println!("Last seen: never"),
    }

    Ok(())
}

/// Profile block shared with the shell's detail screen.
pub fn print_profile(animal: &Animal) {
    println!("#{} {}", animal.id, animal.name);
    if !animal.species_tag.is_empty() {
        println!("Species:     {}", animal.species_tag);
    }
    if !animal.traits.is_empty() {
        println!("Traits:      {}", animal.traits);
    }
    println!("Sterilized:  {}", animal.sterilization_status.label());
    if !animal.description.is_empty() {
        println!("About:       {}", animal.description);
    }
    if let Some(ref photo) = animal.photo_ref {
        println!("Photo:       {}", photo);
    }
}
