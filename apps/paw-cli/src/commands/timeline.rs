// timeline.rs — Per-animal timeline and the pending-profile queue.

use paw_core::{AnimalId, PawConfig, TimelineQuery};
use paw_records::Sighting;

use super::{display_time, open_store, truncate};

pub fn execute(id: AnimalId, json: bool, config: &PawConfig) -> anyhow::Result<()> {
    let query = TimelineQuery::new(open_store(config)?);
    let timeline = query.get_timeline(id)?;

    if json {
        let sightings: Vec<&Sighting> = timeline.iter().collect();
        println!("{}", serde_json::to_string_pretty(&sightings)?);
        return Ok(());
    }

    if timeline.is_empty() {
        println!("No sightings of #{} yet.", id);
        return Ok(());
    }

    print_sightings(timeline.iter());
    println!("\n{} sighting(s).", timeline.len());

    Ok(())
}

/// New-profile proposals, newest first.
pub fn pending(config: &PawConfig) -> anyhow::Result<()> {
    let query = TimelineQuery::new(open_store(config)?);
    let pending = query.pending_sightings()?;

    if pending.is_empty() {
        println!("No new profiles awaiting review.");
        return Ok(());
    }

    println!("{:<18} {:<14} {:<24} {}", "WHEN", "WHERE", "PHOTO", "PENDING ID");
    println!("{}", "-".repeat(96));
    for s in &pending {
        println!(
            "{:<18} {:<14} {:<24} {}",
            display_time(&s.timestamp),
            truncate(&s.location_label, 12),
            truncate(s.photo_ref.as_deref().unwrap_or("-"), 22),
            s.animal,
        );
    }
    println!("\n{} proposal(s).", pending.len());

    Ok(())
}

/// Timeline rows shared with the shell's detail screen.
pub fn print_sightings<'a>(sightings: impl IntoIterator<Item = &'a Sighting>) {
    for s in sightings {
        print!("{}  {}", display_time(&s.timestamp), s.location_label);
        if !s.note.is_empty() {
            print!("  “{}”", s.note);
        }
        if let Some(ref photo) = s.photo_ref {
            print!("  [{}]", photo);
        }
        println!();
    }
}
