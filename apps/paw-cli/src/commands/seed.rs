// seed.rs — Register the two demo animals on an empty registry.

use paw_core::{AnimalRegistry, PawConfig, SterilizationStatus};
use paw_records::NewAnimal;

use super::{event_dispatcher, open_store};

fn demo_animals() -> Vec<NewAnimal> {
    vec![
        NewAnimal::new("大黄")
            .with_species("橘猫")
            .with_traits("亲人、贪吃")
            .with_status(SterilizationStatus::Sterilized)
            .with_description("经常出现在图书馆草坪，喜欢晒太阳。")
            .with_photo("assets/animals/test1.jpg"),
        NewAnimal::new("点点")
            .with_species("三花")
            .with_traits("胆小、警觉")
            .with_status(SterilizationStatus::NotSterilized)
            .with_description("在学五食堂后门出没，对塑料袋声音敏感。")
            .with_photo("assets/animals/test2.jpg"),
    ]
}

pub fn execute(config: &PawConfig) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let registry = AnimalRegistry::new(store).with_events(event_dispatcher(config));

    let existing = registry.list_animals()?;
    if !existing.is_empty() {
        println!(
            "Registry already has {} animal(s); nothing to seed.",
            existing.len()
        );
        return Ok(());
    }

    for new in demo_animals() {
        let animal = registry.register_animal(new)?;
        println!("Registered #{}: {}", animal.id, animal.name);
    }

    Ok(())
}
