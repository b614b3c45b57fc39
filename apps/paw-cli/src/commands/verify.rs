// verify.rs — Check the hash chain of every record log.

use paw_core::PawConfig;
use paw_records::JsonlRecordStore;

pub fn execute(config: &PawConfig) -> anyhow::Result<()> {
    let logs = JsonlRecordStore::verify(&config.data_dir)?;

    if logs.is_empty() {
        println!("No record logs in {}", config.data_dir.display());
        return Ok(());
    }

    for (path, count) in &logs {
        println!("ok  {:>6} record(s)  {}", count, path.display());
    }
    println!("\nAll {} log(s) intact.", logs.len());

    Ok(())
}
