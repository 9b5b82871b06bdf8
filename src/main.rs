mod db;
mod models;
mod run;
mod stats;
mod ui;

use anyhow::{Context, Result};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let db_path = get_db_path()?;
    let mut db = db::Database::open(&db_path)?;
    let profile = ensure_default_profile(&mut db)?;

    match args.len() {
        1 => run::as_tui(&mut db, profile),
        2.. => run::as_cli(&args, &mut db, profile),
        _ => {
            eprintln!("Usage: fincontrol [command]");
            Ok(())
        }
    }
}

fn ensure_default_profile(db: &mut db::Database) -> Result<models::Profile> {
    if let Some(first) = db.get_profiles()?.into_iter().next() {
        return Ok(first);
    }
    let profile = models::Profile::new("Default".into());
    let id = db.insert_profile(&profile)?;
    Ok(models::Profile {
        id: Some(id),
        ..profile
    })
}

fn get_db_path() -> Result<std::path::PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "fincontrol", "FinControl")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("fincontrol.db"))
}
