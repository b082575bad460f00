mod db;
mod ledger;
mod models;
mod ops;
mod run;

use anyhow::{Context, Result};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let db_path = get_db_path()?;
    let db = db::Database::open(&db_path)?;
    let mut repo = ledger::LedgerRepository::new(db);

    if args.len() < 2 {
        run::as_cli(&["finledger".into(), "--help".into()], &mut repo)
    } else {
        run::as_cli(&args, &mut repo)
    }
}

fn get_db_path() -> Result<std::path::PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "finledger", "FinLedger")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("finledger.db"))
}
