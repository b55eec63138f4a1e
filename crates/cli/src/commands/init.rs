//! `switchyard init`: write a default config file, and optionally create the
//! demo university database.

use switchyard_config::AppConfig;
use switchyard_tools::seed_database;

pub async fn run(seed_db: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("Created config directory: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("Config already exists at: {}", config_path.display());
        if !seed_db {
            println!("Edit it manually or delete it and re-run init.");
            return Ok(());
        }
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("Created config.toml at: {}", config_path.display());
    }

    if seed_db {
        let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
        let path = &config.database.path;
        let report = seed_database(path)
            .await
            .map_err(|e| format!("Failed to seed {}: {e}", path.display()))?;
        println!(
            "Seeded {}: {} students, {} courses, {} offerings, {} professors, {} transcript rows",
            path.display(),
            report.students,
            report.courses,
            report.course_offerings,
            report.professors,
            report.transcripts,
        );
    }

    println!();
    println!("Next steps:");
    println!("  1. Set an API key (api_key in the file, or AZURE_OPENAI_API_KEY / OPENAI_API_KEY)");
    if seed_db {
        println!("  2. Point [programs] dir at your program documents");
    } else {
        println!("  2. Point [database] path and [programs] dir at your data (or re-run with --seed-db)");
    }
    println!("  3. Run: switchyard chat");

    Ok(())
}
