use crate::config::OptionOverrides;
use anyhow::Result;
use pydtogen_schema::parser::read_tables_from_paths;
use pydtogen_schema::{Generator, SchemaValidator};
use std::path::PathBuf;

pub fn run(paths: Vec<PathBuf>, overrides: OptionOverrides) -> Result<()> {
    let options = overrides.resolve()?;

    println!("🔍 Validating table definitions...");
    let tables = read_tables_from_paths(&paths)?;
    println!("✅ Read {} table(s)", tables.len());

    // 1. Structural checks
    let result = SchemaValidator::validate_tables(&tables, &options);
    let mut issues: Vec<String> = result.errors.iter().map(|e| format!("❌ {}", e)).collect();
    let warnings: Vec<String> = result.warnings.iter().map(|w| format!("⚠️  {}", w)).collect();

    // 2. Type resolution and field partitioning; warnings are already collected
    if !result.has_errors() {
        let generator = Generator::new(options)?;
        if let Err(e) = generator.resolve_models(&tables) {
            issues.push(format!("❌ {}", e));
        }
    }

    if !warnings.is_empty() {
        println!("\n⚠️  Warnings:");
        for warning in &warnings {
            println!("  {}", warning);
        }
    }

    if !issues.is_empty() {
        println!("\n❌ Issues:");
        for issue in &issues {
            println!("  {}", issue);
        }
        anyhow::bail!("Validation failed with {} issue(s)", issues.len());
    }

    println!("\n✅ All tables are valid");
    Ok(())
}
