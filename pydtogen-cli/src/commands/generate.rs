use crate::config::OptionOverrides;
use anyhow::{Context, Result};
use pydtogen_schema::parser::read_tables_from_paths;
use pydtogen_schema::Generator;
use std::fs;
use std::path::PathBuf;

pub fn run(paths: Vec<PathBuf>, overrides: OptionOverrides, output: Option<PathBuf>) -> Result<()> {
    let options = overrides.resolve()?;
    let tables = read_tables_from_paths(&paths)?;
    log::info!("Generating models for {} table(s)", tables.len());

    let generator = Generator::new(options)?;
    let source = generator.generate(&tables)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {}", parent.display()))?;
            }
            fs::write(&path, &source)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("✅ Generated {} table(s) into {}", tables.len(), path.display());
        }
        None => print!("{}", source),
    }

    Ok(())
}
