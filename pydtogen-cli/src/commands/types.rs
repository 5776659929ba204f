use anyhow::Result;
use pydtogen_schema::{Dialect, TypeCatalog};

/// Print the native type names the built-in catalog understands
pub fn run(dialect: Option<Dialect>) -> Result<()> {
    let catalog = TypeCatalog::default();
    let dialects: Vec<Dialect> = match dialect {
        Some(dialect) => vec![dialect],
        None => Dialect::ALL.to_vec(),
    };

    for dialect in dialects {
        println!("{}:", dialect);
        for name in catalog.type_names(dialect) {
            if let Some(resolved) = catalog.resolve(name, Some(dialect)) {
                println!("  {:<18} {}", name, resolved.mapping.python.name());
            }
        }
    }

    Ok(())
}
