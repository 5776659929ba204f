pub mod generate;
pub mod types;
pub mod validate;
