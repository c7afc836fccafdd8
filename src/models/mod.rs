pub mod definitions;
pub mod field;
