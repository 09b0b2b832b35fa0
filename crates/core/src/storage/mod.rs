pub mod document;
pub mod file;
pub mod memory;
pub mod traits;
