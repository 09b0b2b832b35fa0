pub mod allocation;
pub mod asset;
pub mod configuration;
pub mod display;
pub mod price;
pub mod settings;
