pub mod allocation_service;
pub mod format_service;
pub mod price_service;
pub mod validation_service;
