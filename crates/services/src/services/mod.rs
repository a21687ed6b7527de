pub mod content;
pub mod locale_registry;
