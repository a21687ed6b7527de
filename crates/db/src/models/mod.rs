pub mod content;
pub mod custom_page;
pub mod faq;
pub mod pricing_plan;
pub mod project;
pub mod resume_entry;
pub mod service;
pub mod site_setting;
pub mod translated;
