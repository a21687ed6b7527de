pub mod locale;
pub mod response;
