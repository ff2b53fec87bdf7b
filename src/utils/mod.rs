pub mod json;
pub mod logging;
