pub mod fs;
pub mod sanitize;
