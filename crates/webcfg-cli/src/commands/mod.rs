pub mod augment;
pub mod env;
pub mod version;
