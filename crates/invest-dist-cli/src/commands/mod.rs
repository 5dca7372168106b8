pub mod analysis;
pub mod distribution;
pub mod settings;
