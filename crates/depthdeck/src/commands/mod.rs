pub mod completion;
pub mod config;
pub mod inspect;
pub mod presets;
