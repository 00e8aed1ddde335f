pub mod config;

pub use config::{check_dimensions, CleanupSection, DitherSection, KnobConfig, ProjectConfig, MAX_DIMENSION};
