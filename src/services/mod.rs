pub mod conversion;
pub mod file_watcher;

pub use conversion::{auto_palette_project, ConversionError, ConversionService, ConversionSummary};
pub use file_watcher::{FileChangeEvent, FileWatcher};
