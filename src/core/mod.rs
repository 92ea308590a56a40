//! Core support modules: error taxonomy and file-system helpers.

pub mod errors;
pub mod fs_utils;

pub use errors::SetupError;
pub use fs_utils::{collect_source_files, is_source_file, read_source, SOURCE_EXTENSIONS};
