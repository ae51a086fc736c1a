//! Dataset ingestion: match records, file loading and source resolution.

pub mod dataset;
pub mod record;
pub mod sources;

pub use dataset::{Dataset, DatasetProvider, JsonFileSource};
pub use record::{ActionRecord, GAIT_SCALE};
pub use sources::{parse_file_list, resolve_files, resolve_files_from_env, FILES_PATH_ENV, FILES_PATH_ENV_ALIAS};
