//! Dataset source resolution.
//!
//! Source locations come from a comma-separated list in the environment.

use std::env;
use std::path::PathBuf;

/// Canonical env var holding the comma-separated match file list.
pub const FILES_PATH_ENV: &str = "GG_FILES_PATH";

/// Legacy alias used by older deployments.
pub const FILES_PATH_ENV_ALIAS: &str = "FILES_PATH";

/// Split a comma-separated list into paths. Entries are trimmed and empty
/// entries are dropped.
pub fn parse_file_list(list: &str) -> Vec<PathBuf> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Resolve dataset files from the environment.
///
/// Resolution order:
/// 1) `GG_FILES_PATH` if set and non-blank
/// 2) `FILES_PATH` if set and non-blank
/// 3) empty list
pub fn resolve_files_from_env() -> Vec<PathBuf> {
    resolve_files(|name| env::var(name).ok())
}

/// Same resolution order as [`resolve_files_from_env`], reading variables
/// through `lookup`.
pub fn resolve_files(lookup: impl Fn(&str) -> Option<String>) -> Vec<PathBuf> {
    [FILES_PATH_ENV, FILES_PATH_ENV_ALIAS]
        .into_iter()
        .filter_map(|name| lookup(name))
        .find(|list| !list.trim().is_empty())
        .map(|list| parse_file_list(&list))
        .unwrap_or_default()
}
