//! CLI command handlers. Each command is in its own file.

mod fetch;
mod search;

pub use fetch::{run_fetch, FetchOptions};
#[cfg(test)]
pub use fetch::{fetch_catalog, walk_roots};
pub use search::run_search;
