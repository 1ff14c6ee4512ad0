//! `mediadex search <tokens>` – print catalog urls containing every token.

use anyhow::Result;
use mediadex_core::catalog::{self, StoreError};
use mediadex_core::search::search;
use std::path::Path;

pub async fn run_search(catalog_path: &Path, tokens: &[String]) -> Result<()> {
    let entries = match catalog::load(catalog_path) {
        Ok(entries) => entries,
        Err(StoreError::NotFound(path)) => {
            tracing::info!(path = %path.display(), "search without catalog");
            println!(
                "Missing catalog file {}, please run `mediadex fetch`",
                path.display()
            );
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let mut hits = 0usize;
    for url in search(&entries, tokens) {
        println!("{url}");
        hits += 1;
    }
    tracing::debug!(?tokens, hits, "search finished");
    Ok(())
}
