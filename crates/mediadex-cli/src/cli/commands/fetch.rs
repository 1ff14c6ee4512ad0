//! `mediadex fetch` – walk the listing tree and rebuild the catalog.

use anyhow::{Context, Result};
use mediadex_core::catalog::{self, format_locations};
use mediadex_core::classify::AnchorClassifier;
use mediadex_core::config::{FailurePolicy, MediadexConfig};
use mediadex_core::control::CancelToken;
use mediadex_core::fetch_page::{CurlPageSource, PageSource};
use mediadex_core::report::Verbosity;
use mediadex_core::walker::{ConcurrentWalker, TreeWalker, WalkOutcome};
use std::path::Path;
use std::sync::Arc;

/// Per-run fetch options from the command line.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Only walk these top-level directories (`base_url + year + "/"`).
    pub years: Vec<String>,
    /// Overrides `fetch.max_concurrent`.
    pub jobs: Option<usize>,
    /// Record failed listings and keep going instead of aborting.
    pub keep_going: bool,
}

/// Roots to walk: one per year, or the base URL itself.
pub fn walk_roots(base_url: &str, years: &[String]) -> Vec<String> {
    if years.is_empty() {
        vec![base_url.to_string()]
    } else {
        years
            .iter()
            .map(|year| format!("{}{}/", base_url, year.trim_matches('/')))
            .collect()
    }
}

pub async fn run_fetch(
    cfg: &MediadexConfig,
    base_url: &str,
    catalog_path: &Path,
    opts: &FetchOptions,
    verbosity: Verbosity,
) -> Result<()> {
    let source = Arc::new(CurlPageSource::from_config(&cfg.fetch_settings()));
    fetch_catalog(source, cfg, base_url, catalog_path, opts, verbosity).await
}

/// Walk every root through `source`, then format and save the catalog.
///
/// Under the abort policy a failed listing returns before anything is written.
pub async fn fetch_catalog<S: PageSource + 'static>(
    source: Arc<S>,
    cfg: &MediadexConfig,
    base_url: &str,
    catalog_path: &Path,
    opts: &FetchOptions,
    verbosity: Verbosity,
) -> Result<()> {
    let settings = cfg.fetch_settings();
    let policy = if opts.keep_going {
        FailurePolicy::Partial
    } else {
        settings.failure_policy
    };
    let jobs = opts.jobs.unwrap_or(settings.max_concurrent).max(1);

    let classifier = Arc::new(AnchorClassifier::from_config(cfg));

    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("interrupt received, cancelling walk");
                cancel.cancel();
            }
        });
    }

    let mut outcome = WalkOutcome::default();
    for root in walk_roots(base_url, &opts.years) {
        verbosity.progress(format_args!("scraping {root} ..."));
        tracing::info!(%root, jobs, ?policy, "walking listing tree");

        let walked = if jobs > 1 {
            ConcurrentWalker::new(Arc::clone(&source), Arc::clone(&classifier), jobs)
                .failure_policy(policy)
                .cancel_token(cancel.clone())
                .verbosity(verbosity)
                .walk(&root)
                .await
        } else {
            let source = Arc::clone(&source);
            let classifier = Arc::clone(&classifier);
            let cancel = cancel.clone();
            let root = root.clone();
            tokio::task::spawn_blocking(move || {
                TreeWalker::new(source.as_ref(), classifier.as_ref())
                    .failure_policy(policy)
                    .cancel_token(cancel)
                    .verbosity(verbosity)
                    .walk(&root)
            })
            .await
            .context("walker task panicked")?
        };
        let walked =
            walked.with_context(|| format!("fetch {root} failed, catalog not written"))?;
        outcome.extend(walked);
    }

    let catalog = format_locations(base_url, &outcome.locations, verbosity)?;

    verbosity.progress(format_args!("writing data to {} ...", catalog_path.display()));
    catalog::save(&catalog, catalog_path, verbosity)?;
    tracing::info!(
        entries = catalog.len(),
        failures = outcome.failures.len(),
        "fetch finished"
    );

    if outcome.is_partial() {
        verbosity.warn(format_args!(
            "warning: {} listing(s) failed; catalog is partial",
            outcome.failures.len()
        ));
        for failure in &outcome.failures {
            verbosity.detail(format_args!("  {}: {}", failure.location, failure.error));
        }
    }

    verbosity.progress("done");
    Ok(())
}
