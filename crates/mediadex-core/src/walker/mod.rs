//! Directory listing tree walk.
//!
//! Starting from a root listing, descends into every sub-directory anchor and
//! records the media file anchors of terminal directories. A page that lists
//! sub-directories is treated as a pure index: file anchors on it are dropped.
//! There is no cycle detection; the server's hierarchy must be finite.

mod concurrent;

pub use concurrent::ConcurrentWalker;

use crate::classify::AnchorClassifier;
use crate::config::FailurePolicy;
use crate::control::CancelToken;
use crate::fetch_page::{FetchError, PageSource};
use crate::listing::{parse_anchors, Anchor, ListingError};
use crate::report::Verbosity;

/// Why one listing node could not be read.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Listing(#[from] ListingError),
}

/// A listing skipped under [`FailurePolicy::Partial`].
#[derive(Debug)]
pub struct NodeFailure {
    pub location: String,
    pub error: NodeError,
}

#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    #[error("listing {location}")]
    Node {
        location: String,
        #[source]
        source: NodeError,
    },
    #[error("walk cancelled")]
    Cancelled,
    #[error("walker task failed: {0}")]
    Task(String),
}

/// Result of a walk: leaf locations in depth-first listing order, plus the
/// listings that failed when running with [`FailurePolicy::Partial`].
#[derive(Debug, Default)]
pub struct WalkOutcome {
    pub locations: Vec<String>,
    pub failures: Vec<NodeFailure>,
}

impl WalkOutcome {
    /// Append another walk's results (used when walking several roots).
    pub fn extend(&mut self, other: WalkOutcome) {
        self.locations.extend(other.locations);
        self.failures.extend(other.failures);
    }

    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Fetch and parse one listing.
pub(crate) fn list_node<S: PageSource + ?Sized>(
    source: &S,
    location: &str,
    verbosity: Verbosity,
) -> Result<Vec<Anchor>, NodeError> {
    verbosity.detail(format_args!("getting node: {location}"));
    tracing::debug!(location, "fetching listing");
    let body = source.fetch(location)?;
    Ok(parse_anchors(&body)?)
}

/// Apply the failure policy to a node error: abort, or record and continue.
pub(crate) fn handle_node_error(
    policy: FailurePolicy,
    location: String,
    error: NodeError,
    verbosity: Verbosity,
) -> Result<NodeFailure, WalkError> {
    match policy {
        FailurePolicy::Abort => Err(WalkError::Node {
            location,
            source: error,
        }),
        FailurePolicy::Partial => {
            tracing::warn!(%location, %error, "listing failed, skipping subtree");
            verbosity.warn(format_args!("skipping {location}: {error}"));
            Ok(NodeFailure { location, error })
        }
    }
}

/// Sequential depth-first walker.
///
/// Uses an explicit stack so depth is bounded only by memory. Blocking; call
/// from `spawn_blocking` if used from async code.
pub struct TreeWalker<'a, S: PageSource + ?Sized> {
    source: &'a S,
    classifier: &'a AnchorClassifier,
    policy: FailurePolicy,
    cancel: Option<CancelToken>,
    verbosity: Verbosity,
}

impl<'a, S: PageSource + ?Sized> TreeWalker<'a, S> {
    pub fn new(source: &'a S, classifier: &'a AnchorClassifier) -> Self {
        Self {
            source,
            classifier,
            policy: FailurePolicy::Abort,
            cancel: None,
            verbosity: Verbosity::silent(),
        }
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Walk the tree under `root` (which should end with `/`).
    pub fn walk(&self, root: &str) -> Result<WalkOutcome, WalkError> {
        let mut outcome = WalkOutcome::default();
        let mut pending = vec![root.to_string()];

        while let Some(location) = pending.pop() {
            if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                return Err(WalkError::Cancelled);
            }

            let anchors = match list_node(self.source, &location, self.verbosity) {
                Ok(anchors) => anchors,
                Err(error) => {
                    let failure = handle_node_error(self.policy, location, error, self.verbosity)?;
                    outcome.failures.push(failure);
                    continue;
                }
            };

            let descend = self.classifier.descend_candidates(&anchors);
            if descend.is_empty() {
                let leaves = self.classifier.leaf_candidates(&anchors);
                tracing::debug!(%location, leaves = leaves.len(), "terminal listing");
                outcome
                    .locations
                    .extend(leaves.into_iter().map(|leaf| format!("{location}{leaf}")));
            } else {
                // Reversed so the first listed sub-directory is popped first.
                pending.extend(
                    descend
                        .into_iter()
                        .rev()
                        .map(|segment| format!("{location}{segment}")),
                );
            }
        }

        Ok(outcome)
    }
}
