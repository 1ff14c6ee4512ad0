//! Bounded parallel fan-out across sibling sub-directories.
//!
//! Keeps up to `max_concurrent` listing fetches in flight on the blocking pool.
//! Every node carries its index path from the root; sorting leaves by that path
//! restores exactly the order the sequential walker produces.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::classify::AnchorClassifier;
use crate::config::FailurePolicy;
use crate::control::CancelToken;
use crate::fetch_page::PageSource;
use crate::report::Verbosity;

use super::{handle_node_error, list_node, NodeFailure, WalkError, WalkOutcome};

struct Node {
    location: String,
    path: Vec<usize>,
}

impl Node {
    fn child(&self, index: usize, segment: &str) -> Node {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push(index);
        Node {
            location: format!("{}{}", self.location, segment),
            path,
        }
    }
}

pub struct ConcurrentWalker<S: PageSource + 'static> {
    source: Arc<S>,
    classifier: Arc<AnchorClassifier>,
    max_concurrent: usize,
    policy: FailurePolicy,
    cancel: Option<CancelToken>,
    verbosity: Verbosity,
}

impl<S: PageSource + 'static> ConcurrentWalker<S> {
    pub fn new(source: Arc<S>, classifier: Arc<AnchorClassifier>, max_concurrent: usize) -> Self {
        Self {
            source,
            classifier,
            max_concurrent: max_concurrent.max(1),
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

    /// Walk the tree under `root`. On abort, outstanding fetches are detached
    /// and their results discarded.
    pub async fn walk(&self, root: &str) -> Result<WalkOutcome, WalkError> {
        let mut queue = VecDeque::from([Node {
            location: root.to_string(),
            path: Vec::new(),
        }]);
        let mut leaves: Vec<(Vec<usize>, String)> = Vec::new();
        let mut failures: Vec<(Vec<usize>, NodeFailure)> = Vec::new();
        let mut join_set = tokio::task::JoinSet::new();

        loop {
            while join_set.len() < self.max_concurrent {
                let Some(node) = queue.pop_front() else {
                    break;
                };
                if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                    return Err(WalkError::Cancelled);
                }
                let source = Arc::clone(&self.source);
                let verbosity = self.verbosity;
                join_set.spawn_blocking(move || {
                    let listed = list_node(source.as_ref(), &node.location, verbosity);
                    (node, listed)
                });
            }

            let Some(joined) = join_set.join_next().await else {
                break;
            };
            let (node, listed) = joined.map_err(|e| WalkError::Task(e.to_string()))?;

            let anchors = match listed {
                Ok(anchors) => anchors,
                Err(error) => {
                    let failure =
                        handle_node_error(self.policy, node.location, error, self.verbosity)?;
                    failures.push((node.path, failure));
                    continue;
                }
            };

            let descend = self.classifier.descend_candidates(&anchors);
            if descend.is_empty() {
                let found = self.classifier.leaf_candidates(&anchors);
                for (index, leaf) in found.into_iter().enumerate() {
                    let child = node.child(index, leaf);
                    leaves.push((child.path, child.location));
                }
            } else {
                for (index, segment) in descend.into_iter().enumerate() {
                    queue.push_back(node.child(index, segment));
                }
            }
        }

        leaves.sort_by(|a, b| a.0.cmp(&b.0));
        failures.sort_by(|a, b| a.0.cmp(&b.0));
        tracing::debug!(
            root,
            leaves = leaves.len(),
            failures = failures.len(),
            "concurrent walk finished"
        );

        Ok(WalkOutcome {
            locations: leaves.into_iter().map(|(_, location)| location).collect(),
            failures: failures.into_iter().map(|(_, failure)| failure).collect(),
        })
    }
}
