//! Category traversal: turn one root category into the sorted list of item
//! page titles reachable from it.
//!
//! The walk is breadth-first over sub-categories. Each category's member
//! listing is paginated; every page of it is fetched before the next queued
//! category is looked at. Requests are issued one at a time with a fixed
//! pause between them.

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::time::Duration;

use tracing::{debug, info, instrument};

use wikiharvest_mediawiki::{CategoryMember, Continuation, Namespace, WikiApi};
use wikiharvest_shared::{Result, ScrapeConfig};

// ---------------------------------------------------------------------------
// Discovery options
// ---------------------------------------------------------------------------

/// Configuration for the traversal.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOptions {
    /// Pause after each continuation request and after each category.
    pub delay: Duration,
}

impl From<&ScrapeConfig> for DiscoveryOptions {
    fn from(config: &ScrapeConfig) -> Self {
        Self {
            delay: config.delay,
        }
    }
}

// ---------------------------------------------------------------------------
// DiscoveryResult
// ---------------------------------------------------------------------------

/// Outcome of a traversal.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryResult {
    /// Unique content-page titles, sorted.
    pub titles: Vec<String>,
    /// Categories in the order they were expanded (each at most once).
    pub categories: Vec<String>,
}

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

/// Walk `root` and every sub-category reachable from it.
///
/// A category reachable through several paths (or through a cycle) is
/// expanded once. Any failure while listing a category aborts the walk.
#[instrument(skip_all, fields(root = %root))]
pub async fn discover_titles<A: WikiApi>(
    api: &A,
    root: &str,
    opts: &DiscoveryOptions,
) -> Result<DiscoveryResult> {
    let mut queue: VecDeque<String> = VecDeque::from([root.to_string()]);
    let mut visited: HashSet<String> = HashSet::new();
    let mut expanded: Vec<String> = Vec::new();
    let mut pages: BTreeSet<String> = BTreeSet::new();

    while let Some(category) = queue.pop_front() {
        if !visited.insert(category.clone()) {
            continue;
        }

        let members = list_members(api, &category, opts).await?;
        debug!(%category, members = members.len(), "category listed");

        for member in members {
            match member.namespace {
                Namespace::Category => queue.push_back(member.title),
                Namespace::Main => {
                    pages.insert(member.title);
                }
                Namespace::Other(_) => {}
            }
        }

        expanded.push(category);
        tokio::time::sleep(opts.delay).await;
    }

    info!(
        categories = expanded.len(),
        pages = pages.len(),
        "category traversal complete"
    );

    Ok(DiscoveryResult {
        titles: pages.into_iter().collect(),
        categories: expanded,
    })
}

/// Fetch every member of one category, following continuation tokens until
/// the API stops returning one.
pub async fn list_members<A: WikiApi>(
    api: &A,
    category: &str,
    opts: &DiscoveryOptions,
) -> Result<Vec<CategoryMember>> {
    let mut members = Vec::new();
    let mut continuation: Option<Continuation> = None;

    loop {
        let page = api.category_members(category, continuation.as_ref()).await?;
        members.extend(page.members);

        match page.continuation {
            Some(next) => {
                continuation = Some(next);
                tokio::time::sleep(opts.delay).await;
            }
            None => break,
        }
    }

    Ok(members)
}
