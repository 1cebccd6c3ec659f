//! MediaWiki API access: the [`WikiApi`] seam and its `reqwest` implementation.
//!
//! Only two endpoints are used:
//! - `action=query&list=categorymembers` (paginated via continuation tokens)
//! - `action=parse&prop=text|categories` (rendered HTML + category list)

mod client;
mod types;

use url::Url;
use wikiharvest_shared::Result;

pub use client::{WikiClient, WikiEndpoint};
pub use types::{
    CategoryMember, Continuation, MemberPage, Namespace, ParsedPage, RenderResponse,
};

/// Operations the traversal and extraction stages need from a wiki.
///
/// Implemented by [`WikiClient`] over HTTP; tests substitute in-memory fakes.
#[allow(async_fn_in_trait)]
pub trait WikiApi {
    /// Origin of the wiki, used to absolutize relative URLs.
    fn base_url(&self) -> &Url;

    /// Fetch one page of direct members of `category`.
    async fn category_members(
        &self,
        category: &str,
        continuation: Option<&Continuation>,
    ) -> Result<MemberPage>;

    /// Fetch rendered HTML and categories for `title`.
    async fn render_page(&self, title: &str) -> Result<RenderResponse>;
}
