use std::sync::Arc;

use composer_core::{compose, make_logger, Pipeline, Step};

use crate::{extract_first_link, FetchError, PageFetcher};

/// Asynchronous step: treats the accumulator as a URL and replaces it with the
/// page body.
pub fn fetch_page_step<F>(fetcher: Arc<F>) -> Step<String, FetchError>
where
    F: PageFetcher + ?Sized + 'static,
{
    Step::then(move |url: &String| {
        let fetcher = Arc::clone(&fetcher);
        let url = url.clone();
        async move { fetcher.fetch_page(&url).await }
    })
    .with_label("fetch_page")
}

/// Synchronous step: replaces a page body with its first absolute link. A page
/// without one yields no value, so the body passes through.
pub fn extract_first_link_step() -> Step<String, FetchError> {
    Step::optional(|html: &String| extract_first_link(html)).with_label("extract_first_link")
}

/// Fetch a page, follow its first absolute link, and repeat `hops` times.
///
/// With `logged` set, each fetch and extraction is preceded by a logger step.
pub fn link_hopping_pipeline<F>(
    fetcher: Arc<F>,
    hops: usize,
    logged: bool,
) -> Pipeline<String, FetchError>
where
    F: PageFetcher + ?Sized + 'static,
{
    let per_hop = if logged { 4 } else { 2 };
    let mut steps = Vec::with_capacity(hops * per_hop);
    for hop in 1..=hops {
        if logged {
            steps.push(make_logger(format!("about to fetch page {hop}")));
        }
        steps.push(fetch_page_step(Arc::clone(&fetcher)));
        if logged {
            steps.push(make_logger(format!("about to get first url from page {hop}")));
        }
        steps.push(extract_first_link_step());
    }
    compose(steps)
}
