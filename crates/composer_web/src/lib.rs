//! Composer web: page fetching and link extraction, plus the pipeline steps
//! that wrap them.
mod decode;
mod fetch;
mod links;
mod steps;
mod types;

pub use decode::decode_body;
pub use fetch::{FetchSettings, PageFetcher, ReqwestFetcher};
pub use links::{absolute_links, extract_first_link};
pub use steps::{extract_first_link_step, fetch_page_step, link_hopping_pipeline};
pub use types::{FailureKind, FetchError};
