use std::collections::HashMap;
use std::sync::Arc;

use composer_core::{compose, PipelineError};
use composer_web::{
    extract_first_link_step, fetch_page_step, link_hopping_pipeline, FailureKind, FetchError,
    FetchSettings, PageFetcher, ReqwestFetcher,
};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const IDN_LINK: &str = "http://www.icann.org/topics/idn/";

async fn two_page_site() -> MockServer {
    let server = MockServer::start().await;
    let first = format!(
        r#"<html><body><a href="/relative">skip</a><a href="{}/second">next</a></body></html>"#,
        server.uri()
    );
    let second = format!(
        r##"<html><body><a href="#top">top</a><a href="{IDN_LINK}">IDN</a></body></html>"##
    );

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(first, "text/html"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/second"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(second, "text/html"))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn two_hops_resolve_to_the_second_pages_first_link() {
    let server = two_page_site().await;
    let fetcher = Arc::new(ReqwestFetcher::new(FetchSettings::default()));
    let pipeline = compose(vec![
        fetch_page_step(Arc::clone(&fetcher)),
        extract_first_link_step(),
        fetch_page_step(Arc::clone(&fetcher)),
        extract_first_link_step(),
    ]);

    let link = pipeline.call(format!("{}/", server.uri())).await.unwrap();
    assert_eq!(link, IDN_LINK);
}

#[tokio::test]
async fn logged_pipeline_gives_the_same_answer() {
    composer_logging::initialize_for_tests();
    let server = two_page_site().await;
    let pipeline = link_hopping_pipeline(Arc::new(ReqwestFetcher::default()), 2, true);

    assert_eq!(pipeline.len(), 8);
    let outcome = pipeline.evaluate(format!("{}/", server.uri()));
    assert!(outcome.is_pending());
    assert_eq!(outcome.await.unwrap(), IDN_LINK);
}

#[tokio::test]
async fn failed_second_fetch_is_reported_as_async_failure() {
    let server = MockServer::start().await;
    let first = format!(r#"<a href="{}/gone">gone</a>"#, server.uri());
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(first, "text/html"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let pipeline = link_hopping_pipeline(Arc::new(ReqwestFetcher::default()), 2, false);
    let err = pipeline.call(format!("{}/", server.uri())).await.unwrap_err();

    assert!(err.is_async());
    assert_eq!(err.index(), 2);
    assert_eq!(err.label(), "fetch_page");
    assert_eq!(err.into_source().kind, FailureKind::HttpStatus(404));
}

struct StaticSite {
    pages: HashMap<String, String>,
}

#[async_trait::async_trait]
impl PageFetcher for StaticSite {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        self.pages.get(url).cloned().ok_or_else(|| FetchError {
            kind: FailureKind::HttpStatus(404),
            message: url.to_string(),
        })
    }
}

#[tokio::test]
async fn any_page_fetcher_can_drive_the_pipeline() {
    let site = StaticSite {
        pages: HashMap::from([
            (
                "http://www.example.com".to_string(),
                r#"<a href="http://www.iana.org/domains/example">More</a>"#.to_string(),
            ),
            (
                "http://www.iana.org/domains/example".to_string(),
                format!(r#"<a href="{IDN_LINK}">IDN</a>"#),
            ),
        ]),
    };
    let fetcher: Arc<dyn PageFetcher> = Arc::new(site);
    let pipeline = link_hopping_pipeline(fetcher, 2, false);

    assert_eq!(
        pipeline.call("http://www.example.com".to_string()).await,
        Ok(IDN_LINK.to_string())
    );
}

#[tokio::test]
async fn page_without_links_passes_its_body_to_the_next_fetch() {
    let site = StaticSite {
        pages: HashMap::from([("http://start".to_string(), "<p>no links</p>".to_string())]),
    };
    let pipeline = link_hopping_pipeline(Arc::new(site), 2, false);

    let err = pipeline.call("http://start".to_string()).await.unwrap_err();
    assert_eq!(
        err,
        PipelineError::AsyncStepFailure {
            index: 2,
            label: "fetch_page".to_string(),
            source: FetchError {
                kind: FailureKind::HttpStatus(404),
                message: "<p>no links</p>".to_string(),
            },
        }
    );
}
