use std::time::Duration;

use composer_web::{FailureKind, FetchSettings, PageFetcher, ReqwestFetcher};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn serve(route: &str, response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn fetcher_returns_decoded_page_body() {
    let server = serve(
        "/doc",
        ResponseTemplate::new(200).set_body_raw("<html>ok</html>", "text/html; charset=utf-8"),
    )
    .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let body = fetcher
        .fetch_page(&format!("{}/doc", server.uri()))
        .await
        .expect("fetch ok");
    assert_eq!(body, "<html>ok</html>");
}

#[tokio::test]
async fn fetcher_decodes_declared_legacy_charset() {
    let server = serve(
        "/latin1",
        ResponseTemplate::new(200).set_body_raw(b"caf\xE9".to_vec(), "text/html; charset=ISO-8859-1"),
    )
    .await;

    let fetcher = ReqwestFetcher::default();
    let body = fetcher
        .fetch_page(&format!("{}/latin1", server.uri()))
        .await
        .unwrap();
    assert_eq!(body, "café");
}

#[tokio::test]
async fn fetcher_fails_on_http_status() {
    let server = serve("/missing", ResponseTemplate::new(404)).await;

    let fetcher = ReqwestFetcher::default();
    let err = fetcher
        .fetch_page(&format!("{}/missing", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}

#[tokio::test]
async fn fetcher_rejects_invalid_url() {
    let fetcher = ReqwestFetcher::default();
    let err = fetcher.fetch_page("<html>not a url</html>").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}

#[tokio::test]
async fn fetcher_times_out_on_slow_response() {
    let server = serve(
        "/slow",
        ResponseTemplate::new(200)
            .set_delay(Duration::from_millis(250))
            .set_body_raw("slow", "text/html"),
    )
    .await;

    let fetcher = ReqwestFetcher::new(FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    });
    let err = fetcher
        .fetch_page(&format!("{}/slow", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn fetcher_rejects_too_large_response() {
    let server = serve(
        "/large",
        ResponseTemplate::new(200).set_body_raw("01234567890", "text/html"),
    )
    .await;

    let fetcher = ReqwestFetcher::new(FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    });
    let err = fetcher
        .fetch_page(&format!("{}/large", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}

#[tokio::test]
async fn fetcher_rejects_unsupported_content_type() {
    let server = serve(
        "/data",
        ResponseTemplate::new(200).set_body_raw("{}", "application/json"),
    )
    .await;

    let fetcher = ReqwestFetcher::default();
    let err = fetcher
        .fetch_page(&format!("{}/data", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::UnsupportedContentType {
            content_type: "application/json".to_string()
        }
    );
}

async fn redirect_chain(hops: usize) -> MockServer {
    let server = MockServer::start().await;
    for hop in 0..hops {
        Mock::given(method("GET"))
            .and(path(format!("/hop{hop}")))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("Location", format!("{}/hop{}", server.uri(), hop + 1)),
            )
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path(format!("/hop{hops}")))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html>landed</html>", "text/html"))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn fetcher_follows_redirects_up_to_the_limit() {
    let fetcher = ReqwestFetcher::default();
    let limit = fetcher.settings().redirect_limit;
    assert_eq!(limit, 5);
    let server = redirect_chain(limit).await;

    let body = fetcher
        .fetch_page(&format!("{}/hop0", server.uri()))
        .await
        .expect("redirects within limit");
    assert_eq!(body, "<html>landed</html>");
}

#[tokio::test]
async fn fetcher_follows_a_single_redirect_with_limit_one() {
    let server = redirect_chain(1).await;
    let fetcher = ReqwestFetcher::new(FetchSettings {
        redirect_limit: 1,
        ..FetchSettings::default()
    });

    let body = fetcher
        .fetch_page(&format!("{}/hop0", server.uri()))
        .await
        .unwrap();
    assert_eq!(body, "<html>landed</html>");
}

#[tokio::test]
async fn fetcher_stops_one_redirect_past_the_limit() {
    let server = redirect_chain(2).await;
    let fetcher = ReqwestFetcher::new(FetchSettings {
        redirect_limit: 1,
        ..FetchSettings::default()
    });

    let err = fetcher
        .fetch_page(&format!("{}/hop0", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::RedirectLimitExceeded);
}
