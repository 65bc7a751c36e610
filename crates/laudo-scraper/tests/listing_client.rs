//! Integration tests for `ListingClient`.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no
//! real network traffic is made.

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use laudo_core::TransactionType;
use laudo_scraper::{ListingClient, ScraperError};

/// 5-second timeout, descriptive UA, no retries.
fn test_client(server: &MockServer) -> ListingClient {
    ListingClient::new(&server.uri(), 5, "laudo-test/0.1", 0, 0)
        .expect("failed to build test ListingClient")
}

fn test_client_with_retries(server: &MockServer, max_retries: u32) -> ListingClient {
    ListingClient::new(&server.uri(), 5, "laudo-test/0.1", max_retries, 0)
        .expect("failed to build test ListingClient")
}

const LISTING_HTML: &str = "<html><body>\
    <h1 class=\"titulo\">Folder do Imóvel</h1>\
    <table>\
    <tr><td class=\"tlabel\">Tipo</td><td>Apartamento</td></tr>\
    <tr><td class=\"tlabel\">Endereço</td><td>SQS 308 Bloco C</td></tr>\
    <tr><td class=\"tlabel\">Bairro</td><td>Asa Sul</td></tr>\
    <tr><td class=\"tlabel\">Cidade</td><td>Brasília</td></tr>\
    <tr><td class=\"tlabel\">Valor do imóvel venda</td><td><strong>R$ 850.000</strong></td></tr>\
    <tr><td class=\"tlabel\">Área privativa</td><td>94,00 m²</td></tr>\
    </table>\
    </body></html>";

// ---------------------------------------------------------------------------
// fetch_listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_listing_parses_print_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/imovel/impressao/1240957"))
        .and(header("user-agent", "laudo-test/0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_HTML))
        .expect(1)
        .mount(&server)
        .await;

    let listing = test_client(&server)
        .fetch_listing(1_240_957)
        .await
        .expect("fetch_listing failed")
        .expect("listing should exist");

    assert_eq!(listing.id, 1_240_957);
    assert_eq!(listing.neighborhood, "Asa Sul");
    assert_eq!(listing.price_text.as_deref(), Some("850.000"));
    assert_eq!(listing.transaction_type, Some(TransactionType::Sale));
    assert_eq!(listing.area_text.as_deref(), Some("94,00 m²"));
}

#[tokio::test]
async fn fetch_listing_returns_none_on_404() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/imovel/impressao/5"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = test_client(&server).fetch_listing(5).await;
    assert!(matches!(result, Ok(None)), "expected Ok(None), got: {result:?}");
}

#[tokio::test]
async fn fetch_listing_rejects_page_without_details() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/imovel/impressao/6"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>Sem dados</body></html>"),
        )
        .mount(&server)
        .await;

    let result = test_client(&server).fetch_listing(6).await;
    assert!(
        matches!(result, Err(ScraperError::NotAListing { listing_id: 6 })),
        "expected NotAListing, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Error statuses and retries
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rate_limited_reports_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/imovel/impressao/7"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&server)
        .await;

    let result = test_client(&server).fetch_print_page(7).await;
    match result {
        Err(ScraperError::RateLimited {
            retry_after_secs, ..
        }) => assert_eq!(retry_after_secs, 30),
        other => panic!("expected RateLimited, got: {other:?}"),
    }
}

#[tokio::test]
async fn client_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/imovel/impressao/8"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client_with_retries(&server, 3).fetch_print_page(8).await;
    assert!(
        matches!(
            result,
            Err(ScraperError::UnexpectedStatus { status: 403, .. })
        ),
        "expected UnexpectedStatus 403, got: {result:?}"
    );
}

#[tokio::test]
async fn server_error_is_retried_until_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/imovel/impressao/9"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/imovel/impressao/9"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_HTML))
        .expect(1)
        .mount(&server)
        .await;

    let html = test_client_with_retries(&server, 2)
        .fetch_print_page(9)
        .await
        .expect("fetch should succeed after retries");
    assert!(html.is_some());
}

// ---------------------------------------------------------------------------
// is_listing_page
// ---------------------------------------------------------------------------

#[tokio::test]
async fn is_listing_page_checks_heading() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/imovel/impressao/10"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_HTML))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/imovel/impressao/11"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<h1 class=\"titulo\">Imóvel indisponível</h1>"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/imovel/impressao/12"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client(&server);
    assert!(client.is_listing_page(10).await.expect("request failed"));
    assert!(!client.is_listing_page(11).await.expect("request failed"));
    assert!(!client.is_listing_page(12).await.expect("request failed"));
}
