use crate::{
    contentful::{config::ContentfulConfig, links::LinkResolver, response::EntriesResponse},
    error::SourceError,
    source::EntrySource,
};
use async_trait::async_trait;
use model::{
    pagination::page::{EntryPage, PageRequest},
    records::entry::Entry,
};
use reqwest::{Client, ClientBuilder};
use tracing::debug;

const USER_AGENT: &str = concat!("product-feed/", env!("CARGO_PKG_VERSION"));

/// Entry source backed by the Contentful delivery (or preview) API.
pub struct ContentfulClient {
    config: ContentfulConfig,
    http: Client,
}

impl ContentfulClient {
    pub fn new(config: ContentfulConfig) -> Result<Self, SourceError> {
        Self::with_builder(config, Client::builder())
    }

    fn with_builder(config: ContentfulConfig, builder: ClientBuilder) -> Result<Self, SourceError> {
        let http = builder.user_agent(USER_AGENT).build()?;
        Ok(Self { config, http })
    }

    async fn get_entries(&self, request: &PageRequest) -> Result<EntriesResponse, SourceError> {
        let response = self
            .http
            .get(self.config.entries_url())
            .bearer_auth(&self.config.access_token)
            .query(&query_params(request))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl EntrySource for ContentfulClient {
    async fn fetch_page(&self, request: &PageRequest) -> Result<EntryPage, SourceError> {
        let start = std::time::Instant::now();
        let response = self.get_entries(request).await?;

        debug!(
            content_type = %request.content_type,
            skip = request.skip,
            limit = request.limit,
            items = response.items.len(),
            includes = response.includes.entries.len(),
            total = response.total,
            "Fetched entries page"
        );

        let mut page = into_page(response)?;
        page.took_ms = start.elapsed().as_millis();
        Ok(page)
    }
}

/// Query string of an entries collection request.
pub fn query_params(request: &PageRequest) -> Vec<(&'static str, String)> {
    vec![
        ("content_type", request.content_type.clone()),
        ("include", request.include.to_string()),
        ("limit", request.limit.to_string()),
        ("skip", request.skip.to_string()),
        ("locale", request.locale.clone()),
    ]
}

/// Resolves links against the response's own includes and decodes the items.
pub fn into_page(response: EntriesResponse) -> Result<EntryPage, SourceError> {
    let resolver = LinkResolver::new(&response);
    let total = response.total;

    let items = response
        .items
        .into_iter()
        .map(|item| Entry::from_json(resolver.resolve_item(item)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(EntryPage {
        items,
        total,
        took_ms: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        task::JoinHandle,
    };

    #[test]
    fn test_query_params() {
        let request = PageRequest::first("topicProduct", 100).next();
        let params = query_params(&request);
        assert_eq!(
            params,
            vec![
                ("content_type", "topicProduct".to_string()),
                ("include", "1".to_string()),
                ("limit", "100".to_string()),
                ("skip", "100".to_string()),
                ("locale", "*".to_string()),
            ]
        );
    }

    #[test]
    fn test_into_page_resolves_and_decodes() {
        let response: EntriesResponse = serde_json::from_value(json!({
            "sys": { "type": "Array" },
            "total": 250,
            "skip": 0,
            "limit": 100,
            "items": [{
                "sys": { "type": "Entry", "id": "p1" },
                "fields": {
                    "variants": { "en": [{ "sys": { "type": "Link", "linkType": "Entry", "id": "v1" } }] }
                }
            }],
            "includes": {
                "Entry": [{
                    "sys": { "type": "Entry", "id": "v1" },
                    "fields": { "sizeClass": { "en": "M" } }
                }]
            }
        }))
        .unwrap();

        let page = into_page(response).unwrap();
        assert_eq!(page.total, 250);
        assert_eq!(page.len(), 1);
        assert_eq!(page.items[0].id().as_str(), "p1");
        assert_eq!(
            page.items[0].fields["variants"]["en"][0]["fields"]["sizeClass"]["en"],
            json!("M")
        );
    }

    #[test]
    fn test_into_page_rejects_items_without_id() {
        let response: EntriesResponse = serde_json::from_value(json!({
            "total": 1,
            "items": [{ "sys": { "type": "Entry" }, "fields": {} }]
        }))
        .unwrap();
        assert!(matches!(into_page(response), Err(SourceError::Decode(_))));
    }

    /// Answers a single request with a canned response and returns the raw
    /// request text once the connection is done.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request: Vec<u8> = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
            String::from_utf8(request).unwrap()
        });

        (format!("http://{addr}"), handle)
    }

    fn local_client(base_url: &str) -> ContentfulClient {
        let config = ContentfulConfig::new("space1", "cda-token", false)
            .with_base_url(base_url)
            .unwrap();
        ContentfulClient::with_builder(config, Client::builder().no_proxy()).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_page_sends_query_and_bearer_token() {
        let body = r#"{
            "sys": { "type": "Array" },
            "total": 1,
            "skip": 0,
            "limit": 100,
            "items": [{
                "sys": { "type": "Entry", "id": "p1" },
                "fields": {
                    "mfc": { "en": "M-1" },
                    "microColor": { "en": { "sys": { "type": "Link", "linkType": "Entry", "id": "c1" } } }
                }
            }],
            "includes": {
                "Entry": [{ "sys": { "type": "Entry", "id": "c1" }, "fields": { "name": { "en": "Navy" } } }]
            }
        }"#;
        let (base_url, server) = serve_once("200 OK", body).await;
        let client = local_client(&base_url);

        let page = client
            .fetch_page(&PageRequest::first("topicProduct", 100))
            .await
            .unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id().as_str(), "p1");
        assert_eq!(
            page.items[0].fields["microColor"]["en"]["fields"]["name"]["en"],
            json!("Navy")
        );

        let request = server.await.unwrap();
        let request_line = request.lines().next().unwrap();
        assert!(request_line.starts_with("GET /spaces/space1/environments/master/entries?"));
        for param in ["content_type=topicProduct", "include=1", "limit=100", "skip=0"] {
            assert!(request_line.contains(param), "{param} missing from {request_line}");
        }
        assert!(request_line.contains("locale=*") || request_line.contains("locale=%2A"));
        assert!(
            request
                .to_lowercase()
                .contains("authorization: bearer cda-token")
        );
    }

    #[tokio::test]
    async fn test_error_status_keeps_status_and_body() {
        let body = r#"{"sys":{"type":"Error","id":"AccessTokenInvalid"}}"#;
        let (base_url, server) = serve_once("401 Unauthorized", body).await;
        let client = local_client(&base_url);

        let err = client
            .fetch_page(&PageRequest::first("topicProduct", 100))
            .await
            .unwrap_err();

        match err {
            SourceError::Status { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("AccessTokenInvalid"));
            }
            other => panic!("expected a status error, got {other:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_decode_error() {
        let (base_url, server) = serve_once("200 OK", "not json").await;
        let client = local_client(&base_url);

        let err = client
            .fetch_page(&PageRequest::first("topicProduct", 100))
            .await
            .unwrap_err();

        assert!(matches!(err, SourceError::Decode(_)));
        server.await.unwrap();
    }
}
