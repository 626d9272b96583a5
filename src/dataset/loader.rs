use futures::StreamExt;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use super::category::category_slug;
use super::fallback::fallback_dataset;
use super::keywords::generate_keywords;
use super::source::{DatasetSource, RawDataset};
use super::types::{Dataset, DatasetOrigin, EmojiRecord};

/// Version recorded on every record when the document has no `@version`.
pub const DEFAULT_UNICODE_VERSION: &str = "16.0";
/// Name recorded when an entry has no `name`.
pub const UNKNOWN_NAME: &str = "Unknown";
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

const MAX_DATASET_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Errors that can occur while loading the dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Request timed out")]
    Timeout,
    /// Body exceeded the 10MB size limit
    #[error("Dataset too large")]
    ResponseTooLarge,
    /// Received fewer bytes than Content-Length announced
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
    #[error("Failed to read dataset file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed dataset: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid dataset source: {0}")]
    InvalidSource(String),
}

/// What to do when the dataset cannot be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LoadPolicy {
    /// Substitute the built-in fallback records and carry on.
    FailSoft,
    /// Surface the error and leave the dataset empty.
    FailVisible,
}

/// Load the dataset, applying `policy` on failure.
///
/// With [`LoadPolicy::FailSoft`] this never returns `Err`: failures are logged
/// and [`fallback_dataset`] is returned instead.
pub async fn load_dataset(
    client: &reqwest::Client,
    source: &DatasetSource,
    policy: LoadPolicy,
    timeout: Duration,
) -> Result<Dataset, LoadError> {
    match fetch_dataset(client, source, timeout).await {
        Ok(dataset) => Ok(dataset),
        Err(e) => match policy {
            LoadPolicy::FailSoft => {
                tracing::warn!(
                    source = %source,
                    error = %e,
                    "Dataset load failed, using built-in fallback set"
                );
                Ok(fallback_dataset())
            }
            LoadPolicy::FailVisible => {
                tracing::error!(source = %source, error = %e, "Dataset load failed");
                Err(e)
            }
        },
    }
}

/// Fetch and parse the dataset with no fallback.
pub async fn fetch_dataset(
    client: &reqwest::Client,
    source: &DatasetSource,
    timeout: Duration,
) -> Result<Dataset, LoadError> {
    let bytes = match source {
        DatasetSource::Url(url) => fetch_url(client, url.as_str(), timeout).await?,
        DatasetSource::File(path) => {
            let meta = tokio::fs::metadata(path).await?;
            if meta.len() > MAX_DATASET_SIZE as u64 {
                return Err(LoadError::ResponseTooLarge);
            }
            tokio::fs::read(path).await?
        }
    };

    let dataset = parse_dataset(&bytes)?;
    tracing::info!(
        source = %source,
        version = %dataset.version(),
        count = dataset.len(),
        "Loaded emoji dataset"
    );
    Ok(dataset)
}

async fn fetch_url(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<Vec<u8>, LoadError> {
    let response = tokio::time::timeout(timeout, client.get(url).send())
        .await
        .map_err(|_| LoadError::Timeout)?
        .map_err(LoadError::Network)?;

    if !response.status().is_success() {
        return Err(LoadError::HttpStatus(response.status().as_u16()));
    }

    tokio::time::timeout(timeout, read_limited_bytes(response, MAX_DATASET_SIZE))
        .await
        .map_err(|_| LoadError::Timeout)?
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, LoadError> {
    let expected_length = response.content_length();

    // Fast path: check Content-Length header
    if let Some(len) = expected_length {
        if len as usize > limit {
            return Err(LoadError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(LoadError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(LoadError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    if let Some(expected) = expected_length {
        if (bytes.len() as u64) < expected {
            return Err(LoadError::IncompleteResponse {
                expected,
                received: bytes.len(),
            });
        }
    }

    Ok(bytes)
}

/// Parse a source document into a flat dataset.
pub fn parse_dataset(bytes: &[u8]) -> Result<Dataset, LoadError> {
    let raw: RawDataset = serde_json::from_slice(bytes)?;
    Ok(build_dataset(raw))
}

/// Flatten the nested document.
///
/// Order is categories, then subcategories, then entries, each as they appear
/// in the source. Entries without a glyph, or whose glyph carries control
/// characters, are skipped.
pub fn build_dataset(raw: RawDataset) -> Dataset {
    let version = raw
        .version
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_UNICODE_VERSION.to_string());

    let mut records = Vec::new();
    let mut skipped = 0usize;
    let mut rejected = 0usize;

    for (category_label, subcategories) in raw.emojis.0 {
        let category = category_slug(&category_label);

        for (subcategory_label, entries) in subcategories.0 {
            for entry in entries {
                let Some(glyph) = entry.emoji.filter(|g| !g.is_empty()) else {
                    skipped += 1;
                    continue;
                };
                // A glyph is written to the terminal as-is
                if glyph.chars().any(char::is_control) {
                    rejected += 1;
                    continue;
                }
                let name = entry.name.filter(|n| !n.is_empty());
                let keywords = generate_keywords(
                    name.as_deref().unwrap_or(""),
                    &category_label,
                    &subcategory_label,
                );

                records.push(EmojiRecord {
                    glyph,
                    name: name.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
                    category: category.clone(),
                    keywords,
                    unicode_version: version.clone(),
                });
            }
        }
    }

    if skipped > 0 {
        tracing::warn!(skipped, "Dataset entries without a glyph skipped");
    }
    if rejected > 0 {
        tracing::warn!(rejected, "Dataset entries with control characters in the glyph skipped");
    }

    Dataset::new(version, DatasetOrigin::Source, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SAMPLE: &str = r#"{
        "@version": "15.1",
        "emojis": {
            "Smileys & Emotion": {
                "face-smiling": [
                    { "emoji": "😀", "name": "grinning face" },
                    { "emoji": "😂", "name": "face with tears of joy" }
                ],
                "face-affection": [
                    { "emoji": "🥰", "name": "smiling face with hearts" }
                ]
            },
            "Component": {
                "hair-style": [
                    { "emoji": "🦰" }
                ]
            },
            "Animals & Nature": {
                "animal-mammal": [
                    { "emoji": "🐶", "name": "dog face" },
                    { "name": "glyphless" }
                ]
            }
        }
    }"#;

    fn glyphs(ds: &Dataset) -> Vec<&str> {
        ds.iter().map(|r| r.glyph.as_str()).collect()
    }

    #[test]
    fn test_flatten_preserves_source_order() {
        let ds = parse_dataset(SAMPLE.as_bytes()).unwrap();
        assert_eq!(glyphs(&ds), vec!["😀", "😂", "🥰", "🦰", "🐶"]);
        assert_eq!(ds.origin(), DatasetOrigin::Source);
    }

    #[test]
    fn test_records_normalized() {
        let ds = parse_dataset(SAMPLE.as_bytes()).unwrap();

        let grin = &ds[0];
        assert_eq!(grin.category, "smileys-emotion");
        assert_eq!(grin.unicode_version, "15.1");
        assert!(grin.keywords.contains("grinning"));
        assert!(grin.keywords.contains("smiling"));

        let hair = &ds[3];
        assert_eq!(hair.name, UNKNOWN_NAME);
        assert_eq!(hair.category, "component");
        // Missing name contributes no keywords of its own
        assert!(!hair.keywords.contains("unknown"));
        assert!(hair.keywords.contains("hair"));

        assert_eq!(ds[4].category, "animals-nature");
    }

    #[test]
    fn test_glyph_with_escape_sequence_skipped() {
        let json = r#"{ "emojis": { "Symbols": { "other-symbol": [
            { "emoji": "\u001b]52;c;cHduZWQ=\u0007X", "name": "clipboard writer" },
            { "emoji": "\u001b[2J", "name": "screen clear" },
            { "emoji": "\u009b31m", "name": "eight bit csi" },
            { "emoji": "✅", "name": "check mark button" }
        ] } } }"#;
        let ds = parse_dataset(json.as_bytes()).unwrap();
        assert_eq!(glyphs(&ds), vec!["✅"]);
    }

    #[test]
    fn test_missing_version_defaults() {
        let json = r#"{ "emojis": { "Flags": { "flag": [ { "emoji": "🏁", "name": "chequered flag" } ] } } }"#;
        let ds = parse_dataset(json.as_bytes()).unwrap();
        assert_eq!(ds.version(), DEFAULT_UNICODE_VERSION);
        assert_eq!(ds[0].unicode_version, "16.0");
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = parse_dataset(b"{ not json").unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[tokio::test]
    async fn test_fetch_from_http() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/categories.min.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(SAMPLE)
                    .insert_header("Content-Type", "application/json"),
            )
            .mount(&mock_server)
            .await;

        let source =
            DatasetSource::parse(&format!("{}/categories.min.json", mock_server.uri())).unwrap();
        let client = reqwest::Client::new();

        let ds = fetch_dataset(&client, &source, DEFAULT_FETCH_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(ds.len(), 5);
    }

    #[tokio::test]
    async fn test_http_404_fail_visible() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let source = DatasetSource::parse(&format!("{}/missing.json", mock_server.uri())).unwrap();
        let client = reqwest::Client::new();

        let result = load_dataset(
            &client,
            &source,
            LoadPolicy::FailVisible,
            DEFAULT_FETCH_TIMEOUT,
        )
        .await;
        match result {
            Err(LoadError::HttpStatus(404)) => {}
            other => panic!("Expected HttpStatus(404), got {:?}", other.map(|d| d.len())),
        }
    }

    #[tokio::test]
    async fn test_http_500_fail_soft_uses_fallback() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let source = DatasetSource::parse(&format!("{}/broken.json", mock_server.uri())).unwrap();
        let client = reqwest::Client::new();

        let ds = load_dataset(&client, &source, LoadPolicy::FailSoft, DEFAULT_FETCH_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(ds.origin(), DatasetOrigin::Fallback);
        assert!(ds.iter().all(|r| r.category == "smileys-emotion"));
    }

    #[tokio::test]
    async fn test_malformed_body_fail_soft() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let source = DatasetSource::parse(&format!("{}/data.json", mock_server.uri())).unwrap();
        let client = reqwest::Client::new();

        let visible = load_dataset(
            &client,
            &source,
            LoadPolicy::FailVisible,
            DEFAULT_FETCH_TIMEOUT,
        )
        .await;
        assert!(matches!(visible, Err(LoadError::Parse(_))));

        let soft = load_dataset(&client, &source, LoadPolicy::FailSoft, DEFAULT_FETCH_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(soft.origin(), DatasetOrigin::Fallback);
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(SAMPLE)
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let source = DatasetSource::parse(&format!("{}/slow.json", mock_server.uri())).unwrap();
        let client = reqwest::Client::new();
        let timeout = Duration::from_millis(50);

        let visible = load_dataset(&client, &source, LoadPolicy::FailVisible, timeout).await;
        assert!(matches!(visible, Err(LoadError::Timeout)));

        let soft = load_dataset(&client, &source, LoadPolicy::FailSoft, timeout)
            .await
            .unwrap();
        assert_eq!(soft.origin(), DatasetOrigin::Fallback);
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_bytes(vec![b' '; MAX_DATASET_SIZE + 1]),
            )
            .mount(&mock_server)
            .await;

        let source = DatasetSource::parse(&format!("{}/huge.json", mock_server.uri())).unwrap();
        let client = reqwest::Client::new();

        let visible = load_dataset(
            &client,
            &source,
            LoadPolicy::FailVisible,
            DEFAULT_FETCH_TIMEOUT,
        )
        .await;
        assert!(matches!(visible, Err(LoadError::ResponseTooLarge)));

        let soft = load_dataset(&client, &source, LoadPolicy::FailSoft, DEFAULT_FETCH_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(soft.origin(), DatasetOrigin::Fallback);
    }

    #[tokio::test]
    async fn test_body_at_size_limit_accepted() {
        // Valid JSON padded with whitespace up to exactly the cap
        let mut body = SAMPLE.as_bytes().to_vec();
        body.resize(MAX_DATASET_SIZE, b' ');

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
            .mount(&mock_server)
            .await;

        let source = DatasetSource::parse(&format!("{}/full.json", mock_server.uri())).unwrap();
        let client = reqwest::Client::new();
        let ds = fetch_dataset(&client, &source, DEFAULT_FETCH_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(ds.len(), 5);
    }

    #[tokio::test]
    async fn test_truncated_body_is_error() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        // Announces 1000 bytes, sends a few, then hangs up
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let mut request = [0u8; 1024];
                let _ = socket.read(&mut request).await;
                socket
                    .write_all(
                        b"HTTP/1.1 200 OK\r\nContent-Length: 1000\r\n\
                          Connection: close\r\n\r\n{\"emojis\"",
                    )
                    .await
                    .ok();
                socket.shutdown().await.ok();
            }
        });

        let source = DatasetSource::parse(&format!("http://{}/short.json", addr)).unwrap();
        let client = reqwest::Client::new();

        let visible = load_dataset(
            &client,
            &source,
            LoadPolicy::FailVisible,
            DEFAULT_FETCH_TIMEOUT,
        )
        .await;
        assert!(matches!(
            visible,
            Err(LoadError::Network(_)) | Err(LoadError::IncompleteResponse { .. })
        ));

        let soft = load_dataset(&client, &source, LoadPolicy::FailSoft, DEFAULT_FETCH_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(soft.origin(), DatasetOrigin::Fallback);

        server.abort();
    }

    #[tokio::test]
    async fn test_oversized_file_rejected() {
        let dir = std::env::temp_dir().join("emoji_picker_loader_test_big_file");
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("categories.min.json");
        // Sparse file, nothing is written
        std::fs::File::create(&file)
            .unwrap()
            .set_len(MAX_DATASET_SIZE as u64 + 1)
            .unwrap();

        let client = reqwest::Client::new();
        let source = DatasetSource::File(file);

        let err = fetch_dataset(&client, &source, DEFAULT_FETCH_TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::ResponseTooLarge));

        let soft = load_dataset(&client, &source, LoadPolicy::FailSoft, DEFAULT_FETCH_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(soft.origin(), DatasetOrigin::Fallback);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_fetch_from_file() {
        let dir = std::env::temp_dir().join("emoji_picker_loader_test_file");
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("categories.min.json");
        std::fs::write(&file, SAMPLE).unwrap();

        let client = reqwest::Client::new();
        let source = DatasetSource::File(file);
        let ds = fetch_dataset(&client, &source, DEFAULT_FETCH_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(glyphs(&ds), vec!["😀", "😂", "🥰", "🦰", "🐶"]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let client = reqwest::Client::new();
        let source = DatasetSource::File("/tmp/emoji_picker_definitely_missing.json".into());
        let err = fetch_dataset(&client, &source, DEFAULT_FETCH_TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
