use crate::{
    types::{
        ErrorResponse,
        SearchQuery,
    },
    Error,
};
use serde::Serialize;
use std::{
    io::Write,
    path::Path,
    time::Duration,
};
use url::Url;

const BASE_URL: &str = "https://wallhaven.cc/api/v1/";
const DEFAULT_USER_AGENT: &str = "wallhaven-rs";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const API_KEY_HEADER: &str = "X-API-KEY";

/// A builder for a [`Client`].
#[derive(Debug, Default)]
pub struct ClientBuilder {
    api_key: Option<String>,
    accept_invalid_certs: bool,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Make a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the api key sent with each request.
    pub fn api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    /// Skip tls certificate verification.
    ///
    /// This only affects the client being built, nothing process-wide.
    pub fn accept_invalid_certs(mut self, accept_invalid_certs: bool) -> Self {
        self.accept_invalid_certs = accept_invalid_certs;
        self
    }

    /// Override the default request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> Client {
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        Client {
            client: reqwest::Client::builder()
                .connect_timeout(timeout)
                .timeout(timeout)
                .user_agent(DEFAULT_USER_AGENT)
                .danger_accept_invalid_certs(self.accept_invalid_certs)
                .build()
                .expect("failed to build client"),
            base_url: Url::parse(BASE_URL).expect("invalid base url"),
            api_key: self.api_key,
        }
    }
}

/// A client for the wallhaven.cc api
#[derive(Debug, Clone)]
pub struct Client {
    /// The inner http client
    pub client: reqwest::Client,

    base_url: Url,
    api_key: Option<String>,
}

impl Client {
    /// Make a new client with no api key.
    pub fn new() -> Self {
        ClientBuilder::new().build()
    }

    /// Make a new client that authenticates with the given api key.
    pub fn with_api_key(api_key: &str) -> Self {
        ClientBuilder::new().api_key(api_key).build()
    }

    /// Get a [`ClientBuilder`] for more transport configuration.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Fetch an endpoint relative to the api base url and return the decoded body.
    pub async fn get(&self, endpoint: &str) -> Result<serde_json::Value, Error> {
        let url = self.base_url.join(endpoint)?;
        self.get_json(url).await
    }

    /// Search for wallpapers.
    pub async fn search(&self, query: &SearchQuery) -> Result<serde_json::Value, Error> {
        let url = self.search_url(query)?;
        self.get_json(url).await
    }

    /// Get a wallpaper by id.
    pub async fn get_wallpaper(&self, id: &str) -> Result<serde_json::Value, Error> {
        self.get(&format!("w/{id}")).await
    }

    /// Get the collections of a user.
    pub async fn get_collections(&self, username: &str) -> Result<serde_json::Value, Error> {
        self.get(&format!("collections/{username}")).await
    }

    /// Get the wallpapers in a user's collection.
    ///
    /// `page` is sent whenever it is given, including `Some(0)`.
    pub async fn get_collection_wallpapers(
        &self,
        username: &str,
        collection_id: &str,
        page: Option<u64>,
    ) -> Result<serde_json::Value, Error> {
        let url = self.collection_wallpapers_url(username, collection_id, page)?;
        self.get_json(url).await
    }

    /// Get a tag by id.
    pub async fn get_tag(&self, tag_id: &str) -> Result<serde_json::Value, Error> {
        self.get(&format!("tag/{tag_id}")).await
    }

    fn search_url(&self, query: &SearchQuery) -> Result<Url, url::ParseError> {
        let mut url = self.base_url.join("search")?;
        let pairs = query.to_query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    fn collection_wallpapers_url(
        &self,
        username: &str,
        collection_id: &str,
        page: Option<u64>,
    ) -> Result<Url, url::ParseError> {
        let mut url = self
            .base_url
            .join(&format!("collections/{username}/{collection_id}"))?;
        if let Some(page) = page {
            let mut buf = itoa::Buffer::new();
            url.query_pairs_mut().append_pair("page", buf.format(page));
        }
        Ok(url)
    }

    fn build_request(&self, url: Url) -> reqwest::RequestBuilder {
        let mut request = self.client.get(url.as_str());
        if let Some(api_key) = self.api_key.as_deref() {
            request = request.header(API_KEY_HEADER, api_key);
        }
        request
    }

    async fn get_json(&self, url: Url) -> Result<serde_json::Value, Error> {
        let response = self.build_request(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            // The api usually explains itself in the error body.
            let message = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .map(|body| body.message);
            return Err(Error::InvalidStatus { status, message });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

/// Save a value as json with 4-space indentation,
/// overwriting any file already at the path.
pub fn save_as_json<T, P>(data: &T, path: P) -> Result<(), Error>
where
    T: Serialize + ?Sized,
    P: AsRef<Path>,
{
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    data.serialize(&mut serializer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn api_key_header_is_sent_only_when_configured() {
        let client = Client::with_api_key("test_api_key");
        let url = Url::parse("https://wallhaven.cc/api/v1/search").expect("invalid url");
        let request = client
            .build_request(url.clone())
            .build()
            .expect("failed to build request");
        assert_eq!(
            request
                .headers()
                .get(API_KEY_HEADER)
                .expect("missing api key header"),
            "test_api_key"
        );

        let client = Client::new();
        let request = client
            .build_request(url)
            .build()
            .expect("failed to build request");
        assert!(request.headers().get(API_KEY_HEADER).is_none());
    }

    #[test]
    fn search_url_drops_unset_fields() {
        let client = Client::new();

        let url = client
            .search_url(&SearchQuery::new())
            .expect("failed to build url");
        assert_eq!(url.as_str(), "https://wallhaven.cc/api/v1/search");

        let query = SearchQuery {
            categories: Some("111".to_string()),
            resolutions: vec!["1920x1080".to_string(), "2560x1440".to_string()],
            ..Default::default()
        };
        let url = client.search_url(&query).expect("failed to build url");
        let pairs: Vec<_> = url.query_pairs().collect();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], ("categories".into(), "111".into()));
        assert_eq!(pairs[1], ("resolutions".into(), "1920x1080,2560x1440".into()));
    }

    #[test]
    fn collection_wallpapers_url_page_handling() {
        let client = Client::new();

        let url = client
            .collection_wallpapers_url("bob", "123", Some(2))
            .expect("failed to build url");
        assert_eq!(
            url.as_str(),
            "https://wallhaven.cc/api/v1/collections/bob/123?page=2"
        );

        let url = client
            .collection_wallpapers_url("bob", "123", None)
            .expect("failed to build url");
        assert_eq!(
            url.as_str(),
            "https://wallhaven.cc/api/v1/collections/bob/123"
        );

        // Page 0 is a real page request, not "unset".
        let url = client
            .collection_wallpapers_url("bob", "123", Some(0))
            .expect("failed to build url");
        assert_eq!(
            url.as_str(),
            "https://wallhaven.cc/api/v1/collections/bob/123?page=0"
        );
    }

    #[test]
    fn save_as_json_round_trips() {
        let path = std::env::temp_dir().join("wallhaven-save-as-json-test.json");
        let data = serde_json::json!({ "a": 1 });

        save_as_json(&data, &path).expect("failed to save");
        let text = std::fs::read_to_string(&path).expect("failed to read back");
        assert_eq!(text, "{\n    \"a\": 1\n}");

        let parsed: serde_json::Value =
            serde_json::from_str(&text).expect("failed to parse saved file");
        assert_eq!(parsed, data);

        std::fs::remove_file(&path).expect("failed to clean up");
    }
}
