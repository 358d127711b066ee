use reqwest::{Client, StatusCode};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::{FestwrapError, Result};
use crate::http_client::send_expecting;
use crate::ports::setlist::{GetSetlistArgs, Setlist, SetlistRepository};
use crate::setlistfm::types::SetlistPage;

pub const DEFAULT_SETLISTFM_BASE_URL: &str = "https://api.setlist.fm";
pub const DEFAULT_MAX_PAGES: usize = 3;

/// Finds the most recent setlist of an artist on setlist.fm.
pub struct SetlistFmRepository {
    client: Client,
    base_url: Url,
    api_key: String,
    max_pages: usize,
}

impl SetlistFmRepository {
    pub fn new(client: Client, base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
            api_key: api_key.into(),
            max_pages: DEFAULT_MAX_PAGES,
        })
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// `None` once setlist.fm has no more pages for the artist.
    async fn fetch_page(&self, artist: &str, page: usize) -> Result<Option<SetlistPage>> {
        let page_number = page.to_string();
        let request = self
            .client
            .get(self.base_url.join("/rest/1.0/search/setlists")?)
            .header("x-api-key", &self.api_key)
            .header("Accept", "application/json")
            .query(&[("artistName", artist), ("p", page_number.as_str())]);

        match send_expecting(&CancellationToken::new(), request, StatusCode::OK).await {
            Ok(body) => Ok(Some(serde_json::from_str(&body)?)),
            Err(FestwrapError::UnexpectedStatus { actual, .. })
                if actual == StatusCode::NOT_FOUND =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait::async_trait]
impl SetlistRepository for SetlistFmRepository {
    async fn get_setlist(&self, args: GetSetlistArgs) -> Result<Setlist> {
        for page in 1..=self.max_pages {
            let Some(results) = self.fetch_page(&args.artist, page).await? else {
                break;
            };
            if results.setlist.is_empty() {
                break;
            }

            if let Some(found) = results
                .setlist
                .into_iter()
                .find(|setlist| setlist.songs().len() >= args.min_songs)
            {
                tracing::debug!(
                    "Using setlist of {} from {}",
                    args.artist,
                    found.event_date.as_deref().unwrap_or("unknown date")
                );
                return Ok(found.into_setlist());
            }
        }

        Err(FestwrapError::SetlistNotFound {
            artist: args.artist,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::{Value, json};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::http_client::build_client;
    use crate::ports::setlist::SetlistSong;

    fn repository(server: &MockServer) -> SetlistFmRepository {
        let client = build_client(Duration::from_secs(5), 10).unwrap();
        SetlistFmRepository::new(client, &server.uri(), "some_key").unwrap()
    }

    fn setlist_json(songs: &[&str]) -> Value {
        let songs: Vec<Value> = songs.iter().map(|s| json!({ "name": s })).collect();
        json!({
            "artist": {"name": "Movements"},
            "eventDate": "01-06-2024",
            "sets": {"set": [{"song": songs}]}
        })
    }

    fn args(min_songs: usize) -> GetSetlistArgs {
        GetSetlistArgs {
            artist: "Movements".into(),
            min_songs,
        }
    }

    async fn mount_page(server: &MockServer, page: &str, setlists: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path("/rest/1.0/search/setlists"))
            .and(query_param("p", page))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "setlist": setlists })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_get_setlist_sends_request_with_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/1.0/search/setlists"))
            .and(query_param("artistName", "Movements"))
            .and(query_param("p", "1"))
            .and(header("x-api-key", "some_key"))
            .and(header("Accept", "application/json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "setlist": [setlist_json(&["Daylily"])] })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let setlist = repository(&server).get_setlist(args(0)).await.unwrap();

        assert_eq!(
            setlist,
            Setlist::new("Movements", vec![SetlistSong::new("Daylily")])
        );
    }

    #[tokio::test]
    async fn test_get_setlist_skips_setlists_below_min_songs() {
        let server = MockServer::start().await;
        mount_page(
            &server,
            "1",
            vec![
                setlist_json(&["Daylily"]),
                setlist_json(&["Full Circle", "Colorblind", "Daylily"]),
            ],
        )
        .await;

        let setlist = repository(&server).get_setlist(args(3)).await.unwrap();

        assert_eq!(setlist.songs.len(), 3);
        assert_eq!(setlist.songs[0], SetlistSong::new("Full Circle"));
    }

    #[tokio::test]
    async fn test_get_setlist_looks_at_following_pages() {
        let server = MockServer::start().await;
        mount_page(&server, "1", vec![setlist_json(&["Daylily"])]).await;
        mount_page(&server, "2", vec![setlist_json(&["Full Circle", "Daylily"])]).await;

        let setlist = repository(&server).get_setlist(args(2)).await.unwrap();

        assert_eq!(setlist.songs.len(), 2);
    }

    #[tokio::test]
    async fn test_get_setlist_stops_after_max_pages() {
        let server = MockServer::start().await;
        mount_page(&server, "1", vec![setlist_json(&["Daylily"])]).await;
        mount_page(&server, "2", vec![setlist_json(&["Full Circle", "Daylily"])]).await;

        let result = repository(&server)
            .with_max_pages(1)
            .get_setlist(args(2))
            .await;

        assert!(matches!(result, Err(FestwrapError::SetlistNotFound { .. })));
    }

    #[tokio::test]
    async fn test_get_setlist_not_found_when_artist_unknown() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let result = repository(&server).get_setlist(args(0)).await;

        assert!(matches!(
            result,
            Err(FestwrapError::SetlistNotFound { artist }) if artist == "Movements"
        ));
    }

    #[tokio::test]
    async fn test_get_setlist_stops_when_later_page_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("p", "1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "setlist": [setlist_json(&["Daylily"])] })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("p", "2"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("p", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "setlist": [setlist_json(&["Full Circle", "Daylily"])]
            })))
            .expect(0)
            .mount(&server)
            .await;

        let result = repository(&server).get_setlist(args(2)).await;

        assert!(matches!(
            result,
            Err(FestwrapError::SetlistNotFound { artist }) if artist == "Movements"
        ));
    }

    #[tokio::test]
    async fn test_get_setlist_errors_on_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = repository(&server).get_setlist(args(0)).await;

        assert!(matches!(result, Err(FestwrapError::UnexpectedStatus { .. })));
    }
}
