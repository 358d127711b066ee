use crate::context::RequestContext;
use crate::error::{FestwrapError, Result};
use crate::ports::song::{GetSongArgs, Song, SongRepository};
use crate::spotify::client::SpotifyApi;
use crate::spotify::types::TrackSearchResponse;

/// Resolves songs to the first matching track in Spotify's catalog.
pub struct SpotifySongRepository {
    api: SpotifyApi,
}

impl SpotifySongRepository {
    pub fn new(api: SpotifyApi) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl SongRepository for SpotifySongRepository {
    async fn get_song(&self, ctx: &RequestContext, args: GetSongArgs) -> Result<Song> {
        let query = format!("artist:{} track:{}", args.artist, args.title);
        let request = self
            .api
            .get(ctx, "/v1/search")?
            .query(&[("q", query.as_str()), ("type", "track"), ("limit", "1")]);

        let response: TrackSearchResponse = self.api.send_json(ctx, request).await?;

        let track = response
            .tracks
            .items
            .into_iter()
            .next()
            .ok_or(FestwrapError::SongNotFound {
                artist: args.artist,
                title: args.title,
            })?;

        tracing::debug!("Matched song {} to {}", track.name, track.uri);
        Ok(Song::new(track.uri))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::spotify::client::test_support::api_for;

    fn default_args() -> GetSongArgs {
        GetSongArgs {
            artist: "Movements".into(),
            title: "Daylily".into(),
        }
    }

    fn ctx() -> RequestContext {
        RequestContext::new("some_token")
    }

    #[tokio::test]
    async fn test_get_song_sends_search_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("q", "artist:Movements track:Daylily"))
            .and(query_param("type", "track"))
            .and(query_param("limit", "1"))
            .and(header("Authorization", "Bearer some_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tracks": {"items": [{"uri": "spotify:track:123", "name": "Daylily"}]}
            })))
            .expect(1)
            .mount(&server)
            .await;
        let repository = SpotifySongRepository::new(api_for(&server.uri()));

        let song = repository.get_song(&ctx(), default_args()).await.unwrap();

        assert_eq!(song, Song::new("spotify:track:123"));
    }

    #[tokio::test]
    async fn test_get_song_returns_first_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tracks": {"items": [
                    {"uri": "spotify:track:first", "name": "Daylily"},
                    {"uri": "spotify:track:second", "name": "Daylily (Live)"}
                ]}
            })))
            .mount(&server)
            .await;
        let repository = SpotifySongRepository::new(api_for(&server.uri()));

        let song = repository.get_song(&ctx(), default_args()).await.unwrap();

        assert_eq!(song.uri, "spotify:track:first");
    }

    #[tokio::test]
    async fn test_get_song_errors_when_nothing_matches() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"tracks": {"items": []}})),
            )
            .mount(&server)
            .await;
        let repository = SpotifySongRepository::new(api_for(&server.uri()));

        let result = repository.get_song(&ctx(), default_args()).await;

        assert!(matches!(
            result,
            Err(FestwrapError::SongNotFound { title, .. }) if title == "Daylily"
        ));
    }

    #[tokio::test]
    async fn test_get_song_errors_on_unexpected_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        let repository = SpotifySongRepository::new(api_for(&server.uri()));

        let result = repository.get_song(&ctx(), default_args()).await;

        assert!(matches!(result, Err(FestwrapError::UnexpectedStatus { .. })));
    }

    #[tokio::test]
    async fn test_get_song_errors_on_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;
        let repository = SpotifySongRepository::new(api_for(&server.uri()));

        let result = repository.get_song(&ctx(), default_args()).await;

        assert!(matches!(result, Err(FestwrapError::Json(_))));
    }
}
