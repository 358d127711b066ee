use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::context::RequestContext;
use crate::error::Result;
use crate::http_client::send_expecting;

pub const DEFAULT_SPOTIFY_BASE_URL: &str = "https://api.spotify.com";

/// Spotify Web API access shared by the Spotify repositories.
#[derive(Debug, Clone)]
pub struct SpotifyApi {
    client: Client,
    base_url: Url,
}

impl SpotifyApi {
    pub fn new(client: Client, base_url: &str) -> Result<Self> {
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
        })
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    pub fn get(&self, ctx: &RequestContext, path: &str) -> Result<RequestBuilder> {
        Ok(self
            .client
            .get(self.url(path)?)
            .bearer_auth(ctx.access_token()))
    }

    pub fn post(&self, ctx: &RequestContext, path: &str) -> Result<RequestBuilder> {
        Ok(self
            .client
            .post(self.url(path)?)
            .bearer_auth(ctx.access_token()))
    }

    pub async fn send(
        &self,
        ctx: &RequestContext,
        request: RequestBuilder,
        expected: StatusCode,
    ) -> Result<String> {
        send_expecting(ctx.cancellation(), request, expected).await
    }

    pub async fn send_json<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        request: RequestBuilder,
    ) -> Result<T> {
        let body = self.send(ctx, request, StatusCode::OK).await?;
        Ok(serde_json::from_str(&body)?)
    }
}
