use crate::context::RequestContext;
use crate::error::Result;
use crate::ports::artist::{Artist, ArtistRepository};
use crate::spotify::client::SpotifyApi;
use crate::spotify::types::ArtistSearchResponse;

pub struct SpotifyArtistRepository {
    api: SpotifyApi,
}

impl SpotifyArtistRepository {
    pub fn new(api: SpotifyApi) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl ArtistRepository for SpotifyArtistRepository {
    async fn search_artist(
        &self,
        ctx: &RequestContext,
        name: &str,
        limit: usize,
    ) -> Result<Vec<Artist>> {
        let query = format!("artist:{name}");
        let limit = limit.to_string();
        let request = self.api.get(ctx, "/v1/search")?.query(&[
            ("limit", limit.as_str()),
            ("q", query.as_str()),
            ("type", "artist"),
        ]);

        let response: ArtistSearchResponse = self.api.send_json(ctx, request).await?;

        Ok(response
            .artists
            .items
            .into_iter()
            .map(|artist| match artist.images.into_iter().next() {
                Some(image) => Artist::with_image_uri(artist.name, image.url),
                None => Artist::new(artist.name),
            })
            .collect())
    }
}
