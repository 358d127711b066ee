use serde::{Deserialize, Serialize};

use crate::context::RequestContext;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
    pub image_uri: Option<String>,
}

impl Artist {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image_uri: None,
        }
    }

    pub fn with_image_uri(name: impl Into<String>, image_uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image_uri: Some(image_uri.into()),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ArtistRepository: Send + Sync {
    async fn search_artist(
        &self,
        ctx: &RequestContext,
        name: &str,
        limit: usize,
    ) -> Result<Vec<Artist>>;
}

#[async_trait::async_trait]
impl<T: ArtistRepository + ?Sized> ArtistRepository for std::sync::Arc<T> {
    async fn search_artist(
        &self,
        ctx: &RequestContext,
        name: &str,
        limit: usize,
    ) -> Result<Vec<Artist>> {
        (**self).search_artist(ctx, name, limit).await
    }
}
