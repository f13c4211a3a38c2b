//! Texture service collaborator
//!
//! The four category fetches are issued concurrently and joined before the
//! catalog is touched; each category is then replaced atomically. A failed
//! category keeps whatever the catalog already holds (at minimum the
//! bundled fallback entry).

use async_trait::async_trait;
use shared::TextureFetchResponse;

use crate::state::{TextureCatalog, TextureCategory};

use super::{ServiceError, REQUEST_TIMEOUT};

/// Fetches texture listings by category
#[async_trait]
pub trait TextureProvider {
    async fn fetch_textures(
        &self,
        category: TextureCategory,
        limit: u32,
    ) -> Result<TextureFetchResponse, ServiceError>;
}

/// HTTP texture API client
pub struct HttpTextureProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTextureProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl TextureProvider for HttpTextureProvider {
    async fn fetch_textures(
        &self,
        category: TextureCategory,
        limit: u32,
    ) -> Result<TextureFetchResponse, ServiceError> {
        tracing::debug!(%category, limit, "fetching textures");
        let limit = limit.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("page", "1"),
                ("limit", limit.as_str()),
                ("category", category.as_str()),
                ("sortBy", "createdAt"),
                ("sortOrder", "desc"),
            ])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .json::<TextureFetchResponse>()
            .await?;
        if !response.success {
            return Err(ServiceError::Unsuccessful(format!(
                "texture request for {category} was not successful"
            )));
        }
        Ok(response)
    }
}

/// Refresh the whole catalog: one concurrent fetch per category with a join
/// barrier, then one atomic replace per category. Terrain texture keys are
/// never resolved against a half-updated catalog.
pub async fn load_texture_catalog<P>(provider: &P, catalog: &mut TextureCatalog)
where
    P: TextureProvider + ?Sized,
{
    let (grass, mud, rock, heightmap) = tokio::join!(
        provider.fetch_textures(TextureCategory::Grass, 12),
        provider.fetch_textures(TextureCategory::Mud, 12),
        provider.fetch_textures(TextureCategory::Rock, 12),
        provider.fetch_textures(TextureCategory::Heightmap, 5),
    );

    for (category, result) in [
        (TextureCategory::Grass, grass),
        (TextureCategory::Mud, mud),
        (TextureCategory::Rock, rock),
        (TextureCategory::Heightmap, heightmap),
    ] {
        match result {
            Ok(response) => catalog.replace(category, &response.textures),
            Err(err) => {
                tracing::warn!(%category, %err, "texture fetch failed, keeping current entries");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::TextureHit;

    /// Provider returning canned listings, failing for chosen categories
    struct FixedProvider {
        fail: Vec<TextureCategory>,
    }

    #[async_trait]
    impl TextureProvider for FixedProvider {
        async fn fetch_textures(
            &self,
            category: TextureCategory,
            limit: u32,
        ) -> Result<TextureFetchResponse, ServiceError> {
            if self.fail.contains(&category) {
                return Err(ServiceError::Transport("connection refused".to_string()));
            }
            let textures = (1..=limit.min(3))
                .map(|i| TextureHit {
                    name: format!("{category} {i}"),
                    url: format!("https://textures.test/{category}/{i}"),
                })
                .collect::<Vec<_>>();
            let total = textures.len();
            Ok(TextureFetchResponse {
                textures,
                total,
                success: true,
            })
        }
    }

    #[tokio::test]
    async fn test_load_replaces_every_category() {
        let provider = FixedProvider { fail: vec![] };
        let mut catalog = TextureCatalog::default();
        load_texture_catalog(&provider, &mut catalog).await;
        for category in TextureCategory::ALL {
            assert_eq!(catalog.count(category), 3);
        }
        assert_eq!(catalog.key_at(TextureCategory::Grass, 1), Some("1"));
    }

    #[tokio::test]
    async fn test_failed_category_keeps_fallback() {
        let provider = FixedProvider {
            fail: vec![TextureCategory::Mud],
        };
        let mut catalog = TextureCatalog::default();
        load_texture_catalog(&provider, &mut catalog).await;
        assert_eq!(catalog.count(TextureCategory::Grass), 3);
        assert_eq!(catalog.count(TextureCategory::Mud), 1);
        assert_eq!(catalog.key_at(TextureCategory::Mud, 1), Some("fallback_mud"));
    }
}
