//! WordPress.com post creation
//!
//! One authenticated form POST per draft. The platform receives `tags` and
//! `categories` as comma-joined strings and generates a slug itself when the
//! draft's slug is empty.

use crate::config::Config;
use crate::error::{HttpError, Result};
use crate::http::{build_client, read_json};
use crate::types::{PostDraft, PostStatus, PublishedPost, TokenRecord};

const SERVICE: &str = "WordPress.com";

pub struct PostPublisher {
    endpoint: String,
    fixed_categories: Option<Vec<String>>,
    http: reqwest::Client,
}

impl PostPublisher {
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` when no site is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let site = config.wordpress.require_site()?;
        let endpoint = format!(
            "{}/sites/{}/posts/new",
            config.wordpress.api_base.trim_end_matches('/'),
            site
        );

        Ok(Self {
            endpoint,
            fixed_categories: config.publish.fixed_categories.clone(),
            http: build_client(SERVICE)?,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Create a post from `draft` with the given status
    pub async fn publish(
        &self,
        draft: &PostDraft,
        token: &TokenRecord,
        status: PostStatus,
    ) -> Result<PublishedPost> {
        let categories = match &self.fixed_categories {
            Some(fixed) => {
                tracing::info!(
                    "Replacing categories {:?} with configured {:?}",
                    draft.categories,
                    fixed
                );
                fixed.join(",")
            }
            None => draft.categories.join(","),
        };

        let form = [
            ("title", draft.title.clone()),
            ("content", draft.content_html.clone()),
            ("excerpt", draft.excerpt.clone()),
            ("status", status.as_str().to_string()),
            ("slug", draft.slug.clone()),
            ("tags", draft.tags.join(",")),
            ("categories", categories),
        ];

        tracing::debug!("Creating {} post at {}", status, self.endpoint);

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&token.access_token)
            .form(&form)
            .send()
            .await
            .map_err(|source| HttpError::Transport {
                service: SERVICE,
                source,
            })?;

        let post: PublishedPost = read_json(SERVICE, response).await?;
        tracing::info!("Created post {} ({})", post.id, post.url);

        Ok(post)
    }
}
