//! HTTP client for the blog backend.

use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::error::ApiError;
use crate::types::{Author, BlogPost, DashboardStats, NewPost, RecentPost, UpdatePost};

/// Client for the blog REST API.
///
/// Thin wrapper over `reqwest::Client`; every method maps to one
/// endpoint and deserializes the JSON body.
#[derive(Debug, Clone)]
pub struct BlogClient {
    base_url: String,
    http: reqwest::Client,
}

impl BlogClient {
    /// Create a client for the API rooted at `base_url`
    /// (e.g. `http://localhost:5000/api`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!(path, "GET");
        let response = self.http.get(self.url(path)).send().await?;
        Ok(response.error_for_status()?.json().await?)
    }

    // === Posts ===

    pub async fn list_posts(&self) -> Result<Vec<BlogPost>, ApiError> {
        self.get_json("/posts").await
    }

    pub async fn get_post(&self, id: u64) -> Result<BlogPost, ApiError> {
        self.get_json(&format!("/posts/{id}")).await
    }

    pub async fn create_post(&self, post: &NewPost) -> Result<BlogPost, ApiError> {
        debug!(title = %post.title, "POST /posts");
        let response = self.http.post(self.url("/posts")).json(post).send().await?;
        Ok(response.error_for_status()?.json().await?)
    }

    pub async fn update_post(&self, id: u64, patch: &UpdatePost) -> Result<BlogPost, ApiError> {
        debug!(id, "PUT /posts");
        let response = self
            .http
            .put(self.url(&format!("/posts/{id}")))
            .json(patch)
            .send()
            .await?;
        Ok(response.error_for_status()?.json().await?)
    }

    pub async fn delete_post(&self, id: u64) -> Result<(), ApiError> {
        debug!(id, "DELETE /posts");
        let response = self
            .http
            .delete(self.url(&format!("/posts/{id}")))
            .send()
            .await?;
        response.error_for_status()?;
        Ok(())
    }

    /// Like a post. Returns the post with its bumped like count.
    pub async fn like_post(&self, id: u64) -> Result<BlogPost, ApiError> {
        let response = self
            .http
            .post(self.url(&format!("/posts/{id}/like")))
            .send()
            .await?;
        Ok(response.error_for_status()?.json().await?)
    }

    /// Add a comment to a post. Returns the post with its bumped
    /// comment count.
    pub async fn add_comment(&self, id: u64, content: &str) -> Result<BlogPost, ApiError> {
        let response = self
            .http
            .post(self.url(&format!("/posts/{id}/comments")))
            .json(&json!({ "content": content }))
            .send()
            .await?;
        Ok(response.error_for_status()?.json().await?)
    }

    // === Dashboard ===

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.get_json("/dashboard/stats").await
    }

    pub async fn recent_posts(&self) -> Result<Vec<RecentPost>, ApiError> {
        self.get_json("/dashboard/recent-posts").await
    }

    pub async fn authors(&self) -> Result<Vec<Author>, ApiError> {
        self.get_json("/dashboard/authors").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = BlogClient::new("http://localhost:5000/api/");
        assert_eq!(client.url("/posts"), "http://localhost:5000/api/posts");
        assert_eq!(
            client.url("/posts/7/like"),
            "http://localhost:5000/api/posts/7/like"
        );
        assert_eq!(
            client.url("/dashboard/recent-posts"),
            "http://localhost:5000/api/dashboard/recent-posts"
        );
    }
}
