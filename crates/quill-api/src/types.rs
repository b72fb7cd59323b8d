//! Wire types for the blog backend.
//!
//! Field names follow the backend's JSON (camelCase); these shapes are
//! a compatibility contract with already-stored content.

use serde::{Deserialize, Serialize};

/// Author role as exposed by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Editor,
    Writer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Number of posts credited to this author.
    pub posts: u64,
    pub avatar: String,
}

/// A post as returned by the posts endpoints. `content` is only
/// populated on single-post fetches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: u64,
    pub title: String,
    pub excerpt: String,
    pub author: Author,
    pub published_at: String,
    pub reading_time: String,
    pub tags: Vec<String>,
    pub likes: u64,
    pub comments: u64,
    pub cover_image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Body for creating a post (a `BlogPost` without its id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    pub excerpt: String,
    pub author: Author,
    pub published_at: String,
    pub reading_time: String,
    pub tags: Vec<String>,
    pub likes: u64,
    pub comments: u64,
    pub cover_image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Partial update body: absent fields are left untouched by the
/// backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePost {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Published,
    Draft,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_posts: u64,
    pub published_posts: u64,
    pub draft_posts: u64,
    pub total_views: u64,
    pub monthly_views: u64,
    pub total_likes: u64,
    pub monthly_likes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentPost {
    pub id: u64,
    pub title: String,
    pub status: PostStatus,
    /// Author display name, not the full author record.
    pub author: String,
    pub published_at: Option<String>,
    pub views: u64,
    pub likes: u64,
}
