//! quill-api: REST client and session objects for the blog backend.
//!
//! The editor core is agnostic to this boundary; it only produces and
//! consumes markup strings. This crate carries everything that talks to
//! the outside: the post/dashboard HTTP client and the injected session
//! object that replaces ambient key-value auth state.

pub mod client;
pub mod error;
pub mod session;
pub mod types;

pub use client::BlogClient;
pub use error::ApiError;
pub use session::{MemoryStore, Session, SettingsStore, UserSettings};
pub use types::{
    Author, BlogPost, DashboardStats, NewPost, PostStatus, RecentPost, Role, UpdatePost,
};
