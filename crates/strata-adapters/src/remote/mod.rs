//! Hosted repository clients.

mod github;

pub use github::{DEFAULT_API_URL, GitHubConfig, GitHubRepository};
