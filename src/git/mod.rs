pub mod repo;
pub mod source;

pub use repo::GitRepo;
pub use source::{is_remote_url, RepoSource};
