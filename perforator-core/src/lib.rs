//! Perforator Core - windowed retrieval engine for repository analytics
//!
//! This crate turns a remote paged list API into an exact "skip N, take M"
//! view over the remote sequence, and holds the configuration shared by the
//! GitHub client and the CLI.

pub mod config;
pub mod error;
pub mod fetch;
pub mod secrets;
pub mod window;

pub use config::{Config, DefaultsConfig, GitHubConfig};
pub use error::{Error, PartialFetch, Result};
pub use fetch::{FetchObserver, FetchResult, NoopObserver, PageProgress, PageSource, PagedFetcher};
pub use secrets::Secrets;
pub use window::{PagePlan, PageStep, SliceBounds, Window, MAX_PER_PAGE};
