//! Content source abstractions and implementations.

mod fs;
mod http;
mod mock;
mod provider;
mod retry;

pub use fs::FsSource;
pub use http::HttpSource;
pub use mock::{MockResponse, MockSource};
pub use provider::ContentSource;
pub use retry::RetrySource;
