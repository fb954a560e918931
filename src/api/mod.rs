pub mod envelope;
pub mod handle;
pub mod http;
pub mod traits;
pub mod types;

pub use handle::Api;
pub use http::HttpClient;
pub use traits::Transport;
pub use types::{ApiRequest, ApiResponse, Body, FilePart, Method, QueryBuilder};

#[cfg(test)]
pub use traits::MockTransport;
