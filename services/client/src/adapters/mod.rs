pub mod fallback;
pub mod http;
pub mod thread_store;

pub use http::HttpBackend;
pub use thread_store::FileThreadStore;
