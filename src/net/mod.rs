pub mod api;
pub mod client;
pub mod request;
pub mod transport;
pub mod types;

pub use client::{ClientOptions, HttpClient};
pub use request::{ApiRequest, ApiResponse};
