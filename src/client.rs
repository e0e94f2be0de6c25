pub mod transport;
pub mod rest;
pub mod remote;

pub use rest::RestClient;
pub use transport::{ApiRequest, ApiResponse, Method, ReqwestTransport, Transport};
