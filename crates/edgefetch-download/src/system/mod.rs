//! System download service implementations.

mod curl;

pub use curl::CurlDownloadService;
