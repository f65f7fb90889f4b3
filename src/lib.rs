//! fileserve - a minimal concurrent static file server
//!
//! Each connection carries one request. The target path is resolved against
//! the served root (with a directory-index fallback) and the file is streamed
//! back with its content type, or a fixed 404 page is sent.

pub mod config;
pub mod http;
pub mod server;
