//! HTTP protocol handling for the file server.
//!
//! Every accepted connection carries exactly one request and gets exactly one
//! response before it is closed. There is no keep-alive.
//!
//! # Architecture
//!
//! - **`connection`**: drives one connection through its state machine
//! - **`parser`**: reads the request line and discards the header block
//! - **`request`**: the parsed request
//! - **`resolver`**: maps a target path to a file under the served root
//! - **`mime`**: content type lookup by file suffix
//! - **`response`**: status codes and response bodies
//! - **`writer`**: serializes a response onto the output stream
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Parsing   │ ← Read request line and headers
//!        └──────┬──────┘
//!               │ Request parsed          (empty / malformed ──► Closed)
//!               ▼
//!        ┌──────────────────┐
//!        │    Resolving     │ ← Pick a file or decide not-found
//!        └──────┬───────────┘
//!               │
//!               ▼
//!        ┌──────────────────┐
//!        │    Responding    │ ← Status line, content type, body
//!        └──────┬───────────┘
//!               │
//!               ▼
//!            Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use fileserve::http::connection::Connection;
//! use fileserve::http::resolver::Resolver;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     let resolver = Arc::new(Resolver::new(".", "index.html"));
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let resolver = resolver.clone();
//!         tokio::spawn(async move {
//!             let _ = Connection::new(socket, resolver).run().await;
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod resolver;
pub mod response;
pub mod writer;
