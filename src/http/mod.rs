//! HTTP protocol implementation.
//!
//! This module implements an HTTP/1.0-style static file responder: one
//! request per connection, then the connection is closed.
//!
//! # Architecture
//!
//! - **`connection`**: The per-connection request/response state machine
//! - **`parser`**: Line reading and request-line parsing
//! - **`request`**: The parsed request line
//! - **`resolve`**: Confines request paths to the document root and opens files
//! - **`mime`**: MIME type detection based on file extensions
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes the head and streams the body to the client
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Request line, then headers until blank line
//!        └──────┬──────┘
//!               │ Request line parsed        (EOF first → Closed)
//!               ▼                            (malformed → Writing 400)
//!        ┌──────────────────┐
//!        │   Processing     │ ← Resolve path, pick 200 or 404
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Head, then body in 1 KiB chunks
//!        └──────┬───────────┘
//!               ▼
//!            Closed
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod resolve;
pub mod response;
pub mod writer;
