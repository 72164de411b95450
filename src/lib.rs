//! Streaming tweet ingestion with running hashtag statistics.
//!
//! Bytes from a [`transport::Transport`] are split into JSON objects by the
//! [`io::RecordStream`], classified by the [`engine`], and counted by a
//! [`storage::TweetStatistics`] implementation. [`streaming::StreamProcessor`]
//! ties these together with a periodic reporter.

pub mod app;
pub mod config;
pub mod domain;
pub mod engine;
pub mod io;
pub mod logging;
pub mod prelude;
pub mod storage;
pub mod streaming;
pub mod transport;
