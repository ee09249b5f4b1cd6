pub mod config;
pub mod error;
pub mod forms;
pub mod http;
pub mod models;
pub mod notify;
pub mod recommendation;
pub mod seed;
pub mod server;
pub mod store;
pub mod wizard;

pub use recommendation::{Answers, FeedbackType, describe, recommend};
