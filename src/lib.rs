pub mod auth;
pub mod config;
pub mod export;
pub mod fetch;
pub mod http;
pub mod output;
pub mod pipeline;
pub mod records;
pub mod window;
