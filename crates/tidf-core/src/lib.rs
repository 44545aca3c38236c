pub mod config;
pub mod logging;

pub mod auth;
pub mod error;
pub mod feed;
pub mod fetcher;
pub mod report;
pub mod retry;
pub mod run;
pub mod settings;
pub mod storage;
