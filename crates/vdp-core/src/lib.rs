pub mod config;
pub mod logging;

pub mod bridge;
pub mod dispatcher;
pub mod download;
pub mod error;
pub mod messages;
pub mod model;
pub mod page;
pub mod popup;
pub mod scanner;
pub mod url_model;
