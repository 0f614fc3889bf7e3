//! CLI command handlers, one file per subcommand.

mod completions;
mod download;
mod page;
mod resolve;
mod scan;

pub use completions::run_completions;
pub use download::{run_download, DownloadArgs};
pub use page::PageSource;
pub use resolve::run_resolve;
pub use scan::run_scan;
