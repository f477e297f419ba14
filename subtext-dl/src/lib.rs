//! Typed Rust bindings to the [yt-dlp](https://github.com/yt-dlp/yt-dlp) Python library.
//!
//! Three operations, all blocking:
//!
//! - [`dl::expand`] - flat, metadata-only listing of a collection's members
//! - [`dl::probe`] - caption track listing for one video, no media download
//! - [`dl::download`] - execute a configured download job
//!
//! ```no_run
//! use subtext_dl::dl::{DownloadOptions, OutputPaths, OutputTemplates, download};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let opts = DownloadOptions {
//!     format: Some("worstaudio".to_string()),
//!     paths: Some(OutputPaths::in_dir(Path::new("./audio"))),
//!     outtmpl: Some(OutputTemplates::simple("%(title)s.%(ext)s".to_string())),
//!     quiet: Some(true),
//!     ..Default::default()
//! };
//!
//! let report = download("https://www.bilibili.com/video/av123", opts)?;
//! println!("downloaded: {}", report.title);
//! # Ok(())
//! # }
//! ```

pub mod dl;
