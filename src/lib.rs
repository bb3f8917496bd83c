//! sandbox - Directory-driven content index and page server
//!
//! Serves a small learning site whose pages are generated from the
//! directories on disk: every project folder becomes a card on the landing
//! page, every sample file in the Fundamentals folder gets a listing card
//! and a source page.
//!
//! # Architecture
//!
//! Pages are built in two independent stages:
//! - The content index scans a directory into `ContentEntry` values
//! - The renderer turns those entries into cards and HTML
//!
//! Nothing is cached; every page view rescans the directory it shows.
//!
//! # Modules
//!
//! - `library`: Content index builder and sample loading
//! - `render`: View models and Handlebars templates
//! - `site`: Wires index data to pages
//! - `server`: HTTP front end with the 404 page
//! - `config`: Config file and environment resolution
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # List projects with their descriptions
//! sandbox list
//!
//! # Print the Fundamentals page
//! sandbox render --section fundamentals
//!
//! # Serve the site
//! sandbox serve --address 127.0.0.1:8080
//! ```

pub mod cli;
pub mod config;
pub mod library;
pub mod render;
pub mod server;
pub mod site;

// Re-export main types at crate root for convenience
pub use library::{build_index, ContentEntry, EntryKind, IndexError, IndexOptions, IndexOrder};
pub use render::PageRenderer;
pub use site::{Section, Site, SiteError};
