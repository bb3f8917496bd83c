//! Directory-driven content library.
//!
//! Each indexed directory yields one [`ContentEntry`] per item. Projects
//! may carry a metadata file whose third line becomes the card text.
//!
//! # Layout
//!
//! ```text
//! <root>/
//! ├── Practice_Projects/
//! │   └── <project>/
//! │       ├── Readme.md       # line 3 = description
//! │       └── index.html
//! └── Fundamentals/
//!     └── 0_Output.php        # sample shown on its own page
//! ```

pub mod entry;
pub mod index;
pub mod sample;

pub use entry::{capitalize, default_description, ContentEntry, EntryKind};
pub use index::{build_index, IndexError, IndexOptions, IndexOrder};
pub use sample::{SampleError, SampleSource};
