//! Front matter parsing and title extraction for markdown documents.
//!
//! Titles are resolved in priority order:
//!
//! 1. `title` key of a `---`-delimited YAML front matter block
//! 2. first level-1 heading (`# Title`) of the body
//! 3. (caller's choice) a label derived from the filename
//!
//! # Example
//!
//! ```
//! use dsfr_meta::{extract_title, title_from_name};
//!
//! let doc = "---\ntitle: Foo\n---\n# Bar\n";
//! assert_eq!(extract_title(doc).as_deref(), Some("Foo"));
//! assert_eq!(title_from_name("setup-guide"), "Setup Guide");
//! ```

mod frontmatter;
mod title;

pub use frontmatter::{FrontMatter, body, split_front_matter};
pub use title::{
    Document, extract_title, first_heading_title, front_matter_title, read_title, title_from_filename,
    title_from_name, titlecase,
};
