//! Rendering of grouped commits. Release notes have a single fixed Markdown
//! shape; [`MarkdownWriter`] produces it.

mod md_writer;

pub use self::md_writer::{range_label, MarkdownWriter};
