//! Value handles into a translation unit.
//!
//! Everything in this module is a cheap `Copy` record (or a thin owner, in
//! the token case) borrowing the [`TranslationUnit`](crate::TranslationUnit)
//! it came from. The borrow is the validity rule: a cursor, type, location,
//! token, comment, or module handle cannot outlive its unit, and misuse is
//! rejected at compile time rather than detected at run time.

mod comment;
mod cursor;
mod location;
mod module;
mod token;
mod types;

pub use comment::Comment;
pub use cursor::Cursor;
pub use location::{File, SourceLocation, SourceRange};
pub use module::Module;
pub use token::{Token, TokenSet};
pub use types::Type;
