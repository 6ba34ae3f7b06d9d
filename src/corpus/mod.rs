//! The note corpus: topic entries grouped into labeled collections.
//!
//! A corpus is organized the way the source notes are laid out on disk:
//!
//! ```text
//! notes/
//! └── 2021/                     # one collection per label
//!     ├── kerberos-module.md    # one topic entry per note file
//!     ├── late-binding-closures.md
//!     └── mutable-default-arguments.md
//! ```
//!
//! Collections keep their entries in insertion order and reject duplicate
//! titles; lookups by unknown title fail with [`CorpusError::NotFound`].

pub mod collection;
pub mod entry;

pub use collection::{CorpusError, TopicCollection};
pub use entry::{CodeSample, Reference, TopicEntry};
