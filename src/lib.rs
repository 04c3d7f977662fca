//! # Prepublish
//!
//! Publish-state resolution for front-matter documents. Each document starts
//! with a YAML header between `---` fences; prepublish reads that header,
//! decides whether the document is visible, and gives hidden documents a
//! review URL slug so they can be previewed before release.
//!
//! # Resolution Pipeline
//!
//! Every document goes through the same fixed sequence of rules, each seeing
//! the state the previous rule produced:
//!
//! ```text
//! 1. Date gate        publish date elapsed?  →  published: true/false
//! 2. Unpublished slug published: false       →  ___UNPUBLISHED___<ms36>_<random> in slugs
//! 3. Secret slug      secret: true           →  fresh in-memory slug override
//! ```
//!
//! The header is rewritten at most once, after all rules ran, and only when a
//! rule asked for it and the encoded header actually differs from what was
//! read. The body is never touched beyond trimming its leading whitespace.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`resolve`] | The rule pipeline and the rewrite gate; entry point [`resolve::Resolver`] |
//! | [`metadata`] | Ordered header mapping with typed accessors and date parsing |
//! | [`frontmatter`] | Header/body split, YAML codec, on-disk document layout |
//! | [`slug`] | Review slug minting with injectable clock and id source |
//! | [`store`] | Read/write seam: filesystem or dry-run |
//! | [`scan`] | Turns CLI targets into a sorted list of content files |
//! | [`config`] | `prepublish.toml` loading, merging over stock defaults, validation |
//! | [`types`] | Report types shared by text and `--json` output |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Persisted vs. Effective Metadata
//!
//! The secret slug is a per-request value: it is handed back to the caller in
//! the effective `slug` but never written to disk. The pre-publish slug is the
//! opposite: it is appended to `slugs` and persisted so the review URL stays
//! stable across runs. [`resolve::Resolution`] tracks the two separately.
//!
//! ## Ordered Headers
//!
//! Headers are kept as a `serde_yaml::Mapping`, not a typed struct, so keys the
//! resolver knows nothing about survive a rewrite in their original order.

pub mod config;
pub mod frontmatter;
pub mod metadata;
pub mod output;
pub mod resolve;
pub mod scan;
pub mod slug;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
