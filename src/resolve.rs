//! Publish-state resolution and header rewriting.
//!
//! Resolving a document answers one question for the caller: under which slug
//! may this document be served right now, and is it still pre-publication?
//!
//! # Rules
//!
//! Three rules run in a fixed order over the decoded metadata. Each one sees
//! the state left by the previous one:
//!
//! 1. **Date gating**: a valid `publish date` (or alias) decides `published`
//!    as `date <= now`. Promotion of an explicit `published: false` to `true`
//!    requests a rewrite; the computed value always replaces the stored one.
//! 2. **Unpublished slug**: an explicit `published: false` needs a review slug.
//!    The first `slugs` entry carrying the pre-publish prefix is reused;
//!    otherwise one is minted, appended to `slugs`, and a rewrite requested.
//! 3. **Secret slug**: `secret: true` mints a fresh secret slug on every call.
//!    It is appended (and a rewrite requested) only while `slugs` is empty.
//!
//! Rules 2 and 3 mark the document pre-published and override the effective
//! `slug` in the returned metadata only. The override never reaches disk.
//!
//! # Rewrite gate
//!
//! Rewrite requests are collected; at most one write happens per call, of the
//! final state. The gate encodes the originally decoded metadata and the
//! candidate through the codec and writes only when the texts differ, so
//! encoder normalization decides what counts as a change.

use crate::frontmatter::{CodecError, Document, MetadataCodec, YamlCodec, render_document};
use crate::metadata::ContentMetadata;
use crate::slug::SlugMinter;
use crate::store::DocumentStore;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Front matter error in {}: {source}", .path.display())]
    Codec {
        path: PathBuf,
        #[source]
        source: CodecError,
    },
}

impl ResolveError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn codec(path: &Path, source: CodecError) -> Self {
        Self::Codec {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Outcome of resolving one document.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishDecision {
    /// Effective metadata, including any in-memory slug override.
    pub meta: ContentMetadata,
    /// Body exactly as decoded.
    pub body: String,
    /// The document must be treated as not yet public.
    pub pre_published: bool,
    /// The header was rewritten through the store.
    pub written: bool,
}

/// State threaded through the rules.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Metadata as it would be persisted.
    pub persisted: ContentMetadata,
    /// Effective slug for this call only.
    pub slug_override: Option<String>,
    pub pre_published: bool,
    pub write_requested: bool,
}

impl Resolution {
    fn start(meta: &ContentMetadata) -> Self {
        Self {
            persisted: meta.clone(),
            slug_override: None,
            pre_published: false,
            write_requested: false,
        }
    }

    /// Persisted metadata with the slug override applied.
    pub fn effective_meta(&self) -> ContentMetadata {
        let mut meta = self.persisted.clone();
        if let Some(slug) = &self.slug_override {
            meta.set_slug(slug);
        }
        meta
    }
}

type Rule = fn(Resolution, &SlugMinter) -> Resolution;

const RULES: [(&str, Rule); 3] = [
    ("publish-date", gate_on_publish_date),
    ("unpublished-slug", assign_unpublished_slug),
    ("secret-slug", assign_secret_slug),
];

/// Run every rule over `meta`. Pure apart from the minter's clock and ids.
pub fn resolve_metadata(meta: &ContentMetadata, minter: &SlugMinter) -> Resolution {
    RULES
        .iter()
        .fold(Resolution::start(meta), |state, (name, rule)| {
            let next = rule(state, minter);
            debug!(
                rule = *name,
                write_requested = next.write_requested,
                pre_published = next.pre_published,
                "applied rule"
            );
            next
        })
}

fn gate_on_publish_date(mut state: Resolution, minter: &SlugMinter) -> Resolution {
    let Some(date) = state.persisted.publish_date() else {
        return state;
    };
    let published = date.timestamp_millis() <= minter.now().timestamp_millis();
    if published && state.persisted.published() == Some(false) {
        state.write_requested = true;
    }
    state.persisted.set_published(published);
    state
}

fn assign_unpublished_slug(mut state: Resolution, minter: &SlugMinter) -> Resolution {
    if state.persisted.published() != Some(false) {
        return state;
    }
    let existing = state
        .persisted
        .find_slug_with_prefix(minter.unpublished_prefix())
        .map(str::to_string);
    let slug = match existing {
        Some(slug) => slug,
        None => {
            let fresh = minter.unpublished_slug();
            state.persisted.push_slug(&fresh);
            state.write_requested = true;
            fresh
        }
    };
    state.pre_published = true;
    state.slug_override = Some(slug);
    state
}

fn assign_secret_slug(mut state: Resolution, minter: &SlugMinter) -> Resolution {
    if state.persisted.secret() != Some(true) {
        return state;
    }
    info!("add secret path");
    let secret = minter.secret_slug();
    if state.persisted.slug_count() == 0 {
        state.persisted.push_slug(&secret);
        state.write_requested = true;
    }
    state.pre_published = true;
    state.slug_override = Some(secret);
    state
}

/// Overwrite `path` with `candidate` as header when it encodes differently
/// from `original`. Returns whether a write happened.
pub fn rewrite_if_changed(
    store: &impl DocumentStore,
    codec: &impl MetadataCodec,
    path: &Path,
    original: &ContentMetadata,
    candidate: &ContentMetadata,
    body: &str,
) -> Result<bool, ResolveError> {
    let before = codec
        .encode(original)
        .map_err(|e| ResolveError::codec(path, e))?;
    let after = codec
        .encode(candidate)
        .map_err(|e| ResolveError::codec(path, e))?;
    if before == after {
        return Ok(false);
    }
    info!(path = %path.display(), "rewriting front matter");
    store
        .write(path, &render_document(&after, body))
        .map_err(|e| ResolveError::io(path, e))?;
    Ok(true)
}

/// Resolves documents read from a store.
#[derive(Debug)]
pub struct Resolver<S, C = YamlCodec> {
    store: S,
    codec: C,
    minter: SlugMinter,
}

impl<S: DocumentStore> Resolver<S> {
    pub fn new(store: S, minter: SlugMinter) -> Self {
        Self {
            store,
            codec: YamlCodec,
            minter,
        }
    }
}

impl<S: DocumentStore, C: MetadataCodec> Resolver<S, C> {
    pub fn with_codec<C2: MetadataCodec>(self, codec: C2) -> Resolver<S, C2> {
        Resolver {
            store: self.store,
            codec,
            minter: self.minter,
        }
    }

    /// Read, resolve and, when needed, rewrite the document at `path`.
    pub fn resolve(&self, path: &Path) -> Result<PublishDecision, ResolveError> {
        info!(path = %path.display(), "resolving publish state");
        let text = self
            .store
            .read(path)
            .map_err(|e| ResolveError::io(path, e))?;
        let Document {
            meta: original,
            body,
        } = self
            .codec
            .decode(&text)
            .map_err(|e| ResolveError::codec(path, e))?;
        debug!(meta = ?original.as_mapping(), "decoded front matter");

        if body.trim().is_empty() {
            warn!(path = %path.display(), "content file has no content");
        }

        let resolution = resolve_metadata(&original, &self.minter);
        let written = if resolution.write_requested {
            rewrite_if_changed(
                &self.store,
                &self.codec,
                path,
                &original,
                &resolution.persisted,
                &body,
            )?
        } else {
            false
        };

        Ok(PublishDecision {
            meta: resolution.effective_meta(),
            body,
            pre_published: resolution.pre_published,
            written,
        })
    }
}
