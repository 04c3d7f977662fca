//! Review slug minting.
//!
//! Two kinds of slugs grant access to content that is not public yet:
//!
//! - **Pre-publish slugs** for drafts: `<prefix><base36 millis>_<random>`,
//!   e.g. `___UNPUBLISHED___lrx3f0a1_Q8dK...`. The prefix lets the resolver
//!   recognize and reuse an existing one.
//! - **Secret slugs** for secret documents: `<base36 millis>_<random>`.
//!
//! Randomness and time are capabilities ([`IdGenerator`], [`Clock`]) so tests
//! can substitute deterministic implementations.

use crate::config::SlugConfig;
use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;

/// Source of unguessable strings.
pub trait IdGenerator {
    /// A fresh string of exactly `len` characters from `[A-Za-z0-9]`.
    fn random_string(&self, len: usize) -> String;
}

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Thread-local CSPRNG backed generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn random_string(&self, len: usize) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Format `value` in lowercase base 36.
pub fn to_base36(value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    let mut n = value;
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Mints review slugs from the configured prefix and length, an id source and
/// a clock.
pub struct SlugMinter {
    config: SlugConfig,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
}

impl SlugMinter {
    pub fn new(config: SlugConfig, ids: Box<dyn IdGenerator>, clock: Box<dyn Clock>) -> Self {
        Self { config, ids, clock }
    }

    /// Minter using the thread RNG and the system clock.
    pub fn system(config: SlugConfig) -> Self {
        Self::new(config, Box::new(RandomIds), Box::new(SystemClock))
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn unpublished_prefix(&self) -> &str {
        &self.config.unpublished_prefix
    }

    /// A new pre-publish slug.
    pub fn unpublished_slug(&self) -> String {
        format!("{}{}", self.config.unpublished_prefix, self.secret_slug())
    }

    /// A new secret slug.
    pub fn secret_slug(&self) -> String {
        // Times before the epoch clamp to zero.
        let millis = u64::try_from(self.now().timestamp_millis()).unwrap_or(0);
        format!(
            "{}_{}",
            to_base36(millis),
            self.ids.random_string(self.config.random_length)
        )
    }
}

impl std::fmt::Debug for SlugMinter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlugMinter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
