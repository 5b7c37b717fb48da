//! Cache key derivation.
//!
//! A key is a hash of the compiled rule text with `&` standing in for the
//! class selector, so it depends only on the resolved content: equal styles
//! share a key no matter how they were requested.

use xxhash_rust::xxh3::xxh3_64;

use crate::util::to_base36;

/// Which stylesheet section a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyKind {
    /// Element styles, emitted as class names.
    Class,
    /// Global rules.
    Global,
}

/// Derives the key for a canonical rule body.
pub(crate) fn derive_key(prefix: &str, kind: KeyKind, canonical: &str) -> String {
    let tag = match kind {
        KeyKind::Class => "c",
        KeyKind::Global => "g",
    };
    let hash = to_base36(xxh3_64(canonical.as_bytes()));
    if prefix.is_empty() {
        format!("{}-{}", tag, hash)
    } else {
        format!("{}-{}-{}", prefix, tag, hash)
    }
}
