// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::PostId;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A marketing blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    /// Post id.
    pub id: PostId,
    /// URL slug, unique across posts.
    pub slug: String,
    /// Title.
    pub title: String,
    /// Author display name.
    pub author: String,
    /// Short summary shown in listings.
    pub excerpt: String,
    /// Body text.
    pub content: String,
    /// Publication instant.
    #[serde(with = "crate::serde_formats::rfc3339")]
    pub published_at: OffsetDateTime,
}

/// Derives a URL slug from a title.
///
/// Lowercases ASCII letters and digits and joins runs of anything else
/// with a single hyphen. Leading and trailing hyphens are dropped.
///
/// # Errors
///
/// Returns `DomainError::InvalidSlug` if nothing slug-worthy remains.
pub fn slugify(title: &str) -> Result<String, DomainError> {
    let mut slug: String = String::with_capacity(title.len());
    let mut pending_hyphen: bool = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        return Err(DomainError::InvalidSlug(title.to_string()));
    }
    Ok(slug)
}
