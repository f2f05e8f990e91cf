//! Pages and their identities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a page on the navigation stack
///
/// Identities are opaque strings. Generated ids are UUID v4 strings; callers
/// may also supply their own to address a page later with
/// [`PopDestination::Page`](crate::PopDestination::Page).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    /// Identity used to tag the root content, which is never a stack entry
    pub const ROOT: &'static str = "root";

    /// Create an id from a caller-supplied string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random id
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// The id tagging root content
    pub fn root() -> Self {
        Self(Self::ROOT.to_string())
    }

    /// Borrow the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One entry of the navigation stack
///
/// A page pairs an identity with the content it owns. Equality is by id
/// only, so the rendering layer can tell "same page, re-rendered" apart from
/// "different page, needs a transition".
pub struct Page<B> {
    id: PageId,
    body: B,
}

impl<B> Page<B> {
    /// Create a page owning `body`
    pub fn new(id: PageId, body: B) -> Self {
        Self { id, body }
    }

    /// The page identity
    pub fn id(&self) -> &PageId {
        &self.id
    }

    /// The page content
    pub fn body(&self) -> &B {
        &self.body
    }

    /// Consume the page, releasing its content
    pub fn into_body(self) -> B {
        self.body
    }
}

impl<B> PartialEq for Page<B> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<B> Eq for Page<B> {}

impl<B> fmt::Debug for Page<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
