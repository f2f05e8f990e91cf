//! Navigation errors

use crate::page::PageId;
use thiserror::Error;

/// Invariant violations raised by stack mutations.
///
/// None of these are user-recoverable: they signal a navigation bug in the
/// calling code. The controller's plain `push`/`pop` treat them as fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// A page with this id is already on the stack
    #[error("Pushed page already exists on stack by id: {0}")]
    DuplicatePage(PageId),

    /// No page with this id is on the stack
    #[error("Page by id {0} doesn't exist on stack")]
    UnknownPage(PageId),

    /// Pop requested while no pages are on the stack
    #[error("Cannot pop an empty navigation stack")]
    EmptyStack,
}

/// Result type for navigation operations
pub type Result<T> = std::result::Result<T, NavigationError>;
