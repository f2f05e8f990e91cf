//! Identity-keyed page stack
//!
//! The stack holds every page above the root, oldest first. The root view is
//! not an entry: an empty stack means "show root". Every mutation checks its
//! precondition before touching the pages, so a failed call leaves the stack
//! exactly as it was.

use crate::error::{NavigationError, Result};
use crate::page::{Page, PageId};

/// Ordered sequence of pages with unique ids
pub struct Stack<B> {
    /// Pages (bottom to top)
    pages: Vec<Page<B>>,
}

impl<B> Default for Stack<B> {
    fn default() -> Self {
        Self { pages: Vec::new() }
    }
}

impl<B> Stack<B> {
    /// Create an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a page on top
    ///
    /// Fails if a page with the same id is still on the stack.
    pub fn push(&mut self, page: Page<B>) -> Result<()> {
        if self.contains(page.id()) {
            return Err(NavigationError::DuplicatePage(page.id().clone()));
        }
        self.pages.push(page);
        Ok(())
    }

    /// Remove and return the top page
    pub fn pop_to_previous(&mut self) -> Result<Page<B>> {
        self.pages.pop().ok_or(NavigationError::EmptyStack)
    }

    /// Remove every page above the page with `id`, leaving it on top
    ///
    /// Returns the removed pages, oldest first.
    pub fn pop_to(&mut self, id: &PageId) -> Result<Vec<Page<B>>> {
        let index = self
            .position(id)
            .ok_or_else(|| NavigationError::UnknownPage(id.clone()))?;
        Ok(self.pages.split_off(index + 1))
    }

    /// Remove every page, exposing the root
    pub fn pop_to_root(&mut self) -> Vec<Page<B>> {
        std::mem::take(&mut self.pages)
    }

    /// Top page, if any
    pub fn peek(&self) -> Option<&Page<B>> {
        self.pages.last()
    }

    /// Number of pages above the root
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether only the root is showing
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Whether a page with `id` is on the stack
    pub fn contains(&self, id: &PageId) -> bool {
        self.position(id).is_some()
    }

    /// Index of the page with `id`, counted from the bottom
    pub fn position(&self, id: &PageId) -> Option<usize> {
        self.pages.iter().position(|page| page.id() == id)
    }

    /// Ids of all pages, bottom to top
    pub fn ids(&self) -> Vec<PageId> {
        self.pages.iter().map(|page| page.id().clone()).collect()
    }

    /// All pages, bottom to top
    pub fn pages(&self) -> &[Page<B>] {
        &self.pages
    }
}

impl<B> std::fmt::Debug for Stack<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stack").field("pages", &self.ids()).finish()
    }
}
