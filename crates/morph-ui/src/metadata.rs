//! Navigation bar metadata
//!
//! [`BarMetadata`] is the live chrome state owned by a navigation host. The
//! [`MetadataAggregator`] folds the preferences of each completed render pass
//! into it and keeps the [`TitleHistory`] that labels the back button.

use crate::preferences::{
    BackgroundContent, BackgroundKey, BarItems, BarItemsKey, PreferenceValues, TaggedView,
    TintColorKey, TitleKey,
};
use crate::theme::Color;
use morph_state::NavigationSnapshot;

/// Chrome state of the visible page
#[derive(Debug, Clone, PartialEq)]
pub struct BarMetadata {
    /// Bar title
    pub title: String,
    /// Leading and trailing items
    pub items: BarItems,
    /// Content behind the bar
    pub background: BackgroundContent,
    /// Bar tint
    pub tint: Color,
}

impl BarMetadata {
    /// Empty metadata with the given starting tint
    pub fn new(tint: Color) -> Self {
        Self {
            title: String::new(),
            items: BarItems::default(),
            background: TaggedView::empty(),
            tint,
        }
    }
}

impl Default for BarMetadata {
    fn default() -> Self {
        Self::new(Color::default())
    }
}

/// Titles of the pages below the visible one
///
/// Entry `i` is the title of stack level `i`, level 0 being the root, so the
/// history is as deep as the page stack and its last entry labels the back
/// button.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleHistory {
    titles: Vec<String>,
}

impl TitleHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the title of the level being covered
    pub fn push(&mut self, title: impl Into<String>) {
        self.titles.push(title.into());
    }

    /// Forget the most recent title
    pub fn pop(&mut self) -> Option<String> {
        self.titles.pop()
    }

    /// Number of recorded titles
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    /// Whether no titles are recorded
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Title of the level directly below the visible one, if it had one
    pub fn previous(&self) -> Option<&str> {
        self.titles
            .last()
            .map(String::as_str)
            .filter(|title| !title.is_empty())
    }

    /// All titles, root first
    pub fn as_slice(&self) -> &[String] {
        &self.titles
    }

    /// Make the history exactly `depth` entries deep
    ///
    /// Levels up to `floor` were never popped since the last commit, so
    /// their titles stay. When nothing was popped below the level that was
    /// visible, its title `current` is recorded; every other new level was
    /// pushed and covered without being rendered and gets a blank title.
    fn align(&mut self, floor: usize, depth: usize, current: &str) {
        let shown = self.titles.len();
        if floor < shown {
            self.titles.truncate(floor + 1);
        } else if depth > shown {
            self.titles.push(current.to_string());
        }
        if depth > self.titles.len() {
            self.titles.resize(depth, String::new());
        } else {
            self.titles.truncate(depth);
        }
    }
}

/// Folds render-pass preferences into the host's [`BarMetadata`]
#[derive(Debug, Default)]
pub struct MetadataAggregator {
    history: TitleHistory,
    seen_generation: u64,
}

impl MetadataAggregator {
    /// Create an aggregator for a host showing its root
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the preferences of a completed render pass
    ///
    /// Title, items and background are replaced by this pass's values (or
    /// their defaults). The tint changes only when the pass emitted one. When
    /// `navigation` reports a new mutation, the title history first follows
    /// the stack: a push records the title that was visible, a pop drops the
    /// titles of the removed levels. `navigation` must be a settled snapshot
    /// so its floor covers every mutation since the previous commit.
    pub fn commit(
        &mut self,
        metadata: &mut BarMetadata,
        preferences: &PreferenceValues,
        navigation: &NavigationSnapshot,
    ) {
        if navigation.generation != self.seen_generation {
            self.seen_generation = navigation.generation;
            self.history
                .align(navigation.floor, navigation.depth, &metadata.title);
            tracing::trace!(
                direction = ?navigation.direction,
                depth = navigation.depth,
                previous = ?self.history.previous(),
                "Updated title history"
            );
        }

        metadata.title = preferences.get::<TitleKey>();
        metadata.items = preferences.get::<BarItemsKey>();
        metadata.background = preferences.get::<BackgroundKey>();
        if let Some(tint) = preferences.get::<TintColorKey>() {
            metadata.tint = tint;
        }
    }

    /// Titles of the covered levels
    pub fn history(&self) -> &TitleHistory {
        &self.history
    }

    /// Back button label source
    pub fn previous_title(&self) -> Option<&str> {
        self.history.previous()
    }
}
