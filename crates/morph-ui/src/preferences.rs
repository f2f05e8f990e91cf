//! Preference channels
//!
//! Descendants declare navigation bar metadata by emitting preference values
//! while they render. Each channel is a [`PreferenceKey`] with a pure reduce
//! function; the values of one render pass are folded into a
//! [`PreferenceValues`] collector that the enclosing host reads once the pass
//! is complete.
//!
//! Modifiers emit before rendering the content they wrap, so emission order
//! is pre-order: a descendant overrides its ancestor, and a later sibling
//! overrides an earlier one.
//!
//! ```rust
//! use morph_ui::preferences::{NavigationBarExt, PreferenceValues, TitleKey};
//! use morph_ui::view::{Environment, Group, RenderContext, Text, View};
//!
//! let page = Group::new()
//!     .child(Text::new("Inbox").navigation_bar_title("Mail"))
//!     .navigation_bar_title("Outer");
//!
//! let mut preferences = PreferenceValues::new();
//! let mut cx = RenderContext::new(Environment::new(), &mut preferences);
//! page.render(&mut cx);
//!
//! assert_eq!(preferences.get::<TitleKey>(), "Mail");
//! ```

use crate::theme::Color;
use crate::view::{EmptyView, RenderContext, View};
use std::any::{Any, TypeId};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use uuid::Uuid;

/// A named channel from descendants to an ancestor
pub trait PreferenceKey: 'static {
    /// Value carried by the channel
    type Value: Clone + Send + Sync + 'static;

    /// Value seen when nothing was emitted during the pass
    fn default_value() -> Self::Value;

    /// Fold `next` into the accumulated value; last writer wins by default
    fn reduce(value: &mut Self::Value, next: Self::Value) {
        *value = next;
    }
}

/// Preference values collected during one render pass
#[derive(Default)]
pub struct PreferenceValues {
    values: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl PreferenceValues {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold an emitted value into channel `K`
    pub fn emit<K: PreferenceKey>(&mut self, next: K::Value) {
        match self.values.entry(TypeId::of::<K>()) {
            Entry::Occupied(mut entry) => {
                if let Some(value) = entry.get_mut().downcast_mut::<K::Value>() {
                    K::reduce(value, next);
                }
            }
            Entry::Vacant(entry) => {
                let mut value = K::default_value();
                K::reduce(&mut value, next);
                entry.insert(Box::new(value));
            }
        }
    }

    /// Reduced value of channel `K`, or its default if nothing was emitted
    pub fn get<K: PreferenceKey>(&self) -> K::Value {
        self.values
            .get(&TypeId::of::<K>())
            .and_then(|value| value.downcast_ref::<K::Value>())
            .cloned()
            .unwrap_or_else(K::default_value)
    }

    /// Whether anything was emitted on channel `K`
    pub fn contains<K: PreferenceKey>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<K>())
    }

    /// Whether nothing was emitted at all
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for PreferenceValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreferenceValues")
            .field("channels", &self.values.len())
            .finish()
    }
}

// =============================================================================
// Tagged Content
// =============================================================================

/// View content carrying an identity tag
///
/// Equality is by tag, so the chrome can tell a re-render of the same
/// declaration apart from a different declaration.
#[derive(Clone)]
pub struct TaggedView {
    id: Uuid,
    view: Arc<dyn View>,
}

impl TaggedView {
    /// Tag `view` with a fresh identity
    pub fn new(view: impl View) -> Self {
        Self {
            id: Uuid::new_v4(),
            view: Arc::new(view),
        }
    }

    /// Empty content; every empty value shares the nil identity
    pub fn empty() -> Self {
        Self {
            id: Uuid::nil(),
            view: Arc::new(EmptyView),
        }
    }

    /// The identity tag
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Whether this is the empty content
    pub fn is_empty(&self) -> bool {
        self.id.is_nil()
    }

    /// The tagged view
    pub fn view(&self) -> &dyn View {
        self.view.as_ref()
    }
}

impl PartialEq for TaggedView {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TaggedView {}

impl fmt::Debug for TaggedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TaggedView").field(&self.id).finish()
    }
}

/// Content shown behind the navigation bar
pub type BackgroundContent = TaggedView;

/// Leading and trailing bar items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarItems {
    /// Items on the leading edge of the title
    pub leading: TaggedView,
    /// Items on the trailing edge of the title
    pub trailing: TaggedView,
}

impl Default for BarItems {
    fn default() -> Self {
        Self {
            leading: TaggedView::empty(),
            trailing: TaggedView::empty(),
        }
    }
}

impl BarItems {
    /// Items on both edges
    pub fn new(leading: impl View, trailing: impl View) -> Self {
        Self {
            leading: TaggedView::new(leading),
            trailing: TaggedView::new(trailing),
        }
    }

    /// Items on the leading edge only
    pub fn leading(leading: impl View) -> Self {
        Self {
            leading: TaggedView::new(leading),
            trailing: TaggedView::empty(),
        }
    }

    /// Items on the trailing edge only
    pub fn trailing(trailing: impl View) -> Self {
        Self {
            leading: TaggedView::empty(),
            trailing: TaggedView::new(trailing),
        }
    }
}

// =============================================================================
// Channels
// =============================================================================

/// Navigation bar title
#[derive(Debug)]
pub enum TitleKey {}

impl PreferenceKey for TitleKey {
    type Value = String;

    fn default_value() -> String {
        String::new()
    }
}

/// Leading and trailing bar items
#[derive(Debug)]
pub enum BarItemsKey {}

impl PreferenceKey for BarItemsKey {
    type Value = BarItems;

    fn default_value() -> BarItems {
        BarItems::default()
    }
}

/// Navigation bar background
#[derive(Debug)]
pub enum BackgroundKey {}

impl PreferenceKey for BackgroundKey {
    type Value = BackgroundContent;

    fn default_value() -> BackgroundContent {
        TaggedView::empty()
    }
}

/// Navigation bar tint
///
/// `None` means "keep the previous tint": the newest non-nil emission wins,
/// and a pass without any emission leaves the host's tint alone.
#[derive(Debug)]
pub enum TintColorKey {}

impl PreferenceKey for TintColorKey {
    type Value = Option<Color>;

    fn default_value() -> Option<Color> {
        None
    }

    fn reduce(value: &mut Option<Color>, next: Option<Color>) {
        if next.is_some() {
            *value = next;
        }
    }
}

// =============================================================================
// Modifiers
// =============================================================================

/// Content that emits a preference value before rendering
pub struct WithPreference<V, K: PreferenceKey> {
    content: V,
    value: K::Value,
    _key: PhantomData<fn() -> K>,
}

impl<V, K: PreferenceKey> WithPreference<V, K> {
    /// Wrap `content`, emitting `value` on channel `K`
    pub fn new(content: V, value: K::Value) -> Self {
        Self {
            content,
            value,
            _key: PhantomData,
        }
    }
}

impl<V: View, K: PreferenceKey> View for WithPreference<V, K> {
    fn render(&self, cx: &mut RenderContext<'_>) {
        cx.emit::<K>(self.value.clone());
        cx.render(&self.content);
    }
}

/// Navigation bar modifiers available on every view
///
/// They only take effect inside a navigation host, while the view is part
/// of the visible page.
pub trait NavigationBarExt: View + Sized {
    /// Set the navigation bar title
    fn navigation_bar_title(self, title: impl Into<String>) -> WithPreference<Self, TitleKey> {
        WithPreference::new(self, title.into())
    }

    /// Set the leading and trailing bar items
    fn navigation_bar_items(
        self,
        leading: impl View,
        trailing: impl View,
    ) -> WithPreference<Self, BarItemsKey> {
        WithPreference::new(self, BarItems::new(leading, trailing))
    }

    /// Set the leading bar items
    fn navigation_bar_leading(self, leading: impl View) -> WithPreference<Self, BarItemsKey> {
        WithPreference::new(self, BarItems::leading(leading))
    }

    /// Set the trailing bar items
    fn navigation_bar_trailing(self, trailing: impl View) -> WithPreference<Self, BarItemsKey> {
        WithPreference::new(self, BarItems::trailing(trailing))
    }

    /// Set the content drawn behind the bar
    fn navigation_bar_background(self, background: impl View) -> WithPreference<Self, BackgroundKey> {
        WithPreference::new(self, TaggedView::new(background))
    }

    /// Set the bar tint
    fn navigation_bar_tint_color(self, color: Color) -> WithPreference<Self, TintColorKey> {
        WithPreference::new(self, Some(color))
    }
}

impl<V: View> NavigationBarExt for V {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{view_fn, Environment, Group, Text};

    fn collect(view: &dyn View) -> PreferenceValues {
        let mut preferences = PreferenceValues::new();
        let mut cx = RenderContext::new(Environment::new(), &mut preferences);
        cx.render(view);
        preferences
    }

    #[test]
    fn test_defaults_when_nothing_emitted() {
        let preferences = collect(&Text::new("plain"));
        assert!(preferences.is_empty());
        assert_eq!(preferences.get::<TitleKey>(), "");
        assert_eq!(preferences.get::<BarItemsKey>(), BarItems::default());
        assert!(preferences.get::<BackgroundKey>().is_empty());
        assert_eq!(preferences.get::<TintColorKey>(), None);
    }

    #[test]
    fn test_later_sibling_wins() {
        let view = Group::new()
            .child(Text::new("a").navigation_bar_title("First"))
            .child(Text::new("b").navigation_bar_title("Second"));

        for _ in 0..3 {
            assert_eq!(collect(&view).get::<TitleKey>(), "Second");
        }
    }

    #[test]
    fn test_descendant_overrides_ancestor() {
        let view = Group::new()
            .child(Text::new("deep").navigation_bar_title("Inner"))
            .navigation_bar_title("Outer");
        assert_eq!(collect(&view).get::<TitleKey>(), "Inner");
    }

    #[test]
    fn test_tint_keeps_newest_non_nil() {
        let red = Color::rgb(255, 0, 0);
        let view = Group::new()
            .child(Text::new("a").navigation_bar_tint_color(red))
            .child(view_fn(|cx| cx.emit::<TintColorKey>(None)));

        let preferences = collect(&view);
        assert!(preferences.contains::<TintColorKey>());
        assert_eq!(preferences.get::<TintColorKey>(), Some(red));
    }

    #[test]
    fn test_bar_items_identity() {
        let view = Text::new("page").navigation_bar_trailing(Text::new("Edit"));
        let first = collect(&view).get::<BarItemsKey>();
        let second = collect(&view).get::<BarItemsKey>();
        assert_eq!(first, second);
        assert!(first.leading.is_empty());
        assert!(!first.trailing.is_empty());

        let other = Text::new("page").navigation_bar_trailing(Text::new("Edit"));
        assert_ne!(collect(&other).get::<BarItemsKey>(), first);
    }

    #[test]
    fn test_background_identity() {
        let view = Text::new("page").navigation_bar_background(Text::new("stripes"));
        let background = collect(&view).get::<BackgroundKey>();
        assert!(!background.is_empty());
        assert_eq!(collect(&view).get::<BackgroundKey>(), background);
        assert_eq!(TaggedView::empty(), TaggedView::empty());
    }
}
