//! Declarative view model
//!
//! Views render into a flat list of [`Element`]s. While rendering, a view can
//! read the ambient [`Environment`] and emit preference values that an
//! ancestor collects once the pass is complete (see
//! [`preferences`](crate::preferences)).

use crate::preferences::{PreferenceKey, PreferenceValues};
use crate::trigger::NativeLinkPresenter;
use morph_state::{Dispatcher, NavigationController};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Renderable content
pub trait View: Send + Sync + 'static {
    /// Render into `cx`
    fn render(&self, cx: &mut RenderContext<'_>);
}

/// Type-erased view owned by a single page
pub type BoxedView = Box<dyn View>;

/// Navigation controller whose pages hold views
pub type Navigator = NavigationController<BoxedView>;

// =============================================================================
// Elements
// =============================================================================

/// Callback attached to an interactive element
#[derive(Clone)]
pub struct Action(Arc<dyn Fn() + Send + Sync>);

impl Action {
    /// Wrap a callback
    pub fn new(f: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Run the callback
    pub fn invoke(&self) {
        (self.0)()
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action")
    }
}

/// One piece of rendered output
#[derive(Debug, Clone)]
pub enum Element {
    /// Static text
    Text(String),
    /// Tappable button
    Button {
        /// Button label
        label: String,
        /// Tap handler
        action: Action,
    },
    /// Link handled by the host toolkit's own navigation
    Link {
        /// Link label
        label: String,
        /// Activation handler
        action: Action,
    },
    /// Identity-tagged subtree
    Tagged {
        /// Identity of the subtree
        id: String,
        /// Rendered children
        children: Vec<Element>,
    },
}

impl Element {
    /// Label of a text, button or link element
    pub fn label(&self) -> Option<&str> {
        match self {
            Element::Text(text) => Some(text.as_str()),
            Element::Button { label, .. } | Element::Link { label, .. } => Some(label.as_str()),
            Element::Tagged { .. } => None,
        }
    }
}

/// Find the action of the first button or link labeled `label`
pub fn find_action<'a>(elements: &'a [Element], label: &str) -> Option<&'a Action> {
    elements.iter().find_map(|element| match element {
        Element::Button { label: l, action } | Element::Link { label: l, action } if l == label => {
            Some(action)
        }
        Element::Tagged { children, .. } => find_action(children, label),
        _ => None,
    })
}

/// All labels in render order, flattening tagged subtrees
pub fn labels(elements: &[Element]) -> Vec<&str> {
    let mut out = Vec::new();
    for element in elements {
        match element {
            Element::Tagged { children, .. } => out.extend(labels(children)),
            other => out.extend(other.label()),
        }
    }
    out
}

// =============================================================================
// Environment
// =============================================================================

/// Vertical size class of the hosting window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    /// Regular height (portrait phones, tablets)
    #[default]
    Regular,
    /// Compact height (landscape phones)
    Compact,
}

/// Ambient values visible to every view in a subtree
///
/// A navigation host installs its controller here for the content it
/// renders; views outside any host see `None`.
#[derive(Clone, Default)]
pub struct Environment {
    navigation: Option<Navigator>,
    dispatcher: Dispatcher,
    native_links: Option<Arc<dyn NativeLinkPresenter>>,
    size_class: SizeClass,
}

impl Environment {
    /// Environment with a fresh dispatcher and no controller
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a navigation controller
    pub fn with_navigation(mut self, navigation: Navigator) -> Self {
        self.navigation = Some(navigation);
        self
    }

    /// Use `dispatcher` for deferred work
    pub fn with_dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// Install the toolkit's native link handler
    pub fn with_native_links(mut self, presenter: Arc<dyn NativeLinkPresenter>) -> Self {
        self.native_links = Some(presenter);
        self
    }

    /// Set the vertical size class
    pub fn with_size_class(mut self, size_class: SizeClass) -> Self {
        self.size_class = size_class;
        self
    }

    /// Controller of the enclosing navigation scope, if any
    pub fn navigation(&self) -> Option<&Navigator> {
        self.navigation.as_ref()
    }

    /// Queue for deferred work
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Native link handler, if any
    pub fn native_links(&self) -> Option<&Arc<dyn NativeLinkPresenter>> {
        self.native_links.as_ref()
    }

    /// Vertical size class
    pub fn size_class(&self) -> SizeClass {
        self.size_class
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("navigation", &self.navigation.is_some())
            .field("native_links", &self.native_links.is_some())
            .field("size_class", &self.size_class)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Render Pass
// =============================================================================

/// State of one render pass over a subtree
pub struct RenderContext<'a> {
    env: Environment,
    preferences: &'a mut PreferenceValues,
    elements: Vec<Element>,
}

impl<'a> RenderContext<'a> {
    /// Start rendering under `env`, collecting into `preferences`
    pub fn new(env: Environment, preferences: &'a mut PreferenceValues) -> Self {
        Self {
            env,
            preferences,
            elements: Vec::new(),
        }
    }

    /// The ambient environment
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Emit a preference value for an ancestor to collect
    pub fn emit<K: PreferenceKey>(&mut self, value: K::Value) {
        self.preferences.emit::<K>(value);
    }

    /// Append an element
    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Append a text element
    pub fn text(&mut self, text: impl Into<String>) {
        self.push(Element::Text(text.into()));
    }

    /// Render a child view in place
    pub fn render(&mut self, view: &dyn View) {
        view.render(self);
    }

    /// Render a child view under a different environment
    pub fn render_with(&mut self, env: Environment, view: &dyn View) {
        let mut child = RenderContext::new(env, &mut *self.preferences);
        view.render(&mut child);
        let elements = child.finish();
        self.elements.extend(elements);
    }

    /// Render a child view as an identity-tagged subtree
    pub fn render_tagged(&mut self, id: impl Into<String>, view: &dyn View) {
        let mut child = RenderContext::new(self.env.clone(), &mut *self.preferences);
        view.render(&mut child);
        let children = child.finish();
        self.push(Element::Tagged {
            id: id.into(),
            children,
        });
    }

    /// Finish the pass, returning the rendered elements
    pub fn finish(self) -> Vec<Element> {
        self.elements
    }
}

/// Render `view` on its own, discarding its preference emissions
pub fn render_detached(view: &dyn View, env: &Environment) -> Vec<Element> {
    let mut preferences = PreferenceValues::new();
    let mut cx = RenderContext::new(env.clone(), &mut preferences);
    view.render(&mut cx);
    cx.finish()
}

// =============================================================================
// Basic Views
// =============================================================================

/// Renders nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyView;

impl View for EmptyView {
    fn render(&self, _cx: &mut RenderContext<'_>) {}
}

/// Static text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text(pub String);

impl Text {
    /// Create a text view
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }
}

impl View for Text {
    fn render(&self, cx: &mut RenderContext<'_>) {
        cx.text(self.0.clone());
    }
}

/// Tappable button
#[derive(Debug, Clone)]
pub struct Button {
    label: String,
    action: Action,
}

impl Button {
    /// Create a button running `action` when tapped
    pub fn new(label: impl Into<String>, action: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            label: label.into(),
            action: Action::new(action),
        }
    }
}

impl View for Button {
    fn render(&self, cx: &mut RenderContext<'_>) {
        cx.push(Element::Button {
            label: self.label.clone(),
            action: self.action.clone(),
        });
    }
}

/// Children rendered in order
#[derive(Default)]
pub struct Group(Vec<BoxedView>);

impl Group {
    /// Create an empty group
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a child
    pub fn child(mut self, view: impl View) -> Self {
        self.0.push(Box::new(view));
        self
    }
}

impl View for Group {
    fn render(&self, cx: &mut RenderContext<'_>) {
        for child in &self.0 {
            cx.render(child.as_ref());
        }
    }
}

/// View backed by a render closure
pub struct ViewFn<F>(F);

/// Build a view from a render closure
pub fn view_fn<F>(f: F) -> ViewFn<F>
where
    F: Fn(&mut RenderContext<'_>) + Send + Sync + 'static,
{
    ViewFn(f)
}

impl<F> View for ViewFn<F>
where
    F: Fn(&mut RenderContext<'_>) + Send + Sync + 'static,
{
    fn render(&self, cx: &mut RenderContext<'_>) {
        (self.0)(cx)
    }
}

/// Conversions available on every view
pub trait ViewExt: View + Sized {
    /// Erase the view type
    fn boxed(self) -> BoxedView {
        Box::new(self)
    }
}

impl<V: View> ViewExt for V {}
