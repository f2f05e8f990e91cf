//! Presentation host
//!
//! A [`NavigationHost`] renders the root content or the top of its page
//! stack inside navigation chrome, and picks the transition for the change
//! from the direction of the latest navigation.
//!
//! ```rust
//! use morph_ui::config::NavigationConfig;
//! use morph_ui::host::{Edge, NavigationHost};
//! use morph_ui::preferences::NavigationBarExt;
//! use morph_ui::view::{Environment, Text, ViewExt};
//!
//! let host = NavigationHost::new(
//!     Text::new("Home").navigation_bar_title("Home"),
//!     NavigationConfig::default(),
//! );
//! let env = Environment::new();
//!
//! let composite = host.render(&env);
//! assert_eq!(composite.chrome.title, "Home");
//! assert!(composite.chrome.back_button.is_none());
//!
//! host.controller().push(Text::new("Detail").boxed(), None);
//! let composite = host.render(&env);
//! assert_eq!(composite.transition.insertion, Edge::Trailing);
//! assert_eq!(composite.chrome.back_button.unwrap().label, "Home");
//! ```

use crate::config::NavigationConfig;
use crate::metadata::{BarMetadata, MetadataAggregator, TitleHistory};
use crate::preferences::PreferenceValues;
use crate::theme::Color;
use crate::tokens;
use crate::view::{
    render_detached, Action, BoxedView, Element, Environment, Navigator, RenderContext, View,
};
use morph_state::{NavigationDirection, PageId, PopDestination};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

// =============================================================================
// Transitions
// =============================================================================

/// Horizontal screen edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    /// Leading edge (left in left-to-right layouts)
    Leading,
    /// Trailing edge (right in left-to-right layouts)
    Trailing,
}

/// Asymmetric move transition of the page content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition {
    /// Edge the incoming content enters from
    pub insertion: Edge,
    /// Edge the outgoing content leaves toward
    pub removal: Edge,
}

impl Transition {
    /// Enter from trailing, exit toward leading
    pub const PUSH: Transition = Transition {
        insertion: Edge::Trailing,
        removal: Edge::Leading,
    };

    /// Enter from leading, exit toward trailing
    pub const POP: Transition = Transition {
        insertion: Edge::Leading,
        removal: Edge::Trailing,
    };

    /// Transition for a navigation direction
    pub fn for_direction(direction: NavigationDirection) -> Self {
        match direction {
            NavigationDirection::Push => Self::PUSH,
            NavigationDirection::Pop => Self::POP,
        }
    }
}

/// Animation the host toolkit should run for this render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationSpec {
    /// Direction of the animated change
    pub direction: NavigationDirection,
    /// Duration in milliseconds
    pub duration_ms: u32,
    /// Easing curve
    pub easing: String,
}

// =============================================================================
// Chrome
// =============================================================================

/// Back button shown while a pop is possible
#[derive(Debug, Clone)]
pub struct BackButton {
    /// Previous title or the configured fallback
    pub label: String,
    /// Pops to the previous page
    pub action: Action,
}

/// Navigation bar around the page content
#[derive(Debug, Clone)]
pub struct Chrome {
    /// Centered title
    pub title: String,
    /// Back button, present iff a pop is possible
    pub back_button: Option<BackButton>,
    /// Rendered leading items
    pub leading: Vec<Element>,
    /// Rendered trailing items
    pub trailing: Vec<Element>,
    /// Rendered background content
    pub background: Vec<Element>,
    /// Bar tint
    pub tint: Color,
    /// Bar height
    pub bar_height: f32,
    /// Inset before the leading items
    pub leading_padding: f32,
    /// Inset after the trailing items
    pub trailing_padding: f32,
}

/// Output of one host render
#[derive(Debug, Clone)]
pub struct Composite {
    /// Identity of the shown content: the page id, or `root`
    pub content_id: PageId,
    /// Rendered page content
    pub content: Vec<Element>,
    /// Navigation bar
    pub chrome: Chrome,
    /// Content transition
    pub transition: Transition,
    /// Animation to run, if this render follows a navigation
    pub animation: Option<AnimationSpec>,
}

// =============================================================================
// Styles
// =============================================================================

/// Everything a style needs to lay out the chrome
pub struct Configuration<'a> {
    /// Live bar metadata
    pub metadata: &'a BarMetadata,
    /// Title of the level below, if it had one
    pub previous_title: Option<&'a str>,
    /// Whether a pop is possible
    pub can_pop_up: bool,
    /// Host configuration
    pub config: &'a NavigationConfig,
    /// Environment the content was rendered in
    pub environment: &'a Environment,
    /// Controller of this host
    pub navigator: &'a Navigator,
}

impl Configuration<'_> {
    /// Back button for this configuration, if a pop is possible
    pub fn back_button(&self) -> Option<BackButton> {
        if !self.can_pop_up {
            return None;
        }
        let label = self
            .previous_title
            .unwrap_or(&self.config.back_label)
            .to_string();
        let navigator = self.navigator.clone();
        let action = Action::new(move || {
            if navigator.can_pop_up() {
                navigator.pop(PopDestination::Previous);
            }
        });
        Some(BackButton { label, action })
    }
}

/// Lays out the navigation chrome
pub trait NavigationViewStyle: Send + Sync {
    /// Build the chrome for `configuration`
    fn make_chrome(&self, configuration: &Configuration<'_>) -> Chrome;
}

/// Glossy bar with a pointed back button
#[derive(Debug, Clone, Copy, Default)]
pub struct SkeuomorphStyle;

impl NavigationViewStyle for SkeuomorphStyle {
    fn make_chrome(&self, configuration: &Configuration<'_>) -> Chrome {
        let env = configuration.environment;
        let metadata = configuration.metadata;
        let back_button = configuration.back_button();
        let leading_padding = if back_button.is_some() {
            tokens::bar::LEADING_PADDING_WITH_BACK
        } else {
            tokens::bar::LEADING_PADDING
        };

        Chrome {
            title: metadata.title.clone(),
            back_button,
            leading: render_detached(metadata.items.leading.view(), env),
            trailing: render_detached(metadata.items.trailing.view(), env),
            background: render_detached(metadata.background.view(), env),
            tint: metadata.tint,
            bar_height: configuration.config.bar_height(env.size_class()),
            leading_padding,
            trailing_padding: tokens::bar::TRAILING_PADDING,
        }
    }
}

// =============================================================================
// Host
// =============================================================================

/// Navigation scope rendering a root view and a stack of pages
///
/// The host owns its controller and the live [`BarMetadata`]. Nested hosts
/// are independent scopes: each installs its own controller for the content
/// it renders.
pub struct NavigationHost {
    root: BoxedView,
    controller: Navigator,
    bar: Mutex<BarState>,
    style: Box<dyn NavigationViewStyle>,
    config: NavigationConfig,
}

#[derive(Debug)]
struct BarState {
    aggregator: MetadataAggregator,
    metadata: BarMetadata,
}

impl NavigationHost {
    /// Create a host showing `root`, with the default style
    pub fn new(root: impl View, config: NavigationConfig) -> Self {
        Self {
            root: Box::new(root),
            controller: Navigator::new(),
            bar: Mutex::new(BarState {
                aggregator: MetadataAggregator::new(),
                metadata: BarMetadata::new(config.default_tint),
            }),
            style: Box::new(SkeuomorphStyle),
            config,
        }
    }

    /// Replace the chrome style
    pub fn with_style(mut self, style: impl NavigationViewStyle + 'static) -> Self {
        self.style = Box::new(style);
        self
    }

    /// Controller of this scope
    pub fn controller(&self) -> &Navigator {
        &self.controller
    }

    /// Live bar metadata
    pub fn metadata(&self) -> BarMetadata {
        self.bar.lock().metadata.clone()
    }

    /// Titles of the covered levels
    pub fn title_history(&self) -> TitleHistory {
        self.bar.lock().aggregator.history().clone()
    }

    /// Host configuration
    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    /// Render the visible content and its chrome
    ///
    /// The content sees `env` with this host's controller installed. Its
    /// preference emissions are folded into the bar metadata before the
    /// chrome is built, so the chrome always describes the content it
    /// surrounds.
    pub fn render(&self, env: &Environment) -> Composite {
        let navigation = self.controller.settle();
        let animation = self
            .controller
            .take_animation()
            .filter(|_| self.config.animated)
            .map(|intent| AnimationSpec {
                direction: intent.direction,
                duration_ms: self.config.animation_duration_ms,
                easing: self.config.easing.clone(),
            });

        let scoped = env.clone().with_navigation(self.controller.clone());
        let mut preferences = PreferenceValues::new();
        let root = &self.root;
        let (content_id, content) = self.controller.with_current_page(|page| {
            let mut cx = RenderContext::new(scoped.clone(), &mut preferences);
            let content_id = match page {
                Some(page) => {
                    cx.render(page.body().as_ref());
                    page.id().clone()
                }
                None => {
                    cx.render(root.as_ref());
                    PageId::root()
                }
            };
            (content_id, cx.finish())
        });

        let mut bar = self.bar.lock();
        let BarState {
            aggregator,
            metadata,
        } = &mut *bar;
        aggregator.commit(metadata, &preferences, &navigation);

        let configuration = Configuration {
            metadata,
            previous_title: aggregator.previous_title(),
            can_pop_up: navigation.can_pop_up(),
            config: &self.config,
            environment: &scoped,
            navigator: &self.controller,
        };
        let chrome = self.style.make_chrome(&configuration);

        tracing::trace!(
            content = %content_id,
            title = %chrome.title,
            direction = ?navigation.direction,
            animated = animation.is_some(),
            "Rendered navigation host"
        );

        Composite {
            content_id,
            content,
            chrome,
            transition: Transition::for_direction(navigation.direction),
            animation,
        }
    }
}

impl Composite {
    /// Flatten chrome and content into one element list
    ///
    /// Order is title, back button, leading items, trailing items, then the
    /// page content. The background is left out.
    pub fn into_elements(self) -> Vec<Element> {
        let Composite { content, chrome, .. } = self;
        let mut elements = vec![Element::Text(chrome.title)];
        if let Some(back) = chrome.back_button {
            elements.push(Element::Button {
                label: back.label,
                action: back.action,
            });
        }
        elements.extend(chrome.leading);
        elements.extend(chrome.trailing);
        elements.extend(content);
        elements
    }
}

impl View for NavigationHost {
    /// Render as a nested navigation scope
    ///
    /// The nested host runs its own full pass: its content's preferences
    /// land in its own bar and never reach the enclosing host.
    fn render(&self, cx: &mut RenderContext<'_>) {
        let composite = NavigationHost::render(self, cx.environment());
        cx.push(Element::Tagged {
            id: composite.content_id.to_string(),
            children: composite.into_elements(),
        });
    }
}

impl std::fmt::Debug for NavigationHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationHost")
            .field("controller", &self.controller)
            .field("bar", &*self.bar.lock())
            .finish_non_exhaustive()
    }
}
