//! Navigation view for Skeuomorph
//!
//! This crate renders a [`morph_state::NavigationController`] stack inside
//! skeuomorphic navigation chrome, collecting bar metadata that pages
//! declare while they render.
//!
//! # Modules
//!
//! - [`view`] - Minimal view tree: views, elements, environment, render passes
//! - [`preferences`] - Preference channels and the navigation bar modifiers
//! - [`metadata`] - Bar metadata and title history aggregation
//! - [`host`] - The presentation host, chrome styles and transitions
//! - [`trigger`] - Navigation triggers and the native link fallback
//! - [`config`] - Host configuration
//! - [`theme`] - Colors
//! - [`tokens`] - Design tokens (bar metrics, durations, easing)
//!
//! # Example
//!
//! ```rust
//! use morph_ui::{Environment, NavigationBarExt, NavigationConfig, NavigationHost};
//! use morph_ui::{find_action, NavigationTrigger, Text};
//!
//! let root = NavigationTrigger::new("Open", || Text::new("Opened").navigation_bar_title("Detail"));
//! let host = NavigationHost::new(root.navigation_bar_title("Home"), NavigationConfig::default());
//! let env = Environment::new();
//!
//! let composite = host.render(&env);
//! find_action(&composite.content, "Open").unwrap().invoke();
//! env.dispatcher().run_pending();
//!
//! let composite = host.render(&env);
//! assert_eq!(composite.chrome.title, "Detail");
//! assert_eq!(composite.chrome.back_button.unwrap().label, "Home");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod host;
pub mod metadata;
pub mod preferences;
pub mod theme;
pub mod tokens;
pub mod trigger;
pub mod view;

// Re-export commonly used types
pub use config::{ConfigError, NavigationConfig};
pub use host::{
    AnimationSpec, BackButton, Chrome, Composite, Configuration, Edge, NavigationHost,
    NavigationViewStyle, SkeuomorphStyle, Transition,
};
pub use metadata::{BarMetadata, MetadataAggregator, TitleHistory};
pub use preferences::{
    BackgroundContent, BackgroundKey, BarItems, BarItemsKey, NavigationBarExt, PreferenceKey,
    PreferenceValues, TaggedView, TintColorKey, TitleKey, WithPreference,
};
pub use theme::Color;
pub use trigger::{ActiveBinding, NativeLinkPresenter, NavigationTrigger};
pub use view::{
    find_action, labels, render_detached, view_fn, Action, BoxedView, Button, Element, EmptyView,
    Environment, Group, Navigator, RenderContext, SizeClass, Text, View, ViewExt,
};
