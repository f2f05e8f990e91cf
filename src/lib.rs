//! Skeuomorph navigation
//!
//! A custom navigation view with a skeuomorphic navigation bar. Pages are
//! kept on an explicit stack, navigated with [`NavigationTrigger`]s or a
//! [`Navigator`] taken from the render environment, and declare their bar
//! title, items, background and tint through preference modifiers.
//!
//! This crate re-exports [`morph_state`] (the stack, controller and
//! dispatcher) and [`morph_ui`] (views, preferences and the host).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use morph_state;
pub use morph_ui;

pub use morph_state::{
    Dispatcher, NavigationController, NavigationDirection, NavigationError, NavigationEvent,
    NavigationSnapshot, Page, PageId, PopDestination, Stack,
};
pub use morph_ui::{
    ActiveBinding, BarMetadata, Color, Composite, Environment, NavigationBarExt, NavigationConfig,
    NavigationHost, NavigationTrigger, NavigationViewStyle, Navigator, Transition, View, ViewExt,
};
