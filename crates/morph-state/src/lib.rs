//! Navigation state for Skeuomorph
//!
//! This crate provides the toolkit-agnostic core of the custom navigation
//! view: an identity-keyed page stack, an observable controller that tracks
//! navigation direction and animation intent, and a single-threaded queue
//! for work that must not run during a render pass.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod controller;
pub mod dispatch;
pub mod error;
pub mod page;
pub mod stack;

pub use controller::{
    AnimationIntent, NavigationController, NavigationDirection, NavigationEvent,
    NavigationSnapshot, PopDestination,
};
pub use dispatch::Dispatcher;
pub use error::{NavigationError, Result};
pub use page::{Page, PageId};
pub use stack::Stack;
