//! Navigation controller
//!
//! The controller orchestrates stack mutations: it records the navigation
//! direction and an animation intent for the next render, and publishes the
//! current page to observers.
//!
//! # State machine
//!
//! ```text
//!            push                 push
//!   Root ──────────► Viewing(p) ──────────► Viewing(q)
//!    ▲                  │  ▲                  │
//!    └──── pop(root) ───┘  └────── pop ───────┘
//! ```
//!
//! There is no terminal state; a controller lives as long as its
//! navigation scope.

use crate::error::{NavigationError, Result};
use crate::page::{Page, PageId};
use crate::stack::Stack;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};

/// Direction of the most recent navigation
///
/// Selects the transition of the next render. It is not retained per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NavigationDirection {
    /// Forward navigation (a page was pushed)
    #[default]
    Push,
    /// Backward navigation (one or more pages were popped)
    Pop,
}

/// Where a pop navigates to
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "to", content = "id", rename_all = "lowercase")]
pub enum PopDestination {
    /// The page below the current one
    #[default]
    Previous,
    /// The root content
    Root,
    /// The page with this id, which becomes the top
    Page(PageId),
}

/// Request that the next render animates its change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationIntent {
    /// Direction of the change
    pub direction: NavigationDirection,
    /// Generation of the mutation that recorded this intent
    pub generation: u64,
}

/// Events broadcast after each successful mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    /// A page was pushed
    Pushed {
        /// The new top page
        id: PageId,
        /// Stack depth after the push
        depth: usize,
    },
    /// Pages were popped
    Popped {
        /// The requested destination
        destination: PopDestination,
        /// Removed page ids, oldest first
        removed: Vec<PageId>,
        /// Stack depth after the pop
        depth: usize,
    },
}

/// Consistent view of the controller state, read under one lock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationSnapshot {
    /// Direction of the most recent mutation
    pub direction: NavigationDirection,
    /// Number of pages above the root
    pub depth: usize,
    /// Mutation counter
    pub generation: u64,
    /// Top page id, `None` when the root is showing
    pub current: Option<PageId>,
    /// Lowest depth reached since the last settled snapshot
    ///
    /// Levels at or below the floor survived every mutation in between;
    /// levels above it may hold pages that were never shown.
    pub floor: usize,
}

impl NavigationSnapshot {
    /// Whether a back navigation is possible
    pub fn can_pop_up(&self) -> bool {
        self.depth > 0
    }
}

struct ControllerState<B> {
    stack: Stack<B>,
    direction: NavigationDirection,
    generation: u64,
    pending_animation: Option<AnimationIntent>,
    floor: usize,
}

impl<B> ControllerState<B> {
    fn record(&mut self, direction: NavigationDirection) {
        self.direction = direction;
        self.generation += 1;
        self.floor = self.floor.min(self.stack.len());
        self.pending_animation = Some(AnimationIntent {
            direction,
            generation: self.generation,
        });
    }

    fn snapshot(&self) -> NavigationSnapshot {
        NavigationSnapshot {
            direction: self.direction,
            depth: self.stack.len(),
            generation: self.generation,
            current: self.stack.peek().map(|page| page.id().clone()),
            floor: self.floor,
        }
    }
}

/// Observable owner of a navigation stack
///
/// Cloning yields another handle to the same navigation scope; this is how
/// triggers deep inside a page reach the controller of their enclosing host.
///
/// # Example
///
/// ```rust
/// use morph_state::{NavigationController, NavigationDirection, PageId, PopDestination};
///
/// let controller: NavigationController<&'static str> = NavigationController::new();
/// assert!(!controller.can_pop_up());
///
/// controller.push("settings", Some(PageId::new("settings")));
/// controller.push("about", None);
/// assert_eq!(controller.depth(), 2);
///
/// controller.pop(PopDestination::Page(PageId::new("settings")));
/// assert_eq!(controller.current_page_id(), Some(PageId::new("settings")));
/// assert_eq!(controller.direction(), NavigationDirection::Pop);
/// ```
pub struct NavigationController<B> {
    state: Arc<RwLock<ControllerState<B>>>,
    current_tx: Arc<watch::Sender<Option<PageId>>>,
    events_tx: broadcast::Sender<NavigationEvent>,
}

impl<B> Clone for NavigationController<B> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            current_tx: self.current_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

impl<B> Default for NavigationController<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> NavigationController<B> {
    /// Create a controller showing the root
    pub fn new() -> Self {
        let (current_tx, _) = watch::channel(None);
        let (events_tx, _) = broadcast::channel(16);

        Self {
            state: Arc::new(RwLock::new(ControllerState {
                stack: Stack::new(),
                direction: NavigationDirection::default(),
                generation: 0,
                pending_animation: None,
                floor: 0,
            })),
            current_tx: Arc::new(current_tx),
            events_tx,
        }
    }

    /// Push `content` as a new page, generating an id if none is given
    ///
    /// # Panics
    ///
    /// Panics if a page with the given id is already on the stack.
    pub fn push(&self, content: B, id: Option<PageId>) -> PageId {
        self.try_push(content, id).unwrap_or_else(|err| fatal(err))
    }

    /// Push `content`, returning the invariant violation instead of panicking
    ///
    /// On error nothing changes: direction, generation and observers are
    /// untouched.
    pub fn try_push(&self, content: B, id: Option<PageId>) -> Result<PageId> {
        let id = id.unwrap_or_else(PageId::generate);
        let depth = {
            let mut state = self.state.write();
            state.stack.push(Page::new(id.clone(), content))?;
            state.record(NavigationDirection::Push);
            state.stack.len()
        };

        tracing::debug!(page = %id, depth, "Pushed navigation page");
        self.publish(Some(id.clone()));
        let _ = self.events_tx.send(NavigationEvent::Pushed {
            id: id.clone(),
            depth,
        });
        Ok(id)
    }

    /// Pop to `destination`
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty or `destination` names a page that is
    /// not on the stack. Check [`can_pop_up`](Self::can_pop_up) first.
    pub fn pop(&self, destination: PopDestination) -> Vec<PageId> {
        self.try_pop(destination).unwrap_or_else(|err| fatal(err))
    }

    /// Pop to `destination`, returning the invariant violation instead of
    /// panicking
    ///
    /// Returns the ids of the removed pages, oldest first.
    pub fn try_pop(&self, destination: PopDestination) -> Result<Vec<PageId>> {
        let (removed, current, depth) = {
            let mut state = self.state.write();
            let removed = match &destination {
                PopDestination::Previous => vec![state.stack.pop_to_previous()?],
                PopDestination::Root => {
                    if state.stack.is_empty() {
                        return Err(NavigationError::EmptyStack);
                    }
                    state.stack.pop_to_root()
                }
                PopDestination::Page(id) => state.stack.pop_to(id)?,
            };
            state.record(NavigationDirection::Pop);
            let current = state.stack.peek().map(|page| page.id().clone());
            (removed, current, state.stack.len())
        };

        // Popped content is released here, outside the lock.
        let removed: Vec<PageId> = removed.into_iter().map(|page| page.id().clone()).collect();

        tracing::debug!(?destination, removed = removed.len(), depth, "Popped navigation pages");
        self.publish(current);
        let _ = self.events_tx.send(NavigationEvent::Popped {
            destination,
            removed: removed.clone(),
            depth,
        });
        Ok(removed)
    }

    /// Whether a back navigation is possible
    pub fn can_pop_up(&self) -> bool {
        !self.state.read_recursive().stack.is_empty()
    }

    /// Id of the top page; `None` means the root is showing
    pub fn current_page_id(&self) -> Option<PageId> {
        self.state.read_recursive().stack.peek().map(|page| page.id().clone())
    }

    /// Borrow the top page for the duration of `f`
    ///
    /// `f` runs under the state read lock: it must not mutate this
    /// controller. Defer such work through a
    /// [`Dispatcher`](crate::Dispatcher).
    pub fn with_current_page<R>(&self, f: impl FnOnce(Option<&Page<B>>) -> R) -> R {
        let state = self.state.read_recursive();
        f(state.stack.peek())
    }

    /// Direction of the most recent mutation
    pub fn direction(&self) -> NavigationDirection {
        self.state.read_recursive().direction
    }

    /// Number of pages above the root
    pub fn depth(&self) -> usize {
        self.state.read_recursive().stack.len()
    }

    /// Ids of all pages, bottom to top
    pub fn page_ids(&self) -> Vec<PageId> {
        self.state.read_recursive().stack.ids()
    }

    /// Mutation counter, incremented by every successful push or pop
    pub fn generation(&self) -> u64 {
        self.state.read_recursive().generation
    }

    /// Read direction, depth, generation, top page and floor together
    pub fn snapshot(&self) -> NavigationSnapshot {
        self.state.read_recursive().snapshot()
    }

    /// Read a snapshot and raise the floor to the current depth
    ///
    /// Called once per render by the host, so the next snapshot's floor
    /// covers only the mutations made after this render.
    pub fn settle(&self) -> NavigationSnapshot {
        let mut state = self.state.write();
        let snapshot = state.snapshot();
        state.floor = state.stack.len();
        snapshot
    }

    /// Consume the animation intent left by the latest mutation
    pub fn take_animation(&self) -> Option<AnimationIntent> {
        self.state.write().pending_animation.take()
    }

    /// Subscribe to current-page changes
    pub fn subscribe(&self) -> watch::Receiver<Option<PageId>> {
        self.current_tx.subscribe()
    }

    /// Subscribe to navigation events
    pub fn subscribe_events(&self) -> broadcast::Receiver<NavigationEvent> {
        self.events_tx.subscribe()
    }

    fn publish(&self, current: Option<PageId>) {
        self.current_tx.send_if_modified(|value| {
            if *value != current {
                *value = current;
                true
            } else {
                false
            }
        });
    }
}

impl<B> std::fmt::Debug for NavigationController<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationController")
            .field("snapshot", &self.snapshot())
            .finish_non_exhaustive()
    }
}

fn fatal<T>(err: NavigationError) -> T {
    tracing::error!(error = %err, "Navigation invariant violated");
    panic!("{err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> NavigationController<&'static str> {
        NavigationController::new()
    }

    #[test]
    fn test_starts_at_root() {
        let nav = controller();
        assert!(!nav.can_pop_up());
        assert_eq!(nav.current_page_id(), None);
        assert_eq!(nav.direction(), NavigationDirection::Push);
        assert_eq!(nav.generation(), 0);
        assert!(nav.take_animation().is_none());
    }

    #[test]
    fn test_push_generates_ids() {
        let nav = controller();
        let a = nav.push("a", None);
        let b = nav.push("b", None);
        assert_ne!(a, b);
        assert_eq!(nav.page_ids(), vec![a, b.clone()]);
        assert_eq!(nav.current_page_id(), Some(b));
    }

    #[test]
    fn test_push_uses_supplied_id() {
        let nav = controller();
        let id = nav.push("detail", Some(PageId::new("detail")));
        assert_eq!(id.as_str(), "detail");
        nav.with_current_page(|page| {
            let page = page.unwrap();
            assert_eq!(page.id().as_str(), "detail");
            assert_eq!(*page.body(), "detail");
        });
    }

    #[test]
    #[should_panic(expected = "already exists on stack")]
    fn test_duplicate_push_is_fatal() {
        let nav = controller();
        nav.push("a", Some(PageId::new("a")));
        nav.push("again", Some(PageId::new("a")));
    }

    #[test]
    fn test_try_push_duplicate_leaves_state_untouched() {
        let nav = controller();
        nav.push("a", Some(PageId::new("a")));
        nav.pop(PopDestination::Root);
        nav.push("b", Some(PageId::new("b")));
        let before = nav.snapshot();

        let err = nav.try_push("b again", Some(PageId::new("b"))).unwrap_err();
        assert_eq!(err, NavigationError::DuplicatePage(PageId::new("b")));
        assert_eq!(nav.snapshot(), before);
    }

    #[test]
    fn test_direction_follows_last_mutation() {
        let nav = controller();
        nav.push("a", None);
        assert_eq!(nav.direction(), NavigationDirection::Push);
        nav.push("b", None);
        nav.pop(PopDestination::Previous);
        assert_eq!(nav.direction(), NavigationDirection::Pop);
        nav.push("c", None);
        assert_eq!(nav.direction(), NavigationDirection::Push);
        nav.pop(PopDestination::Root);
        assert_eq!(nav.direction(), NavigationDirection::Pop);
    }

    #[test]
    fn test_pop_to_page() {
        let nav = controller();
        nav.push("a", Some(PageId::new("a")));
        nav.push("x", Some(PageId::new("x")));
        nav.push("b", Some(PageId::new("b")));
        nav.push("c", Some(PageId::new("c")));
        nav.push("d", Some(PageId::new("d")));

        let removed = nav.pop(PopDestination::Page(PageId::new("x")));
        assert_eq!(
            removed,
            vec![PageId::new("b"), PageId::new("c"), PageId::new("d")]
        );
        assert_eq!(nav.current_page_id(), Some(PageId::new("x")));
        assert_eq!(nav.depth(), 2);
    }

    #[test]
    #[should_panic(expected = "doesn't exist on stack")]
    fn test_pop_to_unknown_is_fatal() {
        let nav = controller();
        nav.push("a", None);
        nav.pop(PopDestination::Page(PageId::new("nonexistent")));
    }

    #[test]
    #[should_panic(expected = "empty navigation stack")]
    fn test_pop_on_root_is_fatal() {
        let nav = controller();
        nav.pop(PopDestination::Previous);
    }

    #[test]
    fn test_pop_after_pop_to_root() {
        let nav = controller();
        nav.push("a", None);
        nav.push("b", None);
        nav.pop(PopDestination::Root);

        assert!(!nav.can_pop_up());
        assert_eq!(nav.current_page_id(), None);
        assert_eq!(
            nav.try_pop(PopDestination::Previous).unwrap_err(),
            NavigationError::EmptyStack
        );
        assert_eq!(
            nav.try_pop(PopDestination::Root).unwrap_err(),
            NavigationError::EmptyStack
        );
    }

    #[test]
    fn test_animation_intent_is_consumed_once() {
        let nav = controller();
        nav.push("a", None);
        let intent = nav.take_animation().unwrap();
        assert_eq!(intent.direction, NavigationDirection::Push);
        assert_eq!(intent.generation, 1);
        assert!(nav.take_animation().is_none());

        nav.pop(PopDestination::Previous);
        let intent = nav.take_animation().unwrap();
        assert_eq!(intent.direction, NavigationDirection::Pop);
        assert_eq!(intent.generation, 2);
    }

    #[test]
    fn test_clones_share_state() {
        let nav = controller();
        let handle = nav.clone();
        handle.push("a", None);
        assert!(nav.can_pop_up());
    }

    #[test]
    fn test_snapshot() {
        let nav = controller();
        let id = nav.push("a", None);
        let snapshot = nav.snapshot();
        assert_eq!(snapshot.depth, 1);
        assert_eq!(snapshot.current, Some(id));
        assert!(snapshot.can_pop_up());
        assert_eq!(snapshot.generation, 1);
    }

    #[test]
    fn test_floor_tracks_lowest_depth_until_settled() {
        let nav = controller();
        nav.push("a", None);
        nav.push("b", None);
        assert_eq!(nav.settle().floor, 0);
        assert_eq!(nav.snapshot().floor, 2);

        nav.pop(PopDestination::Root);
        nav.push("x", None);
        nav.push("y", None);
        let snapshot = nav.settle();
        assert_eq!(snapshot.depth, 2);
        assert_eq!(snapshot.floor, 0);

        nav.push("z", None);
        assert_eq!(nav.snapshot().floor, 2);
    }

    #[tokio::test]
    async fn test_subscription_tracks_current_page() {
        let nav = controller();
        let mut rx = nav.subscribe();
        assert_eq!(*rx.borrow(), None);

        let id = nav.push("a", None);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), Some(id));

        nav.pop(PopDestination::Previous);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), None);
    }

    #[tokio::test]
    async fn test_pop_to_current_top_does_not_notify() {
        let nav = controller();
        nav.push("a", Some(PageId::new("a")));
        let mut rx = nav.subscribe();
        rx.borrow_and_update();

        nav.pop(PopDestination::Page(PageId::new("a")));
        assert!(!rx.has_changed().unwrap());
        assert_eq!(nav.direction(), NavigationDirection::Pop);
    }

    #[tokio::test]
    async fn test_events() {
        let nav = controller();
        let mut rx = nav.subscribe_events();

        let a = nav.push("a", None);
        let b = nav.push("b", None);
        nav.pop(PopDestination::Root);

        assert_eq!(
            rx.recv().await.unwrap(),
            NavigationEvent::Pushed { id: a.clone(), depth: 1 }
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            NavigationEvent::Pushed { id: b.clone(), depth: 2 }
        );
        match rx.recv().await.unwrap() {
            NavigationEvent::Popped {
                destination,
                removed,
                depth,
            } => {
                assert_eq!(destination, PopDestination::Root);
                assert_eq!(removed, vec![a, b]);
                assert_eq!(depth, 0);
            }
            other => panic!("Expected Popped event, got {other:?}"),
        }
    }
}
