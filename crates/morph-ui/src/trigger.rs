//! Navigation triggers
//!
//! A [`NavigationTrigger`] is one interactive element meaning "go to this
//! destination". Inside a navigation host it pushes onto the host's stack;
//! outside any host it degrades to a link handled by the toolkit's own
//! navigation.

use crate::view::{Action, BoxedView, Element, Environment, Navigator, RenderContext, View};
use morph_state::PageId;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// The host toolkit's native link navigation
///
/// Used by triggers rendered outside any navigation host.
#[cfg_attr(test, mockall::automock)]
pub trait NativeLinkPresenter: Send + Sync {
    /// Present `destination` natively
    fn present(&self, label: &str, destination: BoxedView);
}

/// Shared flag that activates a trigger when set
///
/// Setting the flag from outside makes the trigger navigate on its next
/// render. Inside a host the trigger clears it once the push is queued;
/// outside a host it stays set while the native presentation is shown.
#[derive(Clone)]
pub struct ActiveBinding(Arc<watch::Sender<bool>>);

impl Default for ActiveBinding {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ActiveBinding {
    /// Create a binding with an initial value
    pub fn new(active: bool) -> Self {
        let (tx, _) = watch::channel(active);
        Self(Arc::new(tx))
    }

    /// Current value
    pub fn get(&self) -> bool {
        *self.0.borrow()
    }

    /// Set the value
    pub fn set(&self, active: bool) {
        self.0.send_replace(active);
    }

    /// Subscribe to value changes
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.0.subscribe()
    }
}

impl fmt::Debug for ActiveBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ActiveBinding").field(&self.get()).finish()
    }
}

type Destination = Arc<dyn Fn() -> BoxedView + Send + Sync>;

/// Element that navigates to a destination when activated
///
/// The destination is a factory: every activation builds a fresh page body
/// under a fresh page id.
pub struct NavigationTrigger {
    label: String,
    destination: Destination,
    binding: Option<ActiveBinding>,
    presented: Arc<AtomicBool>,
}

impl NavigationTrigger {
    /// Create a trigger labeled `label`
    pub fn new<V, F>(label: impl Into<String>, destination: F) -> Self
    where
        V: View,
        F: Fn() -> V + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            destination: Arc::new(move || Box::new(destination()) as BoxedView),
            binding: None,
            presented: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a trigger that also navigates when `binding` is set
    pub fn with_binding<V, F>(label: impl Into<String>, destination: F, binding: ActiveBinding) -> Self
    where
        V: View,
        F: Fn() -> V + Send + Sync + 'static,
    {
        Self {
            binding: Some(binding),
            ..Self::new(label, destination)
        }
    }

    /// The trigger label
    pub fn label(&self) -> &str {
        &self.label
    }

    fn native_action(&self, env: &Environment) -> Action {
        let env = env.clone();
        let destination = self.destination.clone();
        let binding = self.binding.clone();
        let presented = self.presented.clone();
        let label = self.label.clone();
        Action::new(move || {
            if let Some(binding) = &binding {
                binding.set(true);
            }
            presented.store(true, Ordering::SeqCst);
            present_natively(&env, &destination, &label);
        })
    }

    /// Present natively when the binding was raised since the last showing
    fn sync_native_binding(&self, env: &Environment) {
        let Some(binding) = &self.binding else {
            return;
        };
        if !binding.get() {
            self.presented.store(false, Ordering::SeqCst);
        } else if !self.presented.swap(true, Ordering::SeqCst) {
            present_natively(env, &self.destination, &self.label);
        }
    }
}

impl View for NavigationTrigger {
    fn render(&self, cx: &mut RenderContext<'_>) {
        let env = cx.environment().clone();
        match env.navigation() {
            Some(navigator) => {
                if let Some(binding) = &self.binding {
                    if binding.get() {
                        binding.set(false);
                        schedule_push(&env, navigator, &self.destination, &self.label);
                    }
                }

                let navigator = navigator.clone();
                let destination = self.destination.clone();
                let label = self.label.clone();
                let tap_env = env.clone();
                cx.push(Element::Button {
                    label: self.label.clone(),
                    action: Action::new(move || {
                        schedule_push(&tap_env, &navigator, &destination, &label)
                    }),
                });
            }
            None => {
                self.sync_native_binding(&env);
                cx.push(Element::Link {
                    label: self.label.clone(),
                    action: self.native_action(&env),
                });
            }
        }
    }
}

impl fmt::Debug for NavigationTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationTrigger")
            .field("label", &self.label)
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}

fn present_natively(env: &Environment, destination: &Destination, label: &str) {
    match env.native_links() {
        Some(presenter) => presenter.present(label, destination()),
        None => tracing::warn!(
            trigger = %label,
            "Navigation trigger activated outside a navigation host with no native link handler"
        ),
    }
}

/// Queue a push of a fresh `destination` page on the env dispatcher
fn schedule_push(env: &Environment, navigator: &Navigator, destination: &Destination, label: &str) {
    let navigator = navigator.clone();
    let destination = destination.clone();
    let label = label.to_string();
    env.dispatcher().defer(move || {
        let id = navigator.push(destination(), Some(PageId::generate()));
        tracing::debug!(trigger = %label, page = %id, "Navigation trigger pushed page");
    });
}
