//! Navigation Flow Integration Tests
//!
//! End-to-end tests driving a navigation host the way a toolkit would:
//! render, activate elements, drain deferred work, render again.

use skeuomorph::morph_ui::{
    find_action, labels, render_detached, BoxedView, Element, Group, NativeLinkPresenter, Text,
    TitleKey, WithPreference,
};
use skeuomorph::{
    ActiveBinding, Color, Environment, NavigationBarExt, NavigationConfig, NavigationDirection,
    NavigationEvent, NavigationHost, NavigationTrigger, PageId, PopDestination, Transition,
    ViewExt,
};
use std::sync::{Arc, Mutex};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("morph_state=debug,morph_ui=trace")
        .with_test_writer()
        .try_init();
}

fn page(title: &'static str) -> impl Fn() -> WithPreference<Text, TitleKey> + Send + Sync + 'static {
    move || Text::new(format!("{title} body")).navigation_bar_title(title)
}

/// Test trigger activation through the dispatcher up to the rendered detail page
#[test]
fn test_trigger_push_and_back() {
    init_tracing();

    let root = Group::new()
        .child(Text::new("Welcome"))
        .child(NavigationTrigger::new("Open A", || {
            Group::new()
                .child(Text::new("A body"))
                .child(NavigationTrigger::new("Open B", page("B")))
                .navigation_bar_title("A")
        }));
    let host = NavigationHost::new(root, NavigationConfig::default());
    let env = Environment::new();

    // Phase 1: root
    let composite = host.render(&env);
    assert_eq!(composite.content_id, PageId::root());
    assert_eq!(composite.chrome.title, "");
    assert!(composite.chrome.back_button.is_none());

    // Phase 2: push A
    find_action(&composite.content, "Open A").unwrap().invoke();
    assert_eq!(host.controller().depth(), 0);
    assert_eq!(env.dispatcher().run_pending(), 1);

    let composite = host.render(&env);
    assert_eq!(composite.chrome.title, "A");
    assert_eq!(composite.transition, Transition::PUSH);
    assert_eq!(composite.chrome.back_button.as_ref().unwrap().label, "Back");
    assert_eq!(host.title_history().as_slice(), [""]);

    // Phase 3: push B from inside A
    find_action(&composite.content, "Open B").unwrap().invoke();
    env.dispatcher().run_pending();

    let composite = host.render(&env);
    assert_eq!(composite.chrome.title, "B");
    assert_eq!(labels(&composite.content), vec!["B body"]);
    assert_eq!(host.title_history().as_slice(), ["", "A"]);
    let back = composite.chrome.back_button.unwrap();
    assert_eq!(back.label, "A");

    // Phase 4: back to A
    back.action.invoke();
    let composite = host.render(&env);
    assert_eq!(composite.chrome.title, "A");
    assert_eq!(composite.transition, Transition::POP);
    assert_eq!(host.title_history().as_slice(), [""]);
}

/// Test popping to a named page and to the root
#[test]
fn test_pop_to_page_and_root() {
    init_tracing();

    let host = NavigationHost::new(
        Text::new("home").navigation_bar_title("Home"),
        NavigationConfig::default(),
    );
    let env = Environment::new();
    let nav = host.controller().clone();
    host.render(&env);

    let a = nav.push(page("A")().boxed(), Some(PageId::new("a")));
    host.render(&env);
    nav.push(page("B")().boxed(), None);
    host.render(&env);
    nav.push(page("C")().boxed(), None);
    host.render(&env);
    assert_eq!(host.title_history().as_slice(), ["Home", "A", "B"]);

    let removed = nav.pop(PopDestination::Page(a.clone()));
    assert_eq!(removed.len(), 2);
    let composite = host.render(&env);
    assert_eq!(composite.content_id, a);
    assert_eq!(composite.chrome.title, "A");
    assert_eq!(composite.chrome.back_button.unwrap().label, "Home");

    nav.pop(PopDestination::Root);
    let composite = host.render(&env);
    assert_eq!(composite.content_id, PageId::root());
    assert_eq!(composite.chrome.title, "Home");
    assert!(composite.chrome.back_button.is_none());
    assert!(host.title_history().is_empty());
}

/// Test a pop followed by pushes within one turn
#[test]
fn test_pop_and_pushes_between_renders() {
    init_tracing();

    let host = NavigationHost::new(
        Text::new("home").navigation_bar_title("Home"),
        NavigationConfig::default(),
    );
    let env = Environment::new();
    let nav = host.controller().clone();
    host.render(&env);
    nav.push(page("A")().boxed(), None);
    host.render(&env);
    nav.push(page("B")().boxed(), None);
    host.render(&env);
    assert_eq!(host.title_history().as_slice(), ["Home", "A"]);

    // One dispatcher turn: back to root, then two pushes.
    let queued = nav.clone();
    env.dispatcher().defer(move || {
        queued.pop(PopDestination::Root);
        queued.push(page("X")().boxed(), None);
        queued.push(page("Y")().boxed(), None);
    });
    env.dispatcher().run_pending();

    let composite = host.render(&env);
    assert_eq!(composite.chrome.title, "Y");
    assert_eq!(host.title_history().as_slice(), ["Home", ""]);
    assert_eq!(composite.chrome.back_button.unwrap().label, "Back");

    nav.pop(PopDestination::Previous);
    let composite = host.render(&env);
    assert_eq!(composite.chrome.title, "X");
    assert_eq!(composite.chrome.back_button.unwrap().label, "Home");
}

/// Test that pushing a duplicate id is fatal
#[test]
#[should_panic(expected = "already exists")]
fn test_duplicate_push_is_fatal() {
    let host = NavigationHost::new(Text::new("home"), NavigationConfig::default());
    host.controller().push(Text::new("x").boxed(), Some(PageId::new("x")));
    host.controller().push(Text::new("y").boxed(), Some(PageId::new("x")));
}

/// Test that popping to an unknown id is fatal
#[test]
#[should_panic(expected = "doesn't exist")]
fn test_pop_to_unknown_page_is_fatal() {
    let host = NavigationHost::new(Text::new("home"), NavigationConfig::default());
    host.controller().push(Text::new("x").boxed(), None);
    host.controller().pop(PopDestination::Page(PageId::new("missing")));
}

/// Test that the transition always mirrors the latest mutation
#[test]
fn test_transition_follows_latest_direction() {
    let host = NavigationHost::new(Text::new("home"), NavigationConfig::default());
    let env = Environment::new();
    let nav = host.controller().clone();

    let script = [true, true, false, true, false, false, true];
    for push in script {
        if push {
            nav.push(Text::new("p").boxed(), None);
        } else {
            nav.pop(PopDestination::Previous);
        }
        let composite = host.render(&env);
        let expected = if push {
            NavigationDirection::Push
        } else {
            NavigationDirection::Pop
        };
        assert_eq!(composite.transition, Transition::for_direction(expected));
        assert_eq!(composite.chrome.back_button.is_some(), nav.can_pop_up());
    }
}

/// Test last-writer-wins across siblings and stability across re-renders
#[test]
fn test_sibling_titles_last_writer_wins() {
    let root = Group::new()
        .child(Text::new("one").navigation_bar_title("First"))
        .child(Text::new("two").navigation_bar_title("Second"))
        .navigation_bar_tint_color(Color::BLACK);
    let host = NavigationHost::new(root, NavigationConfig::default());
    let env = Environment::new();

    for _ in 0..3 {
        let composite = host.render(&env);
        assert_eq!(composite.chrome.title, "Second");
        assert_eq!(composite.chrome.tint, Color::BLACK);
    }
}

/// Test a bound trigger driven programmatically
#[test]
fn test_programmatic_activation() {
    let binding = ActiveBinding::default();
    let root = NavigationTrigger::with_binding("Settings", page("Settings"), binding.clone());
    let host = NavigationHost::new(root, NavigationConfig::default());
    let env = Environment::new();
    host.render(&env);

    binding.set(true);
    host.render(&env);
    assert!(!binding.get());
    env.dispatcher().run_pending();

    let composite = host.render(&env);
    assert_eq!(composite.chrome.title, "Settings");
}

/// Test that a trigger outside any host falls back to a plain link
#[test]
fn test_trigger_outside_host_renders_link() {
    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl NativeLinkPresenter for Recorder {
        fn present(&self, label: &str, _destination: BoxedView) {
            self.0.lock().unwrap().push(label.to_string());
        }
    }

    let recorder = Arc::new(Recorder::default());
    let env = Environment::new().with_native_links(recorder.clone());
    let trigger = NavigationTrigger::new("Help", page("Help"));

    let elements = render_detached(&trigger, &env);
    assert!(matches!(&elements[0], Element::Link { label, .. } if label == "Help"));
    find_action(&elements, "Help").unwrap().invoke();
    assert_eq!(*recorder.0.lock().unwrap(), vec!["Help".to_string()]);
    assert_eq!(env.dispatcher().pending(), 0);
}

/// Test observers see each navigation
#[tokio::test]
async fn test_observers_follow_navigation() {
    let host = NavigationHost::new(Text::new("home"), NavigationConfig::default());
    let nav = host.controller().clone();
    let mut current = nav.subscribe();
    let mut events = nav.subscribe_events();

    let id = nav.push(Text::new("p").boxed(), None);
    current.changed().await.unwrap();
    assert_eq!(*current.borrow_and_update(), Some(id.clone()));
    assert_eq!(
        events.recv().await.unwrap(),
        NavigationEvent::Pushed { id: id.clone(), depth: 1 }
    );

    nav.pop(PopDestination::Previous);
    current.changed().await.unwrap();
    assert_eq!(*current.borrow(), None);
    assert!(matches!(
        events.recv().await.unwrap(),
        NavigationEvent::Popped { removed, depth: 0, .. } if removed == vec![id]
    ));
}
