use asciiview::scene::Scene;

#[test]
fn should_start_empty() {
    let scene = Scene::new();

    assert!(scene.is_empty());
    assert_eq!(scene.model_count(), 0);
    assert!(scene.model().is_none());
}

#[test]
fn should_treat_the_latest_ticket_as_current() {
    let mut scene = Scene::new();

    let first = scene.begin_load();
    assert!(scene.is_current(first));

    let second = scene.begin_load();
    assert!(!scene.is_current(first));
    assert!(scene.is_current(second));
}

#[test]
fn should_keep_superseded_tickets_stale() {
    let mut scene = Scene::new();

    let first = scene.begin_load();
    let second = scene.begin_load();
    let third = scene.begin_load();

    // Only the newest load may commit, no matter how many began.
    assert!(!scene.is_current(first));
    assert!(!scene.is_current(second));
    assert!(scene.is_current(third));
}

#[test]
fn should_stay_empty_while_loads_are_pending() {
    let mut scene = Scene::new();
    let _ticket = scene.begin_load();

    assert!(scene.is_empty());
}

#[test]
fn should_clear_without_a_model() {
    let mut scene = Scene::new();
    let ticket = scene.begin_load();
    scene.clear();

    assert!(scene.is_empty());
    // Clearing does not invalidate an in-flight load.
    assert!(scene.is_current(ticket));
}
