use std::cell::RefCell;
use std::rc::Rc;

use vitrine_carousel_core::{
    CarouselError, CarouselEvent, CompletionToken, Config, InputEvent, Intent, Mode, TimerHandle,
    UiTree,
};
use vitrine_test_fixtures::{
    image_carousel, pages, property_section, track_of, MemoryTree, Page, SectionLayout,
};

#[test]
fn property_page_binds_each_valid_section() {
    let tree = pages::tree("property-page").unwrap();
    let mut page = Page::without_renderer(tree);
    let (registry, ids) = page.bind(Config::default());

    // the coming-soon section has no track and the orphan dots have no section
    assert_eq!(ids.len(), 2);
    let featured = registry.get(ids[0]).unwrap();
    let rentals = registry.get(ids[1]).unwrap();
    assert_eq!(featured.mode(), Mode::Multi);
    assert_eq!((featured.slide_count(), featured.per_view()), (6, 3));
    assert_eq!((rentals.slide_count(), rentals.per_view()), (4, 2));
    assert_ne!(featured.drag_surface(), rentals.drag_surface());

    let rentals_root = *rentals.root();
    assert_eq!(page.tree.query_all(&rentals_root, ".dot").len(), 4);
}

#[test]
fn identical_ids_in_other_sections_are_untouched() {
    let tree = pages::tree("property-page").unwrap();
    let mut page = Page::without_renderer(tree);
    let (mut registry, ids) = page.bind(Config::default());
    let rentals_track = track_of(&page.tree, *registry.get(ids[1]).unwrap().root());
    let before = page.tree.style(rentals_track, "transform").map(str::to_owned);

    registry
        .apply(ids[0], Intent::GoTo(2), &mut page.host())
        .unwrap();
    assert_eq!(registry.get(ids[0]).unwrap().current_index(), 2);
    assert_eq!(registry.get(ids[1]).unwrap().current_index(), 0);
    assert_eq!(
        page.tree.style(rentals_track, "transform").map(str::to_owned),
        before
    );
}

#[test]
fn discovery_is_the_only_unscoped_lookup() {
    let mut tree = MemoryTree::new();
    image_carousel(&mut tree, 4);
    property_section(&mut tree, SectionLayout::default());
    let mut page = Page::new(tree);
    let (mut registry, ids) = page.bind(Config::default());
    assert_eq!(ids.len(), 2);
    let scans = page.tree.document_queries();

    assert!(registry.discover_and_bind(&mut page.host()).is_empty());
    for id in &ids {
        registry.apply(*id, Intent::Next, &mut page.host()).unwrap();
    }
    page.advance(&mut registry, 30_000);
    page.finish_animations(&mut registry);
    registry.on_resize(&mut page.host());
    assert_eq!(page.tree.document_queries(), scans);
    assert_eq!(registry.len(), 2);
}

#[test]
fn superseded_completion_is_ignored() {
    let mut tree = MemoryTree::new();
    image_carousel(&mut tree, 5);
    let mut page = Page::new(tree);
    let (mut registry, ids) = page.bind(Config::default());
    let id = ids[0];
    // let the loading overlay fade finish first
    page.finish_animations(&mut registry);
    let changed = Rc::new(RefCell::new(Vec::new()));
    let sink = changed.clone();
    registry.subscribe(move |_, e| {
        if let CarouselEvent::PositionChanged { index } = e {
            sink.borrow_mut().push(*index);
        }
    });

    registry.apply(id, Intent::Next, &mut page.host()).unwrap();
    registry.apply(id, Intent::Next, &mut page.host()).unwrap();
    assert_eq!(page.renderer.pending_completions().len(), 2);
    page.finish_animations(&mut registry);
    assert_eq!(*changed.borrow(), vec![2]);

    let track = track_of(&page.tree, *registry.get(id).unwrap().root());
    assert_eq!(page.tree.style(track, "transform"), Some("translateX(-200%)"));
}

#[test]
fn teardown_releases_every_timer() {
    let mut tree = MemoryTree::new();
    image_carousel(&mut tree, 4);
    property_section(&mut tree, SectionLayout::default());
    property_section(&mut tree, SectionLayout::default());
    let mut page = Page::new(tree);
    let (mut registry, ids) = page.bind(Config::default());
    assert_eq!(ids.len(), 3);

    registry.apply(ids[1], Intent::Next, &mut page.host()).unwrap();
    registry
        .dispatch(ids[0], InputEvent::DragStart { x: 10.0, y: 10.0 }, &mut page.host())
        .unwrap();
    assert!(page.timers.live_count() > 0);

    registry.teardown(&mut page.host());
    assert_eq!(page.timers.live_count(), 0);
    assert!(registry.is_empty());

    // late host callbacks find nothing to act on
    assert_eq!(
        registry.on_timer(ids[2], TimerHandle(1), &mut page.host()),
        Err(CarouselError::UnknownInstance(ids[2]))
    );
    assert_eq!(
        registry.on_animation_complete(ids[1], CompletionToken(0), &mut page.host()),
        Err(CarouselError::UnknownInstance(ids[1]))
    );
    page.finish_animations(&mut registry);
    page.advance(&mut registry, 60_000);
}

#[test]
fn unknown_instance_is_reported() {
    let mut page = Page::new(MemoryTree::new());
    let (mut registry, ids) = page.bind(Config::default());
    assert!(ids.is_empty());
    let ghost = vitrine_carousel_core::InstanceId(42);
    assert_eq!(
        registry.dispatch(ghost, InputEvent::PointerEnter, &mut page.host()),
        Err(CarouselError::UnknownInstance(ghost))
    );
}

#[test]
fn bind_emits_ready_for_each_instance() {
    let mut tree = MemoryTree::new();
    image_carousel(&mut tree, 3);
    property_section(&mut tree, SectionLayout::default());
    let mut page = Page::without_renderer(tree);
    let mut registry = vitrine_carousel_core::Registry::new(Config::default());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    registry.subscribe(move |id, e| sink.borrow_mut().push((id, e.clone())));

    let ids = registry.discover_and_bind(&mut page.host());
    assert_eq!(
        *seen.borrow(),
        vec![(ids[0], CarouselEvent::Ready), (ids[1], CarouselEvent::Ready)]
    );
}
