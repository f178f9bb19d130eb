use std::cell::RefCell;
use std::rc::Rc;

use vitrine_carousel_core::{
    CarouselEvent, Config, Control, InputEvent, InstanceId, Intent, Key, Property, Registry,
    UiTree,
};
use vitrine_test_fixtures::{property_section, track_of, MemoryTree, NodeId, Page, SectionLayout};

type Log = Rc<RefCell<Vec<(InstanceId, CarouselEvent)>>>;

fn record(registry: &mut Registry<NodeId>) -> Log {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    registry.subscribe(move |id, e| sink.borrow_mut().push((id, e.clone())));
    log
}

fn changing(log: &Log, id: InstanceId) -> Vec<(usize, usize)> {
    log.borrow()
        .iter()
        .filter_map(|(owner, e)| match e {
            CarouselEvent::PositionChanging { from, to } if *owner == id => Some((*from, *to)),
            _ => None,
        })
        .collect()
}

/// One default section (6 cards, 3 visible), host without a renderer.
fn one_section() -> (Page, Registry<NodeId>, InstanceId, Log) {
    let mut tree = MemoryTree::new();
    property_section(&mut tree, SectionLayout::default());
    let mut page = Page::without_renderer(tree);
    let (mut registry, ids) = page.bind(Config::default());
    assert_eq!(ids.len(), 1);
    let log = record(&mut registry);
    (page, registry, ids[0], log)
}

#[test]
fn next_at_the_end_loops_and_prev_at_zero_stays() {
    let (mut page, mut registry, id, log) = one_section();
    let inst = registry.get(id).unwrap();
    assert_eq!(inst.per_view(), 3);
    assert_eq!(inst.max_index(), 3);
    let track = track_of(&page.tree, *inst.root());

    registry.apply(id, Intent::GoTo(3), &mut page.host()).unwrap();
    assert_eq!(page.tree.style(track, "transform"), Some("translateX(-996px)"));

    registry.apply(id, Intent::Next, &mut page.host()).unwrap();
    assert_eq!(registry.get(id).unwrap().current_index(), 0);
    assert_eq!(page.tree.style(track, "transform"), Some("translateX(0px)"));

    registry.apply(id, Intent::Prev, &mut page.host()).unwrap();
    assert_eq!(changing(&log, id), vec![(0, 3), (3, 0), (0, 0)]);
    assert_eq!(registry.get(id).unwrap().current_index(), 0);
}

#[test]
fn goto_past_the_end_clamps() {
    let (mut page, mut registry, id, _log) = one_section();
    registry.apply(id, Intent::GoTo(5), &mut page.host()).unwrap();
    assert_eq!(registry.get(id).unwrap().current_index(), 3);
}

#[test]
fn manual_navigation_pauses_then_resumes() {
    let (mut page, mut registry, id, log) = one_section();
    page.advance(&mut registry, 1000);
    registry.apply(id, Intent::Next, &mut page.host()).unwrap();
    assert_eq!(page.timers.live_intervals(id), 0);
    assert_eq!(page.timers.live_timeouts(id), 1);

    page.advance(&mut registry, 2999);
    assert!(!registry.get(id).unwrap().is_autoplay_armed());
    page.advance(&mut registry, 1);
    assert!(registry.get(id).unwrap().is_autoplay_armed());
    assert_eq!(page.timers.live_timeouts(id), 0);

    page.advance(&mut registry, 4999);
    assert_eq!(changing(&log, id), vec![(0, 1)]);
    page.advance(&mut registry, 1);
    assert_eq!(changing(&log, id), vec![(0, 1), (1, 2)]);

    // autoplay ticks keep the cadence and loop at the end
    page.advance(&mut registry, 10_000);
    assert_eq!(changing(&log, id), vec![(0, 1), (1, 2), (2, 3), (3, 0)]);
}

#[test]
fn repeated_navigation_restarts_the_grace_period() {
    let (mut page, mut registry, id, _log) = one_section();
    registry.apply(id, Intent::Next, &mut page.host()).unwrap();
    page.advance(&mut registry, 2000);
    registry.apply(id, Intent::Next, &mut page.host()).unwrap();
    assert_eq!(page.timers.live_timeouts(id), 1);

    page.advance(&mut registry, 2999);
    assert!(!registry.get(id).unwrap().is_autoplay_armed());
    page.advance(&mut registry, 1);
    assert!(registry.get(id).unwrap().is_autoplay_armed());
    assert_eq!(page.timers.live_intervals(id), 1);
}

#[test]
fn hover_outlasts_the_grace_period() {
    let (mut page, mut registry, id, _log) = one_section();
    registry
        .dispatch(id, InputEvent::PointerEnter, &mut page.host())
        .unwrap();
    registry
        .dispatch(id, InputEvent::Control(Control::Next), &mut page.host())
        .unwrap();
    page.advance(&mut registry, 10_000);
    assert!(!registry.get(id).unwrap().is_autoplay_armed());

    registry
        .dispatch(id, InputEvent::PointerLeave, &mut page.host())
        .unwrap();
    assert!(registry.get(id).unwrap().is_autoplay_armed());
}

#[test]
fn widening_the_viewport_pulls_the_index_back() {
    let (mut page, mut registry, id, log) = one_section();
    let root = *registry.get(id).unwrap().root();
    let track = track_of(&page.tree, root);
    registry.apply(id, Intent::GoTo(3), &mut page.host()).unwrap();
    log.borrow_mut().clear();

    let viewport = page.tree.find_in(root, ".overflow-hidden").unwrap();
    page.tree.set_width(viewport, 2000.0);
    registry.on_resize(&mut page.host());

    let inst = registry.get(id).unwrap();
    assert_eq!(inst.per_view(), 6);
    assert_eq!(inst.current_index(), 0);
    assert_eq!(
        *log.borrow(),
        vec![
            (id, CarouselEvent::PositionChanging { from: 3, to: 0 }),
            (id, CarouselEvent::PositionChanged { index: 0 }),
        ]
    );
    assert_eq!(page.tree.style(track, "transform"), Some("translateX(0px)"));
}

#[test]
fn narrowing_the_viewport_opens_more_positions() {
    let (mut page, mut registry, id, log) = one_section();
    let root = *registry.get(id).unwrap().root();
    let viewport = page.tree.find_in(root, ".overflow-hidden").unwrap();
    page.tree.set_width(viewport, 400.0);
    registry.on_resize(&mut page.host());
    assert!(log.borrow().is_empty());
    assert_eq!(registry.get(id).unwrap().max_index(), 5);

    registry.apply(id, Intent::GoTo(5), &mut page.host()).unwrap();
    assert_eq!(registry.get(id).unwrap().current_index(), 5);
}

#[test]
fn missing_gap_uses_the_fallback() {
    let mut tree = MemoryTree::new();
    property_section(
        &mut tree,
        SectionLayout {
            gap: None,
            viewport_width: 700.0,
            ..SectionLayout::default()
        },
    );
    let mut page = Page::without_renderer(tree);
    let (mut registry, ids) = page.bind(Config::default());
    let id = ids[0];
    assert_eq!(registry.get(id).unwrap().per_view(), 2);

    registry.apply(id, Intent::GoTo(1), &mut page.host()).unwrap();
    let track = track_of(&page.tree, *registry.get(id).unwrap().root());
    assert_eq!(page.tree.style(track, "transform"), Some("translateX(-332px)"));
}

#[test]
fn clicking_the_active_card_keeps_autoplay_running() {
    let (mut page, mut registry, id, log) = one_section();
    assert_eq!(registry.get(id).unwrap().cards().len(), 6);
    registry
        .dispatch(id, InputEvent::SelectCard(0), &mut page.host())
        .unwrap();
    let inst = registry.get(id).unwrap();
    assert!(inst.is_autoplay_armed());
    assert!(!inst.in_resume_grace());
    assert!(log.borrow().is_empty());

    registry
        .dispatch(id, InputEvent::SelectCard(2), &mut page.host())
        .unwrap();
    let inst = registry.get(id).unwrap();
    assert_eq!(inst.current_index(), 2);
    assert!(inst.in_resume_grace());

    // a dot for the current position still counts as navigation
    let (mut page, mut registry, id, _log) = one_section();
    registry
        .dispatch(id, InputEvent::Select(0), &mut page.host())
        .unwrap();
    assert!(registry.get(id).unwrap().in_resume_grace());
}

#[test]
fn dots_are_built_and_follow_selection() {
    let (mut page, mut registry, id, _log) = one_section();
    let root = *registry.get(id).unwrap().root();
    let dots = page.tree.query_all(&root, ".dot");
    assert_eq!(dots.len(), 6);
    assert_eq!(page.tree.attribute(dots[2], "aria-label"), Some("Go to slide 3"));
    assert!(page.tree.has_class(dots[0], "bg-blue-500"));

    registry
        .dispatch(id, InputEvent::Select(2), &mut page.host())
        .unwrap();
    assert_eq!(registry.get(id).unwrap().current_index(), 2);
    assert!(page.tree.has_class(dots[2], "bg-blue-500"));
    assert!(page.tree.has_class(dots[2], "animate-glow"));
    assert!(!page.tree.has_class(dots[2], "bg-slate-300"));
    assert!(page.tree.has_class(dots[0], "bg-slate-300"));
    assert!(!page.tree.has_class(dots[0], "bg-blue-500"));
}

#[test]
fn active_card_is_emphasised_when_animating() {
    let mut tree = MemoryTree::new();
    let section = property_section(&mut tree, SectionLayout::default());
    let mut page = Page::new(tree);
    let (mut registry, ids) = page.bind(Config::default());
    let id = ids[0];
    let cards = page.tree.query_all(&section, ".property-card");

    page.renderer.clear_log();
    registry.apply(id, Intent::Next, &mut page.host()).unwrap();

    let last_scale = |card: NodeId| {
        page.renderer
            .log()
            .iter()
            .filter(|a| a.target == card && a.property == Property::Scale)
            .map(|a| a.value)
            .last()
    };
    assert_eq!(last_scale(cards[1]), Some(1.0));
    assert_eq!(last_scale(cards[0]), Some(0.97));
}

#[test]
fn cards_are_left_alone_without_a_renderer() {
    let (mut page, mut registry, id, _log) = one_section();
    registry.apply(id, Intent::Next, &mut page.host()).unwrap();
    let root = *registry.get(id).unwrap().root();
    for card in page.tree.query_all(&root, ".property-card") {
        assert_eq!(page.tree.style(card, "opacity"), None);
    }
}

#[test]
fn swipe_navigates_and_starts_the_grace_period() {
    let (mut page, mut registry, id, _log) = one_section();
    let mut host = page.host();
    registry
        .dispatch(id, InputEvent::DragStart { x: 400.0, y: 100.0 }, &mut host)
        .unwrap();
    registry
        .dispatch(id, InputEvent::DragEnd { x: 300.0, y: 110.0 }, &mut host)
        .unwrap();
    drop(host);
    let inst = registry.get(id).unwrap();
    assert_eq!(inst.current_index(), 1);
    assert!(inst.in_resume_grace());
    assert!(!inst.is_autoplay_armed());
}

#[test]
fn keys_reach_only_the_hovered_section() {
    let mut tree = MemoryTree::new();
    property_section(&mut tree, SectionLayout::default());
    property_section(&mut tree, SectionLayout::default());
    let mut page = Page::without_renderer(tree);
    let (mut registry, ids) = page.bind(Config::default());
    let (a, b) = (ids[0], ids[1]);

    registry
        .dispatch(a, InputEvent::PointerEnter, &mut page.host())
        .unwrap();
    assert_eq!(registry.on_key(Key::ArrowRight, &mut page.host()), 1);
    assert_eq!(registry.get(a).unwrap().current_index(), 1);
    assert_eq!(registry.get(b).unwrap().current_index(), 0);
}

#[test]
fn shuffle_and_fullscreen_do_not_apply() {
    let (mut page, mut registry, id, log) = one_section();
    registry
        .apply(id, Intent::ToggleShuffle, &mut page.host())
        .unwrap();
    registry
        .apply(id, Intent::ToggleFullscreen, &mut page.host())
        .unwrap();
    assert!(log.borrow().is_empty());
    assert!(!registry.get(id).unwrap().shuffle_enabled());
    assert_eq!(page.tree.fullscreen_element(), None);
}
