//! End-to-end behaviour of the carousel, driven only through messages and the
//! public API.

use super::*;
use crate::Widget;
use crossterm::event::{KeyCode, KeyModifiers};
use std::time::Duration;

fn items(n: usize) -> Vec<Item<String>> {
    (0..n).map(|i| Item::new(format!("slide {}", i))).collect()
}

fn measured(n: usize, options: Configuration, width: f32) -> Model<String> {
    let mut m = Model::new(items(n), options);
    m.update(Box::new(ResizeMsg::new(width, 10.0)));
    m.take_events();
    m
}

fn settle(m: &mut Model<String>) {
    let mut frames = 0;
    while m.is_animating() && frames < 1000 {
        let frame = m.frame_msg();
        m.update(Box::new(frame));
        frames += 1;
    }
}

fn key(code: KeyCode) -> Msg {
    Box::new(KeyMsg {
        key: code,
        modifiers: KeyModifiers::NONE,
    })
}

#[test]
fn test_wrap_target_matches_fresh_navigation() {
    let mut m = measured(6, Configuration::default(), 400.0);
    m.go_to(0);
    settle(&mut m);
    m.go_to(7);
    settle(&mut m);
    assert_eq!(m.current(), 1);
    let wrapped = m.display_offset();

    let mut fresh = measured(6, Configuration::default(), 400.0);
    fresh.go_to(1);
    settle(&mut fresh);
    assert_eq!(fresh.display_offset(), wrapped);
}

#[test]
fn test_breakpoint_swaps_and_reverts() {
    let options = Configuration::default()
        .with_visible_count(3)
        .with_breakpoint(Breakpoint::new(768.0, Overrides::visible(1)));
    let mut m = Model::new(items(6), options);
    m.update(Box::new(ResizeMsg::new(900.0, 10.0)));
    assert_eq!(m.options().visible_count, 3);
    assert_eq!(m.refreshes(), 0);
    m.take_events();

    m.update(Box::new(ResizeMsg::new(500.0, 10.0)));
    assert_eq!(m.options().visible_count, 1);
    assert_eq!(m.refreshes(), 1);
    assert_eq!(
        m.take_events(),
        vec![Event::Breakpoint {
            threshold: Some(768.0)
        }]
    );

    // Same breakpoint: layout only.
    m.update(Box::new(ResizeMsg::new(520.0, 10.0)));
    assert_eq!(m.refreshes(), 1);

    m.update(Box::new(ResizeMsg::new(900.0, 10.0)));
    assert_eq!(m.options().visible_count, 3);
    assert_eq!(m.refreshes(), 2);
    assert!(m.active_breakpoint().is_none());
    assert_eq!(m.take_events(), vec![Event::Breakpoint { threshold: None }]);
}

#[test]
fn test_gesture_commit_and_snap_back() {
    // touch_threshold 5 on a 400 wide list: 80 is the minimum swipe.
    let mut m = measured(5, Configuration::default(), 400.0);
    m.update(Box::new(PointerMsg::down(300.0, 5.0)));
    m.update(Box::new(PointerMsg::moved(220.0, 5.0)));
    m.update(Box::new(PointerMsg::up(220.0, 5.0)));
    assert_eq!(m.current(), 1);
    settle(&mut m);

    let before = m.display_offset();
    m.update(Box::new(PointerMsg::down(300.0, 5.0)));
    m.update(Box::new(PointerMsg::moved(260.0, 5.0)));
    m.update(Box::new(PointerMsg::up(260.0, 5.0)));
    assert_eq!(m.current(), 1);
    assert_eq!(m.preview().delta(), 0.0);
    settle(&mut m);
    assert_eq!(m.display_offset(), before);
}

#[test]
fn test_autoplay_ping_pong_on_finite_track() {
    let options = Configuration::default()
        .with_infinite(false)
        .with_autoplay(Duration::from_millis(3000));
    let mut m = measured(5, options, 400.0);
    m.jump_to(3);
    assert_eq!(m.current(), 3);

    m.update(Box::new(m.tick_msg()));
    settle(&mut m);
    assert_eq!(m.current(), 4);

    m.update(Box::new(m.tick_msg()));
    settle(&mut m);
    assert_eq!(m.current(), 3);
}

#[test]
fn test_nothing_to_scroll() {
    let options = Configuration::default()
        .with_visible_count(3)
        .with_infinite(false)
        .with_autoplay(Duration::from_millis(3000));
    let mut m = measured(3, options, 300.0);
    for target in [-4, -1, 1, 2, 3, 10] {
        assert!(m.go_to(target).is_none());
        assert_eq!(m.current(), 0);
        assert!(!m.is_animating());
    }
    assert!(m.next().is_none());
    assert!(!m.is_playing());
    assert!(m.take_events().is_empty());
}

#[test]
fn test_wrap_normalization_holds_for_any_target() {
    for target in [-13, -7, -6, -1, 0, 5, 6, 11, 12, 100] {
        let mut m = measured(6, Configuration::default(), 400.0);
        m.go_to(target);
        settle(&mut m);
        assert_eq!(m.current(), target.rem_euclid(6) as usize, "target {}", target);

        // Going a full lap ahead lands on the same index.
        let current = m.current() as isize;
        m.go_to(current + 6);
        settle(&mut m);
        assert_eq!(m.current(), current as usize);
    }
}

#[test]
fn test_wrap_normalization_with_uneven_paging() {
    let options = Configuration::default().with_scroll_count(2);
    for target in [-8, -3, -2, -1, 5, 6, 7, 9, 12] {
        let mut m = measured(5, options.clone(), 400.0);
        m.go_to(target);
        settle(&mut m);
        assert_eq!(m.current(), target.rem_euclid(5) as usize, "target {}", target);
        assert_eq!(m.display_offset(), m.offset_for(m.current() as isize));
    }
}

#[test]
fn test_navigation_before_first_measure() {
    let mut m = Model::new(items(5), Configuration::default());
    m.go_to(3);
    assert_eq!(m.current(), 3);
    m.finish_transition();

    m.update(Box::new(ResizeMsg::new(400.0, 10.0)));
    assert_eq!(m.current(), 3);
    assert_eq!(m.display_offset(), m.offset_for(3));
}

#[test]
fn test_finite_round_trip() {
    let options = Configuration::default().with_infinite(false);
    let mut m = measured(5, options, 400.0);
    for target in 0..5 {
        m.go_to(target);
        settle(&mut m);
        assert_eq!(m.current(), target as usize);
    }
    // Past the end the index stays put.
    m.go_to(9);
    settle(&mut m);
    assert_eq!(m.current(), 4);
}

#[test]
fn test_clone_symmetry_after_refresh() {
    for (visible, centered) in [(1, false), (3, false), (3, true), (2, true)] {
        let options = Configuration::default()
            .with_visible_count(visible)
            .with_centered(centered);
        let mut m = measured(7, options, 420.0);
        m.refresh();
        let expected = if centered { visible + 1 } else { visible };
        assert_eq!(m.items().prefix_len(), expected);
        assert_eq!(m.items().suffix_len(), expected);
    }
}

#[test]
fn test_offset_is_pure() {
    let mut m = measured(6, Configuration::default().with_visible_count(2), 400.0);
    for target in -3..9 {
        assert_eq!(m.offset_for(target), m.offset_for(target));
    }
    m.go_to(3);
    // Mid-transition reads do not disturb it either.
    m.update(Box::new(m.frame_msg()));
    assert_eq!(m.offset_for(3), m.offset_for(3));
}

#[test]
fn test_add_and_remove_reinit() {
    let mut m = measured(4, Configuration::default(), 400.0);
    m.jump_to(3);
    m.take_events();

    m.add(Item::new("new".to_string()), None, false);
    assert_eq!(m.items().len(), 5);
    assert_eq!(m.items().get(4).unwrap().content, "new");
    assert!(m.take_events().contains(&Event::Reinit));
    assert_eq!(m.items().prefix_len(), 1);

    m.remove(3, false);
    m.remove(3, false);
    assert_eq!(m.items().len(), 3);
    // The current index stepped back when its item went away.
    assert_eq!(m.current(), 2);

    assert!(m.add(Item::new("x".to_string()), Some(9), false).is_none());
    assert_eq!(m.items().len(), 3);
}

#[test]
fn test_try_variants_report_bad_indexes() {
    let mut m = measured(3, Configuration::default(), 400.0);
    match m.try_add(Item::new("x".to_string()), Some(3), true) {
        Err(Error::ItemOutOfRange { index, count }) => assert_eq!((index, count), (3, 3)),
        other => panic!("unexpected {:?}", other.map(|_| ())),
    }
    assert!(m.try_remove(0, true).is_err());
    let (removed, _) = m.try_remove(1, false).unwrap();
    assert_eq!(removed.content, "slide 1");
    assert_eq!(m.items().len(), 2);
}

#[test]
fn test_remove_all_leaves_empty_carousel() {
    let mut m = measured(3, Configuration::default(), 400.0);
    m.jump_to(2);
    m.remove_all();
    assert_eq!(m.current(), 0);
    assert!(m.items().is_empty());
    assert!(m.go_to(1).is_none());
}

#[test]
fn test_filter_and_unfilter() {
    let labels = ["apple", "banana", "apricot", "cherry"];
    let all = labels.iter().map(|s| Item::new(s.to_string())).collect();
    let mut m = Model::new(all, Configuration::default());
    m.update(Box::new(ResizeMsg::new(100.0, 1.0)));

    m.filter_matching("ap");
    assert!(m.items().is_filtered());
    let shown: Vec<&str> = m.items().items().iter().map(|i| i.content.as_str()).collect();
    assert_eq!(shown.len(), 2);
    assert!(shown.contains(&"apple") && shown.contains(&"apricot"));

    m.filter(|item| item.content.starts_with('c'));
    assert_eq!(m.items().len(), 1);
    assert_eq!(m.current(), 0);

    m.unfilter();
    assert_eq!(m.items().len(), 4);
    assert!(m.unfilter().is_none());
}

#[test]
fn test_keyboard_requires_focus() {
    let mut m = measured(4, Configuration::default(), 400.0);
    m.update(key(KeyCode::Right));
    assert_eq!(m.current(), 0);

    m.focus();
    m.update(key(KeyCode::Right));
    settle(&mut m);
    assert_eq!(m.current(), 1);
    m.update(key(KeyCode::Char('h')));
    settle(&mut m);
    assert_eq!(m.current(), 0);
}

#[test]
fn test_keyboard_rtl_and_accessibility() {
    let mut m = measured(4, Configuration::default().with_rtl(true), 400.0);
    m.focus();
    m.update(key(KeyCode::Left));
    settle(&mut m);
    assert_eq!(m.current(), 1);

    let mut options = Configuration::default();
    options.accessibility = false;
    let mut m = measured(4, options, 400.0);
    m.focus();
    m.update(key(KeyCode::Right));
    assert_eq!(m.current(), 0);
}

#[test]
fn test_page_keys_follow_dots() {
    let mut options = Configuration::default()
        .with_visible_count(2)
        .with_scroll_count(2)
        .with_infinite(false);
    options.dots = true;
    let mut m = measured(6, options, 400.0);
    m.focus();
    assert_eq!(m.dots().total_pages, 3);

    m.update(key(KeyCode::PageDown));
    assert_eq!(m.current(), 2);
    assert_eq!(m.dots().page, 1);

    // Rejected while animating: the dots stay with the carousel.
    m.update(key(KeyCode::PageDown));
    assert_eq!(m.current(), 2);
    assert_eq!(m.dots().page, 1);
}

#[test]
fn test_focus_pauses_autoplay() {
    let options = Configuration::default().with_autoplay(Duration::from_millis(3000));
    let mut m = measured(4, options, 400.0);
    m.focus();
    m.update(Box::new(m.tick_msg()));
    assert_eq!(m.current(), 0);
    m.blur();
    m.update(Box::new(m.tick_msg()));
    assert_eq!(m.current(), 1);
}

#[test]
fn test_hover_via_pointer() {
    let options = Configuration::default().with_autoplay(Duration::from_millis(3000));
    let mut m = measured(4, options, 400.0);
    m.update(Box::new(PointerMsg::enter()));
    m.update(Box::new(m.tick_msg()));
    assert_eq!(m.current(), 0);
    m.update(Box::new(PointerMsg::leave()));
    m.update(Box::new(m.tick_msg()));
    assert_eq!(m.current(), 1);
}

#[test]
fn test_set_options_rebuilds() {
    let mut m = measured(6, Configuration::default(), 400.0);
    m.jump_to(5);
    let cmd = m.set_options(Configuration::default().with_visible_count(2).with_infinite(false));
    assert!(cmd.is_none());
    assert_eq!(m.options().visible_count, 2);
    assert_eq!(m.current(), 4);
    assert_eq!(m.items().prefix_len(), 0);
    assert_eq!(m.refreshes(), 1);
}

#[test]
fn test_widget_lifecycle() {
    let config = CarouselInit {
        items: items(5),
        options: Configuration::default().with_autoplay(Duration::from_millis(1000)),
    };
    let (mut m, cmd) = <Model<String> as Widget>::init(config);
    assert!(cmd.is_some());
    m.update(Box::new(ResizeMsg::new(400.0, 10.0)));
    Widget::go_to(&mut m, 8);
    assert_eq!(Widget::current(&m), 3);

    Widget::destroy(&mut m);
    assert!(m.is_disabled());
    assert!(!m.is_playing());
    assert!(Widget::refresh(&mut m).is_none());
    assert!(m.update(Box::new(m.frame_msg())).is_none());
}

#[test]
fn test_options_from_json() {
    let options = Configuration::from_json(
        r#"{"visible_count": 2, "infinite": false, "unknown_key": 1,
            "responsive": [{"width": 600, "options": {"visible_count": 1}}]}"#,
    )
    .unwrap();
    let mut m = Model::new(items(4), options);
    m.update(Box::new(ResizeMsg::new(500.0, 10.0)));
    assert_eq!(m.options().visible_count, 1);
    assert!(Configuration::from_json(r#"{"responsive": [{"width": "wide"}]}"#).is_err());
}

#[test]
fn test_view_tracks_navigation() {
    let labels = ["aa", "bb", "cc"];
    let mut options = Configuration::default().with_infinite(false);
    options.arrows = false;
    let list = labels.iter().map(|s| Item::new(s.to_string())).collect();
    let mut m = Model::new(list, options);
    m.update(Box::new(ResizeMsg::new(2.0, 1.0)));
    assert_eq!(lipgloss_extras::lipgloss::strip_ansi(&m.view()), "aa");
    m.go_to(1);
    settle(&mut m);
    assert_eq!(lipgloss_extras::lipgloss::strip_ansi(&m.view()), "bb");
}
