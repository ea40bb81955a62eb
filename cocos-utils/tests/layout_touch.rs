use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use cocos_utils::{Node, Screen, Size, TouchDistributor, TouchEvent, TouchKind, TouchPhase, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Widget {
    Title,
    Play,
    Options,
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A title at the top of a letterboxed screen with two buttons stacked under it.
fn menu(screen: &Screen) -> HashMap<Widget, Node> {
    let mut title = Node::new(Size::new(200.0, 60.0));
    title.align_content_screen_top(screen, Vec2::new(0.0, -10.0));
    title.align_horizontal(&Node::new(screen.size).with_position(screen.center()), Vec2::ZERO);

    let mut play = Node::new(Size::new(120.0, 40.0)).with_anchor_point(Vec2::ZERO);
    play.layout_below(&title, Vec2::new(0.0, -20.0));

    let mut options = Node::new(Size::new(120.0, 40.0)).with_scale(0.5);
    options.layout_below(&play, Vec2::new(0.0, -10.0));

    HashMap::from([
        (Widget::Title, title),
        (Widget::Play, play),
        (Widget::Options, options),
    ])
}

#[test]
fn menu_layout_stacks_widgets() {
    init_logging();
    let screen = Screen::new(568.0, 320.0).with_content_size(480.0, 300.0);
    let nodes = menu(&screen);
    let title = &nodes[&Widget::Title];
    let play = &nodes[&Widget::Play];
    let options = &nodes[&Widget::Options];

    assert_eq!(title.top_y(), 300.0);
    assert_eq!(title.position.x, 284.0);
    assert_eq!(play.top_y(), title.bottom_y() - 20.0);
    assert_eq!(play.left_x(), 224.0);
    assert_eq!(options.top_y(), play.bottom_y() - 10.0);
    assert_eq!(options.right_x() - options.left_x(), 60.0);
}

#[test]
fn buttons_receive_their_own_touches() {
    init_logging();
    let screen = Screen::new(568.0, 320.0).with_content_size(480.0, 300.0);
    let nodes = menu(&screen);
    let events = Rc::new(RefCell::new(Vec::new()));

    let mut distributor = TouchDistributor::new(screen);
    for widget in [Widget::Play, Widget::Options] {
        let events = Rc::clone(&events);
        distributor.register(widget, move |w: &Widget, kind, e: &TouchEvent| {
            events.borrow_mut().push((*w, kind, e.id))
        });
    }

    let play_centre = nodes[&Widget::Play].bounding_box().center();
    let options_centre = nodes[&Widget::Options].bounding_box().center();

    assert!(distributor.handle_touch(&TouchEvent::new(7, TouchPhase::Started, play_centre), &nodes));
    assert!(distributor.handle_touch(&TouchEvent::new(8, TouchPhase::Started, options_centre), &nodes));
    assert!(distributor.handle_touch(&TouchEvent::new(7, TouchPhase::Ended, play_centre), &nodes));
    assert!(distributor.handle_touch(&TouchEvent::new(8, TouchPhase::Cancelled, options_centre), &nodes));

    let title_centre = nodes[&Widget::Title].bounding_box().center();
    assert!(!distributor.handle_touch(&TouchEvent::new(9, TouchPhase::Started, title_centre), &nodes));

    assert_eq!(
        *events.borrow(),
        vec![
            (Widget::Play, TouchKind::Down, 7),
            (Widget::Options, TouchKind::Down, 8),
            (Widget::Play, TouchKind::Up, 7),
            (Widget::Options, TouchKind::Cancel, 8),
        ]
    );
}
