//! Whole-cycle layout, rendering, and event-routing tests against the
//! in-memory backend.

use pergola::backend::{ScriptedEvents, TestBackend};
use pergola::event::Event;
use pergola::tutils::{log, probe, probe_minmax};
use pergola::{
    Align, Axis, Bin, Flex, Justify, Margin, NodeRef, Region, Size, SizeRequest, Stack, Text, Ui,
    Widget, node,
};

#[test]
fn preferred_size_is_idempotent() {
    let mut row = Flex::row();
    row.add_child(probe("a", 10, 2));
    row.add_child(probe_minmax("b", (3, 9), (1, 4)));
    let first = row.get_preferred_size(Axis::Horizontal, None);
    let second = row.get_preferred_size(Axis::Horizontal, None);
    assert_eq!(first, second);
    assert_eq!(first, SizeRequest::new(13, 19));
}

#[test]
fn flex_exact_fill() {
    let mut row = Flex::row();
    let kids = [probe("a", 10, 1), probe("b", 10, 1), probe("c", 10, 1)];
    for k in &kids {
        row.add_child(k.clone());
    }
    row.allocate_region(Region::new(0, 0, 50, 1));

    let rs: Vec<Region> = kids.iter().map(|k| k.borrow().state().region()).collect();
    let total: i32 = rs.iter().map(|r| r.w).sum();
    // Children carry the default flex weight, so the surplus is consumed
    // exactly.
    assert_eq!(total, 50);
    // Sizes tile the region left to right.
    assert_eq!(rs[0].tl.x, 0);
    assert_eq!(rs[1].tl.x, rs[0].right());
    assert_eq!(rs[2].tl.x, rs[1].right());
    assert_eq!(rs[2].right(), 50);
}

#[test]
fn flex_no_flex_justify_center() {
    let mut row = Flex::row().with_justify(Justify::Center);
    let kids = [probe("a", 10, 1), probe("b", 10, 1), probe("c", 10, 1)];
    for k in &kids {
        k.borrow_mut().state.set_flex_grow(0);
        row.add_child(k.clone());
    }
    row.allocate_region(Region::new(0, 0, 50, 1));

    // Leftover 20 splits 10 before the first child and 10 after the last.
    assert_eq!(kids[0].borrow().state().region(), Region::new(10, 0, 10, 1));
    assert_eq!(kids[1].borrow().state().region(), Region::new(20, 0, 10, 1));
    assert_eq!(kids[2].borrow().state().region(), Region::new(30, 0, 10, 1));
}

#[test]
fn flex_shrinks_toward_minimums() {
    let mut row = Flex::row();
    let a = probe_minmax("a", (5, 20), (1, 1));
    let b = probe_minmax("b", (5, 20), (1, 1));
    row.add_child(a.clone());
    row.add_child(b.clone());
    row.allocate_region(Region::new(0, 0, 20, 1));

    // Equal slack above equal minimums: the reduction splits evenly.
    assert_eq!(a.borrow().state().region().w, 10);
    assert_eq!(b.borrow().state().region().w, 10);
}

#[test]
fn flex_overflow_clamps_at_minimums() {
    let mut row = Flex::row();
    let a = probe_minmax("a", (5, 20), (1, 1));
    let b = probe_minmax("b", (5, 20), (1, 1));
    row.add_child(a.clone());
    row.add_child(b.clone());
    row.allocate_region(Region::new(0, 0, 6, 1));

    // Below the sum of minimums, children sit at minimum from the start
    // edge and the total overflows the region.
    assert_eq!(a.borrow().state().region(), Region::new(0, 0, 5, 1));
    assert_eq!(b.borrow().state().region(), Region::new(5, 0, 5, 1));
}

#[test]
fn flex_cross_axis_alignment() {
    let mut row = Flex::row().with_align(Align::Center);
    let a = probe("a", 4, 2);
    let end = probe("end", 4, 2);
    end.borrow_mut().state.set_align_self(Align::End);
    let stretch = probe("s", 4, 2);
    stretch.borrow_mut().state.set_align_self(Align::Stretch);
    row.add_child(a.clone());
    row.add_child(end.clone());
    row.add_child(stretch.clone());
    row.allocate_region(Region::new(0, 0, 12, 10));

    // align_items centers by default; align_self overrides per child.
    assert_eq!(a.borrow().state().region(), Region::new(0, 4, 4, 2));
    assert_eq!(end.borrow().state().region(), Region::new(4, 8, 4, 2));
    assert_eq!(stretch.borrow().state().region(), Region::new(8, 0, 4, 10));
}

#[test]
fn grid_track_union_satisfies_spans() {
    let mut grid = pergola::Grid::new();
    let narrow = probe("narrow", 10, 1);
    let wide = probe("wide", 30, 1);
    grid.add_child(narrow.clone(), 0, 0, 1, 1);
    grid.add_child(wide.clone(), 0, 1, 2, 1);
    let sr = grid.get_preferred_size(Axis::Horizontal, None);
    assert!(sr.nat >= 30);

    grid.allocate_region(Region::new(0, 0, sr.nat, 2));
    // The spanning child's region is the union of both columns.
    assert!(wide.borrow().state().region().w >= 30);
    assert!(narrow.borrow().state().region().w >= 10);
}

#[test]
fn stack_renders_bottom_up_and_dispatches_top_down() {
    let activity = log();
    let mut stack = Stack::new();
    for name in ["a", "b", "c"] {
        let p = node(
            pergola::tutils::Probe::new(name, SizeRequest::fixed(5), SizeRequest::fixed(1))
                .with_log(&activity),
        );
        stack.add_child(p);
    }
    let root: NodeRef = node(stack);

    let (_canvas, backend) = TestBackend::create(Size::new(20, 5));
    let mut ui = Ui::new(Box::new(backend));
    ui.push_layout(root);
    ui.render_frame().expect("render");

    // A added first renders first (bottommost).
    assert_eq!(
        *activity.borrow(),
        vec!["draw:a", "draw:b", "draw:c"]
    );

    activity.borrow_mut().clear();
    ui.dispatch(&Event::Key('x'.into()));
    // C added last is offered the event first.
    assert_eq!(
        *activity.borrow(),
        vec!["event:c", "event:b", "event:a"]
    );
}

#[test]
fn stack_consumer_stops_dispatch() {
    let activity = log();
    let mut stack = Stack::new();
    let bottom = node(
        pergola::tutils::Probe::new("bottom", SizeRequest::fixed(5), SizeRequest::fixed(1))
            .with_log(&activity),
    );
    let top = node(
        pergola::tutils::Probe::new("top", SizeRequest::fixed(5), SizeRequest::fixed(1))
            .with_log(&activity)
            .consuming(),
    );
    stack.add_child(bottom);
    stack.add_child(top);
    let root: NodeRef = node(stack);

    let (_canvas, backend) = TestBackend::create(Size::new(20, 5));
    let mut ui = Ui::new(Box::new(backend));
    ui.push_layout(root);

    assert!(ui.dispatch(&Event::Key('x'.into())));
    // The topmost overlay consumed the event; the one below never saw it.
    assert_eq!(*activity.borrow(), vec!["event:top"]);
}

#[test]
fn signals_short_circuit_through_the_tree() {
    let root: NodeRef = node(Bin::new());
    let (_canvas, backend) = TestBackend::create(Size::new(20, 5));
    let mut ui = Ui::new(Box::new(backend));
    ui.push_layout(root.clone());

    let fired = log();
    let f1 = fired.clone();
    ui.on(&root, move |_| {
        f1.borrow_mut().push("first".into());
        true
    });
    let f2 = fired.clone();
    ui.on(&root, move |_| {
        f2.borrow_mut().push("second".into());
        true
    });

    assert!(ui.dispatch(&Event::Key('x'.into())));
    assert_eq!(*fired.borrow(), vec!["first"]);

    // After removal the same event falls through unconsumed.
    let id = root.borrow().state().id();
    ui.signals().remove_by_target(id);
    assert!(!ui.dispatch(&Event::Key('x'.into())));
}

#[test]
fn full_cycle_renders_text_into_the_grid() {
    let mut column = Flex::column();
    for line in ["title", "body text"] {
        let text = node(Text::new(line));
        // No flex: lines keep their natural height at the top.
        text.borrow_mut().state_mut().set_flex_grow(0);
        column.add_child(text);
    }
    let root: NodeRef = node(column);

    let (canvas, backend) = TestBackend::create(Size::new(20, 5));
    let mut ui = Ui::new(Box::new(backend));
    ui.push_layout(root);
    ui.render_frame().expect("render");

    let canvas = canvas.lock().expect("canvas");
    assert_eq!(canvas.line(0).trim_end(), "title");
    assert_eq!(canvas.line(1).trim_end(), "body text");
}

#[test]
fn margins_offset_rendered_content() {
    let text = node(Text::new("hi"));
    text.borrow_mut().state_mut().set_margin(Margin::new(1, 0, 0, 2));
    let root: NodeRef = node(Bin::with_child(text));

    let (canvas, backend) = TestBackend::create(Size::new(10, 4));
    let mut ui = Ui::new(Box::new(backend));
    ui.push_layout(root);
    ui.render_frame().expect("render");

    let canvas = canvas.lock().expect("canvas");
    assert_eq!(canvas.line(1).trim_end(), "  hi");
}

#[test]
fn scissor_clips_rendering() {
    let root: NodeRef = node(Bin::with_child(node(Text::new("abcdefgh"))));
    let (canvas, backend) = TestBackend::create(Size::new(20, 3));
    let mut ui = Ui::new(Box::new(backend));
    ui.push_layout(root);

    ui.push_scissor(Region::new(0, 0, 4, 3));
    assert_eq!(ui.scissor(), Region::new(0, 0, 4, 3));
    // Nested push narrows against the current scissor.
    ui.push_scissor(Region::new(2, 0, 10, 3));
    assert_eq!(ui.scissor(), Region::new(2, 0, 2, 3));
    ui.pop_scissor();

    ui.render_frame().expect("render");
    let painted = canvas.lock().expect("canvas").line(0);
    assert_eq!(painted.trim_end(), "abcd");
}

#[test]
fn wrapped_text_lays_out_against_allocated_width() {
    let text = node(Text::new("alpha beta gamma").with_wrap());
    let root: NodeRef = node(Bin::with_child(text.clone()));

    let (canvas, backend) = TestBackend::create(Size::new(5, 5));
    let mut ui = Ui::new(Box::new(backend));
    ui.push_layout(root);
    ui.render_frame().expect("render");

    // Width 5 forces one token per line; the root height tracks the
    // wrapped extents.
    assert_eq!(text.borrow().state().region().h, 3);
    let canvas = canvas.lock().expect("canvas");
    assert_eq!(canvas.line(0).trim_end(), "alpha");
    assert_eq!(canvas.line(1).trim_end(), "beta");
    assert_eq!(canvas.line(2).trim_end(), "gamma");
}

#[test]
fn resize_reseeds_stacked_roots() {
    let root: NodeRef = node(Flex::column());
    let (_canvas, backend) = TestBackend::create(Size::new(20, 5));
    let mut ui = Ui::new(Box::new(backend));
    ui.push_layout(root.clone());
    // Flex roots expand to the surface.
    assert_eq!(root.borrow().state().region(), Region::new(0, 0, 20, 5));

    ui.resize(30, 8);
    assert_eq!(root.borrow().state().region(), Region::new(0, 0, 30, 8));
}

#[test]
fn pump_drains_a_scripted_source() {
    let root: NodeRef = node(Flex::column());
    let (_canvas, backend) = TestBackend::create(Size::new(20, 5));
    let mut ui = Ui::new(Box::new(backend));
    ui.push_layout(root.clone());

    let seen = log();
    let s = seen.clone();
    ui.on(&root, move |event| {
        if let Event::Key(k) = event {
            s.borrow_mut().push(format!("{:?}", k.code));
        }
        false
    });

    let mut source = ScriptedEvents::new([
        Event::Key('a'.into()),
        Event::Resize(Size::new(40, 10)),
        Event::Key('b'.into()),
    ]);
    ui.pump_events(&mut source).expect("pump");

    assert_eq!(*seen.borrow(), vec!["Char('a')", "Char('b')"]);
    assert_eq!(root.borrow().state().region(), Region::new(0, 0, 40, 10));
}

#[test]
fn handler_mutations_are_picked_up_by_the_next_cycle() {
    let text = node(Text::new("short"));
    let root: NodeRef = node(Bin::with_child(text.clone()));
    let (canvas, backend) = TestBackend::create(Size::new(30, 3));
    let mut ui = Ui::new(Box::new(backend));
    ui.push_layout(root.clone());

    let edited = text.clone();
    ui.on(&root, move |_| {
        edited.borrow_mut().set_text("a longer replacement");
        true
    });

    let mut source = ScriptedEvents::new([Event::Key('e'.into())]);
    ui.pump_events(&mut source).expect("pump");
    // The final pump iteration relayouts and renders before exhausting, so
    // one more frame shows the mutation.
    ui.render_frame().expect("render");

    assert!(canvas.lock().expect("canvas").contains("a longer replacement"));
}

#[test]
fn modal_layouts_render_in_stack_order_and_capture_events() {
    let activity = log();
    let base = node(
        pergola::tutils::Probe::new("base", SizeRequest::fixed(10), SizeRequest::fixed(3))
            .with_log(&activity),
    );
    let modal = node(
        pergola::tutils::Probe::new("modal", SizeRequest::fixed(6), SizeRequest::fixed(1))
            .with_log(&activity)
            .consuming(),
    );

    let (_canvas, backend) = TestBackend::create(Size::new(20, 5));
    let mut ui = Ui::new(Box::new(backend));
    ui.push_layout(base);
    ui.push_layout(modal);

    ui.render_frame().expect("render");
    assert_eq!(*activity.borrow(), vec!["draw:base", "draw:modal"]);

    activity.borrow_mut().clear();
    // Only the active (topmost) layout receives events.
    assert!(ui.dispatch(&Event::Key('x'.into())));
    assert_eq!(*activity.borrow(), vec!["event:modal"]);

    ui.pop_layout();
    activity.borrow_mut().clear();
    ui.dispatch(&Event::Key('x'.into()));
    assert_eq!(*activity.borrow(), vec!["event:base"]);
}
