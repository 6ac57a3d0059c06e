//! Integration Tests for the Incremental Core
//!
//! These tests drive signals, parameters, compilation and polling together
//! through the public API, against the array medium.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use trellis_core::compile::{compile, Node};
use trellis_core::log::{Level, Logger};
use trellis_core::output::{ArrayMedium, Medium, Output, RangeKind, RangeState};
use trellis_core::params::{call, constant, Param, ReactiveParameters, ReactiveState, StateDict};
use trellis_core::poll::UpdateScheduler;
use trellis_core::reactive::{Cached, Signal};
use trellis_core::{BindingError, RenderError, RenderOptions, Renderer, StructuralError};

/// Append 1, 2, 3 under one block, change the middle one, then clear it.
#[test]
fn array_scenario() {
    let params = ReactiveParameters::new();
    let a: Param<i32> = params.param("a").unwrap();
    let b: Param<i32> = params.param("b").unwrap();
    let c: Param<i32> = params.param("c").unwrap();

    let second = Signal::new(2);
    let state = params
        .hydrate(
            StateDict::new()
                .with("a", Signal::new(1))
                .with("b", second.clone())
                .with("c", Signal::new(3)),
        )
        .unwrap();

    let tree = Node::block(vec![Node::atom(a), Node::atom(b), Node::atom(c)]);
    let mut renderer = Renderer::new(ArrayMedium::new(0));
    renderer.render(&tree, &state).unwrap();

    let root = renderer.output().root();
    assert_eq!(renderer.output().medium().items(), &[1, 2, 3]);
    assert_eq!(renderer.output().size(root), Ok(3));

    // Change the backing cell of the second element and poll once.
    second.set(5);
    let report = renderer.poll().unwrap();
    assert_eq!(report.replaced, 1);
    assert_eq!(renderer.output().medium().items(), &[1, 5, 3]);

    // A second poll with nothing changed issues no mutation.
    let before = renderer.output().medium().mutations();
    let report = renderer.poll().unwrap();
    assert_eq!(report.replaced, 0);
    assert_eq!(renderer.output().medium().mutations(), before);
    assert_eq!(renderer.output().medium().items(), &[1, 5, 3]);

    // The "5" is the child Range at offset 1 with size 1.
    let block = renderer.output().children(root).unwrap()[0];
    let five = renderer.output().children(block).unwrap()[1];
    assert_eq!(renderer.output().tree().start(five), Ok(1));
    assert_eq!(renderer.output().size(five), Ok(1));
    assert_eq!(renderer.output().tree().kind(five), Ok(RangeKind::Unit));

    let output = renderer.output_mut();
    output.clear(five).unwrap();
    assert_eq!(output.medium().items(), &[1, 3]);
    assert_eq!(output.size(root), Ok(2));
    assert_eq!(
        output.clear(five),
        Err(RenderError::Structural(StructuralError::AlreadyCleared(five)))
    );
}

/// Test that a cached computation over constants runs once and is const.
#[test]
fn constant_computation_runs_once() {
    let runs = Rc::new(Cell::new(0));
    let runs_clone = Rc::clone(&runs);
    let cached = Cached::new(move || {
        runs_clone.set(runs_clone.get() + 1);
        42
    });

    assert_eq!(cached.is_const(), Err(BindingError::NotComputed));
    for _ in 0..4 {
        assert_eq!(cached.compute(), 42);
    }
    assert_eq!(runs.get(), 1);
    assert_eq!(cached.is_const(), Ok(true));
}

/// Test that derived Params only recompute after an input changed.
#[test]
fn derived_params_recompute_on_change_only() {
    let runs = Rc::new(Cell::new(0));
    let runs_clone = Rc::clone(&runs);
    let sum = call(
        (Param::<i32>::dynamic("x"), constant(10)),
        move |(x, offset)| {
            runs_clone.set(runs_clone.get() + 1);
            x + offset
        },
    );

    let x = Signal::new(1);
    let state = ReactiveState::from_dict(StateDict::new().with("x", x.clone()));
    let var = sum.hydrate(&state).unwrap();

    assert_eq!(var.current(), 11);
    assert_eq!(var.current(), 11);
    assert_eq!(runs.get(), 1);

    x.set(5);
    assert_eq!(var.current(), 15);
    assert_eq!(runs.get(), 2);
    assert_eq!(var.is_const(), Ok(false));
}

/// Test that named inputs are bound during hydration and stay reactive.
#[test]
fn named_inputs_follow_dynamic_keys() {
    let params = ReactiveParameters::new();
    let price: Param<i32> = params.param("price").unwrap();
    let total = params
        .define("total", call(price.clone(), |p| p * 3))
        .unwrap();
    assert_eq!(params.dynamic_keys(), vec!["price".to_string()]);

    let signal = Signal::new(2);
    let state = params
        .hydrate(StateDict::new().with("price", signal.clone()))
        .unwrap();

    let mut renderer = Renderer::new(ArrayMedium::new(0));
    renderer
        .render(&Node::block(vec![Node::atom(price), Node::atom(total)]), &state)
        .unwrap();
    assert_eq!(renderer.output().medium().items(), &[2, 6]);

    signal.set(4);
    renderer.poll().unwrap();
    assert_eq!(renderer.output().medium().items(), &[4, 12]);
}

/// Test that hydration rejects a state of the wrong shape.
#[test]
fn hydration_checks_the_key_set() {
    let params = ReactiveParameters::new();
    let _: Param<i32> = params.param("a").unwrap();

    assert_eq!(
        params.hydrate(StateDict::new()).unwrap_err(),
        BindingError::MissingKey("a".to_string())
    );
    assert_eq!(
        params
            .hydrate(StateDict::new().with_value("a", 1).with_value("b", 2))
            .unwrap_err(),
        BindingError::UnexpectedKey("b".to_string())
    );
}

/// Test that a compiled tree can be run against independent outputs.
#[test]
fn compiled_tree_renders_independently() {
    let x = Signal::new(1);
    let state = ReactiveState::from_dict(StateDict::new().with("x", x.clone()));
    let tree = Node::block(vec![Node::value(0), Node::atom(Param::dynamic("x"))]);
    let evaluate = compile::<ArrayMedium<i32>, _>(&tree, &state).unwrap();

    let mut first = Renderer::new(ArrayMedium::new(-1));
    let mut second = Renderer::new(ArrayMedium::new(-1));
    first.mount(&evaluate).unwrap();
    second.mount(&evaluate).unwrap();
    second.mount(&evaluate).unwrap();

    x.set(7);
    first.poll().unwrap();
    second.poll().unwrap();
    assert_eq!(first.output().medium().items(), &[0, 7]);
    assert_eq!(second.output().medium().items(), &[0, 7, 0, 7]);
}

/// Test that conditional and list content re-render in place between siblings.
#[test]
fn dynamic_content_keeps_siblings_in_place() {
    let show = Signal::new(false);
    let items = Signal::new(vec![1, 2, 3]);
    let label = Signal::new(100);
    let state = ReactiveState::from_dict(
        StateDict::new()
            .with("show", show.clone())
            .with("items", items.clone())
            .with("label", label.clone()),
    );

    let tree = Node::block_with_head(
        0,
        vec![
            Node::when(
                Param::dynamic("show"),
                Node::atom(Param::dynamic("label")),
                Node::empty(),
            ),
            Node::list(Param::dynamic("items")),
            Node::value(99),
        ],
    );
    let mut renderer = Renderer::with_options(
        ArrayMedium::new(-1),
        RenderOptions::default().with_verify_sizes(true),
    );
    renderer.render(&tree, &state).unwrap();
    assert_eq!(renderer.output().medium().items(), &[0, -1, 1, 2, 3, 99]);

    show.set(true);
    items.set(vec![4]);
    renderer.poll().unwrap();
    assert_eq!(renderer.output().medium().items(), &[0, 100, 4, 99]);

    // The label atom inside the shown branch is polled through the slot.
    label.set(101);
    let report = renderer.poll().unwrap();
    assert_eq!(report.replaced, 1);
    assert_eq!(renderer.output().medium().items(), &[0, 101, 4, 99]);

    items.set(Vec::new());
    renderer.poll().unwrap();
    assert_eq!(renderer.output().medium().items(), &[0, 101, -1, 99]);

    let root = renderer.output().root();
    assert_eq!(renderer.output().size(root), Ok(4));
    renderer.output().verify().unwrap();
}

/// Test the structural invariants on the root.
#[test]
fn root_cannot_be_committed_or_cleared() {
    let mut output = Output::new(ArrayMedium::new(0));
    let root = output.root();
    let child = output.begin(root).unwrap();

    assert_eq!(output.commit(child), Ok(root));
    assert_eq!(
        output.commit(root),
        Err(RenderError::Structural(StructuralError::CommitRoot))
    );
    assert_eq!(
        output.clear(root),
        Err(RenderError::Structural(StructuralError::ClearRoot))
    );
}

/// Test that sizes stay consistent through nested appends and clears.
#[test]
fn sizes_add_up_after_every_step() {
    let mut output = Output::new(ArrayMedium::new(0));
    let root = output.root();
    let mut spans = vec![root];

    for step in 0..24 {
        let target = spans[step % spans.len()];
        if output.tree().state(target) != Ok(RangeState::Open) {
            continue;
        }
        if step % 3 == 0 {
            spans.push(output.begin(target).unwrap());
        } else {
            output.append(target, step as i32).unwrap();
        }
        output.verify().unwrap();
    }

    let victim = spans[2];
    output.clear(victim).unwrap();
    output.verify().unwrap();

    let children_total: usize = output
        .children(root)
        .unwrap()
        .iter()
        .map(|child| output.size(*child).unwrap())
        .sum();
    assert_eq!(output.size(root), Ok(children_total));
    assert_eq!(output.size(root), Ok(output.medium().len()));
}

#[derive(Default)]
struct Recorder {
    events: RefCell<Vec<String>>,
}

impl Logger for Recorder {
    fn log(&self, _level: Level, message: &str) {
        self.events.borrow_mut().push(format!("log {message}"));
    }

    fn begin(&self, _level: Level, message: &str) {
        self.events.borrow_mut().push(format!("begin {message}"));
    }

    fn end(&self, _level: Level, message: &str) {
        self.events.borrow_mut().push(format!("end {message}"));
    }
}

/// Test that structure and poll cycles reach a host logger as brackets.
#[test]
fn host_logger_sees_balanced_brackets() {
    let recorder = Rc::new(Recorder::default());
    let mut renderer = Renderer::new(ArrayMedium::new(0)).with_logger(recorder.clone());
    renderer
        .render(
            &Node::block(vec![Node::value(1)]),
            &ReactiveState::default(),
        )
        .unwrap();
    renderer.poll().unwrap();

    let events = recorder.events.borrow();
    let opened = events.iter().filter(|e| e.starts_with("begin")).count();
    let closed = events.iter().filter(|e| e.starts_with("end")).count();
    assert_eq!(opened, closed);
    assert!(events.iter().any(|e| e == "begin poll cycle 1"));
    assert!(events.iter().any(|e| e.starts_with("log cycle => CycleReport")));
}

/// Test that a scheduler can be driven by hand next to its output.
#[test]
fn scheduler_drives_a_bare_output() {
    let value = Signal::new(3);
    let state = ReactiveState::from_dict(StateDict::new().with("v", value.clone()));
    let tree = Node::<i32>::atom(Param::dynamic("v"));
    let evaluate = compile::<ArrayMedium<i32>, _>(&tree, &state).unwrap();

    let mut output = Output::new(ArrayMedium::new(0));
    let root = output.root();
    let mut updaters = Vec::new();
    evaluate.run(&mut output.region(root, &mut updaters)).unwrap();
    let mut scheduler = UpdateScheduler::new();
    scheduler.extend(updaters);

    value.set(8);
    let report = scheduler.poll(&mut output).unwrap();
    assert_eq!(report.cycle, 1);
    assert_eq!(output.medium().items(), &[8]);
    assert_eq!(scheduler.active_count(), 1);
}
