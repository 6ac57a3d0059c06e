//! Reactive Context
//!
//! The reactive context records which cells the running computation reads.
//!
//! # Implementation
//!
//! We use a thread-local stack of frames. Entering a computation pushes an empty
//! frame; every tracked read lands in the top frame; finishing the computation
//! pops the frame and hands back its Tag.
//!
//! Frames nest. A cached computation that answers from its cache inside another
//! computation forwards its own Tag to the enclosing frame, so the outer
//! computation depends on everything the inner one read.

use std::cell::RefCell;
use std::rc::Rc;

use super::tag::{Tag, Tracked};

thread_local! {
    static FRAME_STACK: RefCell<Vec<Tag>> = const { RefCell::new(Vec::new()) };
}

/// Guard for one tracking frame.
///
/// Pops its frame when dropped, so the stack stays balanced even if the
/// computation panics.
pub struct ReactiveContext {
    depth: usize,
    finished: bool,
}

impl ReactiveContext {
    /// Push a new, empty frame.
    pub fn enter() -> Self {
        let depth = FRAME_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            stack.push(Tag::constant());
            stack.len()
        });

        Self {
            depth,
            finished: false,
        }
    }

    /// Pop this frame and return everything read inside it.
    pub fn finish(mut self) -> Tag {
        self.finished = true;
        self.pop()
    }

    fn pop(&self) -> Tag {
        FRAME_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            debug_assert_eq!(
                stack.len(),
                self.depth,
                "ReactiveContext mismatch: frame {} popped at depth {}",
                self.depth,
                stack.len()
            );
            stack.pop().unwrap_or_default()
        })
    }

    /// Check if a frame is active.
    pub fn is_active() -> bool {
        FRAME_STACK.with(|stack| !stack.borrow().is_empty())
    }

    /// Record a read of `source` in the top frame, if any.
    pub fn track(source: Rc<dyn Tracked>) {
        FRAME_STACK.with(|stack| {
            if let Some(frame) = stack.borrow_mut().last_mut() {
                frame.record(source);
            }
        });
    }

    /// Record every read of `tag` in the top frame, if any.
    pub fn track_tag(tag: &Tag) {
        if tag.is_const() {
            return;
        }
        FRAME_STACK.with(|stack| {
            if let Some(frame) = stack.borrow_mut().last_mut() {
                frame.absorb(tag);
            }
        });
    }

    /// Run `f` without recording its reads anywhere.
    pub fn untracked<R>(f: impl FnOnce() -> R) -> R {
        let frame = Self::enter();
        let result = f();
        drop(frame);
        result
    }
}

impl Drop for ReactiveContext {
    fn drop(&mut self) {
        if !self.finished {
            self.pop();
        }
    }
}
