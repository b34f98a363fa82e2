//! Timed animations driven by frame ticks.
//!
//! Animations live in [`State::active_animations`] but are drained out of
//! the state before being advanced, so their apply closures may freely
//! dispatch against the store.
//!
//! [`State::active_animations`]: crate::State

use crate::store::Store;

/// Smooth zero-derivative blend: `f(t) / (f(t) + f(1 - t))` with
/// `f(x) = e^(-1/x)`. Flat at both endpoints to arbitrary order.
pub fn smooth_blend(t: f32) -> f32 {
    fn f(x: f32) -> f32 {
        if x <= 0.0 { 0.0 } else { (-1.0 / x).exp() }
    }
    let a = f(t);
    let b = f(1.0 - t);
    if a + b == 0.0 { 0.0 } else { a / (a + b) }
}

pub struct Animation {
    /// Total duration in seconds.
    length: f32,
    elapsed: f32,
    /// Called each tick with completion clamped to `0.0..=1.0`.
    apply: Box<dyn FnMut(&mut Store, f32)>,
    on_complete: Option<Box<dyn FnOnce(&mut Store)>>,
}

impl Animation {
    pub fn new(length: f32, apply: impl FnMut(&mut Store, f32) + 'static) -> Self {
        Animation {
            length,
            elapsed: 0.0,
            apply: Box::new(apply),
            on_complete: None,
        }
    }

    pub fn with_completion(mut self, on_complete: impl FnOnce(&mut Store) + 'static) -> Self {
        self.on_complete = Some(Box::new(on_complete));
        self
    }

    /// Advance by `delta` seconds and apply. Returns `false` once finished;
    /// the completion callback runs on the tick that crosses the end.
    pub fn advance(&mut self, store: &mut Store, delta: f32) -> bool {
        self.elapsed += delta;
        let pct = (self.elapsed / self.length).min(1.0);
        (self.apply)(store, pct);
        if self.elapsed >= self.length {
            if let Some(done) = self.on_complete.take() {
                done(store);
            }
            return false;
        }
        true
    }
}

impl std::fmt::Debug for Animation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animation")
            .field("length", &self.length)
            .field("elapsed", &self.elapsed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Store, reduce};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn blend_is_clamped_and_monotonic() {
        assert_eq!(smooth_blend(0.0), 0.0);
        assert_eq!(smooth_blend(1.0), 1.0);
        assert!((smooth_blend(0.5) - 0.5).abs() < 1e-6);
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = smooth_blend(i as f32 / 100.0);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn animation_applies_clamped_completion_then_finishes() {
        let mut store = Store::new(Default::default(), Vec::new(), reduce);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut anim = Animation::new(1.0, move |_, pct| sink.borrow_mut().push(pct));

        assert!(anim.advance(&mut store, 0.25));
        assert!(anim.advance(&mut store, 0.5));
        // Overshoot clamps to 1.0 and ends the animation.
        assert!(!anim.advance(&mut store, 0.5));
        assert_eq!(*seen.borrow(), vec![0.25, 0.75, 1.0]);
    }

    #[test]
    fn completion_callback_runs_exactly_once_at_the_end() {
        let mut store = Store::new(Default::default(), Vec::new(), reduce);
        let fired = Rc::new(RefCell::new(0));
        let flag = fired.clone();
        let mut anim =
            Animation::new(0.5, |_, _| {}).with_completion(move |_| *flag.borrow_mut() += 1);

        assert!(anim.advance(&mut store, 0.2));
        assert_eq!(*fired.borrow(), 0);
        assert!(!anim.advance(&mut store, 0.4));
        assert_eq!(*fired.borrow(), 1);
    }
}
