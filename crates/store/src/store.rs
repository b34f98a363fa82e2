//! Dispatch engine: interceptor chain, reducer, and change-detecting
//! subscriptions.
//!
//! Interceptors run in registration order and may transform an action,
//! halt it, or synchronously dispatch further actions. A nested dispatch
//! re-walks the chain; the interceptor currently executing is skipped in
//! that inner walk (its slot is vacated for the duration of its own call,
//! and a vacated slot passes actions through unchanged).

use std::cell::RefCell;
use std::rc::Rc;

use crate::action::Action;
use crate::state::State;

/// A stage in the dispatch chain. Returning `None` halts the action;
/// returning `Some` forwards it (possibly transformed) to the next stage.
pub trait Interceptor {
    fn intercept(&mut self, action: Action, store: &mut Store) -> Option<Action>;
}

/// Final state transition for actions that survive the whole chain.
pub type Reducer = fn(Action, &mut State);

/// The default reducer. Interceptors own almost every transition; the
/// reducer only records window geometry.
pub fn reduce(action: Action, state: &mut State) {
    if let Action::ChangeWindowSize(dims) = action {
        state.window_dimensions = dims;
    }
}

pub trait Subscription {
    fn process(&mut self, state: &State);
}

/// Handle returned by [`Store::subscribe`], used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

/// Change-detecting subscription: extracts a value from the state and
/// invokes the callback only when the extracted value differs from the
/// previously delivered one.
pub struct Selector<T> {
    extract: Box<dyn Fn(&State) -> T>,
    callback: Box<dyn FnMut(&T)>,
    last: Option<T>,
}

impl<T: PartialEq> Selector<T> {
    pub fn new(
        extract: impl Fn(&State) -> T + 'static,
        callback: impl FnMut(&T) + 'static,
    ) -> Self {
        Selector {
            extract: Box::new(extract),
            callback: Box::new(callback),
            last: None,
        }
    }
}

impl<T: PartialEq> Subscription for Selector<T> {
    fn process(&mut self, state: &State) {
        let value = (self.extract)(state);
        if self.last.as_ref() != Some(&value) {
            (self.callback)(&value);
            self.last = Some(value);
        }
    }
}

pub struct Store {
    pub state: State,
    interceptors: Vec<Option<Box<dyn Interceptor>>>,
    reducer: Reducer,
    subscribers: Vec<(SubscriptionId, Box<dyn Subscription>)>,
    next_subscription_id: u64,
}

impl Store {
    pub fn new(state: State, interceptors: Vec<Box<dyn Interceptor>>, reducer: Reducer) -> Self {
        Store {
            state,
            interceptors: interceptors.into_iter().map(Some).collect(),
            reducer,
            subscribers: Vec::new(),
            next_subscription_id: 0,
        }
    }

    /// Run `action` through the chain, the reducer, and the subscriptions.
    ///
    /// Safe to call re-entrantly from inside an interceptor; the inner
    /// dispatch completes before the outer chain resumes.
    pub fn dispatch(&mut self, action: Action) {
        tracing::trace!(action = action.name(), "dispatch");
        let mut current = Some(action);
        for i in 0..self.interceptors.len() {
            let Some(action) = current.take() else {
                break;
            };
            match self.interceptors[i].take() {
                Some(mut ceptor) => {
                    current = ceptor.intercept(action, self);
                    self.interceptors[i] = Some(ceptor);
                }
                // Vacated by an outer dispatch frame currently inside this
                // interceptor; pass through.
                None => current = Some(action),
            }
        }
        if let Some(action) = current {
            (self.reducer)(action, &mut self.state);
        }
        // Subscriptions see the state after every dispatch, halted or not;
        // change detection keeps quiet calls cheap.
        self.notify();
    }

    /// Register a subscription. It is processed once immediately so the
    /// subscriber starts from the current state.
    pub fn subscribe(&mut self, mut subscription: Box<dyn Subscription>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription_id);
        self.next_subscription_id += 1;
        subscription.process(&self.state);
        self.subscribers.push((id, subscription));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sid, _)| *sid != id);
    }

    fn notify(&mut self) {
        for (_, subscription) in &mut self.subscribers {
            subscription.process(&self.state);
        }
    }
}

/// Attribute value pushed to a [`PropSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Number(f64),
    Flag(bool),
    Text(String),
    TextList(Vec<String>),
}

/// Receiver for derived view attributes, the boundary between the store
/// and whatever surface displays them.
pub trait PropSink {
    fn set_attribute(&mut self, key: &str, value: &PropValue);
}

/// Bind named extractors to a sink. Each binding becomes its own selector,
/// so an attribute is pushed only when its value actually changes.
pub fn map_to_props(
    store: &mut Store,
    sink: Rc<RefCell<dyn PropSink>>,
    bindings: Vec<(&'static str, Box<dyn Fn(&State) -> PropValue>)>,
) -> Vec<SubscriptionId> {
    bindings
        .into_iter()
        .map(|(key, extract)| {
            let sink = sink.clone();
            store.subscribe(Box::new(Selector::new(
                move |state: &State| extract(state),
                move |value: &PropValue| sink.borrow_mut().set_attribute(key, value),
            )))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LogCeptor {
        tag: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Interceptor for LogCeptor {
        fn intercept(&mut self, action: Action, _store: &mut Store) -> Option<Action> {
            self.log.borrow_mut().push(format!("{}:{}", self.tag, action.name()));
            Some(action)
        }
    }

    struct HaltCeptor {
        bump_points: bool,
    }

    impl Interceptor for HaltCeptor {
        fn intercept(&mut self, action: Action, store: &mut Store) -> Option<Action> {
            if let Action::ChangeViewingCameraZoom(zoom) = action {
                if self.bump_points {
                    store.state.point_count += 1;
                }
                store.state.viewing_camera.zoom = zoom;
                return None;
            }
            Some(action)
        }
    }

    struct NestedCeptor;

    impl Interceptor for NestedCeptor {
        fn intercept(&mut self, action: Action, store: &mut Store) -> Option<Action> {
            if matches!(action, Action::Render(_)) {
                store.dispatch(Action::ChangeWindowSize([64, 48]));
            }
            Some(action)
        }
    }

    fn log_store(log: &Rc<RefCell<Vec<String>>>, tags: &[&'static str]) -> Store {
        let interceptors = tags
            .iter()
            .map(|tag| {
                Box::new(LogCeptor {
                    tag,
                    log: log.clone(),
                }) as Box<dyn Interceptor>
            })
            .collect();
        Store::new(State::default(), interceptors, reduce)
    }

    #[test]
    fn interceptors_run_in_registration_order_then_reducer() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut store = log_store(&log, &["a", "b"]);
        store.dispatch(Action::ChangeWindowSize([320, 200]));
        assert_eq!(
            *log.borrow(),
            vec!["a:change-window-size", "b:change-window-size"]
        );
        assert_eq!(store.state.window_dimensions, [320, 200]);
    }

    #[test]
    fn halt_skips_later_stages_and_the_reducer() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut store = Store::new(
            State::default(),
            vec![
                Box::new(HaltCeptor { bump_points: false }),
                Box::new(LogCeptor {
                    tag: "after",
                    log: log.clone(),
                }),
            ],
            reduce,
        );
        let before = store.state.window_dimensions;
        store.dispatch(Action::ChangeViewingCameraZoom(0.8));
        assert!(log.borrow().is_empty());
        assert_eq!(store.state.viewing_camera.zoom, 0.8);
        assert_eq!(store.state.window_dimensions, before);
    }

    #[test]
    fn halted_dispatch_still_notifies_subscriptions() {
        let mut store = Store::new(
            State::default(),
            vec![Box::new(HaltCeptor { bump_points: false })],
            reduce,
        );
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        store.subscribe(Box::new(Selector::new(
            |state: &State| state.viewing_camera.zoom,
            move |zoom: &f32| sink.borrow_mut().push(*zoom),
        )));
        store.dispatch(Action::ChangeViewingCameraZoom(1.5));
        // Initial delivery on subscribe plus one change.
        assert_eq!(*seen.borrow(), vec![0.6, 1.5]);
    }

    #[test]
    fn nested_dispatch_completes_before_the_outer_chain_resumes() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut store = Store::new(
            State::default(),
            vec![
                Box::new(LogCeptor {
                    tag: "a",
                    log: log.clone(),
                }),
                Box::new(NestedCeptor),
                Box::new(LogCeptor {
                    tag: "b",
                    log: log.clone(),
                }),
            ],
            reduce,
        );
        store.dispatch(Action::Render(0.016));
        // The nested action walks the whole chain (the dispatching stage's
        // vacated slot passes it through) before the outer action reaches b.
        assert_eq!(
            *log.borrow(),
            vec!["a:render", "a:change-window-size", "b:change-window-size", "b:render"]
        );
        assert_eq!(store.state.window_dimensions, [64, 48]);
    }

    #[test]
    fn selector_fires_once_per_distinct_value() {
        let mut store = Store::new(State::default(), Vec::new(), reduce);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        store.subscribe(Box::new(Selector::new(
            |state: &State| state.window_dimensions,
            move |dims: &[u32; 2]| sink.borrow_mut().push(*dims),
        )));
        let initial = store.state.window_dimensions;
        store.dispatch(Action::ChangeWindowSize([100, 100]));
        store.dispatch(Action::ChangeWindowSize([100, 100]));
        store.dispatch(Action::ChangeWindowSize([200, 100]));
        assert_eq!(*seen.borrow(), vec![initial, [100, 100], [200, 100]]);
    }

    #[test]
    fn unsubscribed_selector_stops_receiving() {
        let mut store = Store::new(State::default(), Vec::new(), reduce);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let id = store.subscribe(Box::new(Selector::new(
            |state: &State| state.window_dimensions,
            move |dims: &[u32; 2]| sink.borrow_mut().push(*dims),
        )));
        store.unsubscribe(id);
        store.dispatch(Action::ChangeWindowSize([5, 5]));
        assert_eq!(seen.borrow().len(), 1);
    }

    struct RecordingSink {
        records: Vec<(String, PropValue)>,
    }

    impl PropSink for RecordingSink {
        fn set_attribute(&mut self, key: &str, value: &PropValue) {
            self.records.push((key.to_string(), value.clone()));
        }
    }

    #[test]
    fn map_to_props_pushes_initial_values_and_changes() {
        let mut store = Store::new(State::default(), Vec::new(), reduce);
        let sink = Rc::new(RefCell::new(RecordingSink {
            records: Vec::new(),
        }));
        map_to_props(
            &mut store,
            sink.clone(),
            vec![
                (
                    "width",
                    Box::new(|state: &State| PropValue::Number(state.window_dimensions[0] as f64)),
                ),
                (
                    "modal-active",
                    Box::new(|state: &State| PropValue::Flag(state.view_modal.active)),
                ),
            ],
        );
        store.dispatch(Action::ChangeWindowSize([640, 480]));
        let records = &sink.borrow().records;
        assert_eq!(records.len(), 3);
        assert_eq!(records[2], ("width".to_string(), PropValue::Number(640.0)));
    }
}
