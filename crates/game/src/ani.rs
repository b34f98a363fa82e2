//! Animation stage: advances timed animations on render ticks and turns
//! focus requests into camera fly-to animations.

use vibequest_store::{Action, Animation, Interceptor, Store, smooth_blend};

const FOCUS_ANIMATION_SECONDS: f32 = 0.5;
const FOCUS_END_ZOOM: f32 = 0.2;

pub struct AniCeptor;

impl Interceptor for AniCeptor {
    fn intercept(&mut self, action: Action, store: &mut Store) -> Option<Action> {
        match action {
            Action::Render(delta) => {
                // Detach the animation list so apply closures may dispatch
                // freely; anything a completion spawned lands in the state
                // and is re-appended afterwards.
                let mut animations = std::mem::take(&mut store.state.active_animations);
                animations.retain_mut(|animation| animation.advance(store, delta));
                let mut spawned = std::mem::take(&mut store.state.active_animations);
                animations.append(&mut spawned);
                store.state.active_animations = animations;
                Some(Action::Render(delta))
            }
            Action::StartFocusPoiAnimation(index) => {
                let Some(poi) = store.state.points_of_interest.get(index) else {
                    tracing::warn!(index, "focus request for unknown point of interest");
                    return None;
                };
                let start_location = store.state.viewing_camera.location;
                let start_zoom = store.state.viewing_camera.zoom;
                let end_location = poi.location;

                store.state.active_animations.push(
                    Animation::new(FOCUS_ANIMATION_SECONDS, move |store, pct| {
                        let t = smooth_blend(pct);
                        store.state.viewing_camera.zoom =
                            FOCUS_END_ZOOM * t + (1.0 - t) * start_zoom;
                        store.state.viewing_camera.location =
                            end_location * t + start_location * (1.0 - t);
                    })
                    .with_completion(move |store| store.dispatch(Action::OpenGameModal(index))),
                );
                None
            }
            other => Some(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use vibequest_common::PointOfInterest;
    use vibequest_store::{State, reduce};

    fn store_with_poi() -> Store {
        let mut state = State::default();
        state.points_of_interest.push(PointOfInterest {
            location: Vec3::new(0.8, 0.3, 0.2),
            label: "somewhere".into(),
        });
        Store::new(state, vec![Box::new(AniCeptor)], reduce)
    }

    #[test]
    fn focus_request_queues_an_animation_and_halts() {
        let mut store = store_with_poi();
        store.dispatch(Action::StartFocusPoiAnimation(0));
        assert_eq!(store.state.active_animations.len(), 1);
    }

    #[test]
    fn focus_animation_lands_on_the_target_and_zoom() {
        let mut store = store_with_poi();
        store.dispatch(Action::StartFocusPoiAnimation(0));
        // One tick past the full length finishes the flight.
        store.dispatch(Action::Render(0.6));
        assert!(store.state.active_animations.is_empty());
        let camera = &store.state.viewing_camera;
        assert!((camera.location - Vec3::new(0.8, 0.3, 0.2)).length() < 1e-5);
        assert!((camera.zoom - 0.2).abs() < 1e-5);
    }

    #[test]
    fn partial_tick_moves_the_camera_toward_the_target() {
        let mut store = store_with_poi();
        let start = store.state.viewing_camera.location;
        store.dispatch(Action::StartFocusPoiAnimation(0));
        store.dispatch(Action::Render(0.25));
        assert_eq!(store.state.active_animations.len(), 1);
        let moved = store.state.viewing_camera.location;
        assert_ne!(moved, start);
        assert!((moved - Vec3::new(0.8, 0.3, 0.2)).length() < (start - moved).length() * 100.0);
    }

    #[test]
    fn unknown_poi_index_is_dropped() {
        let mut store = store_with_poi();
        store.dispatch(Action::StartFocusPoiAnimation(7));
        assert!(store.state.active_animations.is_empty());
    }
}
