//! Pointer input stage: zoom, pan drags, and rotation drags.

use glam::Vec2;
use vibequest_store::{Action, Interceptor, Store};

/// Consumes camera gestures. Pan speed tracks the current zoom so a drag
/// covers the same screen distance at any magnification.
pub struct InputCeptor {
    drag: Option<Vec2>,
    rotation_drag: Option<Vec2>,
}

impl InputCeptor {
    pub fn new() -> Self {
        InputCeptor {
            drag: None,
            rotation_drag: None,
        }
    }
}

impl Default for InputCeptor {
    fn default() -> Self {
        Self::new()
    }
}

impl Interceptor for InputCeptor {
    fn intercept(&mut self, action: Action, store: &mut Store) -> Option<Action> {
        match action {
            Action::ChangeViewingCameraZoom(zoom) => {
                store.state.viewing_camera.zoom = zoom;
                None
            }
            Action::StartMouseDrag(event) => {
                if event.primary() {
                    self.drag = Some(Vec2::new(event.x, event.y));
                }
                if event.secondary() {
                    self.rotation_drag = Some(Vec2::new(event.x, event.y));
                }
                None
            }
            Action::StopMouseDrag(event) => {
                if !event.primary() {
                    self.drag = None;
                }
                if !event.secondary() {
                    self.rotation_drag = None;
                }
                None
            }
            Action::MoveMouseDrag(event) => {
                let [width, height] = store.state.window_dimensions;
                let (width, height) = (width as f32, height as f32);
                let position = Vec2::new(event.x, event.y);

                if let Some(anchor) = self.drag {
                    let zoom = store.state.viewing_camera.zoom;
                    let width_to_height_ratio = width / height;
                    let move_x = -((position.x - anchor.x) / width) * zoom;
                    let move_y = ((position.y - anchor.y) / height) * zoom / width_to_height_ratio;

                    // Screen axes rotated into world axes.
                    let angle = store.state.viewing_camera.rotation;
                    let (sin, cos) = angle.sin_cos();
                    let x_axis = Vec2::new(cos, sin);
                    let y_axis = Vec2::new(-sin, cos);

                    let camera = &mut store.state.viewing_camera;
                    camera.location.x += move_x * x_axis.x + move_y * y_axis.x;
                    camera.location.y += move_x * x_axis.y + move_y * y_axis.y;

                    self.drag = Some(position);
                } else if let Some(anchor) = self.rotation_drag {
                    store.state.viewing_camera.rotation += (position.x - anchor.x) / width;
                    self.rotation_drag = Some(position);
                }
                None
            }
            other => Some(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibequest_common::PointerEvent;
    use vibequest_store::{State, reduce};

    fn press(buttons: u32, x: f32, y: f32) -> PointerEvent {
        PointerEvent { buttons, x, y }
    }

    fn input_store() -> Store {
        let mut state = State::default();
        state.window_dimensions = [1000, 500];
        Store::new(state, vec![Box::new(InputCeptor::new())], reduce)
    }

    #[test]
    fn zoom_action_sets_the_camera_zoom() {
        let mut store = input_store();
        store.dispatch(Action::ChangeViewingCameraZoom(0.25));
        assert_eq!(store.state.viewing_camera.zoom, 0.25);
    }

    #[test]
    fn primary_drag_pans_against_pointer_motion() {
        let mut store = input_store();
        store.state.viewing_camera.rotation = 0.0;
        store.state.viewing_camera.zoom = 1.0;
        let start = store.state.viewing_camera.location;

        store.dispatch(Action::StartMouseDrag(press(1, 100.0, 100.0)));
        store.dispatch(Action::MoveMouseDrag(press(1, 200.0, 100.0)));

        let moved = store.state.viewing_camera.location;
        // 100px right over a 1000px window at zoom 1 pans x by -0.1.
        assert!((moved.x - (start.x - 0.1)).abs() < 1e-6);
        assert!((moved.y - start.y).abs() < 1e-6);
    }

    #[test]
    fn vertical_drag_scales_with_aspect_ratio() {
        let mut store = input_store();
        store.state.viewing_camera.rotation = 0.0;
        store.state.viewing_camera.zoom = 1.0;
        let start = store.state.viewing_camera.location;

        store.dispatch(Action::StartMouseDrag(press(1, 100.0, 100.0)));
        store.dispatch(Action::MoveMouseDrag(press(1, 100.0, 200.0)));

        let moved = store.state.viewing_camera.location;
        // 100px down over a 500px-tall window, divided by the 2.0 aspect.
        assert!((moved.y - (start.y + 0.1)).abs() < 1e-6);
        assert!((moved.x - start.x).abs() < 1e-6);
    }

    #[test]
    fn secondary_drag_rotates() {
        let mut store = input_store();
        let start = store.state.viewing_camera.rotation;

        store.dispatch(Action::StartMouseDrag(press(2, 100.0, 100.0)));
        store.dispatch(Action::MoveMouseDrag(press(2, 350.0, 100.0)));

        assert!((store.state.viewing_camera.rotation - (start + 0.25)).abs() < 1e-6);
    }

    #[test]
    fn releasing_the_button_ends_the_drag() {
        let mut store = input_store();
        store.state.viewing_camera.zoom = 1.0;
        store.dispatch(Action::StartMouseDrag(press(1, 100.0, 100.0)));
        store.dispatch(Action::StopMouseDrag(press(0, 100.0, 100.0)));
        let before = store.state.viewing_camera.location;
        store.dispatch(Action::MoveMouseDrag(press(0, 400.0, 100.0)));
        assert_eq!(store.state.viewing_camera.location, before);
    }
}
