use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Placement of one voxel model instance in normalized world space.
///
/// Locations live in the unit square horizontally; the vertical component
/// is pre-scaled by the world height scale so renderers consume it as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectPose {
    pub location: Vec3,
    /// Rotation about the vertical axis, radians.
    pub rotation: f32,
    /// Non-uniform scale per axis.
    pub scale: Vec3,
}

impl ObjectPose {
    pub fn new(location: Vec3, rotation: f32, scale: Vec3) -> Self {
        Self {
            location,
            rotation,
            scale,
        }
    }
}

/// A world-anchored, labeled location tied to one quiz song.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub location: Vec3,
    pub label: String,
}

/// One quiz song. Mutated in place when its question is answered; never
/// removed from the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    /// Index of the answered category, `None` while undecided.
    pub done: Option<usize>,
    /// Points earned per category choice.
    pub points: Vec<u32>,
    /// Display names offered in the quiz modal.
    pub choices: Vec<String>,
    pub name: String,
    pub artist: String,
    pub lyrics: String,
}

impl Song {
    /// Index of the highest-scoring category.
    pub fn best_category(&self) -> usize {
        self.points
            .iter()
            .enumerate()
            .max_by_key(|(_, p)| **p)
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

/// Pointer state delivered by the host, decoupled from any window toolkit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Pressed-button bitmask: bit 0 primary, bit 1 secondary.
    pub buttons: u32,
    pub x: f32,
    pub y: f32,
}

impl PointerEvent {
    pub fn primary(&self) -> bool {
        self.buttons & 1 != 0
    }

    pub fn secondary(&self) -> bool {
        self.buttons & 2 != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(points: Vec<u32>) -> Song {
        Song {
            done: None,
            points,
            choices: vec![],
            name: "a".into(),
            artist: "b".into(),
            lyrics: String::new(),
        }
    }

    #[test]
    fn best_category_picks_argmax() {
        assert_eq!(song(vec![3, 1, 0, 0, 0, 6]).best_category(), 5);
        assert_eq!(song(vec![1, 0, 0]).best_category(), 0);
    }

    #[test]
    fn pointer_button_bits() {
        let e = PointerEvent {
            buttons: 0b11,
            x: 0.0,
            y: 0.0,
        };
        assert!(e.primary());
        assert!(e.secondary());
        let e = PointerEvent {
            buttons: 0b10,
            x: 0.0,
            y: 0.0,
        };
        assert!(!e.primary());
        assert!(e.secondary());
    }
}
