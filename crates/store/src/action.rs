//! Actions understood by the dispatch engine.

use glam::Vec2;
use vibequest_common::{PointerEvent, Song};

/// Every user gesture, timer tick, and worker result enters the store as
/// one of these.
#[derive(Debug, Clone)]
pub enum Action {
    /// Frame tick carrying the elapsed seconds since the previous tick.
    Render(f32),
    ChangeViewingCameraZoom(f32),
    StartMouseDrag(PointerEvent),
    StopMouseDrag(PointerEvent),
    MoveMouseDrag(PointerEvent),
    /// Begin the fly-to animation toward the indexed point of interest.
    StartFocusPoiAnimation(usize),
    OpenGameModal(usize),
    CloseGameModal,
    /// Player picked an answer in the open modal.
    ChooseCategory(usize),
    /// Kick off the song catalog download on a worker.
    LoadSongs,
    /// Worker result: parsed songs plus their normalized map positions.
    LoadSongsFinished(Vec<Song>, Vec<Vec2>),
    /// Kick off the audio preview lookup for the indexed song.
    LoadAudioPreview(usize),
    /// Worker result: preview URI for the indexed song, if one was found.
    LoadAudioPreviewFinished(usize, Option<String>),
    /// Regenerate the island and all prop poses from current songs.
    RebuildWorld,
    /// Regroup tower poses into per-category flag buckets.
    UpdateTowerFlag,
    ChangeWindowSize([u32; 2]),
}

impl Action {
    /// Stable lowercase name, used for log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Render(_) => "render",
            Action::ChangeViewingCameraZoom(_) => "change-viewing-camera-zoom",
            Action::StartMouseDrag(_) => "start-mouse-drag",
            Action::StopMouseDrag(_) => "stop-mouse-drag",
            Action::MoveMouseDrag(_) => "move-mouse-drag",
            Action::StartFocusPoiAnimation(_) => "start-focus-poi-animation",
            Action::OpenGameModal(_) => "open-game-modal",
            Action::CloseGameModal => "close-game-modal",
            Action::ChooseCategory(_) => "choose-category",
            Action::LoadSongs => "load-songs",
            Action::LoadSongsFinished(..) => "load-songs-finished",
            Action::LoadAudioPreview(_) => "load-audio-preview",
            Action::LoadAudioPreviewFinished(..) => "load-audio-preview-finished",
            Action::RebuildWorld => "rebuild-world",
            Action::UpdateTowerFlag => "update-tower-flag",
            Action::ChangeWindowSize(_) => "change-window-size",
        }
    }
}
