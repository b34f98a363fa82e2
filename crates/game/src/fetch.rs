//! Catalog fetch stage: talks to the quiz backend on worker threads and
//! feeds results back through the action channel.

use std::sync::mpsc::Sender;
use std::thread;

use glam::Vec2;
use serde::Deserialize;
use vibequest_common::{Song, config};
use vibequest_store::{Action, Interceptor, Store};

use crate::catalog;

/// A song as the backend serves it.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendSong {
    pub classname: String,
    pub name: String,
    pub author: String,
    pub lyrics: String,
    pub tsne_vector: [f32; 2],
}

#[derive(Debug, Deserialize)]
struct PreviewResponse {
    uri: String,
}

/// Margin kept free around the map edge when normalizing song positions.
const MAP_BORDER: f32 = 0.1;

/// Turn backend songs into quiz songs plus normalized island positions.
///
/// Positions are squeezed into the unit square with a border on every
/// side. A degenerate axis (all songs at one value) centers instead.
pub fn process_response_body(body: &[BackendSong]) -> (Vec<Song>, Vec<Vec2>) {
    let songs = body
        .iter()
        .map(|backend| Song {
            done: None,
            // One point for the true category, nothing anywhere else.
            points: config::BACKEND_CATEGORY_CODES
                .iter()
                .map(|code| u32::from(*code == backend.classname))
                .collect(),
            choices: config::CATEGORY_DISPLAY_NAMES
                .iter()
                .map(|name| name.to_string())
                .collect(),
            name: backend.name.clone(),
            artist: backend.author.clone(),
            lyrics: backend.lyrics.clone(),
        })
        .collect();

    let normalize_axis = |select: fn(&BackendSong) -> f32| {
        let min = body.iter().map(select).fold(f32::INFINITY, f32::min);
        let max = body.iter().map(select).fold(f32::NEG_INFINITY, f32::max);
        move |value: f32| {
            let norm = if max > min {
                (value - min) / (max - min)
            } else {
                0.5
            };
            norm * (1.0 - 2.0 * MAP_BORDER) + MAP_BORDER
        }
    };
    let norm_x = normalize_axis(|song| song.tsne_vector[0]);
    let norm_y = normalize_axis(|song| song.tsne_vector[1]);

    let positions = body
        .iter()
        .map(|song| {
            Vec2::new(
                norm_x(song.tsne_vector[0]),
                norm_y(song.tsne_vector[1]),
            )
        })
        .collect();

    (songs, positions)
}

/// Fetches the song catalog and audio previews. Requests run on worker
/// threads; results come back as actions over the channel the host drains
/// between dispatches.
pub struct SongCatalogCeptor {
    api_base: String,
    offline: bool,
    tx: Sender<Action>,
}

impl SongCatalogCeptor {
    pub fn new(api_base: impl Into<String>, offline: bool, tx: Sender<Action>) -> Self {
        SongCatalogCeptor {
            api_base: api_base.into(),
            offline,
            tx,
        }
    }

    fn spawn_catalog_request(&self) {
        if self.offline {
            let (songs, positions) = process_response_body(&catalog::demo_catalog());
            let _ = self.tx.send(Action::LoadSongsFinished(songs, positions));
            return;
        }
        let url = format!("{}/api/songs", self.api_base);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let response = match ureq::get(&url).call() {
                Ok(response) => response,
                Err(err) => {
                    tracing::warn!(%err, url, "song catalog request failed");
                    return;
                }
            };
            match response.into_json::<Vec<BackendSong>>() {
                Ok(body) => {
                    tracing::info!(songs = body.len(), "song catalog loaded");
                    let (songs, positions) = process_response_body(&body);
                    let _ = tx.send(Action::LoadSongsFinished(songs, positions));
                }
                Err(err) => tracing::warn!(%err, "song catalog body was not valid JSON"),
            }
        });
    }

    fn spawn_preview_request(&self, index: usize, name: String, artist: String) {
        if self.offline {
            let _ = self.tx.send(Action::LoadAudioPreviewFinished(index, None));
            return;
        }
        let url = format!("{}/spsearch", self.api_base);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let response = ureq::get(&url)
                .query("artist", &artist)
                .query("songname", &name)
                .call();
            let uri = match response {
                Ok(response) => match response.into_json::<PreviewResponse>() {
                    Ok(preview) => Some(preview.uri),
                    Err(err) => {
                        tracing::warn!(%err, name, "audio preview body was not valid JSON");
                        None
                    }
                },
                Err(err) => {
                    tracing::warn!(%err, name, "audio preview lookup failed");
                    None
                }
            };
            let _ = tx.send(Action::LoadAudioPreviewFinished(index, uri));
        });
    }
}

impl Interceptor for SongCatalogCeptor {
    fn intercept(&mut self, action: Action, store: &mut Store) -> Option<Action> {
        match action {
            Action::LoadSongs => {
                self.spawn_catalog_request();
                None
            }
            Action::LoadSongsFinished(songs, positions) => {
                store.state.songs = songs;
                store.state.flat_positions = positions;
                store.dispatch(Action::RebuildWorld);
                None
            }
            Action::LoadAudioPreview(index) => {
                if let Some(song) = store.state.songs.get(index) {
                    self.spawn_preview_request(index, song.name.clone(), song.artist.clone());
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

    fn backend_song(classname: &str, x: f32, y: f32) -> BackendSong {
        BackendSong {
            classname: classname.into(),
            name: "song".into(),
            author: "author".into(),
            lyrics: "words".into(),
            tsne_vector: [x, y],
        }
    }

    #[test]
    fn points_reward_only_the_true_category() {
        let (songs, _) = process_response_body(&[backend_song("party", 0.0, 0.0)]);
        let party = config::BACKEND_CATEGORY_CODES
            .iter()
            .position(|code| *code == "party")
            .unwrap();
        for (i, points) in songs[0].points.iter().enumerate() {
            assert_eq!(*points, u32::from(i == party));
        }
        assert_eq!(songs[0].choices.len(), config::CATEGORY_DISPLAY_NAMES.len());
    }

    #[test]
    fn unknown_category_earns_no_points_anywhere() {
        let (songs, _) = process_response_body(&[backend_song("polka", 0.0, 0.0)]);
        assert!(songs[0].points.iter().all(|points| *points == 0));
    }

    #[test]
    fn positions_are_normalized_inside_the_border() {
        let body = vec![
            backend_song("party", -40.0, 3.0),
            backend_song("loneliness", 55.0, -12.0),
            backend_song("aggressive", 7.0, 30.0),
        ];
        let (_, positions) = process_response_body(&body);
        for position in &positions {
            assert!(position.x >= MAP_BORDER - 1e-6 && position.x <= 1.0 - MAP_BORDER + 1e-6);
            assert!(position.y >= MAP_BORDER - 1e-6 && position.y <= 1.0 - MAP_BORDER + 1e-6);
        }
        // Extremes land exactly on the border.
        assert!((positions[0].x - MAP_BORDER).abs() < 1e-6);
        assert!((positions[1].x - (1.0 - MAP_BORDER)).abs() < 1e-6);
    }

    #[test]
    fn single_song_sits_at_the_map_center() {
        let (_, positions) = process_response_body(&[backend_song("party", 123.0, -7.0)]);
        assert!((positions[0].x - 0.5).abs() < 1e-6);
        assert!((positions[0].y - 0.5).abs() < 1e-6);
    }
}
