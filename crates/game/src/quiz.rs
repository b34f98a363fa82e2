//! Quiz rules: the modal lifecycle and scoring.

use vibequest_store::{Action, Interceptor, Store, ViewModal};

pub struct GameCeptor;

impl Interceptor for GameCeptor {
    fn intercept(&mut self, action: Action, store: &mut Store) -> Option<Action> {
        match action {
            Action::CloseGameModal => {
                store.state.view_modal = ViewModal::default();
                None
            }
            Action::OpenGameModal(index) => {
                let Some(song) = store.state.songs.get(index) else {
                    tracing::warn!(index, "modal requested for unknown song");
                    return None;
                };
                store.state.view_modal = ViewModal {
                    active: true,
                    song_index: index,
                    song_name: song.name.clone(),
                    artist: song.artist.clone(),
                    lyrics: song.lyrics.clone(),
                    choices: song.choices.clone(),
                    correct_choice: song.best_category(),
                    done: song.done,
                    points: song.done.map(|choice| song.points[choice]).unwrap_or(0),
                    audio_uri: None,
                };
                store.dispatch(Action::LoadAudioPreview(index));
                None
            }
            Action::ChooseCategory(choice) => {
                let index = store.state.view_modal.song_index;
                let Some(song) = store.state.songs.get_mut(index) else {
                    tracing::warn!(index, "category chosen with no song in the modal");
                    return None;
                };
                let Some(&points) = song.points.get(choice) else {
                    tracing::warn!(choice, "category choice out of range");
                    return None;
                };
                song.done = Some(choice);
                store.state.view_modal.done = Some(choice);
                store.state.view_modal.points = points;
                store.state.point_count += points;
                store.dispatch(Action::UpdateTowerFlag);
                None
            }
            Action::LoadAudioPreviewFinished(index, uri) => {
                let modal = &mut store.state.view_modal;
                if modal.active && modal.song_index == index {
                    modal.audio_uri = uri;
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
    use vibequest_common::Song;
    use vibequest_store::{State, reduce};

    fn sample_song(name: &str, correct: usize) -> Song {
        let mut points = vec![0; 7];
        points[correct] = 1;
        Song {
            done: None,
            points,
            choices: (0..7).map(|i| format!("category {i}")).collect(),
            name: name.into(),
            artist: "artist".into(),
            lyrics: "la la".into(),
        }
    }

    fn quiz_store() -> Store {
        let mut state = State::default();
        state.songs.push(sample_song("first", 2));
        state.songs.push(sample_song("second", 5));
        Store::new(state, vec![Box::new(GameCeptor)], reduce)
    }

    #[test]
    fn opening_the_modal_fills_it_from_the_song() {
        let mut store = quiz_store();
        store.dispatch(Action::OpenGameModal(1));
        let modal = &store.state.view_modal;
        assert!(modal.active);
        assert_eq!(modal.song_name, "second");
        assert_eq!(modal.correct_choice, 5);
        assert_eq!(modal.done, None);
        assert_eq!(modal.points, 0);
    }

    #[test]
    fn correct_choice_scores_a_point() {
        let mut store = quiz_store();
        store.dispatch(Action::OpenGameModal(0));
        store.dispatch(Action::ChooseCategory(2));
        assert_eq!(store.state.view_modal.done, Some(2));
        assert_eq!(store.state.view_modal.points, 1);
        assert_eq!(store.state.songs[0].done, Some(2));
        assert_eq!(store.state.point_count, 1);
    }

    #[test]
    fn wrong_choice_scores_nothing_but_locks_the_answer() {
        let mut store = quiz_store();
        store.dispatch(Action::OpenGameModal(0));
        store.dispatch(Action::ChooseCategory(4));
        assert_eq!(store.state.view_modal.points, 0);
        assert_eq!(store.state.songs[0].done, Some(4));
        assert_eq!(store.state.point_count, 0);
    }

    #[test]
    fn reopening_an_answered_song_restores_the_result() {
        let mut store = quiz_store();
        store.dispatch(Action::OpenGameModal(0));
        store.dispatch(Action::ChooseCategory(2));
        store.dispatch(Action::CloseGameModal);
        assert!(!store.state.view_modal.active);
        store.dispatch(Action::OpenGameModal(0));
        assert_eq!(store.state.view_modal.done, Some(2));
        assert_eq!(store.state.view_modal.points, 1);
    }

    #[test]
    fn preview_result_only_lands_on_the_open_song() {
        let mut store = quiz_store();
        store.dispatch(Action::OpenGameModal(0));
        store.dispatch(Action::LoadAudioPreviewFinished(
            1,
            Some("spotify:stale".into()),
        ));
        assert_eq!(store.state.view_modal.audio_uri, None);
        store.dispatch(Action::LoadAudioPreviewFinished(
            0,
            Some("spotify:fresh".into()),
        ));
        assert_eq!(
            store.state.view_modal.audio_uri.as_deref(),
            Some("spotify:fresh")
        );
    }
}
