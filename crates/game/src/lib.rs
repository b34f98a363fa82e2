//! Game orchestration: the interceptor chain that turns actions into a
//! running quiz island.
//!
//! Chain order matters and matches the dispatch flow the game depends on:
//! animation first (it consumes focus requests and rides render ticks),
//! then world building, rendering, input, quiz rules, and finally the
//! catalog fetcher.

pub mod ani;
pub mod catalog;
pub mod fetch;
pub mod input;
pub mod quiz;
pub mod render;
pub mod world_builder;

pub use ani::AniCeptor;
pub use fetch::SongCatalogCeptor;
pub use input::InputCeptor;
pub use quiz::GameCeptor;
pub use render::{FrameContext, FrameSlot, RenderCeptor};
pub use world_builder::WorldBuilderCeptor;

use vibequest_store::Interceptor;

/// Assemble the full chain in dispatch order.
pub fn interceptor_stack(
    world_builder: WorldBuilderCeptor,
    render: RenderCeptor,
    fetch: SongCatalogCeptor,
) -> Vec<Box<dyn Interceptor>> {
    vec![
        Box::new(AniCeptor),
        Box::new(world_builder),
        Box::new(render),
        Box::new(InputCeptor::new()),
        Box::new(GameCeptor),
        Box::new(fetch),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use vibequest_store::{Action, State, Store, reduce};
    use vibequest_worldgen::TerrainParams;

    /// Drive a whole offline session through the chain, minus the GPU
    /// stage: load the catalog, fly to a tower, answer, and check the
    /// flags regrouped.
    #[test]
    fn offline_session_from_catalog_to_answered_flag() {
        let (tx, rx) = mpsc::channel();
        let params = TerrainParams {
            width: 48,
            length: 48,
            levels: 32,
            ..TerrainParams::default()
        };
        let mut store = Store::new(
            State::default(),
            vec![
                Box::new(AniCeptor),
                Box::new(WorldBuilderCeptor::with_params(params)),
                Box::new(InputCeptor::new()),
                Box::new(GameCeptor),
                Box::new(SongCatalogCeptor::new("http://unused", true, tx)),
            ],
            reduce,
        );

        store.dispatch(Action::LoadSongs);
        // The offline catalog arrives over the channel like a real
        // worker result would.
        let finished = rx.try_recv().expect("offline catalog result");
        store.dispatch(finished);

        let song_count = store.state.songs.len();
        assert!(song_count > 0);
        assert!(store.state.world.terrain.is_some());
        assert_eq!(store.state.points_of_interest.len(), song_count);
        assert_eq!(store.state.world.tower_buckets[0].len(), song_count);

        // Fly to the first tower; the focus animation opens the modal.
        store.dispatch(Action::StartFocusPoiAnimation(0));
        store.dispatch(Action::Render(1.0));
        assert!(store.state.view_modal.active);
        assert_eq!(store.state.view_modal.song_index, 0);

        let correct = store.state.view_modal.correct_choice;
        store.dispatch(Action::ChooseCategory(correct));
        assert_eq!(store.state.point_count, 1);
        assert_eq!(store.state.world.tower_buckets[0].len(), song_count - 1);
        assert_eq!(store.state.world.tower_buckets[correct + 1].len(), 1);

        store.dispatch(Action::CloseGameModal);
        assert!(!store.state.view_modal.active);
    }
}
