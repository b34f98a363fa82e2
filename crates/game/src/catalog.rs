//! Built-in demo catalog for running without a backend.

use crate::fetch::BackendSong;

fn song(
    classname: &str,
    name: &str,
    author: &str,
    lyrics: &str,
    tsne_vector: [f32; 2],
) -> BackendSong {
    BackendSong {
        classname: classname.into(),
        name: name.into(),
        author: author.into(),
        lyrics: lyrics.into(),
        tsne_vector,
    }
}

/// A small invented catalog, one song per category plus a few extras so
/// the island gets some clustering.
pub fn demo_catalog() -> Vec<BackendSong> {
    vec![
        song(
            "selfdetermination",
            "My Own Compass",
            "The Cartographers",
            "I drew the map myself this time / no borrowed roads, no borrowed lines",
            [-12.0, 4.5],
        ),
        song(
            "heartbroken",
            "Half a House",
            "Ruby Vale",
            "Your coat is gone but the hook still waits / I set two cups by force of habit",
            [8.5, -14.0],
        ),
        song(
            "aggressive",
            "Knuckle Weather",
            "Static Parade",
            "Storm in my hands and thunder in the floor / don't tell me to settle, tell the walls",
            [21.0, 9.0],
        ),
        song(
            "loneliness",
            "Apartment Echo",
            "Moth Radio",
            "The kettle talks more than the phone does / I answer anyway",
            [6.0, -11.5],
        ),
        song(
            "lovemaking",
            "Slow Orbit",
            "Velvet Meridian",
            "Gravity is just an excuse / to fall toward you all night",
            [-18.0, -7.0],
        ),
        song(
            "perseverance",
            "One More Mile Marker",
            "The Long Haul",
            "Blisters are just miles that stayed / I count them like medals",
            [-9.0, 16.0],
        ),
        song(
            "party",
            "Ceiling Confetti",
            "Neon Chorus",
            "Turn the speakers to the sky / the downstairs neighbors can sleep in July",
            [25.0, 18.0],
        ),
        song(
            "heartbroken",
            "Return Address",
            "Ruby Vale",
            "I mailed you back your winter / postage due on every word",
            [10.0, -16.5],
        ),
        song(
            "party",
            "Borrowed Saturdays",
            "Neon Chorus",
            "We spent a week of weekends in one night / invoice me on Monday",
            [23.5, 14.0],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibequest_common::config;

    #[test]
    fn demo_catalog_covers_every_category() {
        let catalog = demo_catalog();
        for code in config::BACKEND_CATEGORY_CODES {
            assert!(
                catalog.iter().any(|song| song.classname == code),
                "missing {code}"
            );
        }
    }
}
