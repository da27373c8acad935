use rand::seq::IndexedRandom;
use rand::Rng;

/// Fixed pool of drawing prompts. Every round's secret word comes from
/// here; the fake artist is simply never shown it client-side.
pub const WORD_LIST: &[&str] = &[
    "lighthouse",
    "volcano",
    "submarine",
    "scarecrow",
    "windmill",
    "campfire",
    "snowman",
    "octopus",
    "cactus",
    "rainbow",
    "pirate",
    "dragon",
    "castle",
    "rocket",
    "tornado",
    "mermaid",
    "penguin",
    "waterfall",
    "skeleton",
    "treehouse",
    "hot air balloon",
    "roller coaster",
    "ferris wheel",
    "jellyfish",
    "dinosaur",
    "astronaut",
    "wizard",
    "igloo",
    "anchor",
    "telescope",
    "hammock",
    "accordion",
    "drawbridge",
    "hedgehog",
    "parachute",
    "koala",
    "sandcastle",
    "unicycle",
    "beehive",
    "iceberg",
];

/// Draws a secret word uniformly from [`WORD_LIST`].
pub fn random_word<R: Rng + ?Sized>(rng: &mut R) -> String {
    WORD_LIST
        .choose(rng)
        .expect("word list is non-empty")
        .to_string()
}

/// Generates a 5-digit numeric room id. Collisions are rare enough that
/// retrying is left to the caller.
pub fn generate_room_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.random_range(10_000..100_000).to_string()
}
