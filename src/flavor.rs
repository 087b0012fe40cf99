//! Comedic text the presentation layer shows around the chaos
//!
//! Everything here is cosmetic. Picks go through the session RNG so a seeded
//! run produces the same jokes.

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::sim::ObstacleKind;

const CHAT_MESSAGES: &[&str] = &[
    "LUL", "SO BAD", "???", "LAG?", "RIGGED", "BOT",
    "MY GRANDMA PLAYS BETTER", "F", "KEKW", "UNINSTALL",
    "INPUT LAG??", "DEV???", "CRINGE", "OMEGALUL", "POG", "Kappa",
    "Throwing for content?", "PAID ACTOR", "SCRIPTED", "Clipped LUL",
    "Gameplay?", "Tutorial level hard?", "PRESS F", "WINNABLE (No)",
    "EZ CLAP", "NOT LIKE THIS", "Controller died?", "Lag switch?",
    "Stream sniper?", "Try jumping?", "He doesnt know", "Copium",
    "Skill gap", "FF 15", "Go next", "GG", "Refund", "This game is broken",
    "Fix your game", "Small indie company", "Spaghetti code",
    "Wifi player", "Touchpad?", "Dance pad?", "Playing blindfolded?",
    "Reported", "Roll ads", "Hype train", "Hi Mom", "First", "Dead chat",
];

const INSULTS: &[&str] = &[
    "Skill Issue", "L + Ratio", "Cringe", "Bro really tried",
    "Emotional Damage", "Imagine dying", "Common L", "Maidenless?",
    "Go touch grass", "Git gud", "Downloading skill...",
    "Error 404: Rizz not found", "Bot behavior", "NPC activity detected",
    "Bruh", "Delulu",
];

const ACHIEVEMENTS: &[&str] = &[
    "Touch Grass (Impossible) 🌿",
    "Main Character Syndrome 🤡",
    "Certified Bot 🤖",
    "Emotional Damage 💔",
    "Cringe Compiler 😬",
    "Ohio Resident 🌽",
    "Giga Chad (Fake) 🗿",
    "Negative Rizz 📉",
    "Professional Yapper 🗣️",
];

const PATCH_NOTES: &[&str] = &[
    "Removed Herobrine",
    "Nerfed Player Confidence",
    "Buffed Emotional Damage",
    "Optimized for 1999 Toasters",
    "Added Microtransactions (Just kidding... unless?)",
    "Updated EULA: We own your vibes",
    "Reduced hope by 69%",
    "Added invisible walls (Skill Issue)",
];

const AVATARS: &[&str] = &[
    "🤡", "💀", "👽", "💩", "🤖", "🦄", "🥶", "🤬", "👺", "👻",
    "🦍", "🌚", "🚀", "💎", "🦀", "👀", "🐸", "🗿", "🧢", "🧟",
];

const DEADLY_GLYPHS: &[&str] = &[
    "📉", "🚔", "🗑️", "🚩", "☢️", "🧊", "🧱", "🪦", "💸", "💩", "🚧",
];

const DECOY_GLYPHS: &[&str] = &["👻", "💨", "💭", "🎣", "🧢", "✨"];

/// Chance the death screen hands out a mock achievement
pub const ACHIEVEMENT_CHANCE: f32 = 0.3;

fn pick<R: Rng + ?Sized>(pool: &[&'static str], rng: &mut R) -> &'static str {
    pool.choose(rng).copied().unwrap_or("")
}

/// Scrolling chat line for a fake-chat disruption
pub fn chat_message<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    pick(CHAT_MESSAGES, rng)
}

/// Caption for a fake donation
pub fn donation<R: Rng + ?Sized>(rng: &mut R) -> String {
    let donor = rng.random_range(100..1000);
    format!("💰 User{donor} donated $5.00!\n\"LUL U SUCK\"")
}

pub fn insult<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    pick(INSULTS, rng)
}

/// A mock achievement, or nothing most of the time
pub fn achievement<R: Rng + ?Sized>(rng: &mut R) -> Option<&'static str> {
    (rng.random::<f32>() < ACHIEVEMENT_CHANCE).then(|| pick(ACHIEVEMENTS, rng))
}

/// Fake version line for the title screen
pub fn patch_note<R: Rng + ?Sized>(rng: &mut R) -> String {
    let build = rng.random_range(1..=420);
    format!("v6.9.{build} - {}", pick(PATCH_NOTES, rng))
}

pub fn avatar<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    pick(AVATARS, rng)
}

/// Glyph for a freshly spawned obstacle
pub fn obstacle_glyph<R: Rng + ?Sized>(kind: ObstacleKind, rng: &mut R) -> &'static str {
    match kind {
        ObstacleKind::Deadly => pick(DEADLY_GLYPHS, rng),
        ObstacleKind::Decoy => pick(DECOY_GLYPHS, rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_glyph_pools_by_kind() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..100 {
            assert!(DEADLY_GLYPHS.contains(&obstacle_glyph(ObstacleKind::Deadly, &mut rng)));
            assert!(DECOY_GLYPHS.contains(&obstacle_glyph(ObstacleKind::Decoy, &mut rng)));
        }
    }

    #[test]
    fn test_seeded_picks_repeat() {
        let mut a = Pcg32::seed_from_u64(77);
        let mut b = Pcg32::seed_from_u64(77);
        for _ in 0..20 {
            assert_eq!(chat_message(&mut a), chat_message(&mut b));
            assert_eq!(insult(&mut a), insult(&mut b));
        }
    }

    #[test]
    fn test_patch_note_format() {
        let mut rng = Pcg32::seed_from_u64(9);
        let note = patch_note(&mut rng);
        assert!(note.starts_with("v6.9."));
        assert!(note.contains(" - "));
    }

    #[test]
    fn test_achievement_rate() {
        let mut rng = Pcg32::seed_from_u64(123);
        let given = (0..10_000).filter(|_| achievement(&mut rng).is_some()).count();
        assert!((2_700..3_300).contains(&given), "{given}");
    }

    #[test]
    fn test_donation_caption() {
        let mut rng = Pcg32::seed_from_u64(5);
        let caption = donation(&mut rng);
        assert!(caption.contains("donated $5.00"));
    }
}
