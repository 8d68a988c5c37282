use rand::seq::SliceRandom;
use rand::Rng;

pub const SUBJECTS: [&str; 7] = [
    "a lobster astronaut floating in space",
    "a cozy Japanese coffee shop",
    "a cyberpunk street market at night",
    "a minimalist Scandinavian living room",
    "a magical forest with glowing mushrooms",
    "a steampunk airship above the clouds",
    "a serene zen garden with cherry blossoms",
];

pub const STYLES: [&str; 7] = [
    "ultra-detailed photorealistic",
    "cinematic 35mm film style",
    "isometric 3D illustration",
    "soft watercolor painting",
    "dramatic concept art",
    "anime style illustration",
    "vintage travel poster",
];

pub const LIGHTING: [&str; 6] = [
    "golden hour sunlight",
    "soft diffused lighting",
    "neon glow",
    "dramatic rim lighting",
    "moody overcast",
    "warm candlelight",
];

/// Compose one prompt as `"{style} of {subject}, {lighting}"`
pub fn compose_prompt(style: &str, subject: &str, lighting: &str) -> String {
    format!("{} of {}, {}", style, subject, lighting)
}

/// Sample `count` prompts, drawing each part independently and with replacement
pub fn generate_prompts<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<String> {
    (0..count)
        .map(|_| {
            let subject = pick(&SUBJECTS, rng);
            let style = pick(&STYLES, rng);
            let lighting = pick(&LIGHTING, rng);
            compose_prompt(style, subject, lighting)
        })
        .collect()
}

fn pick<'a, R: Rng + ?Sized>(vocabulary: &[&'a str], rng: &mut R) -> &'a str {
    // vocabularies are non-empty constants
    vocabulary.choose(rng).copied().unwrap_or_default()
}
