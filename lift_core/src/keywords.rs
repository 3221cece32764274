//! Name-keyword heuristic for mapping exercises to muscle regions.
//!
//! Only used by the coverage engine's optional fallback strategy, for
//! exercises that have no curated muscle map inside the active split.

use crate::MuscleGroup;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use uuid::Uuid;

/// Keywords keyed by lower-cased `"group/region"`
static REGION_KEYWORDS: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    HashMap::from([
        ("chest/upper", &["incline"][..]),
        ("chest/mid", &["bench", "press", "fly", "push-up"][..]),
        ("chest/lower", &["decline", "dip"][..]),
        ("triceps/long", &["overhead", "skull", "french press"][..]),
        ("triceps/lateral", &["pushdown", "pressdown", "kickback"][..]),
        ("triceps/medial", &["close-grip", "close grip", "dip", "pushdown"][..]),
        ("shoulders/anterior", &["overhead press", "shoulder press", "front raise"][..]),
        ("shoulders/lateral", &["lateral raise", "upright row"][..]),
        ("shoulders/posterior", &["rear delt", "face pull", "reverse fly"][..]),
        ("back/lats", &["pulldown", "pull-up", "chin-up", "straight-arm"][..]),
        ("back/upper back", &["row", "face pull", "rear delt"][..]),
        ("back/lower back", &["deadlift", "rdl", "back extension", "good morning"][..]),
        ("biceps/long", &["incline curl", "drag curl"][..]),
        ("biceps/short", &["preacher", "concentration", "cable curl"][..]),
        ("biceps/brachialis", &["hammer", "reverse curl"][..]),
        ("legs/quads", &["squat", "leg press", "leg extension", "lunge", "hack squat"][..]),
        ("legs/hamstrings", &["rdl", "romanian", "leg curl", "deadlift"][..]),
        ("legs/glutes", &["hip thrust", "glute", "lunge", "squat", "deadlift"][..]),
        ("legs/calves", &["calf"][..]),
        ("core/upper abs", &["crunch", "sit-up"][..]),
        ("core/lower abs", &["leg raise", "hanging knee", "reverse crunch"][..]),
        ("core/obliques", &["twist", "side plank", "woodchop"][..]),
    ])
});

/// Regions of `groups` whose keywords appear in `exercise_name`
///
/// A region without a keyword entry matches on its own name.
pub fn keyword_regions(exercise_name: &str, groups: &[&MuscleGroup]) -> Vec<Uuid> {
    let name = exercise_name.to_lowercase();
    if name.trim().is_empty() {
        return Vec::new();
    }

    groups
        .iter()
        .flat_map(|group| {
            group.regions.iter().filter_map(|region| {
                let key = format!("{}/{}", group.name, region.name).to_lowercase();
                let hit = match REGION_KEYWORDS.get(key.as_str()) {
                    Some(keywords) => keywords.iter().any(|k| name.contains(k)),
                    None => name.contains(&region.name.to_lowercase()),
                };
                hit.then_some(region.id)
            })
        })
        .collect()
}
