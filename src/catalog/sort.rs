use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions, Strength};
use unicase::UniCase;

use crate::models::{SortKey, Song};

thread_local! {
    static COLLATOR: Option<Collator> = make_collator();
}

/// Root-locale collator. Secondary strength keeps accents significant but
/// folds case, so "Édith" sorts beside "Eagles" and "abba" beside "ABBA".
fn make_collator() -> Option<Collator> {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Secondary);
    Collator::try_new(&Default::default(), options).ok()
}

/// Compare display text the way a reader expects: collated first, raw text
/// only to break exact ties. Falls back to case-folding if no collator could
/// be built.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    COLLATOR
        .with(|collator| match collator {
            Some(collator) => collator.compare(a, b),
            None => UniCase::new(a).cmp(&UniCase::new(b)),
        })
        .then_with(|| a.cmp(b))
}

/// Ordering used for catalog and result lists. Artist order falls back to the
/// title; title order looks at the title alone.
pub fn compare_songs(a: &Song, b: &Song, key: SortKey) -> Ordering {
    match key {
        SortKey::Artist => compare_text(&a.artist, &b.artist)
            .then_with(|| compare_text(&a.title, &b.title)),
        SortKey::Title => compare_text(&a.title, &b.title),
    }
}

/// Stable in-place sort; rows comparing equal keep their relative order.
pub fn sort_songs(songs: &mut [Song], key: SortKey) {
    songs.sort_by(|a, b| compare_songs(a, b, key));
}
