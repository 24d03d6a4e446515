//! Shared fixtures for unit tests.

use crate::engine::{OlympicsEngine, PreprocessOptions};
use olympics_domain::{EventRecord, Medal, RegionRecord, Sex};

/// KEN and USA are mapped; ATL is deliberately absent.
pub(crate) fn regions() -> Vec<RegionRecord> {
    vec![
        RegionRecord::new("KEN", "Kenya"),
        RegionRecord::new("USA", "USA"),
    ]
}

/// Small dataset over three editions:
///
/// - 1900 Paris: one unplaced US marathoner (men only edition)
/// - 2000 Sydney: Kenyan marathon gold, two US swimming medals, a US
///   basketball gold shared by two players, a bronze for the unmapped ATL
/// - 2004 Athina: Kenyan marathon silver, one unplaced Kenyan 10000m runner
pub(crate) fn sample_events() -> Vec<EventRecord> {
    vec![
        EventRecord::participation("Ann", "Kenya", "KEN", 2000, "Athletics", "Marathon")
            .with_sex(Sex::Female)
            .with_age(25)
            .with_physique(160.0, 50.0)
            .with_city("Sydney")
            .with_medal(Medal::Gold),
        EventRecord::participation("Ann", "Kenya", "KEN", 2004, "Athletics", "Marathon")
            .with_sex(Sex::Female)
            .with_age(29)
            .with_city("Athina")
            .with_medal(Medal::Silver),
        EventRecord::participation("Bob", "USA", "USA", 2000, "Swimming", "100m Freestyle")
            .with_age(22)
            .with_physique(193.0, 88.0)
            .with_city("Sydney")
            .with_medal(Medal::Gold),
        EventRecord::participation("Bob", "USA", "USA", 2000, "Swimming", "200m Freestyle")
            .with_age(22)
            .with_city("Sydney")
            .with_medal(Medal::Bronze),
        EventRecord::participation("Cal", "USA", "USA", 2000, "Basketball", "Basketball Men's")
            .with_age(30)
            .with_city("Sydney")
            .with_medal(Medal::Gold),
        EventRecord::participation("Dan", "USA", "USA", 2000, "Basketball", "Basketball Men's")
            .with_age(31)
            .with_city("Sydney")
            .with_medal(Medal::Gold),
        EventRecord::participation("Zed", "Atlantis", "ATL", 2000, "Athletics", "Marathon")
            .with_city("Sydney")
            .with_medal(Medal::Bronze),
        EventRecord::participation("Old", "USA", "USA", 1900, "Athletics", "Marathon")
            .with_age(40)
            .with_city("Paris"),
        EventRecord::participation("Eve", "Kenya", "KEN", 2004, "Athletics", "10000m")
            .with_sex(Sex::Female)
            .with_age(20)
            .with_city("Athina"),
    ]
}

pub(crate) fn sample_engine() -> OlympicsEngine {
    OlympicsEngine::from_records(&sample_events(), &regions(), &PreprocessOptions::default())
        .unwrap()
}
