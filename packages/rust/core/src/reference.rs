//! Maintained reference sets for the validated columns.
//!
//! These lists are the definition of valid data. Adding a new speaker or
//! episode to a fragment means adding it here too.

use std::collections::BTreeSet;

/// Every speaker name allowed in the `character` column.
///
/// Both "Jet" and "jet" are listed: the lowercase spelling occurs in the
/// maintained fragments and is accepted as-is.
pub const CHARACTERS: &[&str] = &[
    "Katara",
    "Sokka",
    "Zuko",
    "Merchant woman",
    "Aang",
    "Fisherman's wife",
    "Fisherman",
    "Jee",
    "Iroh",
    "Tashi",
    "Pasang",
    "Gyatso",
    "Ozai",
    "Yue",
    "Pakku",
    "Oh",
    "Pirate captain",
    "Cabbage merchant",
    "Gan Jin tribesman",
    "Zhang leader",
    "Gan Jin leader",
    "Canyon guide",
    "Hakoda",
    "Bato",
    "Chey",
    "Jeong Jeong",
    "Bumi",
    "Jet",
    "Kanna",
    "Southern Water Tribe girl",
    "Mechanist",
    "Haru",
    "Guard",
    "Tyro",
    "Captain",
    "Warden",
    "Suki",
    "Meng",
    "Wu",
    "Zhao",
    "Kay-fon",
    "Senlin Village leader",
    "Earthbender captain",
    "Great Fire Sage",
    "Shyu",
    "Roku",
    "Arnook",
    "Hahn",
    "Koh",
    "Chong",
    "Lily",
    "Song",
    "Tho",
    "Huu",
    "Due",
    "Tong",
    "Kyoshi",
    "Zei",
    "Toph",
    "Wan Shi Tong",
    "Ticket lady",
    "Ying",
    "Smellerbee",
    "jet",
    "Azula",
    "Fong",
    "Kuei",
    "Guru Pathik",
    "Ty Lee",
    "Mai",
    "Kenji",
    "Macmu-Ling",
    "Joo Dee",
    "Long Feng",
    "General Sung",
    "Pong",
    "Yu",
    "The Boulder",
    "Yung",
    "Iio",
    "Lee",
    "Gansu",
    "Ursa",
    "Kwan",
    "Piandao",
    "Kuruk",
    "Yangchen",
    "Lion Turtle",
    "Hama",
    "Momo",
    "Appa",
];

/// Every episode title allowed in the `episode` column.
pub const EPISODES: &[&str] = &[
    "The Storm",
    "The Waterbending Master",
    "The Waterbending Scroll",
    "The Great Divide",
    "Bato of the Water Tribe",
    "The Deserter",
    "The King of Omashu",
    "Jet",
    "The Avatar Returns",
    "The Northern Air Temple",
    "The Boy in the Iceberg",
    "Imprisoned",
    "The Warriors of Kyoshi",
    "The Fortuneteller",
    "The Southern Air Temple",
    "Winter Solstice Part 1: The Spirit World",
    "Winter Solstice Part 2: Avatar Roku",
    "The Siege of the North, Part 1",
    "The Siege of the North, Part 2",
    "The Blue Spirit",
    "The Cave of Two Lovers",
    "The Swamp",
    "Avatar Day",
    "The Library",
    "The Serpent's Pass",
    "The Avatar State",
    "The Guru",
    "The Tales of Ba Sing Se",
    "Lake Laogai",
    "Bitter Work",
    "The Earth King",
    "The Drill",
    "City of Walls and Secrets",
    "The Blind Bandit",
    "The Chase",
    "The Crossroads of Destiny",
    "Return to Omashu",
    "Appa's Lost Days",
    "The Desert",
    "Zuko Alone",
    "The Firebending Masters",
    "The Awakening",
    "The Headband",
    "The Western Air Temple",
    "The Runaway",
    "The Day of Black Sun, Part 1: The Invasion",
    "The Beach",
    "The Boiling Rock, Part 2",
    "Sozin's Comet, Part 2: The Old Masters",
    "The Painted Lady",
    "Sozin's Comet, Part 4: Avatar Aang",
    "Sozin's Comet, Part 1: The Phoenix King",
    "The Puppetmaster",
    "The Boiling Rock, Part 1",
    "Nightmares and Daydreams",
    "The Avatar and The Fire Lord",
    "The Day of Black Sun, Part 2: The Eclipse",
    "Sozin's Comet, Part 3: Into the Inferno",
    "Sokka's Master",
    "The Southern Raiders",
    "The Ember Island Players",
];

/// Allowed values of the `nation` column.
pub const NATIONS: &[&str] = &["Water", "Earth", "Fire", "Air", "None"];

/// Allowed values of the `bending` column.
pub const BENDING_STYLES: &[&str] = &["Water", "Earth", "Fire", "Air", "None", "All"];

/// Allowed values of the `book` column.
pub const BOOKS: &[&str] = &["Water", "Earth", "Fire"];

/// One column and the exact set of values it must contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRule {
    /// Check name shown in reports (e.g. `characters`).
    pub name: String,
    /// Column the rule applies to.
    pub column: String,
    /// Values the column's unique non-null values must equal.
    pub expected: BTreeSet<String>,
}

impl ColumnRule {
    pub fn new(name: impl Into<String>, column: impl Into<String>, expected: &[&str]) -> Self {
        Self {
            name: name.into(),
            column: column.into(),
            expected: expected.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// The full set of column rules a dataset is checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSets {
    pub rules: Vec<ColumnRule>,
}

impl ReferenceSets {
    pub fn new(rules: Vec<ColumnRule>) -> Self {
        Self { rules }
    }

    /// The five maintained rules: characters, nations, bending styles,
    /// episodes, books.
    pub fn maintained() -> Self {
        Self::new(vec![
            ColumnRule::new("characters", "character", CHARACTERS),
            ColumnRule::new("nations", "nation", NATIONS),
            ColumnRule::new("bending_styles", "bending", BENDING_STYLES),
            ColumnRule::new("episodes", "episode", EPISODES),
            ColumnRule::new("books", "book", BOOKS),
        ])
    }
}

impl Default for ReferenceSets {
    fn default() -> Self {
        Self::maintained()
    }
}
