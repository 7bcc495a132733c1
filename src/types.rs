//! Core type definitions for animal-face ranking

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Number of candidates kept before forbidden-pair resolution
pub const TOP_K: usize = 5;

/// Maximum number of categories in a final result
pub const MAX_RESULTS: usize = 2;

/// Closed set of animal-type labels, plus an `Unknown` sentinel for empty
/// results. Declaration order is the canonical order used for tie-breaking.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Bear,
    Snake,
    Cat,
    Dog,
    Wolf,
    Dinosaur,
    Squirrel,
    Rabbit,
    Tiger,
    Turtle,
    Deer,
    Unknown,
}

impl Category {
    /// All rankable categories in canonical (declaration) order.
    /// `Unknown` is a sentinel, never a candidate.
    pub const ALL: [Category; 11] = [
        Category::Bear,
        Category::Snake,
        Category::Cat,
        Category::Dog,
        Category::Wolf,
        Category::Dinosaur,
        Category::Squirrel,
        Category::Rabbit,
        Category::Tiger,
        Category::Turtle,
        Category::Deer,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Bear => "bear",
            Category::Snake => "snake",
            Category::Cat => "cat",
            Category::Dog => "dog",
            Category::Wolf => "wolf",
            Category::Dinosaur => "dinosaur",
            Category::Squirrel => "squirrel",
            Category::Rabbit => "rabbit",
            Category::Tiger => "tiger",
            Category::Turtle => "turtle",
            Category::Deer => "deer",
            Category::Unknown => "unknown",
        }
    }

    /// Parse a backend label. Rejects anything outside the rankable set.
    pub fn from_label(label: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.label() == label)
    }

    /// Human-facing message shown with a primary result
    pub fn message(&self) -> &'static str {
        match self {
            Category::Bear => "Bear look! A dependable face that inspires trust 🐻",
            Category::Snake => "Snake look! A mysterious and captivating aura 🐍",
            Category::Cat => "Cat look! A soft and polished charm 😺",
            Category::Dog => "Dog look! A loyal and friendly impression 🐶",
            Category::Wolf => "Wolf look! A strong and free-spirited style 🐺",
            Category::Dinosaur => "Dinosaur look! A powerful presence that fills the room 🦖",
            Category::Squirrel => "Squirrel look! A lively and adorable energy 🐿️",
            Category::Rabbit => "Rabbit look! A cute and lovable image 🐰",
            Category::Tiger => "Tiger look! A bold and confident style 🐯",
            Category::Turtle => "Turtle look! A relaxed and composed charm 🐢",
            Category::Deer => "Deer look! A graceful and delicate feel 🦌",
            Category::Unknown => {
                "No confident match this time. Try a photo with your face clearly visible 💫"
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Optional gender supplied by the caller; absence means no exclusion filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Which post-processing sequence applies to a backend's raw scores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Classifier,
    Similarity,
}

/// Categories excluded when gender is female
pub const MALE_PREFERRED: [Category; 3] = [Category::Bear, Category::Tiger, Category::Wolf];

/// Categories excluded when gender is male
pub const FEMALE_PREFERRED: [Category; 3] = [Category::Rabbit, Category::Cat, Category::Deer];

/// Unordered category pairs that must never co-occur in a final result
pub const FORBIDDEN_PAIRS: [(Category, Category); 5] = [
    (Category::Cat, Category::Bear),
    (Category::Cat, Category::Dinosaur),
    (Category::Snake, Category::Bear),
    (Category::Rabbit, Category::Bear),
    (Category::Turtle, Category::Cat),
];

/// Raw per-category scores for one face image.
///
/// Iteration through `entries()`/`ranked()` always follows the canonical
/// category order, so sorting and tie-breaking are deterministic regardless
/// of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreMap {
    scores: HashMap<Category, f32>,
}

impl ScoreMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: Category, score: f32) {
        self.scores.insert(category, score);
    }

    pub fn remove(&mut self, category: Category) {
        self.scores.remove(&category);
    }

    pub fn get(&self, category: Category) -> Option<f32> {
        self.scores.get(&category).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Entries in canonical category order
    pub fn entries(&self) -> Vec<(Category, f32)> {
        Category::ALL
            .iter()
            .filter_map(|&c| self.scores.get(&c).map(|&s| (c, s)))
            .collect()
    }

    /// Entries descending by score; ties resolve to canonical order
    /// (stable sort over `entries()`).
    pub fn ranked(&self) -> Vec<(Category, f32)> {
        let mut entries = self.entries();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        entries
    }

    pub fn max_score(&self) -> Option<f32> {
        self.entries()
            .into_iter()
            .map(|(_, s)| s)
            .reduce(f32::max)
    }
}

impl FromIterator<(Category, f32)> for ScoreMap {
    fn from_iter<T: IntoIterator<Item = (Category, f32)>>(iter: T) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}

/// Knobs for similarity-score calibration
#[derive(Debug, Clone, Copy)]
pub struct CalibrationParams {
    /// Rescale ceiling: if the top similarity exceeds this, the whole map is scaled down
    pub cap: f32,
    /// Nudge applied to a near-tied top pair (top-1 up, top-2 down)
    pub boost: f32,
    /// Top-2 gap below which the nudge applies
    pub closeness: f32,
}

impl Default for CalibrationParams {
    fn default() -> Self {
        Self {
            cap: 0.7,
            boost: 0.05,
            closeness: 0.03,
        }
    }
}

/// One category in the final result with its softmax percentage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    #[serde(rename = "animal")]
    pub category: Category,
    #[serde(rename = "score")]
    pub percentage: f64,
}

/// Ordered final result: at most two entries, descending by percentage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingResult {
    entries: Vec<RankedEntry>,
}

impl RankingResult {
    pub fn new(entries: Vec<RankedEntry>) -> Self {
        debug_assert!(entries.len() <= MAX_RESULTS);
        Self { entries }
    }

    /// First entry, or the `Unknown` sentinel when no category survived
    pub fn primary(&self) -> RankedEntry {
        self.entries.first().copied().unwrap_or(RankedEntry {
            category: Category::Unknown,
            percentage: 0.0,
        })
    }

    pub fn entries(&self) -> &[RankedEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<RankedEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Human-facing classification payload (upload-API response shape)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub main_result: RankedEntry,
    pub top_k: Vec<RankedEntry>,
    pub message: String,
}

impl Classification {
    pub fn from_result(result: RankingResult) -> Self {
        let main_result = result.primary();
        Self {
            main_result,
            message: main_result.category.message().to_string(),
            top_k: result.into_entries(),
        }
    }
}
