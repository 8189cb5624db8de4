//! Delivery platforms and their quality thresholds.

use serde::{Deserialize, Serialize};

/// Delivery channel a content item targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// LinkedIn posts
    LinkedIn,
    /// Twitter / X posts
    Twitter,
    /// Instagram captions
    Instagram,
    /// Facebook posts
    Facebook,
    /// Threads posts
    Threads,
    /// Long-form blog articles
    Blog,
    /// Long-form email newsletters
    Newsletter,
}

impl Platform {
    /// All platforms, in table order.
    pub const ALL: [Platform; 7] = [
        Platform::LinkedIn,
        Platform::Twitter,
        Platform::Instagram,
        Platform::Facebook,
        Platform::Threads,
        Platform::Blog,
        Platform::Newsletter,
    ];

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::LinkedIn => "linkedin",
            Platform::Twitter => "twitter",
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
            Platform::Threads => "threads",
            Platform::Blog => "blog",
            Platform::Newsletter => "newsletter",
        }
    }

    /// Parse a platform key, case-insensitively.
    ///
    /// Returns `None` for unknown keys; callers fall back to the default
    /// profile rather than failing.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "linkedin" => Some(Platform::LinkedIn),
            "twitter" | "x" => Some(Platform::Twitter),
            "instagram" => Some(Platform::Instagram),
            "facebook" => Some(Platform::Facebook),
            "threads" => Some(Platform::Threads),
            "blog" | "article" => Some(Platform::Blog),
            "newsletter" => Some(Platform::Newsletter),
            _ => None,
        }
    }

    /// Whether items on this platform are long-form.
    pub fn is_long_form(&self) -> bool {
        matches!(self, Platform::Blog | Platform::Newsletter)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-platform thresholds used by the analyzers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformProfile {
    /// Platform this profile belongs to (`None` for the default profile)
    pub platform: Option<Platform>,

    /// Hard lower word limit
    pub min_words: usize,

    /// Lower bound of the optimal word range
    pub optimal_min: usize,

    /// Upper bound of the optimal word range
    pub optimal_max: usize,

    /// Hard upper word limit
    pub max_words: usize,

    /// Longest acceptable hook, in characters
    pub hook_max_chars: usize,

    /// Largest share of the batch one CTA category may hold
    pub variety_threshold: f64,

    /// Minimum number of headline engagement elements
    pub min_headline_elements: u8,

    /// Width of the length histogram buckets, in words
    pub histogram_bucket: usize,

    /// For long-form platforms, the hook is the first N words
    pub hook_words: Option<usize>,
}

impl PlatformProfile {
    /// Resolve the profile for an optional platform.
    ///
    /// Absent platforms get the default profile.
    pub fn resolve(platform: Option<Platform>) -> Self {
        match platform {
            Some(p) => Self::for_platform(p),
            None => Self::default(),
        }
    }

    /// Profile table entry for a known platform.
    pub fn for_platform(platform: Platform) -> Self {
        let (min_words, optimal_min, optimal_max, max_words) = match platform {
            Platform::LinkedIn => (50, 150, 300, 600),
            Platform::Twitter => (5, 15, 45, 60),
            Platform::Instagram => (20, 50, 150, 400),
            Platform::Facebook => (20, 40, 120, 500),
            Platform::Threads => (5, 15, 60, 100),
            Platform::Blog => (800, 1500, 2500, 3500),
            Platform::Newsletter => (300, 500, 1200, 2000),
        };

        let (hook_max_chars, variety_threshold, min_headline_elements, histogram_bucket) =
            match platform {
                Platform::LinkedIn => (150, 0.40, 2, 50),
                Platform::Twitter => (100, 0.50, 1, 10),
                Platform::Instagram => (125, 0.50, 1, 25),
                Platform::Facebook => (120, 0.50, 1, 25),
                Platform::Threads => (100, 0.60, 1, 10),
                Platform::Blog => (90, 0.70, 3, 500),
                Platform::Newsletter => (90, 0.70, 2, 250),
            };

        let hook_words = if platform.is_long_form() { Some(12) } else { None };

        Self {
            platform: Some(platform),
            min_words,
            optimal_min,
            optimal_max,
            max_words,
            hook_max_chars,
            variety_threshold,
            min_headline_elements,
            histogram_bucket,
            hook_words,
        }
    }

    /// The full profile table, known platforms first, then the default.
    pub fn table() -> Vec<PlatformProfile> {
        Platform::ALL
            .iter()
            .map(|p| Self::for_platform(*p))
            .chain(std::iter::once(Self::default()))
            .collect()
    }

    /// Key used in reports and histograms.
    pub fn key(&self) -> &'static str {
        self.platform.map(|p| p.as_str()).unwrap_or("default")
    }
}

impl Default for PlatformProfile {
    fn default() -> Self {
        Self {
            platform: None,
            min_words: 10,
            optimal_min: 50,
            optimal_max: 500,
            max_words: 3000,
            hook_max_chars: 150,
            variety_threshold: 0.40,
            min_headline_elements: 1,
            histogram_bucket: 50,
            hook_words: None,
        }
    }
}
