//! Keyword-based species classification.
//!
//! A record's category decides its marker colour. Classification looks for
//! keywords in the scientific and common names; groups are tested in
//! priority order and the first match wins, so a record mentioning both
//! genera always lands in the earlier group.

use std::fmt;

use crate::record::Record;

/// Visual category of a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Azorella / llareta cushion plants
    Azorella,
    /// Polylepis / queñua woodland trees
    Polylepis,
    /// Anything not matched by a keyword group
    Default,
}

impl Category {
    /// All categories in priority order.
    pub const ALL: [Category; 3] = [Category::Azorella, Category::Polylepis, Category::Default];

    /// Fill colour for markers of this category.
    pub fn color(&self) -> &'static str {
        match self {
            Category::Azorella => "#2e9e44",
            Category::Polylepis => "#d9822b",
            Category::Default => "#2b7cff",
        }
    }

    /// Returns the display name for this category.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Azorella => "Azorella (llareta)",
            Category::Polylepis => "Polylepis (queñua)",
            Category::Default => "Otras especies",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A category together with the keywords that select it.
struct KeywordGroup {
    category: Category,
    keywords: &'static [&'static str],
}

/// Keyword groups in priority order.
const KEYWORD_GROUPS: &[KeywordGroup] = &[
    KeywordGroup {
        category: Category::Azorella,
        keywords: &["azorella", "llareta", "yareta"],
    },
    KeywordGroup {
        category: Category::Polylepis,
        keywords: &["polylepis", "queñua", "quenua"],
    },
];

/// Classifies a record by its species names.
pub fn classify(record: &Record) -> Category {
    let haystack = format!("{} {}", record.scientific_name, record.common_name).to_lowercase();
    classify_text(&haystack)
}

/// Classifies already lower-cased text.
fn classify_text(haystack: &str) -> Category {
    KEYWORD_GROUPS
        .iter()
        .find(|group| group.keywords.iter().any(|kw| haystack.contains(kw)))
        .map(|group| group.category)
        .unwrap_or(Category::Default)
}
