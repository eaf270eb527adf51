use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::StorageError;

/// The fixed, ordered vocabulary of age categories used for filtering and
/// sorting. Declaration order is display order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
pub enum AgeCategory {
    #[serde(rename = "11 Under Age Group")]
    Under11,
    #[serde(rename = "13 Under Age Group")]
    Under13,
    #[serde(rename = "14-15 Age Group")]
    Youth14To15,
    #[serde(rename = "16-17 Age Group")]
    Youth16To17,
    #[serde(rename = "Junior (15-20)")]
    Junior,
    #[serde(rename = "Open / Senior (15+)")]
    Open,
    #[serde(rename = "Masters (35-39)")]
    Masters35,
    #[serde(rename = "Masters (40-44)")]
    Masters40,
    #[serde(rename = "Masters (45-49)")]
    Masters45,
    #[serde(rename = "Masters (50-54)")]
    Masters50,
    #[serde(rename = "Masters (55-59)")]
    Masters55,
    #[serde(rename = "Masters (60-64)")]
    Masters60,
    #[serde(rename = "Masters (65-69)")]
    Masters65,
    #[serde(rename = "Masters (70-74)")]
    Masters70,
    #[serde(rename = "Masters (75-79)")]
    Masters75To79,
    #[serde(rename = "Masters (75+)")]
    Masters75Plus,
    #[serde(rename = "Masters (80+)")]
    Masters80Plus,
}

/// Substring markers checked in order by [`AgeCategory::classify`].
/// "Open" comes last since many descriptive strings mention it alongside a
/// more specific marker.
const STRING_MARKERS: [(&str, AgeCategory); 17] = [
    ("11 Under", AgeCategory::Under11),
    ("13 Under", AgeCategory::Under13),
    ("14-15", AgeCategory::Youth14To15),
    ("16-17", AgeCategory::Youth16To17),
    ("Junior", AgeCategory::Junior),
    ("Masters (35-39)", AgeCategory::Masters35),
    ("Masters (40-44)", AgeCategory::Masters40),
    ("Masters (45-49)", AgeCategory::Masters45),
    ("Masters (50-54)", AgeCategory::Masters50),
    ("Masters (55-59)", AgeCategory::Masters55),
    ("Masters (60-64)", AgeCategory::Masters60),
    ("Masters (65-69)", AgeCategory::Masters65),
    ("Masters (70-74)", AgeCategory::Masters70),
    ("Masters (75-79)", AgeCategory::Masters75To79),
    ("Masters (75+)", AgeCategory::Masters75Plus),
    ("Masters (80+)", AgeCategory::Masters80Plus),
    ("Open", AgeCategory::Open),
];

impl AgeCategory {
    pub const ALL: [AgeCategory; 17] = [
        Self::Under11,
        Self::Under13,
        Self::Youth14To15,
        Self::Youth16To17,
        Self::Junior,
        Self::Open,
        Self::Masters35,
        Self::Masters40,
        Self::Masters45,
        Self::Masters50,
        Self::Masters55,
        Self::Masters60,
        Self::Masters65,
        Self::Masters70,
        Self::Masters75To79,
        Self::Masters75Plus,
        Self::Masters80Plus,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Under11 => "11 Under Age Group",
            Self::Under13 => "13 Under Age Group",
            Self::Youth14To15 => "14-15 Age Group",
            Self::Youth16To17 => "16-17 Age Group",
            Self::Junior => "Junior (15-20)",
            Self::Open => "Open / Senior (15+)",
            Self::Masters35 => "Masters (35-39)",
            Self::Masters40 => "Masters (40-44)",
            Self::Masters45 => "Masters (45-49)",
            Self::Masters50 => "Masters (50-54)",
            Self::Masters55 => "Masters (55-59)",
            Self::Masters60 => "Masters (60-64)",
            Self::Masters65 => "Masters (65-69)",
            Self::Masters70 => "Masters (70-74)",
            Self::Masters75To79 => "Masters (75-79)",
            Self::Masters75Plus => "Masters (75+)",
            Self::Masters80Plus => "Masters (80+)",
        }
    }

    /// Every category a competitor of `age` belongs to. Membership is
    /// inclusive: a 16 year old is youth, junior and open at once.
    pub fn for_age(age: u32) -> Vec<AgeCategory> {
        let masters_bands = [
            (35, 39, Self::Masters35),
            (40, 44, Self::Masters40),
            (45, 49, Self::Masters45),
            (50, 54, Self::Masters50),
            (55, 59, Self::Masters55),
            (60, 64, Self::Masters60),
            (65, 69, Self::Masters65),
            (70, 74, Self::Masters70),
            (75, 79, Self::Masters75To79),
        ];

        let mut categories = Vec::new();
        if age <= 11 {
            categories.push(Self::Under11);
        }
        if age <= 13 {
            categories.push(Self::Under13);
        }
        if (14..=15).contains(&age) {
            categories.push(Self::Youth14To15);
        }
        if (16..=17).contains(&age) {
            categories.push(Self::Youth16To17);
        }
        if (15..=20).contains(&age) {
            categories.push(Self::Junior);
        }
        if age >= 15 {
            categories.push(Self::Open);
        }
        for (low, high, category) in masters_bands {
            if (low..=high).contains(&age) {
                categories.push(category);
            }
        }
        if age >= 75 {
            categories.push(Self::Masters75Plus);
        }
        if age >= 80 {
            categories.push(Self::Masters80Plus);
        }
        categories
    }

    /// Single category for a descriptive string such as
    /// `"Open Women's 71kg"`. First marker found wins; `None` when the
    /// string carries no recognised marker.
    pub fn classify(raw: &str) -> Option<AgeCategory> {
        STRING_MARKERS
            .iter()
            .find(|(marker, _)| raw.contains(marker))
            .map(|(_, category)| *category)
    }
}

impl std::str::FromStr for AgeCategory {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.label() == trimmed)
            .ok_or_else(|| StorageError::InvalidData(format!("Unknown age category '{}'", s)))
    }
}

impl std::fmt::Display for AgeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sixteen_year_old_is_multi_member() {
        assert_eq!(
            AgeCategory::for_age(16),
            vec![AgeCategory::Youth16To17, AgeCategory::Junior, AgeCategory::Open]
        );
    }

    #[test]
    fn test_masters_overlap_at_seventy_six() {
        let categories = AgeCategory::for_age(76);
        assert!(categories.contains(&AgeCategory::Open));
        assert!(categories.contains(&AgeCategory::Masters75To79));
        assert!(categories.contains(&AgeCategory::Masters75Plus));
        assert!(!categories.contains(&AgeCategory::Masters80Plus));
    }

    #[test]
    fn test_young_children() {
        assert_eq!(
            AgeCategory::for_age(10),
            vec![AgeCategory::Under11, AgeCategory::Under13]
        );
        assert_eq!(AgeCategory::for_age(13), vec![AgeCategory::Under13]);
    }

    #[test]
    fn test_classify_first_match_wins() {
        assert_eq!(
            AgeCategory::classify("Junior Women's 64kg"),
            Some(AgeCategory::Junior)
        );
        assert_eq!(
            AgeCategory::classify("Masters (40-44) Men's 89kg"),
            Some(AgeCategory::Masters40)
        );
        assert_eq!(
            AgeCategory::classify("Open Men's 81kg"),
            Some(AgeCategory::Open)
        );
        assert_eq!(AgeCategory::classify("Senior"), None);
    }

    #[test]
    fn test_string_path_is_single_valued() {
        // the numeric path for a 16 year old yields three categories,
        // the descriptive path yields exactly one
        assert_eq!(
            AgeCategory::classify("16-17 Age Group Women's 55kg"),
            Some(AgeCategory::Youth16To17)
        );
    }

    #[test]
    fn test_label_round_trip() {
        for category in AgeCategory::ALL {
            assert_eq!(category.label().parse::<AgeCategory>().unwrap(), category);
        }
        assert!("Masters (90+)".parse::<AgeCategory>().is_err());
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&AgeCategory::Junior).unwrap();
        assert_eq!(json, "\"Junior (15-20)\"");
    }
}
