use std::collections::HashSet;

use csv::{ReaderBuilder, Trim};

const INACTIVE_MARKER: &str = "(Inactive)";

/// Gender and weight class combinations that are no longer contested,
/// keyed as `"Women's 64kg"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InactiveDivisions {
    divisions: HashSet<String>,
}

impl InactiveDivisions {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse the divisions feed: a CSV whose first column holds the
    /// division name, retired ones prefixed with `(Inactive)`. Unreadable
    /// records are skipped.
    pub fn parse(content: &str) -> Self {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(content.as_bytes());

        let divisions = reader
            .records()
            .filter_map(|record| record.ok())
            .filter_map(|record| inactive_key(record.get(0)?))
            .collect();

        Self { divisions }
    }

    pub fn contains(&self, gender_weight_class: &str) -> bool {
        self.divisions.contains(gender_weight_class)
    }

    pub fn len(&self) -> usize {
        self.divisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.divisions.is_empty()
    }
}

impl FromIterator<String> for InactiveDivisions {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            divisions: iter.into_iter().collect(),
        }
    }
}

/// `"(Inactive) Open Women's 64kg"` becomes `"Women's 64kg"`.
fn inactive_key(division: &str) -> Option<String> {
    let division = division.strip_prefix(INACTIVE_MARKER)?.trim();

    let gender = if division.contains("Women's") {
        "Women's"
    } else if division.contains("Men's") {
        "Men's"
    } else {
        return None;
    };

    let weight_class = division.split(' ').next_back()?;
    if !weight_class.contains("kg") {
        return None;
    }

    Some(format!("{} {}", gender, weight_class))
}
