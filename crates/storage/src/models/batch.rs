use super::athlete_result::AthleteResult;
use super::federation::Federation;
use crate::error::Result;
use crate::services::ranking::merge_federations;

/// The records produced by one fetch cycle, kept per federation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultBatch {
    /// Years the batch was fetched for, ascending.
    pub years: Vec<i32>,
    pub usaw: Vec<AthleteResult>,
    pub iwf: Vec<AthleteResult>,
}

impl ResultBatch {
    pub fn new(years: Vec<i32>, usaw: Vec<AthleteResult>, iwf: Vec<AthleteResult>) -> Self {
        let mut years = years;
        years.sort_unstable();
        years.dedup();
        Self { years, usaw, iwf }
    }

    pub fn federation(&self, federation: Federation) -> &[AthleteResult] {
        match federation {
            Federation::Usaw => &self.usaw,
            Federation::Iwf => &self.iwf,
        }
    }

    pub fn len(&self) -> usize {
        self.usaw.len() + self.iwf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.usaw.is_empty() && self.iwf.is_empty()
    }

    /// USAW then IWF records as one collection.
    pub fn merged(&self) -> Result<Vec<AthleteResult>> {
        merge_federations(&self.usaw, &self.iwf)
    }
}
