pub mod age_category;
pub mod athlete_result;
pub mod batch;
pub mod detailed_result;
pub mod division;
pub mod federation;
pub mod lenient;
pub mod lifter;
pub mod raw_result;
pub mod weight_class;

pub use age_category::AgeCategory;
pub use athlete_result::{
    Affiliation, AthleteResult, QScoreKind, compute_best_q_score, parse_result_date,
};
pub use batch::ResultBatch;
pub use detailed_result::{DetailedExportRow, IwfDetailedResult, UsawDetailedResult};
pub use division::InactiveDivisions;
pub use federation::Federation;
pub use lifter::{LifterMetadata, UsawLifterDetail};
pub use raw_result::{IwfRawResult, IwfResultRow, RawResult, UsawRawResult, UsawResultRow};
pub use weight_class::{WeightClassEra, compare_weight_class_labels, normalize_weight_class};
