use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Current athlete record joined onto live-query results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct LifterMetadata {
    pub lifter_id: i64,
    pub athlete_name: Option<String>,
    pub wso: Option<String>,
    pub club_name: Option<String>,
    pub membership_number: Option<String>,
}

/// Membership and state looked up for the detailed export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UsawLifterDetail {
    pub lifter_id: i64,
    pub membership_number: Option<String>,
    pub state: Option<String>,
}
