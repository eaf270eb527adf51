use chrono::{Datelike, NaiveDate};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::Result;
use crate::models::{
    IwfDetailedResult, IwfResultRow, LifterMetadata, UsawDetailedResult, UsawLifterDetail,
    UsawResultRow,
};

/// Numeric columns are read back as text so the lenient number parsing
/// treats live rows and snapshot rows the same way.
const USAW_RESULT_COLUMNS: &str = r#"
    r.result_id,
    r.meet_id,
    r.lifter_id,
    l.membership_number::text AS membership_number,
    r.lifter_name,
    r.gender,
    r.weight_class,
    r.age_category,
    r.date::text AS date,
    r.meet_name,
    r.body_weight_kg::text AS body_weight_kg,
    r.competition_age::int4 AS competition_age,
    r.best_snatch::text AS best_snatch,
    r.best_cj::text AS best_cj,
    r.total::text AS total,
    r.qpoints::text AS qpoints,
    r.q_youth::text AS q_youth,
    r.q_masters::text AS q_masters,
    r.wso,
    r.club_name
"#;

const IWF_RESULT_COLUMNS: &str = r#"
    r.db_result_id,
    r.db_meet_id,
    r.db_lifter_id,
    l.iwf_lifter_id,
    r.lifter_name,
    r.gender,
    r.weight_class,
    r.age_category,
    r.date,
    r.meet_name,
    r.body_weight_kg::text AS body_weight_kg,
    r.competition_age::int4 AS competition_age,
    r.best_snatch::text AS best_snatch,
    r.best_cj::text AS best_cj,
    r.total::text AS total,
    r.qpoints::text AS qpoints,
    r.q_youth::text AS q_youth,
    r.q_masters::text AS q_masters,
    r.country_code,
    r.country_name
"#;

/// Date columns are free text and are never cast. Rows whose date does not
/// have the expected shape are skipped. USAW dates start with `YYYY-MM-DD`.
const USAW_DATE_GUARD: &str = r"r.date::text ~ '^\d{4}-\d{2}-\d{2}'";
const USAW_DAY_EXPR: &str = "left(r.date::text, 10)";

/// IWF dates look like `"Jan 15, 2024"`; they are matched on the trailing
/// year only.
const IWF_DATE_GUARD: &str = r"btrim(r.date) ~ '\d{4}$'";
const IWF_YEAR_EXPR: &str = "right(btrim(r.date), 4)";

fn usaw_page_query(
    start: NaiveDate,
    end: NaiveDate,
    offset: i64,
    limit: i64,
) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("SELECT ");
    query.push(USAW_RESULT_COLUMNS);
    query.push(
        " FROM usaw_meet_results r LEFT JOIN usaw_lifters l ON l.lifter_id = r.lifter_id WHERE ",
    );
    query.push(USAW_DATE_GUARD);
    query.push(" AND ");
    query.push(USAW_DAY_EXPR);
    query.push(" >= ");
    query.push_bind(start.format("%Y-%m-%d").to_string());
    query.push(" AND ");
    query.push(USAW_DAY_EXPR);
    query.push(" <= ");
    query.push_bind(end.format("%Y-%m-%d").to_string());
    query.push(" ORDER BY r.date DESC, r.result_id LIMIT ");
    query.push_bind(limit);
    query.push(" OFFSET ");
    query.push_bind(offset);
    query
}

/// Year granular: callers narrow to exact dates after parsing.
fn iwf_page_query(
    start: NaiveDate,
    end: NaiveDate,
    offset: i64,
    limit: i64,
) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("SELECT ");
    query.push(IWF_RESULT_COLUMNS);
    query.push(
        " FROM iwf_meet_results r LEFT JOIN iwf_lifters l ON l.db_lifter_id = r.db_lifter_id WHERE ",
    );
    query.push(IWF_DATE_GUARD);
    query.push(" AND ");
    query.push(IWF_YEAR_EXPR);
    query.push(" >= ");
    query.push_bind(format!("{:04}", start.year()));
    query.push(" AND ");
    query.push(IWF_YEAR_EXPR);
    query.push(" <= ");
    query.push_bind(format!("{:04}", end.year()));
    query.push(" ORDER BY r.db_result_id LIMIT ");
    query.push_bind(limit);
    query.push(" OFFSET ");
    query.push_bind(offset);
    query
}

pub struct ResultsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ResultsRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// One page of USAW results dated within `[start, end]`, newest first.
    pub async fn usaw_results_page(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<UsawResultRow>> {
        let mut query = usaw_page_query(start, end, offset, limit);
        let rows: Vec<UsawResultRow> = query.build_query_as().fetch_all(self.pool).await?;
        Ok(rows)
    }

    /// One page of IWF results from the years spanned by `[start, end]`.
    pub async fn iwf_results_page(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<IwfResultRow>> {
        let mut query = iwf_page_query(start, end, offset, limit);
        let rows: Vec<IwfResultRow> = query.build_query_as().fetch_all(self.pool).await?;
        Ok(rows)
    }

    /// Canonical USAW lifter metadata for the given ids. Callers batch the
    /// ids to keep the parameter list bounded.
    pub async fn lifters_by_ids(&self, lifter_ids: &[i64]) -> Result<Vec<LifterMetadata>> {
        if lifter_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::new(
            "SELECT lifter_id, athlete_name, wso, club_name, membership_number::text AS membership_number FROM usaw_lifters WHERE lifter_id IN ",
        );
        push_id_list(&mut query, lifter_ids);

        let rows: Vec<LifterMetadata> = query.build_query_as().fetch_all(self.pool).await?;
        Ok(rows)
    }

    pub async fn usaw_lifter_details(&self, lifter_ids: &[i64]) -> Result<Vec<UsawLifterDetail>> {
        if lifter_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::new(
            "SELECT lifter_id, membership_number::text AS membership_number, state FROM usaw_lifters WHERE lifter_id IN ",
        );
        push_id_list(&mut query, lifter_ids);

        let rows: Vec<UsawLifterDetail> = query.build_query_as().fetch_all(self.pool).await?;
        Ok(rows)
    }

    /// Attempt-level USAW rows for the detailed export.
    pub async fn usaw_details_by_result_ids(
        &self,
        result_ids: &[i64],
    ) -> Result<Vec<UsawDetailedResult>> {
        if result_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::new(
            r#"
            SELECT
                r.result_id,
                r.lifter_id,
                r.lifter_name,
                l.membership_number::text AS membership_number,
                r.date::text AS date,
                r.meet_name,
                r.location,
                r.gender,
                r.age_category,
                r.weight_class,
                r.body_weight_kg::text AS body_weight_kg,
                r.snatch_lift_1::text AS snatch_lift_1,
                r.snatch_lift_2::text AS snatch_lift_2,
                r.snatch_lift_3::text AS snatch_lift_3,
                r.best_snatch::text AS best_snatch,
                r.cj_lift_1::text AS cj_lift_1,
                r.cj_lift_2::text AS cj_lift_2,
                r.cj_lift_3::text AS cj_lift_3,
                r.best_cj::text AS best_cj,
                r.total::text AS total,
                r.qpoints::text AS qpoints,
                r.q_youth::text AS q_youth,
                r.q_masters::text AS q_masters,
                r.competition_age::int4 AS competition_age,
                r.wso,
                r.club_name
            FROM usaw_meet_results r
            WHERE r.result_id IN
            "#,
        );
        push_id_list(&mut query, result_ids);

        let rows: Vec<UsawDetailedResult> = query.build_query_as().fetch_all(self.pool).await?;
        Ok(rows)
    }

    /// Attempt-level IWF rows for the detailed export.
    pub async fn iwf_details_by_result_ids(
        &self,
        result_ids: &[i64],
    ) -> Result<Vec<IwfDetailedResult>> {
        if result_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::new(
            r#"
            SELECT
                r.db_result_id,
                r.lifter_name,
                r.date,
                r.meet_name,
                r.gender,
                r.age_category,
                r.weight_class,
                r.body_weight_kg::text AS body_weight_kg,
                r.snatch_1::text AS snatch_1,
                r.snatch_2::text AS snatch_2,
                r.snatch_3::text AS snatch_3,
                r.best_snatch::text AS best_snatch,
                r.cj_1::text AS cj_1,
                r.cj_2::text AS cj_2,
                r.cj_3::text AS cj_3,
                r.best_cj::text AS best_cj,
                r.total::text AS total,
                r.qpoints::text AS qpoints,
                r.competition_age::int4 AS competition_age,
                r.nation
            FROM iwf_meet_results r
            WHERE r.db_result_id IN
            "#,
        );
        push_id_list(&mut query, result_ids);

        let rows: Vec<IwfDetailedResult> = query.build_query_as().fetch_all(self.pool).await?;
        Ok(rows)
    }
}

fn push_id_list(query: &mut QueryBuilder<'_, Postgres>, ids: &[i64]) {
    query.push("(");
    let mut separated = query.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        )
    }

    #[test]
    fn test_usaw_page_never_casts_dates() {
        let (start, end) = window();
        let query = usaw_page_query(start, end, 0, 1000);
        let sql = query.sql();

        assert!(!sql.contains("::date"));
        assert!(!sql.contains("to_date"));
        assert!(sql.contains(USAW_DATE_GUARD));
        assert!(sql.contains("left(r.date::text, 10) >= $1"));
    }

    #[test]
    fn test_usaw_page_joins_membership_number() {
        let (start, end) = window();
        let query = usaw_page_query(start, end, 0, 1000);
        let sql = query.sql();

        assert!(sql.contains("LEFT JOIN usaw_lifters l ON l.lifter_id = r.lifter_id"));
        assert!(sql.contains("l.membership_number::text AS membership_number"));
        assert!(!sql.contains("NULL::text AS membership_number"));
    }

    #[test]
    fn test_iwf_page_filters_on_year_suffix() {
        let (start, end) = window();
        let query = iwf_page_query(start, end, 1000, 1000);
        let sql = query.sql();

        assert!(!sql.contains("to_date"));
        assert!(sql.contains(IWF_DATE_GUARD));
        assert!(sql.contains("right(btrim(r.date), 4) <= $2"));
        assert!(sql.contains("ORDER BY r.db_result_id"));
    }
}
