use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::protocol::{CreateProtocolRequest, ProtocolFilter, UpdateProtocolRequest};
use crate::error::{Result, StorageError, map_foreign_key};
use crate::models::{Protocol, ProtocolEntry};

const UNKNOWN_CATEGORY: &str = "Tournament category not found";

const ENTRY_SELECT: &str = r#"
    SELECT p.*, t.tournament_id, t.title AS tournament_title,
           tc.category, tc.gender, tc.bow_type
    FROM protocols p
    LEFT JOIN tournament_categories tc ON tc.tournament_category_id = p.tournament_category_id
    LEFT JOIN tournaments t ON t.tournament_id = tc.tournament_id
    WHERE 1=1
"#;

pub struct ProtocolRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProtocolRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Newest year first, then newest event within a year.
    pub async fn list(
        &self,
        filter: &ProtocolFilter,
        include_unpublished: bool,
    ) -> Result<(Vec<ProtocolEntry>, i64)> {
        let pagination = filter.pagination();

        let mut count = QueryBuilder::<Postgres>::new(
            r#"
            SELECT COUNT(*)
            FROM protocols p
            LEFT JOIN tournament_categories tc ON tc.tournament_category_id = p.tournament_category_id
            WHERE 1=1
            "#,
        );
        push_filters(&mut count, filter, include_unpublished);
        let total = count.build_query_scalar::<i64>().fetch_one(self.pool).await?;

        let mut query = QueryBuilder::<Postgres>::new(ENTRY_SELECT);
        push_filters(&mut query, filter, include_unpublished);
        query.push(" ORDER BY p.year DESC, p.event_date DESC, p.sort_order LIMIT ");
        query.push_bind(pagination.limit());
        query.push(" OFFSET ");
        query.push_bind(pagination.offset());

        let entries = query
            .build_query_as::<ProtocolEntry>()
            .fetch_all(self.pool)
            .await?;

        Ok((entries, total))
    }

    pub async fn find_entry(&self, id: Uuid, include_unpublished: bool) -> Result<ProtocolEntry> {
        let mut query = QueryBuilder::<Postgres>::new(ENTRY_SELECT);
        query.push(" AND p.protocol_id = ");
        query.push_bind(id);
        if !include_unpublished {
            query.push(" AND p.is_published");
        }

        query
            .build_query_as::<ProtocolEntry>()
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Protocol> {
        sqlx::query_as::<_, Protocol>("SELECT * FROM protocols WHERE protocol_id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    pub async fn create(&self, req: &CreateProtocolRequest) -> Result<Protocol> {
        sqlx::query_as::<_, Protocol>(
            r#"
            INSERT INTO protocols (
                tournament_category_id, title, title_kk, title_en, event_date,
                location, location_kk, location_en, file_url, year, sort_order, is_published
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(req.tournament_category_id)
        .bind(&req.title)
        .bind(&req.title_kk)
        .bind(&req.title_en)
        .bind(req.event_date)
        .bind(&req.location)
        .bind(&req.location_kk)
        .bind(&req.location_en)
        .bind(&req.file_url)
        .bind(req.year)
        .bind(req.sort_order)
        .bind(req.is_published)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_foreign_key(e, UNKNOWN_CATEGORY))
    }

    pub async fn update(&self, existing: &Protocol, req: &UpdateProtocolRequest) -> Result<Protocol> {
        sqlx::query_as::<_, Protocol>(
            r#"
            UPDATE protocols
            SET tournament_category_id = $2, title = $3, title_kk = $4, title_en = $5,
                event_date = $6, location = $7, location_kk = $8, location_en = $9,
                file_url = $10, year = $11, sort_order = $12, is_published = $13
            WHERE protocol_id = $1
            RETURNING *
            "#,
        )
        .bind(existing.protocol_id)
        .bind(req.tournament_category_id.or(existing.tournament_category_id))
        .bind(req.title.as_ref().unwrap_or(&existing.title))
        .bind(req.title_kk.as_ref().or(existing.title_kk.as_ref()))
        .bind(req.title_en.as_ref().or(existing.title_en.as_ref()))
        .bind(req.event_date.unwrap_or(existing.event_date))
        .bind(req.location.as_ref().unwrap_or(&existing.location))
        .bind(req.location_kk.as_ref().or(existing.location_kk.as_ref()))
        .bind(req.location_en.as_ref().or(existing.location_en.as_ref()))
        .bind(req.file_url.as_ref().or(existing.file_url.as_ref()))
        .bind(req.year.unwrap_or(existing.year))
        .bind(req.sort_order.unwrap_or(existing.sort_order))
        .bind(req.is_published.unwrap_or(existing.is_published))
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_foreign_key(e, UNKNOWN_CATEGORY))?
        .ok_or(StorageError::NotFound)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM protocols WHERE protocol_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

fn push_filters(
    query: &mut QueryBuilder<'_, Postgres>,
    filter: &ProtocolFilter,
    include_unpublished: bool,
) {
    if !include_unpublished {
        query.push(" AND p.is_published");
    }

    if let Some(year) = filter.year {
        query.push(" AND p.year = ");
        query.push_bind(year);
    }

    if let Some(tournament_id) = filter.tournament_id {
        query.push(" AND tc.tournament_id = ");
        query.push_bind(tournament_id);
    }

    if let Some(category_id) = filter.tournament_category_id {
        query.push(" AND p.tournament_category_id = ");
        query.push_bind(category_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn protocol(year: i32, title: &str, category: Option<Uuid>, published: bool) -> CreateProtocolRequest {
        CreateProtocolRequest {
            title: title.to_string(),
            title_kk: None,
            title_en: None,
            event_date: NaiveDate::from_ymd_opt(year, 5, 20).unwrap(),
            location: "Астана".to_string(),
            location_kk: None,
            location_en: None,
            file_url: Some(format!("https://files.example.kz/protocols/{}.pdf", year)),
            year,
            sort_order: 0,
            is_published: published,
            tournament_category_id: category,
        }
    }

    async fn seed_category(pool: &PgPool) -> (Uuid, Uuid) {
        let tournament_id: Uuid = sqlx::query_scalar(
            "INSERT INTO tournaments (title, location, start_date, end_date) VALUES ('Чемпионат РК', 'Астана', NOW(), NOW() + INTERVAL '2 days') RETURNING tournament_id",
        )
        .fetch_one(pool)
        .await
        .unwrap();

        let category_id: Uuid = sqlx::query_scalar(
            "INSERT INTO tournament_categories (tournament_id, category, gender, bow_type) VALUES ($1, 'Adults', 'M', 'Recurve') RETURNING tournament_category_id",
        )
        .bind(tournament_id)
        .fetch_one(pool)
        .await
        .unwrap();

        (tournament_id, category_id)
    }

    fn filter() -> ProtocolFilter {
        ProtocolFilter {
            page: 1,
            limit: 10,
            ..Default::default()
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_list_filters_by_year_and_hides_drafts(pool: PgPool) {
        let (tournament_id, category_id) = seed_category(&pool).await;
        let repo = ProtocolRepository::new(&pool);
        repo.create(&protocol(2024, "Кубок 2024", None, true)).await.unwrap();
        repo.create(&protocol(2025, "Чемпионат 2025", Some(category_id), true))
            .await
            .unwrap();
        repo.create(&protocol(2025, "Черновик", None, false)).await.unwrap();

        let (all, total) = repo.list(&filter(), false).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(all[0].protocol.year, 2025);
        assert_eq!(all[0].tournament_id, Some(tournament_id));

        let by_year = ProtocolFilter {
            year: Some(2025),
            ..filter()
        };
        let (published, total) = repo.list(&by_year, false).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(published[0].protocol.title, "Чемпионат 2025");

        let (with_drafts, total) = repo.list(&by_year, true).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(with_drafts.len(), 2);

        let by_tournament = ProtocolFilter {
            tournament_id: Some(tournament_id),
            ..filter()
        };
        let (linked, _) = repo.list(&by_tournament, true).await.unwrap();
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].protocol.tournament_category_id, Some(category_id));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_unknown_category_is_rejected(pool: PgPool) {
        let repo = ProtocolRepository::new(&pool);

        let err = repo
            .create(&protocol(2025, "Кубок", Some(Uuid::new_v4()), true))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), UNKNOWN_CATEGORY);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_unpublished_protocol_is_hidden_by_id(pool: PgPool) {
        let repo = ProtocolRepository::new(&pool);
        let draft = repo.create(&protocol(2025, "Черновик", None, false)).await.unwrap();

        let hidden = repo.find_entry(draft.protocol_id, false).await;
        assert!(matches!(hidden, Err(StorageError::NotFound)));

        let visible = repo.find_entry(draft.protocol_id, true).await.unwrap();
        assert_eq!(visible.protocol.protocol_id, draft.protocol_id);
    }
}
