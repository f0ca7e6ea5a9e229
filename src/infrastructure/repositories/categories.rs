// src/infrastructure/repositories/categories.rs
use super::{map_sqlx, to_count};
use crate::domain::category::{
    Category, CategoryId, CategoryName, CategoryRepository, CategoryUpdate, CategoryWithCount,
    NewCategory,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::slug::Slug;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

pub(super) const CATEGORY_COLUMNS: &str =
    "c.id, c.name, c.slug, c.description, c.color, c.created_at, c.updated_at";

#[derive(Clone)]
pub struct PostgresCategoryRepository {
    pool: PgPool,
}

impl PostgresCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct CategoryRow {
    id: i64,
    name: String,
    slug: String,
    description: Option<String>,
    color: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CategoryRow> for Category {
    type Error = DomainError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        Ok(Category {
            id: CategoryId::new(row.id)?,
            name: CategoryName::new(row.name)?,
            slug: Slug::new(row.slug)?,
            description: row.description,
            color: row.color,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct CategoryCountRow {
    #[sqlx(flatten)]
    category: CategoryRow,
    post_count: i64,
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn insert(&self, category: NewCategory) -> DomainResult<Category> {
        let NewCategory {
            name,
            slug,
            description,
            color,
            created_at,
        } = category;

        let row = sqlx::query_as::<_, CategoryRow>(
            "INSERT INTO categories AS c (name, slug, description, color, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $5)
             RETURNING c.id, c.name, c.slug, c.description, c.color, c.created_at, c.updated_at",
        )
        .bind(name.as_str())
        .bind(slug.as_str())
        .bind(description)
        .bind(color)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Category::try_from(row)
    }

    async fn update(&self, update: CategoryUpdate) -> DomainResult<Category> {
        let CategoryUpdate {
            id,
            name,
            slug,
            description,
            color,
            updated_at,
        } = update;

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE categories AS c SET updated_at = ");
        builder.push_bind(updated_at);

        if let Some(name) = name {
            builder.push(", name = ");
            builder.push_bind(String::from(name));
        }
        if let Some(slug) = slug {
            builder.push(", slug = ");
            builder.push_bind(slug.into_inner());
        }
        if let Some(description) = description {
            builder.push(", description = ");
            builder.push_bind(description);
        }
        if let Some(color) = color {
            builder.push(", color = ");
            builder.push_bind(color);
        }

        builder.push(" WHERE c.id = ");
        builder.push_bind(i64::from(id));
        builder.push(" RETURNING ");
        builder.push(CATEGORY_COLUMNS);

        let row = builder
            .build_query_as::<CategoryRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .ok_or_else(|| DomainError::NotFound("category not found".into()))?;

        Category::try_from(row)
    }

    async fn delete(&self, id: CategoryId) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(i64::from(id))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("category not found".into()));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: CategoryId) -> DomainResult<Option<Category>> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories c WHERE c.id = $1");
        sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(i64::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .map(Category::try_from)
            .transpose()
    }

    async fn find_by_slug(&self, slug: &Slug) -> DomainResult<Option<Category>> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories c WHERE c.slug = $1");
        sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(slug.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .map(Category::try_from)
            .transpose()
    }

    async fn list_with_post_counts(&self) -> DomainResult<Vec<CategoryWithCount>> {
        let sql = format!(
            "SELECT {CATEGORY_COLUMNS}, COUNT(p.id) AS post_count
             FROM categories c
             LEFT JOIN post_categories pc ON pc.category_id = c.id
             LEFT JOIN posts p ON p.id = pc.post_id AND p.published
             GROUP BY c.id
             ORDER BY c.name ASC"
        );
        let rows = sqlx::query_as::<_, CategoryCountRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        rows.into_iter()
            .map(|row| {
                Ok(CategoryWithCount {
                    category: Category::try_from(row.category)?,
                    post_count: to_count(row.post_count),
                })
            })
            .collect()
    }

    async fn count_linked_posts(&self, id: CategoryId) -> DomainResult<u64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM post_categories WHERE category_id = $1")
            .bind(i64::from(id))
            .fetch_one(&self.pool)
            .await
            .map(to_count)
            .map_err(map_sqlx)
    }
}
