// src/infrastructure/repositories/posts.rs
use super::{
    categories::{CATEGORY_COLUMNS, CategoryRow},
    contains_pattern,
    links::replace_in_tx,
    map_sqlx,
    tags::{TAG_COLUMNS, TagRow},
    to_count,
};
use crate::domain::category::Category;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::pagination::PageRequest;
use crate::domain::post::{
    LinkKind, NewPost, Post, PostContent, PostDetails, PostFilter, PostId, PostOrder,
    PostReadRepository, PostTitle, PostUpdate, PostWriteRepository, PublicationFilter,
    ReadingTime,
};
use crate::domain::slug::Slug;
use crate::domain::tag::Tag;
use crate::domain::user::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use std::collections::{BTreeSet, HashMap};

const POST_COLUMNS: &str = "p.id, p.title, p.slug, p.content, p.excerpt, p.meta_description, \
     p.featured_image, p.reading_time, p.published, p.published_at, p.view_count, p.author_id, \
     p.created_at, p.updated_at";

#[derive(Clone)]
pub struct PostgresPostWriteRepository {
    pool: PgPool,
}

impl PostgresPostWriteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Clone)]
pub struct PostgresPostReadRepository {
    pool: PgPool,
}

impl PostgresPostReadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PostRow {
    id: i64,
    title: String,
    slug: String,
    content: String,
    excerpt: Option<String>,
    meta_description: Option<String>,
    featured_image: Option<String>,
    reading_time: Option<i32>,
    published: bool,
    published_at: Option<DateTime<Utc>>,
    view_count: i64,
    author_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PostRow> for Post {
    type Error = DomainError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        Ok(Post {
            id: PostId::new(row.id)?,
            title: PostTitle::new(row.title)?,
            slug: Slug::new(row.slug)?,
            content: PostContent::new(row.content)?,
            excerpt: row.excerpt,
            meta_description: row.meta_description,
            featured_image: row.featured_image,
            reading_time: row.reading_time.map(ReadingTime::new).transpose()?,
            published: row.published,
            published_at: row.published_at,
            view_count: row.view_count,
            author_id: UserId::new(row.author_id)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct PostWithAuthorRow {
    #[sqlx(flatten)]
    post: PostRow,
    author_name: String,
}

#[derive(Debug, FromRow)]
struct LinkedCategoryRow {
    post_id: i64,
    #[sqlx(flatten)]
    category: CategoryRow,
}

#[derive(Debug, FromRow)]
struct LinkedTagRow {
    post_id: i64,
    #[sqlx(flatten)]
    tag: TagRow,
}

#[derive(Clone, Copy)]
enum Lookup<'a> {
    Id(i64),
    Slug(&'a str),
}

fn raw_ids<T: Copy + Into<i64>>(ids: &BTreeSet<T>) -> BTreeSet<i64> {
    ids.iter().copied().map(Into::into).collect()
}

#[async_trait]
impl PostWriteRepository for PostgresPostWriteRepository {
    async fn insert(&self, post: NewPost) -> DomainResult<Post> {
        let NewPost {
            title,
            slug,
            content,
            excerpt,
            meta_description,
            featured_image,
            reading_time,
            publish_state,
            author_id,
            categories,
            tags,
            created_at,
        } = post;

        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        let row = sqlx::query_as::<_, PostRow>(&format!(
            "INSERT INTO posts AS p (title, slug, content, excerpt, meta_description, featured_image,
                 reading_time, published, published_at, author_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
             RETURNING {POST_COLUMNS}"
        ))
        .bind(title.as_str())
        .bind(slug.as_str())
        .bind(content.as_str())
        .bind(excerpt)
        .bind(meta_description)
        .bind(featured_image)
        .bind(reading_time.map(|r| r.minutes()))
        .bind(publish_state.published)
        .bind(publish_state.published_at)
        .bind(i64::from(author_id))
        .bind(created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        replace_in_tx(&mut tx, row.id, LinkKind::Category, &raw_ids(&categories)).await?;
        replace_in_tx(&mut tx, row.id, LinkKind::Tag, &raw_ids(&tags)).await?;

        tx.commit().await.map_err(map_sqlx)?;
        Post::try_from(row)
    }

    async fn update(&self, update: PostUpdate) -> DomainResult<Post> {
        let PostUpdate {
            id,
            title,
            slug,
            content,
            excerpt,
            meta_description,
            featured_image,
            reading_time,
            publish_state,
            categories,
            tags,
            updated_at,
        } = update;

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE posts AS p SET updated_at = ");
        builder.push_bind(updated_at);

        if let Some(title) = title {
            builder.push(", title = ");
            builder.push_bind(String::from(title));
        }
        if let Some(slug) = slug {
            builder.push(", slug = ");
            builder.push_bind(slug.into_inner());
        }
        if let Some(content) = content {
            builder.push(", content = ");
            builder.push_bind(String::from(content));
        }
        if let Some(excerpt) = excerpt {
            builder.push(", excerpt = ");
            builder.push_bind(excerpt);
        }
        if let Some(meta_description) = meta_description {
            builder.push(", meta_description = ");
            builder.push_bind(meta_description);
        }
        if let Some(featured_image) = featured_image {
            builder.push(", featured_image = ");
            builder.push_bind(featured_image);
        }
        if let Some(reading_time) = reading_time {
            builder.push(", reading_time = ");
            builder.push_bind(reading_time.minutes());
        }
        if let Some(state) = publish_state {
            builder.push(", published = ");
            builder.push_bind(state.published);
            builder.push(", published_at = ");
            builder.push_bind(state.published_at);
        }

        builder.push(" WHERE p.id = ");
        builder.push_bind(i64::from(id));
        builder.push(" RETURNING ");
        builder.push(POST_COLUMNS);

        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        let row = builder
            .build_query_as::<PostRow>()
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx)?
            .ok_or_else(|| DomainError::NotFound("post not found".into()))?;

        if let Some(categories) = categories {
            replace_in_tx(&mut tx, row.id, LinkKind::Category, &raw_ids(&categories)).await?;
        }
        if let Some(tags) = tags {
            replace_in_tx(&mut tx, row.id, LinkKind::Tag, &raw_ids(&tags)).await?;
        }

        tx.commit().await.map_err(map_sqlx)?;
        Post::try_from(row)
    }

    async fn delete(&self, id: PostId) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(i64::from(id))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("post not found".into()));
        }
        Ok(())
    }

    async fn increment_view_count(&self, id: PostId) -> DomainResult<()> {
        let result = sqlx::query("UPDATE posts SET view_count = view_count + 1 WHERE id = $1")
            .bind(i64::from(id))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("post not found".into()));
        }
        Ok(())
    }
}

impl PostgresPostReadRepository {
    fn push_conditions<'a>(builder: &mut QueryBuilder<'a, Postgres>, filter: &'a PostFilter) {
        builder.push(" WHERE TRUE");

        match filter.publication {
            PublicationFilter::All => {}
            PublicationFilter::Published => {
                builder.push(" AND p.published = TRUE");
            }
            PublicationFilter::Drafts => {
                builder.push(" AND p.published = FALSE");
            }
        }

        if let Some(category) = &filter.category {
            builder.push(
                " AND EXISTS (SELECT 1 FROM post_categories pc JOIN categories c ON c.id = pc.category_id \
                 WHERE pc.post_id = p.id AND c.slug = ",
            );
            builder.push_bind(category.as_str());
            builder.push(")");
        }

        if let Some(tag) = &filter.tag {
            builder.push(
                " AND EXISTS (SELECT 1 FROM post_tags pt JOIN tags t ON t.id = pt.tag_id \
                 WHERE pt.post_id = p.id AND t.slug = ",
            );
            builder.push_bind(tag.as_str());
            builder.push(")");
        }

        if let Some(search) = &filter.search {
            let pattern = contains_pattern(search);
            builder.push(" AND (p.title ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR p.excerpt ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR p.content ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }
    }

    async fn fetch_one(&self, lookup: Lookup<'_>) -> DomainResult<Option<PostDetails>> {
        let column = match lookup {
            Lookup::Id(_) => "id",
            Lookup::Slug(_) => "slug",
        };
        let sql = format!(
            "SELECT {POST_COLUMNS}, u.name AS author_name
             FROM posts p JOIN users u ON u.id = p.author_id
             WHERE p.{column} = $1"
        );
        let query = sqlx::query_as::<_, PostWithAuthorRow>(&sql);
        let query = match lookup {
            Lookup::Id(id) => query.bind(id),
            Lookup::Slug(slug) => query.bind(slug),
        };
        let row = query.fetch_optional(&self.pool).await.map_err(map_sqlx)?;

        match row {
            Some(row) => Ok(self.attach_terms(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Loads categories and tags for a batch of posts with two queries.
    async fn attach_terms(&self, rows: Vec<PostWithAuthorRow>) -> DomainResult<Vec<PostDetails>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = rows.iter().map(|row| row.post.id).collect();

        let category_sql = format!(
            "SELECT pc.post_id, {CATEGORY_COLUMNS}
             FROM post_categories pc JOIN categories c ON c.id = pc.category_id
             WHERE pc.post_id = ANY($1)
             ORDER BY c.name ASC"
        );
        let category_rows = sqlx::query_as::<_, LinkedCategoryRow>(&category_sql)
            .bind(&ids)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let tag_sql = format!(
            "SELECT pt.post_id, {TAG_COLUMNS}
             FROM post_tags pt JOIN tags t ON t.id = pt.tag_id
             WHERE pt.post_id = ANY($1)
             ORDER BY t.name ASC"
        );
        let tag_rows = sqlx::query_as::<_, LinkedTagRow>(&tag_sql)
            .bind(&ids)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let mut categories: HashMap<i64, Vec<Category>> = HashMap::new();
        for row in category_rows {
            categories
                .entry(row.post_id)
                .or_default()
                .push(Category::try_from(row.category)?);
        }
        let mut tags: HashMap<i64, Vec<Tag>> = HashMap::new();
        for row in tag_rows {
            tags.entry(row.post_id)
                .or_default()
                .push(Tag::try_from(row.tag)?);
        }

        rows.into_iter()
            .map(|row| {
                let id = row.post.id;
                Ok(PostDetails {
                    post: Post::try_from(row.post)?,
                    author_name: row.author_name,
                    categories: categories.remove(&id).unwrap_or_default(),
                    tags: tags.remove(&id).unwrap_or_default(),
                })
            })
            .collect()
    }
}

#[async_trait]
impl PostReadRepository for PostgresPostReadRepository {
    async fn exists(&self, id: PostId) -> DomainResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM posts WHERE id = $1)")
            .bind(i64::from(id))
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn find_by_id(&self, id: PostId) -> DomainResult<Option<PostDetails>> {
        self.fetch_one(Lookup::Id(i64::from(id))).await
    }

    async fn find_by_slug(&self, slug: &Slug) -> DomainResult<Option<PostDetails>> {
        self.fetch_one(Lookup::Slug(slug.as_str())).await
    }

    async fn list(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> DomainResult<(Vec<PostDetails>, u64)> {
        let mut count: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM posts p");
        Self::push_conditions(&mut count, filter);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {POST_COLUMNS}, u.name AS author_name FROM posts p JOIN users u ON u.id = p.author_id"
        ));
        Self::push_conditions(&mut builder, filter);
        builder.push(match filter.order {
            PostOrder::NewestPublished => " ORDER BY p.published_at DESC NULLS LAST, p.id DESC",
            PostOrder::NewestCreated => " ORDER BY p.created_at DESC, p.id DESC",
        });
        builder.push(" LIMIT ");
        builder.push_bind(i64::from(page.limit()));
        builder.push(" OFFSET ");
        builder.push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));

        let rows = builder
            .build_query_as::<PostWithAuthorRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        Ok((self.attach_terms(rows).await?, to_count(total)))
    }
}
