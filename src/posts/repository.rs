use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::{
    error::AppError,
    policy,
    posts::{AuthorResponse, Post, PostResponse},
};

/// Flat row for post reads joined with author and like stats.
#[derive(FromRow)]
struct PostFromDb {
    id: Uuid,
    title: String,
    body: String,
    created_at: chrono::DateTime<chrono::Utc>,
    author_id: Uuid,
    username: String,
    like_count: i64,
    liked: bool,
}

impl From<PostFromDb> for PostResponse {
    fn from(p: PostFromDb) -> Self {
        PostResponse {
            id: p.id,
            author: AuthorResponse {
                id: p.author_id,
                username: p.username,
            },
            title: p.title,
            body: p.body,
            like_count: p.like_count,
            liked: p.liked,
            created_at: p.created_at,
        }
    }
}

// $1 is always the viewer (nullable): `liked` is false when it is NULL.
const POST_VIEW: &str = r#"
    SELECT
        p.id, p.title, p.body, p.created_at, p.author_id,
        u.username,
        (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count,
        EXISTS (SELECT 1 FROM likes l WHERE l.post_id = p.id AND l.user_id = $1) AS liked
    FROM posts p
    JOIN users u ON u.id = p.author_id
"#;

pub async fn create(
    pool: &PgPool,
    author_id: Uuid,
    title: &str,
    body: &str,
) -> Result<Post, AppError> {
    let post = sqlx::query_as::<_, Post>(
        "INSERT INTO posts (author_id, title, body) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(author_id)
    .bind(title)
    .bind(body)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

pub async fn view(
    pool: &PgPool,
    id: Uuid,
    viewer: Option<Uuid>,
) -> Result<Option<PostResponse>, AppError> {
    let row = sqlx::query_as::<_, PostFromDb>(&format!("{} WHERE p.id = $2", POST_VIEW))
        .bind(viewer)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(PostResponse::from))
}

pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
    let found = sqlx::query("SELECT 1 FROM posts WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .is_some();

    Ok(found)
}

/// Newest first, optionally restricted to one author.
pub async fn list(
    pool: &PgPool,
    author: Option<Uuid>,
    viewer: Option<Uuid>,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostResponse>, AppError> {
    let rows = sqlx::query_as::<_, PostFromDb>(&format!(
        "{} WHERE ($2::uuid IS NULL OR p.author_id = $2) \
         ORDER BY p.created_at DESC, p.id DESC LIMIT $3 OFFSET $4",
        POST_VIEW
    ))
    .bind(viewer)
    .bind(author)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(PostResponse::from).collect())
}

/// Posts written by the users `viewer` follows, newest first.
pub async fn feed(
    pool: &PgPool,
    viewer: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostResponse>, AppError> {
    let rows = sqlx::query_as::<_, PostFromDb>(&format!(
        "{} JOIN follows f ON f.following_id = p.author_id AND f.follower_id = $1 \
         ORDER BY p.created_at DESC, p.id DESC LIMIT $2 OFFSET $3",
        POST_VIEW
    ))
    .bind(viewer)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(PostResponse::from).collect())
}

/// Updates title and/or body on behalf of `caller`.
///
/// The author row is locked for the duration of the check so the ownership decision and the
/// write see the same post. Missing posts are `NotFound`; posts owned by someone else are
/// `Forbidden`.
pub async fn update(
    pool: &PgPool,
    caller: Uuid,
    id: Uuid,
    title: Option<&str>,
    body: Option<&str>,
) -> Result<Post, AppError> {
    let mut tx = pool.begin().await?;

    let author_id: Uuid =
        sqlx::query_scalar::<_, Uuid>("SELECT author_id FROM posts WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::NotFound("Post not found".to_string()))?;

    policy::ensure_owner(caller, author_id, "edit this post")?;

    let post = sqlx::query_as::<_, Post>(
        r#"
        UPDATE posts
        SET title = COALESCE($2, title),
            body = COALESCE($3, body)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(body)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(post)
}

/// Deletes a post on behalf of its author. Likes on it go with it.
pub async fn delete(pool: &PgPool, caller: Uuid, id: Uuid) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let author_id: Uuid =
        sqlx::query_scalar::<_, Uuid>("SELECT author_id FROM posts WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::NotFound("Post not found".to_string()))?;

    policy::ensure_owner(caller, author_id, "delete this post")?;

    sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}
