//! Insert-or-delete toggling for the two edge tables (`likes`, `follows`).
//!
//! The toggle never reads before it writes. It inserts with `ON CONFLICT DO NOTHING`, letting
//! the unique constraint on the pair decide whether the edge already exists, and deletes the
//! edge only when the insert was swallowed. Both statements share one transaction, so racing
//! toggles on the same pair never produce duplicates or errors. Two toggles racing on an
//! existing edge can both take the delete branch and both report `Removed`.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;

/// An edge table keyed by a unique `(from, to)` pair.
pub struct Edge {
    pub table: &'static str,
    pub from: &'static str,
    pub to: &'static str,
}

pub const LIKES: Edge = Edge {
    table: "likes",
    from: "user_id",
    to: "post_id",
};

pub const FOLLOWS: Edge = Edge {
    table: "follows",
    from: "follower_id",
    to: "following_id",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Created,
    Removed,
}

impl Toggled {
    pub fn is_created(self) -> bool {
        matches!(self, Toggled::Created)
    }
}

pub async fn toggle(pool: &PgPool, edge: &Edge, from: Uuid, to: Uuid) -> Result<Toggled, AppError> {
    let mut tx = pool.begin().await?;

    let insert = format!(
        "INSERT INTO {table} ({from}, {to}) VALUES ($1, $2) \
         ON CONFLICT ({from}, {to}) DO NOTHING RETURNING id",
        table = edge.table,
        from = edge.from,
        to = edge.to,
    );

    let inserted = sqlx::query(&insert)
        .bind(from)
        .bind(to)
        .fetch_optional(&mut *tx)
        .await?
        .is_some();

    let outcome = if inserted {
        Toggled::Created
    } else {
        // The pair already existed, or a concurrent toggle committed it first.
        let delete = format!(
            "DELETE FROM {table} WHERE {from} = $1 AND {to} = $2",
            table = edge.table,
            from = edge.from,
            to = edge.to,
        );
        sqlx::query(&delete)
            .bind(from)
            .bind(to)
            .execute(&mut *tx)
            .await?;
        Toggled::Removed
    };

    tx.commit().await?;

    Ok(outcome)
}
