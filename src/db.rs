use sqlx::migrate::Migrator;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Constraint rejections Postgres reports through SQLSTATE codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    Check,
    ForeignKey,
}

impl ConstraintKind {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "23505" => Some(ConstraintKind::Unique),
            "23514" => Some(ConstraintKind::Check),
            "23503" => Some(ConstraintKind::ForeignKey),
            _ => None,
        }
    }

    pub fn of(err: &sqlx::Error) -> Option<Self> {
        let db_err = err.as_database_error()?;
        Self::from_code(&db_err.code()?)
    }
}

/// Name of the violated constraint, when the driver reports one.
pub fn constraint_name(err: &sqlx::Error) -> Option<String> {
    err.as_database_error()
        .and_then(|db_err| db_err.constraint())
        .map(str::to_string)
}
