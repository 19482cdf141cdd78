//! SeaORM-backed Storage Port
//!
//! `SeaOrmStorage` is generic over the SeaORM connection so the same
//! repository code runs on a pooled `DatabaseConnection` (the `Storage`) and
//! on an open `DatabaseTransaction` (the `UnitOfWork`).

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult, Storage, UnitOfWork};

pub struct SeaOrmStorage<C> {
    pub(super) conn: C,
}

impl<C> SeaOrmStorage<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl Storage for SeaOrmStorage<DatabaseConnection> {
    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>> {
        let txn = self.conn.begin().await.map_err(db_err)?;
        debug!("Database transaction opened");
        Ok(Box::new(SeaOrmStorage::new(txn)))
    }
}

#[async_trait]
impl UnitOfWork for SeaOrmStorage<DatabaseTransaction> {
    async fn commit(self: Box<Self>) -> DomainResult<()> {
        let this = *self;
        this.conn.commit().await.map_err(db_err)?;
        debug!("Database transaction committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> DomainResult<()> {
        let this = *self;
        this.conn.rollback().await.map_err(db_err)?;
        debug!("Database transaction rolled back");
        Ok(())
    }
}

// ── Conversion helpers ──────────────────────────────────────────

pub(super) fn db_err(e: DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

pub(super) fn parse_id(raw: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|e| DomainError::Storage(format!("Corrupt id {:?} in database: {}", raw, e)))
}

/// `LOWER(column) LIKE '%needle%'`, with LIKE wildcards in `needle` matched literally.
///
/// `needle` is expected to be lowercased already.
pub(super) fn contains_ignore_case<T>(column: T, needle: &str) -> SimpleExpr
where
    T: ColumnTrait + 'static,
{
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Expr::expr(Func::lower(Expr::col(column)))
        .like(LikeExpr::new(format!("%{}%", escaped)).escape('\\'))
}
