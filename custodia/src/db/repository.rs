use crate::db::Handle;

/// Point-lookup / scan / write contract shared by entity repositories.
///
/// Implementations issue exactly one statement per call and never retry.
#[async_trait::async_trait]
pub trait BaseRepository<T, DB>
where
    DB: sqlx::Database,
    for<'e> &'e mut DB::Connection: sqlx::Executor<'e, Database = DB>,
{
    /// Unfiltered scan. Empty when the table has no rows.
    async fn find_all(&self, h: &mut Handle<DB>) -> crate::Result<Vec<T>>;

    /// Fails with `NotFound` when no row matches.
    async fn find_by_id(
        &self,
        h: &mut Handle<DB>,
        id: i64,
    ) -> crate::Result<T>;

    /// Inserts `entity`, ignoring its id, and returns the generated key.
    async fn create(&self, h: &mut Handle<DB>, entity: T)
    -> crate::Result<i64>;

    /// Matches by id. Zero matched rows is not an error.
    async fn update(&self, h: &mut Handle<DB>, entity: T)
    -> crate::Result<()>;

    /// Matches by id. Deleting a missing row is not an error.
    async fn delete(&self, h: &mut Handle<DB>, id: i64)
    -> crate::Result<()>;
}
