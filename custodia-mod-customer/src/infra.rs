use custodia::db::{AppDbDriver, AppDbHandle, AsExecutor, BaseRepository};

use crate::{entity::Customer, queries, repository::CustomerRepository};

/// Creates the `customers` table when absent. Safe to run on every start.
pub async fn ensure_schema(h: &mut AppDbHandle) -> custodia::Result<()> {
    sqlx::query(queries::CREATE_TABLE)
        .execute(h.as_executor())
        .await
        .map_err(custodia::db::map_err)?;
    Ok(())
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SqlxCustomerRepository;

#[async_trait::async_trait]
impl BaseRepository<Customer, AppDbDriver> for SqlxCustomerRepository {
    async fn find_all(
        &self,
        h: &mut AppDbHandle,
    ) -> custodia::Result<Vec<Customer>> {
        sqlx::query_as(queries::SELECT_ALL)
            .fetch_all(h.as_executor())
            .await
            .map_err(custodia::db::map_err)
    }

    async fn find_by_id(
        &self,
        h: &mut AppDbHandle,
        id: i64,
    ) -> custodia::Result<Customer> {
        sqlx::query_as(queries::SELECT_BY_ID)
            .bind(id)
            .fetch_optional(h.as_executor())
            .await
            .map_err(custodia::db::map_err)?
            .ok_or_else(|| custodia::Error::NotFound(format!("customer {id}")))
    }

    async fn create(
        &self,
        h: &mut AppDbHandle,
        entity: Customer,
    ) -> custodia::Result<i64> {
        sqlx::query_scalar::<_, i64>(queries::INSERT)
            .bind(entity.name)
            .fetch_optional(h.as_executor())
            .await
            .map_err(|e| match custodia::db::map_err(e) {
                custodia::Error::Decode(e) => {
                    custodia::Error::GeneratedKey(e.to_string())
                }
                e => e,
            })?
            .ok_or_else(|| {
                custodia::Error::GeneratedKey("insert returned no id".into())
            })
    }

    async fn update(
        &self,
        h: &mut AppDbHandle,
        entity: Customer,
    ) -> custodia::Result<()> {
        sqlx::query(queries::UPDATE)
            .bind(entity.name)
            .bind(entity.id)
            .execute(h.as_executor())
            .await
            .map_err(custodia::db::map_err)?;
        Ok(())
    }

    async fn delete(
        &self,
        h: &mut AppDbHandle,
        id: i64,
    ) -> custodia::Result<()> {
        sqlx::query(queries::DELETE)
            .bind(id)
            .execute(h.as_executor())
            .await
            .map_err(custodia::db::map_err)?;
        Ok(())
    }
}

impl CustomerRepository for SqlxCustomerRepository {}
