use custodia::db::AppDbHandle;

use crate::entity::Customer;

/// Validation and orchestration in front of the customer store.
///
/// Every method receives the request-scoped handle explicitly; implementations
/// hold no per-request state and can be shared across requests.
#[async_trait::async_trait]
pub trait CustomerService: Sync + Send {
    async fn list(
        &self,
        h: &mut AppDbHandle,
    ) -> custodia::Result<Vec<Customer>>;

    /// `id` must parse as a base-10 integer `>= 0`.
    async fn get_by_id(
        &self,
        h: &mut AppDbHandle,
        id: &str,
    ) -> custodia::Result<Customer>;

    /// Returns the row as re-read after the insert.
    async fn create(
        &self,
        h: &mut AppDbHandle,
        customer: Customer,
    ) -> custodia::Result<Customer>;

    /// Requires `id >= 1`. Returns the row as re-read after the update.
    async fn update(
        &self,
        h: &mut AppDbHandle,
        customer: Customer,
    ) -> custodia::Result<Customer>;

    /// `id` must parse as a base-10 integer `>= 0`.
    async fn delete(
        &self,
        h: &mut AppDbHandle,
        id: &str,
    ) -> custodia::Result<()>;
}

mod customer_service_impl;
pub use customer_service_impl::*;
