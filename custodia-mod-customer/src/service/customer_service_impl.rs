use crate::{
    entity::Customer, repository::CustomerRepository, service::CustomerService,
};
use custodia::db::AppDbHandle;
use std::sync::Arc;

pub struct CustomerServiceImpl<R: CustomerRepository> {
    pub repo: Arc<R>,
}

impl<R: CustomerRepository> CustomerServiceImpl<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

fn parse_id(raw: &str) -> custodia::Result<i64> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id >= 0)
        .ok_or_else(|| custodia::Error::invalid_param("id"))
}

fn require_name(customer: &Customer) -> custodia::Result<()> {
    if customer.name.is_empty() {
        return Err(custodia::Error::invalid_param("Name"));
    }
    Ok(())
}

#[async_trait::async_trait]
impl<R: CustomerRepository> CustomerService for CustomerServiceImpl<R> {
    async fn list(
        &self,
        h: &mut AppDbHandle,
    ) -> custodia::Result<Vec<Customer>> {
        self.repo.find_all(h).await
    }

    async fn get_by_id(
        &self,
        h: &mut AppDbHandle,
        id: &str,
    ) -> custodia::Result<Customer> {
        let id = parse_id(id)?;
        self.repo.find_by_id(h, id).await
    }

    async fn create(
        &self,
        h: &mut AppDbHandle,
        customer: Customer,
    ) -> custodia::Result<Customer> {
        require_name(&customer)?;

        let id = self.repo.create(h, customer).await?;
        tracing::debug!(customer_id = id, "customer created");
        // not in a transaction: a concurrent delete turns this into NotFound
        self.repo.find_by_id(h, id).await
    }

    async fn update(
        &self,
        h: &mut AppDbHandle,
        customer: Customer,
    ) -> custodia::Result<Customer> {
        require_name(&customer)?;
        // stricter than parse_id: zero is rejected here
        if customer.id < 1 {
            return Err(custodia::Error::invalid_param("id"));
        }

        let id = customer.id;
        self.repo.update(h, customer).await?;
        tracing::debug!(customer_id = id, "customer updated");
        self.repo.find_by_id(h, id).await
    }

    async fn delete(
        &self,
        h: &mut AppDbHandle,
        id: &str,
    ) -> custodia::Result<()> {
        let id = parse_id(id)?;
        self.repo.delete(h, id).await?;
        tracing::debug!(customer_id = id, "customer deleted");
        Ok(())
    }
}
