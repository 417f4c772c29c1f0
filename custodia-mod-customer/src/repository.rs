use custodia::db::{AppDbDriver, BaseRepository};

use crate::entity::Customer;

pub trait CustomerRepository:
    BaseRepository<Customer, AppDbDriver> + Sync + Send
{
}
