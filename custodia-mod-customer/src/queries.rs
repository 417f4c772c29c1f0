//! Every statement issued against the `customers` table.

pub const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS customers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
)";

pub const SELECT_ALL: &str = "SELECT id, name FROM customers";
pub const SELECT_BY_ID: &str = "SELECT id, name FROM customers WHERE id = ?";
pub const INSERT: &str = "INSERT INTO customers (name) VALUES (?) RETURNING id";
pub const UPDATE: &str = "UPDATE customers SET name = ? WHERE id = ?";
pub const DELETE: &str = "DELETE FROM customers WHERE id = ?";
