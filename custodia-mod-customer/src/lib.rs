pub mod entity;
pub mod handler;
pub mod infra;
pub mod queries;
pub mod repository;
pub mod service;
