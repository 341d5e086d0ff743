pub mod memory_repository;
pub mod pg_repository;
