/*
 * Responsibility
 * - SQLx によるテーブル操作 (organizations / contacts)
 */
pub mod contact_repo;
pub mod error;
pub mod organization_repo;
