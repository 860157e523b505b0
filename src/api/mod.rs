/*
 * Responsibility
 * - HTTP surface (/api 配下) の公開ポイント
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::routes;
