/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: Bearer gate / http: request id・trace・limit / cors / security headers
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
