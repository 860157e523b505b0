/*
 * Responsibility
 * - handler から呼ばれるドメインサービス
 * - auth: Bearer token の検証 (JWKS 取得 → 署名/claims 検証)
 */
pub mod auth;
