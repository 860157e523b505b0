pub mod access_jwt;
pub mod factory;
pub mod jwks;

#[cfg(test)]
pub mod test_support;

pub use access_jwt::{AuthError, AuthService};
pub use factory::build_auth_service;
pub use jwks::RemoteJwks;
