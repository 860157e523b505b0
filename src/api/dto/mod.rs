pub mod contacts;
pub mod organizations;
