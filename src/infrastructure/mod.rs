pub mod backends;
pub mod stores;
