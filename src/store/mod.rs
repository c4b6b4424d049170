pub mod products;
pub mod users;

pub use users::CredentialStore;
