mod auth;
mod credentials;
mod manifest;
mod token;

pub use auth::TokenManager;
pub use manifest::ManifestWriter;
pub use token::TokenStore;
