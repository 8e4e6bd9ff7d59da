// Auth module - token service, credential hashing, and the request gate

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod password;
pub mod routes;
pub mod token;


pub use extractors::AuthedUser;
pub use routes::auth_routes;
