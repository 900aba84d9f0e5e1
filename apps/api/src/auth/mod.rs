//! Login, registration, logout and password-reset endpoints. Credentials are
//! checked by the store's auth endpoints; this service only issues and clears
//! the session cookies.

pub mod handlers;
