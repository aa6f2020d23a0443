pub mod cookies;
pub mod health;
pub mod logging;
pub mod request;
