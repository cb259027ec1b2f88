pub mod application;
pub mod audit;
pub mod event;
pub mod role;
pub mod user;
