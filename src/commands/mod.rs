pub mod auth;
pub mod create;
pub mod delete;
pub mod fetch;
pub mod update;
