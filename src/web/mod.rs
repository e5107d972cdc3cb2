// src/web/mod.rs
pub mod auth_handlers;
pub mod content_handlers;
pub mod event_handlers;
pub mod extract;
pub mod folder_handlers;
pub mod mw_admin;
pub mod mw_auth;
pub mod mw_semester;
pub mod qanda_handlers;
pub mod quiz_handlers;
pub mod routes;
pub mod semester_handlers;
pub mod subject_handlers;
pub mod user_handlers;

#[cfg(test)]
pub mod test_support;
