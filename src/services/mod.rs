// src/services/mod.rs
pub mod auth_service;
pub mod content_service;
pub mod event_service;
pub mod folder_service;
pub mod qanda_service;
pub mod quiz_service;
pub mod semester_service;
pub mod subject_service;
pub mod token_service;
pub mod user_service;
