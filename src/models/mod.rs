// src/models/mod.rs
pub mod content;
pub mod event;
pub mod folder;
pub mod qanda;
pub mod quiz;
pub mod semester;
pub mod subject;
pub mod user;
