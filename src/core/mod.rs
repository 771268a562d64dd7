// src/core/mod.rs
pub mod engine;
pub mod eval_view;
