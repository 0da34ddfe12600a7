// src/services/mod.rs

pub mod analytics;
pub mod attempts;
pub mod catalog;
pub mod coursework;
pub mod faculty;
pub mod grading;
pub mod roster;
