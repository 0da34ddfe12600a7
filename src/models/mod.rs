// src/models/mod.rs

pub mod analytics;
pub mod assignment;
pub mod attempt;
pub mod faculty;
pub mod learner;
pub mod quiz;
