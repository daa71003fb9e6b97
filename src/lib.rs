//! Coagulation-factor network model and clinical lab-panel reasoning engine.
//!
//! The crate is organised the same way an evaluation flows: static tables are
//! loaded once into an [`tables::EngineConfig`], a lab panel is mapped onto
//! per-factor activities, clamped by medications and by zymogen supply, and
//! independently classified into a scored differential diagnosis.

pub mod cli;
pub mod ctx;
pub mod diagnosis;
pub mod io;
pub mod labs;
pub mod math;
pub mod network;
pub mod pipeline;
pub mod schema;
pub mod scores;
pub mod simulate;
pub mod tables;
