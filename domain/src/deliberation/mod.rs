//! Deliberation domain
//!
//! Types that describe one roundtable run: its configuration, the rounds it
//! moves through, the per-model responses it collects and the events it emits.

pub mod entities;
pub mod event;
pub mod mode;
pub mod settings;
pub mod synthesizer;
pub mod value_objects;
