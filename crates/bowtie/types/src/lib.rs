//! Bowtie Domain Types
//!
//! A bowtie diagram links threats (activities and the pressures they
//! exert) through preventive controls to a central problem, and from
//! there through protective controls to consequences. This crate holds
//! the data the guided workflow collects while building one.
//!
//! # Key Concepts
//!
//! - **Category**: one of the five element kinds the workflow collects.
//! - **ItemCollection**: an ordered, duplicate-free list of items for a
//!   category, chosen from a vocabulary or typed in as custom terms.
//! - **Step**: the eight guided steps, from project setup to finalization.
//! - **WorkflowState**: step position, completed steps and project fields.
//! - **PathwayRow**: one scored scenario through the bowtie, produced by
//!   the conversion engine.
//! - **Snapshot**: the persisted form of a session, resumable later.
//! - **Vocabulary**: the read-only term lists the user picks from.

#![deny(unsafe_code)]

mod category;
mod errors;
mod item;
mod pathway;
mod snapshot;
mod state;
mod step;
mod vocabulary;

pub use category::*;
pub use errors::*;
pub use item::*;
pub use pathway::*;
pub use snapshot::*;
pub use state::*;
pub use step::*;
pub use vocabulary::*;
