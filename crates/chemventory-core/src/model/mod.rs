//! Domain types for chemical records and the audit log.
//!
//! These types double as the wire format: the JSON field names match the
//! hosted `chemicals` table columns and the local `chemicals_v1` cache.

mod audit;
mod chemical;

pub use audit::{AuditAction, AuditEntry};
pub use chemical::{
    parse_record_date, ChemicalPatch, ChemicalRecord, NewChemical, PhysicalState, SafetyClass,
};
