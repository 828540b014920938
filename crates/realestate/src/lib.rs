//! Real estate records: leads, the calls and meetings logged against them,
//! and the per-tenant lookup tables that name their stages and statuses.
//!
//! Pure data and input rules (no IO, no HTTP, no storage).

pub mod action;
pub mod lead;
pub mod lookup;

pub use action::{Call, CallId, Meeting, MeetingId, NewCall, NewMeeting};
pub use lead::{Lead, LeadChanges, LeadId, NewLead};
pub use lookup::{LookupEntry, LookupKind, StatusNames};
