use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use technia_core::TenantId;

/// The per-tenant lookup tables of the real estate module.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupKind {
    LeadStage,
    LeadStatus,
    LeadType,
    CallStatus,
    MeetingStatus,
}

impl LookupKind {
    pub const ALL: [LookupKind; 5] = [
        LookupKind::LeadStage,
        LookupKind::LeadStatus,
        LookupKind::LeadType,
        LookupKind::CallStatus,
        LookupKind::MeetingStatus,
    ];

    /// Lookups describing calls and meetings (as opposed to leads).
    pub fn describes_actions(self) -> bool {
        matches!(self, LookupKind::CallStatus | LookupKind::MeetingStatus)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupEntry {
    pub id: i32,
    pub tenant_id: TenantId,
    pub name: String,
}

/// Id to display name resolution for call/meeting statuses.
#[derive(Debug, Clone, Default)]
pub struct StatusNames {
    names: HashMap<i32, String>,
}

impl StatusNames {
    pub const UNKNOWN: &'static str = "Unknown";

    pub fn name_of(&self, id: i32) -> &str {
        self.names.get(&id).map(String::as_str).unwrap_or(Self::UNKNOWN)
    }
}

impl FromIterator<LookupEntry> for StatusNames {
    fn from_iter<T: IntoIterator<Item = LookupEntry>>(iter: T) -> Self {
        Self {
            names: iter.into_iter().map(|e| (e.id, e.name)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmapped_status_reads_as_unknown() {
        let names: StatusNames = vec![LookupEntry {
            id: 2,
            tenant_id: TenantId::new("technia.io"),
            name: "Answered".into(),
        }]
        .into_iter()
        .collect();

        assert_eq!(names.name_of(2), "Answered");
        assert_eq!(names.name_of(7), "Unknown");
    }
}
