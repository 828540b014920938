//! Calls and meetings: the "actions" taken on a lead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use technia_core::{TenantId, UserId};

use crate::LeadId;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallId(pub i32);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeetingId(pub i32);

/// A phone call logged against a lead by the user who made it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub id: CallId,
    pub tenant_id: TenantId,
    pub lead_id: LeadId,
    pub assigned_to: UserId,
    pub call_date: DateTime<Utc>,
    pub status: i32,
    pub date_added: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCall {
    pub call_date: DateTime<Utc>,
    pub status: i32,
}

impl NewCall {
    pub fn into_call(
        self,
        id: CallId,
        tenant_id: TenantId,
        lead_id: LeadId,
        assigned_to: UserId,
        date_added: DateTime<Utc>,
    ) -> Call {
        Call {
            id,
            tenant_id,
            lead_id,
            assigned_to,
            call_date: self.call_date,
            status: self.status,
            date_added,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: MeetingId,
    pub tenant_id: TenantId,
    pub lead_id: LeadId,
    pub assigned_to: UserId,
    pub meeting_date: DateTime<Utc>,
    pub status: i32,
    pub date_added: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMeeting {
    pub meeting_date: DateTime<Utc>,
    pub status: i32,
}

impl NewMeeting {
    pub fn into_meeting(
        self,
        id: MeetingId,
        tenant_id: TenantId,
        lead_id: LeadId,
        assigned_to: UserId,
        date_added: DateTime<Utc>,
    ) -> Meeting {
        Meeting {
            id,
            tenant_id,
            lead_id,
            assigned_to,
            meeting_date: self.meeting_date,
            status: self.status,
            date_added,
        }
    }
}
