use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Proposal,
    Negotiation,
    Closed,
}

impl LeadStatus {
    /// Pipeline order.
    pub const ALL: [LeadStatus; 6] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::Qualified,
        LeadStatus::Proposal,
        LeadStatus::Negotiation,
        LeadStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Proposal => "proposal",
            LeadStatus::Negotiation => "negotiation",
            LeadStatus::Closed => "closed",
        }
    }

    /// "new, contacted, qualified, proposal, negotiation, closed"
    pub fn options_list() -> String {
        Self::ALL
            .iter()
            .map(LeadStatus::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for LeadStatus {
    fn default() -> Self {
        LeadStatus::New
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = String;

    /// Case-insensitive; surrounding whitespace is not stripped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        LeadStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == lowered)
            .ok_or_else(|| format!("unknown lead status: {}", s))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Contact {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Payload for creating a lead. Identity and bookkeeping timestamps are
/// assigned by the repository.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewLead {
    pub title: String,
    pub company: String,
    pub value: f64,
    pub status: LeadStatus,
    pub date: DateTime<Utc>,
    pub description: String,
    pub contact: Contact,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_follow_up: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub title: String,
    pub company: String,
    pub value: f64,
    pub status: LeadStatus,
    pub date: DateTime<Utc>,
    pub description: String,
    pub contact: Contact,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_follow_up: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    pub fn from_new(id: String, new_lead: NewLead, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: new_lead.title,
            company: new_lead.company,
            value: new_lead.value,
            status: new_lead.status,
            date: new_lead.date,
            description: new_lead.description,
            contact: new_lead.contact,
            next_follow_up: new_lead.next_follow_up,
            created_at: now,
            updated_at: now,
        }
    }

    /// Case-insensitive substring match over the searchable text fields.
    /// `needle` must already be lower-cased.
    pub fn matches_search(&self, needle: &str) -> bool {
        let haystacks = [
            Some(self.title.as_str()),
            Some(self.company.as_str()),
            Some(self.contact.name.as_str()),
            Some(self.contact.email.as_str()),
            self.contact.phone.as_deref(),
        ];
        haystacks
            .into_iter()
            .flatten()
            .any(|text| text.to_lowercase().contains(needle))
    }

    pub fn apply(&mut self, patch: LeadPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(company) = patch.company {
            self.company = company;
        }
        if let Some(value) = patch.value {
            self.value = value;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(contact) = patch.contact {
            self.contact = contact;
        }
        if let Some(next_follow_up) = patch.next_follow_up {
            self.next_follow_up = next_follow_up;
        }
        self.updated_at = now;
    }
}

/// Partial update. `next_follow_up: Some(None)` clears the follow-up date.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeadPatch {
    pub title: Option<String>,
    pub company: Option<String>,
    pub value: Option<f64>,
    pub status: Option<LeadStatus>,
    pub description: Option<String>,
    pub contact: Option<Contact>,
    /// Absent leaves the date unchanged; `null` clears it.
    #[serde(default, deserialize_with = "present_or_null")]
    pub next_follow_up: Option<Option<DateTime<Utc>>>,
}

/// Maps a present field (including `null`) to `Some`, so that `null` is
/// distinguishable from a missing key.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct LeadQuery {
    pub search: Option<String>,
    pub status: Option<LeadStatus>,
}

impl LeadQuery {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            status: None,
        }
    }

    pub fn with_status(mut self, status: LeadStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, lead: &Lead) -> bool {
        if let Some(status) = self.status {
            if lead.status != status {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => lead.matches_search(&term.to_lowercase()),
            _ => true,
        }
    }
}
