use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::LeadRepository;
use crate::domain::error::{AppError, Result};
use crate::domain::lead::{Contact, Lead, LeadPatch, LeadQuery, LeadStatus, NewLead};
use crate::shared::clock::{Clock, SystemClock};

/// Process-local lead store. Insertion order is preserved.
pub struct InMemoryLeadRepository {
    leads: RwLock<Vec<Lead>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryLeadRepository {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            leads: RwLock::new(Vec::new()),
            clock,
        }
    }

    /// Store pre-populated with demo leads.
    pub fn seeded(clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();
        let leads = fixture_leads(now)
            .into_iter()
            .enumerate()
            .map(|(idx, (new_lead, follow_up_days))| {
                let mut lead = Lead::from_new((idx + 1).to_string(), new_lead, now);
                lead.next_follow_up = Some(now + Duration::days(follow_up_days));
                lead
            })
            .collect();

        Self {
            leads: RwLock::new(leads),
            clock,
        }
    }

    pub async fn len(&self) -> usize {
        self.leads.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.leads.read().await.is_empty()
    }
}

impl Default for InMemoryLeadRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LeadRepository for InMemoryLeadRepository {
    async fn create(&self, lead: NewLead) -> Result<Lead> {
        let lead = Lead::from_new(Uuid::new_v4().to_string(), lead, self.clock.now());
        debug!(lead_id = %lead.id, company = %lead.company, "Created lead");
        self.leads.write().await.push(lead.clone());
        Ok(lead)
    }

    async fn get(&self, id: &str) -> Result<Lead> {
        self.leads
            .read()
            .await
            .iter()
            .find(|lead| lead.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Lead {} not found", id)))
    }

    async fn list(&self, query: &LeadQuery) -> Result<Vec<Lead>> {
        Ok(self
            .leads
            .read()
            .await
            .iter()
            .filter(|lead| query.matches(lead))
            .cloned()
            .collect())
    }

    async fn update(&self, id: &str, patch: LeadPatch) -> Result<Lead> {
        let now = self.clock.now();
        let mut leads = self.leads.write().await;
        let lead = leads
            .iter_mut()
            .find(|lead| lead.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Lead {} not found", id)))?;
        lead.apply(patch, now);
        Ok(lead.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut leads = self.leads.write().await;
        let before = leads.len();
        leads.retain(|lead| lead.id != id);
        if leads.len() == before {
            return Err(AppError::NotFound(format!("Lead {} not found", id)));
        }
        debug!(lead_id = %id, "Deleted lead");
        Ok(())
    }
}

/// Demo leads with their follow-up offset in days.
fn fixture_leads(now: DateTime<Utc>) -> Vec<(NewLead, i64)> {
    vec![
        (
            NewLead {
                title: "Enterprise CRM Rollout".to_string(),
                company: "Example Corp".to_string(),
                value: 50000.0,
                status: LeadStatus::New,
                date: now,
                description: "Inbound from website".to_string(),
                contact: Contact {
                    name: "John Doe".to_string(),
                    email: "john.doe@example.com".to_string(),
                    phone: Some("123-456-7890".to_string()),
                },
                next_follow_up: None,
            },
            7,
        ),
        (
            NewLead {
                title: "Analytics Add-on".to_string(),
                company: "Smith & Partners".to_string(),
                value: 75000.0,
                status: LeadStatus::Contacted,
                date: now,
                description: "Referral from existing customer".to_string(),
                contact: Contact {
                    name: "Jane Smith".to_string(),
                    email: "jane.smith@example.com".to_string(),
                    phone: Some("987-654-3210".to_string()),
                },
                next_follow_up: None,
            },
            14,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::clock::FixedClock;
    use chrono::TimeZone;

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        ))
    }

    fn new_lead(title: &str, email: &str) -> NewLead {
        NewLead {
            title: title.to_string(),
            company: "Acme".to_string(),
            value: 10.0,
            status: LeadStatus::New,
            date: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            description: String::new(),
            contact: Contact {
                name: "Ann".to_string(),
                email: email.to_string(),
                phone: None,
            },
            next_follow_up: None,
        }
    }

    #[tokio::test]
    async fn create_get_update_delete() {
        let clock = clock();
        let repo = InMemoryLeadRepository::with_clock(clock.clone());

        let created = repo.create(new_lead("Deal", "ann@acme.com")).await.unwrap();
        assert_eq!(created.created_at, clock.now());
        assert_eq!(repo.get(&created.id).await.unwrap(), created);

        clock.advance(Duration::minutes(1));
        let updated = repo
            .update(
                &created.id,
                LeadPatch {
                    value: Some(99.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.value, 99.0);
        assert_eq!(updated.updated_at, clock.now());
        assert_eq!(updated.created_at, created.created_at);

        repo.delete(&created.id).await.unwrap();
        assert!(repo.is_empty().await);
        assert!(matches!(
            repo.get(&created.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            repo.delete(&created.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_filters_and_keeps_order() {
        let repo = InMemoryLeadRepository::with_clock(clock());
        repo.create(new_lead("First", "a@x.io")).await.unwrap();
        repo.create(new_lead("Second", "b@y.io")).await.unwrap();
        repo.create(new_lead("Third", "c@x.io")).await.unwrap();

        let all = repo.list(&LeadQuery::default()).await.unwrap();
        let titles: Vec<_> = all.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);

        let x = repo.list(&LeadQuery::search("X.IO")).await.unwrap();
        assert_eq!(x.len(), 2);
    }

    #[tokio::test]
    async fn seeded_store_has_fixtures() {
        let clock = clock();
        let repo = InMemoryLeadRepository::seeded(clock.clone());
        assert_eq!(repo.len().await, 2);
        let first = repo.get("1").await.unwrap();
        assert_eq!(first.contact.email, "john.doe@example.com");
        assert_eq!(first.date, clock.now());
        assert_eq!(first.next_follow_up, Some(clock.now() + Duration::days(7)));
    }
}
