use std::sync::Arc;

use tracing::{info, warn};

use super::lead_validator::{is_valid_email, INVALID_EMAIL};
use crate::domain::error::{AppError, Result};
use crate::domain::lead::{Contact, Lead, LeadPatch, LeadQuery, LeadStatus, NewLead};
use crate::domain::pipeline::{PipelineStage, PipelineSummary, Timeframe};
use crate::infrastructure::store::LeadRepository;
use crate::shared::clock::Clock;

pub struct LeadUseCase {
    repository: Arc<dyn LeadRepository>,
    clock: Arc<dyn Clock>,
}

impl LeadUseCase {
    pub fn new(repository: Arc<dyn LeadRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    pub async fn create_lead(&self, lead: NewLead) -> Result<Lead> {
        check_required("Title", &lead.title)?;
        check_required("Company", &lead.company)?;
        check_value(lead.value)?;
        check_contact(&lead.contact)?;

        let created = self.repository.create(lead).await?;
        info!(lead_id = %created.id, status = %created.status, "Lead created");
        Ok(created)
    }

    pub async fn get_lead(&self, id: &str) -> Result<Lead> {
        self.repository.get(id).await
    }

    pub async fn list_leads(&self, query: &LeadQuery) -> Result<Vec<Lead>> {
        self.repository.list(query).await
    }

    pub async fn update_lead(&self, id: &str, patch: LeadPatch) -> Result<Lead> {
        if let Some(title) = &patch.title {
            check_required("Title", title)?;
        }
        if let Some(company) = &patch.company {
            check_required("Company", company)?;
        }
        if let Some(value) = patch.value {
            check_value(value)?;
        }
        if let Some(contact) = &patch.contact {
            check_contact(contact)?;
        }

        self.repository.update(id, patch).await
    }

    /// Move a lead to another pipeline stage.
    pub async fn update_status(&self, id: &str, status: LeadStatus) -> Result<Lead> {
        let patch = LeadPatch {
            status: Some(status),
            ..Default::default()
        };
        self.repository.update(id, patch).await
    }

    pub async fn delete_lead(&self, id: &str) -> Result<()> {
        self.repository.delete(id).await.map_err(|e| {
            warn!(error = %e, lead_id = %id, "Failed to delete lead");
            e
        })
    }

    /// Per-status counts and values for leads created within the timeframe.
    pub async fn pipeline_summary(&self, timeframe: Timeframe) -> Result<PipelineSummary> {
        let since = self.clock.now() - timeframe.window();
        let leads = self.repository.list(&LeadQuery::default()).await?;
        let recent: Vec<&Lead> = leads.iter().filter(|l| l.created_at > since).collect();

        let stages = LeadStatus::ALL
            .iter()
            .map(|&status| {
                let in_stage = recent.iter().filter(|l| l.status == status);
                PipelineStage {
                    status,
                    count: in_stage.clone().count(),
                    total_value: in_stage.map(|l| l.value).sum(),
                }
            })
            .collect();

        Ok(PipelineSummary {
            timeframe,
            stages,
            total_leads: recent.len(),
            total_value: recent.iter().map(|l| l.value).sum(),
        })
    }
}

fn check_required(label: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::ValidationError(format!("{} is required", label)));
    }
    Ok(())
}

fn check_value(value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(AppError::ValidationError(
            "Value must be a valid number".to_string(),
        ));
    }
    Ok(())
}

fn check_contact(contact: &Contact) -> Result<()> {
    check_required("Contact name", &contact.name)?;
    check_required("Contact email", &contact.email)?;
    if !is_valid_email(&contact.email) {
        return Err(AppError::ValidationError(INVALID_EMAIL.to_string()));
    }
    Ok(())
}
