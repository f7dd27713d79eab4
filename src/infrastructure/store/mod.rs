pub mod memory;

use crate::domain::error::Result;
use crate::domain::lead::{Lead, LeadPatch, LeadQuery, NewLead};
use async_trait::async_trait;

pub use memory::InMemoryLeadRepository;

/// Lead storage capability injected into the use cases.
#[async_trait]
pub trait LeadRepository: Send + Sync {
    async fn create(&self, lead: NewLead) -> Result<Lead>;
    async fn get(&self, id: &str) -> Result<Lead>;
    async fn list(&self, query: &LeadQuery) -> Result<Vec<Lead>>;
    async fn update(&self, id: &str, patch: LeadPatch) -> Result<Lead>;
    async fn delete(&self, id: &str) -> Result<()>;
}
