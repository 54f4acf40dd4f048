//! Business logic services

pub mod borrowers;
pub mod catalog;
pub mod circulation;
pub mod reports;

use crate::{error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub borrowers: borrowers::BorrowersService,
    pub circulation: circulation::CirculationService,
    pub reports: reports::ReportsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            borrowers: borrowers::BorrowersService::new(repository.clone()),
            circulation: circulation::CirculationService::new(repository.clone()),
            reports: reports::ReportsService::new(repository.clone()),
            repository,
        }
    }

    /// Check that the backing store is reachable
    pub async fn ping_store(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
