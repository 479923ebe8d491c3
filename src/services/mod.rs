//! Business logic services

pub mod catalog;
pub mod companies;
pub mod job_roles;
pub mod loans;
pub mod people;

use crate::config::LoansConfig;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub people: people::PeopleService,
    pub job_roles: job_roles::JobRolesService,
    pub companies: companies::CompaniesService,
    pub loans: loans::LoansService,
}

impl Services {
    pub fn new(loans_config: &LoansConfig) -> Self {
        Self {
            catalog: catalog::CatalogService::new(),
            people: people::PeopleService::new(),
            job_roles: job_roles::JobRolesService::new(),
            companies: companies::CompaniesService::new(),
            loans: loans::LoansService::new(loans_config),
        }
    }
}
