//! TurboCloud backend API.

/// reqwest implementation of [`Backend`].
pub mod client;
/// Typed request failures.
pub mod error;
/// Wire entities.
pub mod models;

use async_trait::async_trait;

pub use client::HttpBackend;
pub use error::ApiError;
pub use models::{
    Environment, Machine, MachineStats, NewEnvironment, NewMachine, NewService, Service,
};

/// Operations the console needs from the backend.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn list_machines(&self) -> Result<Vec<Machine>, ApiError>;
    async fn machine_stats(&self) -> Result<Vec<MachineStats>, ApiError>;
    async fn create_machine(&self, req: &NewMachine) -> Result<Machine, ApiError>;
    async fn delete_machine(&self, id: &str) -> Result<(), ApiError>;

    async fn list_services(&self) -> Result<Vec<Service>, ApiError>;
    async fn create_service(&self, req: &NewService) -> Result<Service, ApiError>;

    async fn list_environments(&self, service_id: &str) -> Result<Vec<Environment>, ApiError>;
    async fn create_environment(&self, req: &NewEnvironment) -> Result<Environment, ApiError>;
    async fn update_environment(&self, env: &Environment) -> Result<Environment, ApiError>;
    async fn delete_environment(&self, id: &str) -> Result<(), ApiError>;

    async fn trigger_deployment(&self, environment_id: &str) -> Result<(), ApiError>;
}
