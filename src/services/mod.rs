pub mod authenticator;
pub use authenticator::{AuthError, TokenAuthenticator};

pub mod capacity;
pub use capacity::{CapacityCheck, CapacityChecker};

pub mod credential_service;
pub mod credential_service_impl;
pub use credential_service::{CredentialError, CredentialService};
pub use credential_service_impl::SeaOrmCredentialService;

pub mod item_service;
pub use item_service::{ItemError, ItemService, SeaOrmItemService};

pub mod mission_service;
pub mod mission_service_impl;
pub use mission_service::{MissionError, MissionService};
pub use mission_service_impl::SeaOrmMissionService;

pub mod password;

pub mod report;
pub use report::{AggregationReporter, CompletedMissions};

pub mod token;
pub use token::{Claims, TokenError, TokenSigner};

pub mod worker_service;
pub use worker_service::{SeaOrmWorkerService, WorkerError, WorkerService};
