use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AggregationReporter, CredentialService, ItemService, MissionService, SeaOrmCredentialService,
    SeaOrmItemService, SeaOrmMissionService, SeaOrmWorkerService, TokenAuthenticator, TokenSigner,
    WorkerService,
};

/// Everything the HTTP layer and the CLI need, wired once at startup.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub signer: Arc<TokenSigner>,

    pub authenticator: TokenAuthenticator,

    pub credential_service: Arc<dyn CredentialService>,

    pub worker_service: Arc<dyn WorkerService>,

    pub item_service: Arc<dyn ItemService>,

    pub mission_service: Arc<dyn MissionService>,

    pub reporter: AggregationReporter,
}

impl SharedState {
    /// Connects to the configured database and builds the services on top of it.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let signer = Arc::new(TokenSigner::from_config(&config.security));

        let authenticator = TokenAuthenticator::new(signer.clone(), store.clone());

        let credential_service = Arc::new(SeaOrmCredentialService::new(
            store.clone(),
            signer.clone(),
            config.security.clone(),
        )) as Arc<dyn CredentialService + Send + Sync + 'static>;

        let worker_service = Arc::new(SeaOrmWorkerService::new(store.clone()))
            as Arc<dyn WorkerService + Send + Sync + 'static>;

        let item_service = Arc::new(SeaOrmItemService::new(store.clone()))
            as Arc<dyn ItemService + Send + Sync + 'static>;

        let mission_service = Arc::new(SeaOrmMissionService::new(store.clone()))
            as Arc<dyn MissionService + Send + Sync + 'static>;

        let reporter = AggregationReporter::new(store.clone());

        Self {
            config: Arc::new(config),
            store,
            signer,
            authenticator,
            credential_service,
            worker_service,
            item_service,
            mission_service,
            reporter,
        }
    }
}
