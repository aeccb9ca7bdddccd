use crate::{
    config::Config,
    services::{
        jwt_service::JwtService, AccountsService, CreditRequestService, InterestService,
        LateFeeService, LedgerService,
    },
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub accounts_service: Arc<AccountsService>,
    pub ledger_service: Arc<LedgerService>,
    pub interest_service: Arc<InterestService>,
    pub late_fee_service: Arc<LateFeeService>,
    pub credit_request_service: Arc<CreditRequestService>,
    pub jwt_service: Arc<JwtService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Self, anyhow::Error> {
        // Connect to database
        let db = sea_orm::Database::connect(&config.database.url).await?;

        // Initialize services
        let accounts_service = Arc::new(AccountsService::new(db.clone()));
        let ledger_service = Arc::new(LedgerService::new(db.clone()));
        let interest_service = Arc::new(InterestService::new(db.clone()));
        let late_fee_service = Arc::new(LateFeeService::new(db.clone()));
        let credit_request_service = Arc::new(CreditRequestService::new(db.clone()));
        let jwt_service = Arc::new(JwtService::new(&config.auth));

        Ok(Self {
            db,
            accounts_service,
            ledger_service,
            interest_service,
            late_fee_service,
            credit_request_service,
            jwt_service,
            config: Arc::new(config),
        })
    }
}
