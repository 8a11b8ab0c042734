use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use chrono::{Local, Months, NaiveDate};
use rust_decimal_macros::dec;
use serde_json::Value;

use crate::workflows::ids::StatementId;
use crate::workflows::statement::{
    ClientRecord, CompletionStatus, DealService, FinishRegistrationRequest, LocalScorer,
    RemoteScorer, RepositoryError, Statement, StatementRepository, UpstreamError,
};
use crate::workflows::underwriting::{
    CreditCalculation, Employment, EmploymentStatus, Gender, LoanApplicationRequest,
    MaritalStatus, Offer, Position, PreOfferGenerator, ScoringRequest,
};

pub(super) fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(super) fn application() -> LoanApplicationRequest {
    LoanApplicationRequest {
        amount: dec!(200000),
        term: 12,
        first_name: "Ivan".to_string(),
        last_name: "Sokolov".to_string(),
        middle_name: None,
        email: "ivan.sokolov@example.com".to_string(),
        birthdate: today()
            .checked_sub_months(Months::new(28 * 12))
            .expect("valid birthdate"),
        passport_series: "4511".to_string(),
        passport_number: "654321".to_string(),
    }
}

pub(super) fn client() -> ClientRecord {
    ClientRecord::from_application(&application())
}

pub(super) fn offer_for(statement_id: StatementId) -> Offer {
    let mut offer = PreOfferGenerator::default()
        .generate(dec!(200000), 12)
        .pop()
        .expect("four offers");
    offer.statement_id = Some(statement_id);
    offer
}

pub(super) fn finish_request() -> FinishRegistrationRequest {
    FinishRegistrationRequest {
        gender: Gender::Male,
        marital_status: MaritalStatus::Single,
        dependent_amount: 0,
        employment: Employment {
            employment_status: EmploymentStatus::Employed,
            employer_inn: Some("7707083893".to_string()),
            salary: Some(dec!(60000)),
            position: Some(Position::Worker),
            work_experience_total: Some(48),
            work_experience_current: Some(24),
        },
        passport_issue_date: NaiveDate::from_ymd_opt(2016, 4, 20),
        passport_issue_branch: Some("Northern district".to_string()),
        account_number: "40817810099910004312".to_string(),
        insurance_enabled: false,
        salary_client: false,
    }
}

pub(super) fn unemployed_finish_request() -> FinishRegistrationRequest {
    let mut finish = finish_request();
    finish.employment.employment_status = EmploymentStatus::Unemployed;
    finish
}

pub(super) fn build_service() -> (
    DealService<MemoryRepository, LocalScorer>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = DealService::new(
        repository.clone(),
        Arc::new(LocalScorer::default()),
        CompletionStatus::CreditIssued,
    );
    (service, repository)
}

pub(super) fn service_with_scorer<S>(scorer: S) -> DealService<MemoryRepository, S>
where
    S: RemoteScorer + 'static,
{
    DealService::new(
        Arc::new(MemoryRepository::default()),
        Arc::new(scorer),
        CompletionStatus::CreditIssued,
    )
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<StatementId, Statement>>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl StatementRepository for MemoryRepository {
    fn insert(&self, statement: Statement) -> Result<Statement, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&statement.statement_id()) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(statement.statement_id(), statement.clone());
        Ok(statement)
    }

    fn update(&self, statement: Statement) -> Result<Statement, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let stored = guard
            .get(&statement.statement_id())
            .ok_or(RepositoryError::NotFound)?;
        if stored.version() != statement.version() {
            return Err(RepositoryError::Conflict);
        }
        let next = statement.next_version();
        guard.insert(next.statement_id(), next.clone());
        Ok(next)
    }

    fn fetch(&self, id: &StatementId) -> Result<Option<Statement>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

/// Serves reads from an inner repository but refuses every write.
pub(super) struct ConflictRepository {
    pub(super) inner: MemoryRepository,
}

impl StatementRepository for ConflictRepository {
    fn insert(&self, statement: Statement) -> Result<Statement, RepositoryError> {
        self.inner.insert(statement)
    }

    fn update(&self, _statement: Statement) -> Result<Statement, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, id: &StatementId) -> Result<Option<Statement>, RepositoryError> {
        self.inner.fetch(id)
    }
}

pub(super) struct UnavailableRepository;

impl StatementRepository for UnavailableRepository {
    fn insert(&self, _statement: Statement) -> Result<Statement, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _statement: Statement) -> Result<Statement, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &StatementId) -> Result<Option<Statement>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Fails the first `failures` calls with `error`, then delegates to the in-process calculator.
pub(super) struct ScriptedScorer {
    pub(super) failures: u32,
    pub(super) error: UpstreamError,
    pub(super) delay: Option<Duration>,
    pub(super) calls: AtomicU32,
    inner: LocalScorer,
}

impl ScriptedScorer {
    pub(super) fn failing(failures: u32, error: UpstreamError) -> Self {
        Self {
            failures,
            error,
            delay: None,
            calls: AtomicU32::new(0),
            inner: LocalScorer::default(),
        }
    }

    pub(super) fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::failing(0, UpstreamError::EmptyResponse)
        }
    }

    pub(super) fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    async fn attempt(&self) -> Result<(), UpstreamError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if call < self.failures {
            return Err(self.error.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteScorer for ScriptedScorer {
    async fn offers(&self, request: &LoanApplicationRequest) -> Result<Vec<Offer>, UpstreamError> {
        self.attempt().await?;
        self.inner.offers(request).await
    }

    async fn calculate(
        &self,
        request: &ScoringRequest,
    ) -> Result<CreditCalculation, UpstreamError> {
        self.attempt().await?;
        self.inner.calculate(request).await
    }
}

/// Answers every offer request with an empty list.
pub(super) struct EmptyScorer;

#[async_trait]
impl RemoteScorer for EmptyScorer {
    async fn offers(
        &self,
        _request: &LoanApplicationRequest,
    ) -> Result<Vec<Offer>, UpstreamError> {
        Ok(Vec::new())
    }

    async fn calculate(
        &self,
        _request: &ScoringRequest,
    ) -> Result<CreditCalculation, UpstreamError> {
        Err(UpstreamError::EmptyResponse)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
