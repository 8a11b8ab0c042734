use chrono::NaiveDate;
use loan_pipeline::workflows::ids::StatementId;
use loan_pipeline::workflows::statement::{RepositoryError, Statement, StatementRepository};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local statement store with optimistic version checks.
#[derive(Default, Clone)]
pub(crate) struct InMemoryStatementRepository {
    records: Arc<Mutex<HashMap<StatementId, Statement>>>,
}

impl InMemoryStatementRepository {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<StatementId, Statement>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("statement store poisoned".to_string()))
    }
}

impl StatementRepository for InMemoryStatementRepository {
    fn insert(&self, statement: Statement) -> Result<Statement, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&statement.statement_id()) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(statement.statement_id(), statement.clone());
        Ok(statement)
    }

    fn update(&self, statement: Statement) -> Result<Statement, RepositoryError> {
        let mut guard = self.lock()?;
        match guard.get(&statement.statement_id()) {
            None => Err(RepositoryError::NotFound),
            Some(stored) if stored.version() != statement.version() => {
                Err(RepositoryError::Conflict)
            }
            Some(_) => {
                let next = statement.next_version();
                guard.insert(next.statement_id(), next.clone());
                Ok(next)
            }
        }
    }

    fn fetch(&self, id: &StatementId) -> Result<Option<Statement>, RepositoryError> {
        Ok(self.lock()?.get(id).cloned())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
