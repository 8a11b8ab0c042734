use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::workflows::ids::{ClientId, CreditId, OfferId, StatementId};
use crate::workflows::underwriting::{
    CreditTerms, Employment, Gender, LoanApplicationRequest, MaritalStatus, Offer,
    RejectionReason,
};
use crate::workflows::underwriting::validation::{check_salary, ViolationCollector};
use crate::workflows::underwriting::ValidationErrors;

/// Lifecycle stage of a statement. Transitions only ever move to a later stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatementStatus {
    Preapproval,
    Approved,
    CcDenied,
    CcApproved,
    CreditIssued,
}

impl StatementStatus {
    pub const fn label(self) -> &'static str {
        match self {
            StatementStatus::Preapproval => "PREAPPROVAL",
            StatementStatus::Approved => "APPROVED",
            StatementStatus::CcDenied => "CC_DENIED",
            StatementStatus::CcApproved => "CC_APPROVED",
            StatementStatus::CreditIssued => "CREDIT_ISSUED",
        }
    }

    pub const fn stage(self) -> u8 {
        match self {
            StatementStatus::Preapproval => 0,
            StatementStatus::Approved => 1,
            StatementStatus::CcDenied
            | StatementStatus::CcApproved
            | StatementStatus::CreditIssued => 2,
        }
    }

    pub const fn is_terminal(self) -> bool {
        self.stage() == 2
    }
}

impl std::fmt::Display for StatementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeType {
    Automatic,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    pub status: StatementStatus,
    pub time: DateTime<Utc>,
    pub change_type: ChangeType,
}

/// Append-only audit trail of status changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusHistory(Vec<StatusHistoryEntry>);

impl StatusHistory {
    pub(super) fn starting_with(entry: StatusHistoryEntry) -> Self {
        Self(vec![entry])
    }

    pub(super) fn append(&mut self, entry: StatusHistoryEntry) {
        self.0.push(entry);
    }

    pub fn entries(&self) -> &[StatusHistoryEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&StatusHistoryEntry> {
        self.0.last()
    }
}

/// Personal data captured when the statement is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub client_id: ClientId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    pub email: String,
    pub birthdate: NaiveDate,
    pub passport_series: String,
    pub passport_number: String,
}

impl ClientRecord {
    pub fn from_application(request: &LoanApplicationRequest) -> Self {
        Self {
            client_id: ClientId::generate(),
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            middle_name: request.middle_name.clone(),
            email: request.email.clone(),
            birthdate: request.birthdate,
            passport_series: request.passport_series.clone(),
            passport_number: request.passport_number.clone(),
        }
    }
}

/// Value snapshot of the offer a statement committed to. Later edits to the source offer never
/// reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedOffer {
    pub offer_id: OfferId,
    pub requested_amount: Decimal,
    pub total_amount: Decimal,
    pub term: u32,
    pub monthly_payment: Decimal,
    pub rate: Decimal,
    pub insurance_enabled: bool,
    pub salary_client: bool,
}

impl From<&Offer> for AppliedOffer {
    fn from(offer: &Offer) -> Self {
        Self {
            offer_id: offer.offer_id,
            requested_amount: offer.requested_amount,
            total_amount: offer.total_amount,
            term: offer.term,
            monthly_payment: offer.monthly_payment,
            rate: offer.rate,
            insurance_enabled: offer.insurance_enabled,
            salary_client: offer.salary_client,
        }
    }
}

impl AppliedOffer {
    /// Last write wins: every field is replaced, nothing is merged.
    pub(super) fn overwrite_with(&mut self, offer: &Offer) {
        self.offer_id = offer.offer_id;
        self.requested_amount = offer.requested_amount;
        self.total_amount = offer.total_amount;
        self.term = offer.term;
        self.monthly_payment = offer.monthly_payment;
        self.rate = offer.rate;
        self.insurance_enabled = offer.insurance_enabled;
        self.salary_client = offer.salary_client;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreditStatus {
    Calculated,
    Issued,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedCredit {
    pub credit_id: CreditId,
    pub status: CreditStatus,
    pub terms: CreditTerms,
}

/// Application record tracked from pre-approval to a terminal decision.
///
/// Fields are only changed through the transitions in `lifecycle`; `version` is owned by the
/// repository and used for optimistic concurrency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub(super) statement_id: StatementId,
    pub(super) client: ClientRecord,
    pub(super) status: StatementStatus,
    pub(super) creation_date: DateTime<Utc>,
    pub(super) applied_offer: Option<AppliedOffer>,
    pub(super) credit: Option<IssuedCredit>,
    pub(super) rejection: Option<RejectionReason>,
    pub(super) status_history: StatusHistory,
    pub(super) version: u64,
}

impl Statement {
    pub fn statement_id(&self) -> StatementId {
        self.statement_id
    }

    pub fn client(&self) -> &ClientRecord {
        &self.client
    }

    pub fn status(&self) -> StatementStatus {
        self.status
    }

    pub fn creation_date(&self) -> DateTime<Utc> {
        self.creation_date
    }

    pub fn applied_offer(&self) -> Option<&AppliedOffer> {
        self.applied_offer.as_ref()
    }

    pub fn credit(&self) -> Option<&IssuedCredit> {
        self.credit.as_ref()
    }

    pub fn rejection(&self) -> Option<&RejectionReason> {
        self.rejection.as_ref()
    }

    pub fn status_history(&self) -> &StatusHistory {
        &self.status_history
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Copy of the record stamped with the next version, for repositories to persist.
    pub fn next_version(&self) -> Self {
        Self {
            version: self.version + 1,
            ..self.clone()
        }
    }

    pub fn view(&self) -> StatementView {
        StatementView {
            statement_id: self.statement_id,
            client_id: self.client.client_id,
            status: self.status.label(),
            applied_offer: self.applied_offer.clone(),
            credit_id: self.credit.as_ref().map(|credit| credit.credit_id),
            monthly_payment: self
                .credit
                .as_ref()
                .map(|credit| credit.terms.monthly_payment),
            rejection_reason: self.rejection.as_ref().map(RejectionReason::summary),
            status_history: self.status_history.entries().to_vec(),
        }
    }
}

/// Data collected when the applicant completes registration after choosing an offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishRegistrationRequest {
    pub gender: Gender,
    pub marital_status: MaritalStatus,
    #[serde(default)]
    pub dependent_amount: u32,
    pub employment: Employment,
    #[serde(default)]
    pub passport_issue_date: Option<NaiveDate>,
    #[serde(default)]
    pub passport_issue_branch: Option<String>,
    pub account_number: String,
    #[serde(default)]
    pub insurance_enabled: bool,
    #[serde(default)]
    pub salary_client: bool,
}

/// Externally visible shape of a statement.
#[derive(Debug, Clone, Serialize)]
pub struct StatementView {
    pub statement_id: StatementId,
    pub client_id: ClientId,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_offer: Option<AppliedOffer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_id: Option<CreditId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_payment: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    pub status_history: Vec<StatusHistoryEntry>,
}

impl FinishRegistrationRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut collector = ViolationCollector::default();
        collector.check(
            !self.account_number.trim().is_empty(),
            "account_number",
            "must not be empty",
        );
        if let Some(salary) = self.employment.salary {
            check_salary(&mut collector, salary);
        }
        if let Some(branch) = &self.passport_issue_branch {
            collector.check(
                !branch.trim().is_empty(),
                "passport_issue_branch",
                "must not be blank",
            );
        }
        collector.finish()
    }
}
