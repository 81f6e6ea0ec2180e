//! Fee form reconciliation.
//!
//! The dashboard offers a single "Save Fees" form, while the backend has two
//! operations: a cheap status flip and a full upsert of the fee terms. This
//! module decides which one a submission means and issues exactly one call.

use crate::api::{ApiClient, ApiError, ApiResult};
use crate::models::{FeeData, FeeStatus, Review};
use crate::util::{parse_calendar_day, same_calendar_day};

/// Raw fee form values as typed by the user.
///
/// `None` means the field was never part of the form; the status-only form
/// (see [`FeeForm::status_only`]) carries nothing but a status.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct FeeForm {
    pub fee_category: Option<String>,
    pub pending_amount: Option<String>,
    pub due_date: Option<String>,
    pub fee_status: Option<FeeStatus>,
}

impl FeeForm {
    pub fn status_only(status: FeeStatus) -> Self {
        Self {
            fee_status: Some(status),
            ..Self::default()
        }
    }

    /// Form pre-filled from the stored review, or blank with `Pending`.
    pub fn from_review(review: Option<&Review>) -> Self {
        let Some(r) = review.filter(|r| r.has_fee_record()) else {
            return Self {
                fee_category: Some(String::new()),
                pending_amount: Some(String::new()),
                due_date: Some(String::new()),
                fee_status: Some(FeeStatus::Pending),
            };
        };

        Self {
            fee_category: r.fee_category.clone(),
            pending_amount: Some(r.pending_amount.map(|a| a.to_string()).unwrap_or_default()),
            due_date: Some(
                r.due_date
                    .as_deref()
                    .map(crate::util::date_input_value)
                    .unwrap_or_default(),
            ),
            fee_status: Some(r.fee_status.unwrap_or(FeeStatus::Pending)),
        }
    }

    fn carries_only_status(&self) -> bool {
        self.fee_status.is_some()
            && self.fee_category.is_none()
            && self.pending_amount.is_none()
            && self.due_date.is_none()
    }

    /// Validate into full fee terms.
    pub fn to_fee_data(&self) -> Result<FeeData, FeeFormError> {
        let fee_category = self
            .fee_category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or(FeeFormError::MissingCategory)?
            .to_string();

        let raw_amount = self.pending_amount.as_deref().unwrap_or_default().trim();
        let pending_amount: f64 = raw_amount
            .parse()
            .ok()
            .filter(|a: &f64| a.is_finite())
            .ok_or_else(|| FeeFormError::InvalidAmount(raw_amount.to_string()))?;
        if pending_amount < 0.0 {
            return Err(FeeFormError::NegativeAmount);
        }

        let raw_date = self.due_date.as_deref().unwrap_or_default();
        let due_date = parse_calendar_day(raw_date)
            .ok_or_else(|| FeeFormError::InvalidDueDate(raw_date.trim().to_string()))?
            .format("%Y-%m-%d")
            .to_string();

        let fee_status = self.fee_status.ok_or(FeeFormError::MissingStatus)?;

        Ok(FeeData {
            fee_category,
            pending_amount,
            due_date,
            fee_status,
        })
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub(crate) enum FeeFormError {
    #[error("Fee category is required")]
    MissingCategory,
    #[error("Pending amount must be a number (got \"{0}\")")]
    InvalidAmount(String),
    #[error("Pending amount cannot be negative")]
    NegativeAmount,
    #[error("Due date must be a valid date (got \"{0}\")")]
    InvalidDueDate(String),
    #[error("Fee status is required")]
    MissingStatus,
}

#[derive(Clone, Debug, thiserror::Error)]
pub(crate) enum FeeSaveError {
    #[error(transparent)]
    Form(#[from] FeeFormError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Which backend operation a fee submission resolves to.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum FeeSavePlan {
    StatusOnly(FeeStatus),
    Upsert(FeeData),
}

fn amounts_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Raw form terms match the stored record. An absent stored value equals an
/// empty field; due dates compare by calendar day.
fn terms_unchanged(form: &FeeForm, stored: &Review) -> bool {
    let raw = |v: &Option<String>| v.as_deref().unwrap_or_default().trim().to_string();

    let category = raw(&form.fee_category);
    let category_same = stored.fee_category.as_deref().unwrap_or_default().trim() == category;

    let amount = raw(&form.pending_amount);
    let amount_same = match stored.pending_amount {
        None => amount.is_empty(),
        Some(stored) => amount.parse::<f64>().is_ok_and(|a| amounts_equal(a, stored)),
    };

    let due = raw(&form.due_date);
    let due_same = match stored.due_date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        None => due.is_empty(),
        Some(stored) => same_calendar_day(stored, &due),
    };

    category_same && amount_same && due_same
}

/// Decide between the status-only update and the full upsert.
///
/// 1. A form that carries only a status is a status change.
/// 2. Unchanged terms with a different status is a status change.
/// 3. Everything else (including a first fee record) is an upsert, and only
///    then are the terms validated.
pub(crate) fn plan_fee_save(form: &FeeForm, stored: Option<&Review>) -> Result<FeeSavePlan, FeeFormError> {
    if form.carries_only_status() {
        let status = form.fee_status.ok_or(FeeFormError::MissingStatus)?;
        return Ok(FeeSavePlan::StatusOnly(status));
    }

    if let (Some(stored), Some(status)) = (stored.filter(|r| r.has_fee_record()), form.fee_status) {
        if terms_unchanged(form, stored) && stored.fee_status != Some(status) {
            return Ok(FeeSavePlan::StatusOnly(status));
        }
    }

    Ok(FeeSavePlan::Upsert(form.to_fee_data()?))
}

/// The two fee operations the backend exposes.
pub(crate) trait FeeGateway {
    async fn update_fee_status(&self, user_id: &str, status: FeeStatus) -> ApiResult<()>;
    async fn upsert_fees(&self, user_id: &str, fees: &FeeData) -> ApiResult<()>;
}

impl FeeGateway for ApiClient {
    async fn update_fee_status(&self, user_id: &str, status: FeeStatus) -> ApiResult<()> {
        ApiClient::update_fee_status(self, user_id, status).await
    }

    async fn upsert_fees(&self, user_id: &str, fees: &FeeData) -> ApiResult<()> {
        ApiClient::upsert_fees(self, user_id, fees).await
    }
}

/// Reconcile a fee form against the stored review and issue exactly one call.
///
/// Returns the plan that was executed so the caller can word its notice.
pub(crate) async fn save_fees<G: FeeGateway>(
    gateway: &G,
    user_id: &str,
    form: &FeeForm,
    stored: Option<&Review>,
) -> Result<FeeSavePlan, FeeSaveError> {
    let plan = plan_fee_save(form, stored)?;
    log::info!("saving fees for {user_id}: {plan:?}");

    match &plan {
        FeeSavePlan::StatusOnly(status) => gateway.update_fee_status(user_id, *status).await?,
        FeeSavePlan::Upsert(data) => gateway.upsert_fees(user_id, data).await?,
    }

    Ok(plan)
}

/// Quick status change from the table (`<select>` or "Mark Paid"). Always
/// the status-only form, so it never touches the fee terms.
pub(crate) async fn update_fee_status<G: FeeGateway>(
    gateway: &G,
    user_id: &str,
    status: FeeStatus,
) -> Result<(), FeeSaveError> {
    save_fees(gateway, user_id, &FeeForm::status_only(status), None)
        .await
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiErrorKind;
    use crate::models::ReviewStatus;
    use futures::executor::block_on;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Status(String, FeeStatus),
        Upsert(String, FeeData),
    }

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<Call>>,
        fail_with: Option<u16>,
    }

    impl Recorder {
        fn outcome(&self) -> ApiResult<()> {
            match self.fail_with {
                Some(status) => Err(ApiError::from_status(status, None, Vec::new())),
                None => Ok(()),
            }
        }
    }

    impl FeeGateway for Recorder {
        async fn update_fee_status(&self, user_id: &str, status: FeeStatus) -> ApiResult<()> {
            self.calls
                .borrow_mut()
                .push(Call::Status(user_id.to_string(), status));
            self.outcome()
        }

        async fn upsert_fees(&self, user_id: &str, fees: &FeeData) -> ApiResult<()> {
            self.calls
                .borrow_mut()
                .push(Call::Upsert(user_id.to_string(), fees.clone()));
            self.outcome()
        }
    }

    fn stored_review() -> Review {
        Review {
            user_id: "u1".to_string(),
            review_status: ReviewStatus::Assigned,
            review_date: "2024-01-10".to_string(),
            fee_category: Some("Weekback".to_string()),
            pending_amount: Some(500.0),
            due_date: Some("2024-01-01T00:00:00.000Z".to_string()),
            fee_status: Some(FeeStatus::Pending),
        }
    }

    fn form(category: &str, amount: &str, due: &str, status: FeeStatus) -> FeeForm {
        FeeForm {
            fee_category: Some(category.to_string()),
            pending_amount: Some(amount.to_string()),
            due_date: Some(due.to_string()),
            fee_status: Some(status),
        }
    }

    #[test]
    fn test_status_change_with_same_terms_uses_status_endpoint() {
        let rec = Recorder::default();
        let stored = stored_review();
        let f = form("Weekback", "500", "2024-01-01", FeeStatus::Completed);

        let plan = block_on(save_fees(&rec, "u1", &f, Some(&stored))).expect("save should succeed");

        assert_eq!(plan, FeeSavePlan::StatusOnly(FeeStatus::Completed));
        assert_eq!(
            *rec.calls.borrow(),
            vec![Call::Status("u1".to_string(), FeeStatus::Completed)]
        );
    }

    #[test]
    fn test_changed_amount_uses_full_upsert() {
        let rec = Recorder::default();
        let stored = stored_review();
        let f = form("Weekback", "700", "2024-01-01", FeeStatus::Pending);

        block_on(save_fees(&rec, "u1", &f, Some(&stored))).expect("save should succeed");

        let expected = FeeData {
            fee_category: "Weekback".to_string(),
            pending_amount: 700.0,
            due_date: "2024-01-01".to_string(),
            fee_status: FeeStatus::Pending,
        };
        assert_eq!(*rec.calls.borrow(), vec![Call::Upsert("u1".to_string(), expected)]);
    }

    #[test]
    fn test_changed_terms_and_status_still_upserts() {
        let stored = stored_review();
        for f in [
            form("Monthly", "500", "2024-01-01", FeeStatus::Completed),
            form("Weekback", "500", "2024-02-01", FeeStatus::Overdued),
            form("Weekback", "500.5", "2024-01-01", FeeStatus::Completed),
        ] {
            let plan = plan_fee_save(&f, Some(&stored)).expect("form is valid");
            assert!(matches!(plan, FeeSavePlan::Upsert(_)), "{f:?} should upsert");
        }
    }

    #[test]
    fn test_due_date_compared_by_calendar_day() {
        let stored = stored_review();
        let f = form("Weekback", "500", "2024-01-01T15:45:00Z", FeeStatus::Overdued);
        assert_eq!(
            plan_fee_save(&f, Some(&stored)),
            Ok(FeeSavePlan::StatusOnly(FeeStatus::Overdued))
        );
    }

    #[test]
    fn test_nothing_changed_falls_through_to_upsert() {
        let stored = stored_review();
        let f = form("Weekback", "500", "2024-01-01", FeeStatus::Pending);
        assert!(matches!(plan_fee_save(&f, Some(&stored)), Ok(FeeSavePlan::Upsert(_))));
    }

    #[test]
    fn test_status_change_on_partial_record_skips_term_validation() {
        let rec = Recorder::default();
        let mut stored = stored_review();
        stored.due_date = None;
        stored.pending_amount = None;

        let mut f = FeeForm::from_review(Some(&stored));
        assert_eq!(f.due_date.as_deref(), Some(""));
        assert_eq!(f.pending_amount.as_deref(), Some(""));
        f.fee_status = Some(FeeStatus::Completed);

        let plan = block_on(save_fees(&rec, "u1", &f, Some(&stored))).expect("save should succeed");
        assert_eq!(plan, FeeSavePlan::StatusOnly(FeeStatus::Completed));
        assert_eq!(
            *rec.calls.borrow(),
            vec![Call::Status("u1".to_string(), FeeStatus::Completed)]
        );
    }

    #[test]
    fn test_filling_missing_term_on_partial_record_upserts() {
        let mut stored = stored_review();
        stored.due_date = None;

        let mut f = FeeForm::from_review(Some(&stored));
        f.due_date = Some("2024-03-01".to_string());
        f.fee_status = Some(FeeStatus::Completed);
        assert!(matches!(plan_fee_save(&f, Some(&stored)), Ok(FeeSavePlan::Upsert(_))));

        let mut blank_date = FeeForm::from_review(Some(&stored));
        blank_date.pending_amount = Some("650".to_string());
        assert_eq!(
            plan_fee_save(&blank_date, Some(&stored)),
            Err(FeeFormError::InvalidDueDate(String::new()))
        );
    }

    #[test]
    fn test_first_fee_record_upserts_even_if_review_exists() {
        let mut stored = stored_review();
        stored.fee_category = None;
        let f = form("Weekback", "500", "2024-01-01", FeeStatus::Completed);
        assert!(matches!(plan_fee_save(&f, Some(&stored)), Ok(FeeSavePlan::Upsert(_))));
        assert!(matches!(plan_fee_save(&f, None), Ok(FeeSavePlan::Upsert(_))));
    }

    #[test]
    fn test_status_only_form_skips_term_validation() {
        let rec = Recorder::default();
        let f = FeeForm::status_only(FeeStatus::Overdued);
        let plan = block_on(save_fees(&rec, "u9", &f, None)).expect("save should succeed");
        assert_eq!(plan, FeeSavePlan::StatusOnly(FeeStatus::Overdued));
        assert_eq!(rec.calls.borrow().len(), 1);
    }

    #[test]
    fn test_invalid_form_makes_no_call() {
        let rec = Recorder::default();
        let stored = stored_review();
        let cases = [
            (form("  ", "500", "2024-01-01", FeeStatus::Pending), FeeFormError::MissingCategory),
            (
                form("Weekback", "abc", "2024-01-01", FeeStatus::Pending),
                FeeFormError::InvalidAmount("abc".to_string()),
            ),
            (form("Weekback", "-1", "2024-01-01", FeeStatus::Pending), FeeFormError::NegativeAmount),
            (
                form("Weekback", "500", "", FeeStatus::Pending),
                FeeFormError::InvalidDueDate(String::new()),
            ),
        ];

        for (f, expected) in cases {
            let err = block_on(save_fees(&rec, "u1", &f, Some(&stored))).expect_err("should be rejected");
            assert!(matches!(err, FeeSaveError::Form(ref e) if *e == expected), "{err:?}");
        }
        assert!(rec.calls.borrow().is_empty());
    }

    #[test]
    fn test_api_failure_is_reported_after_single_call() {
        let rec = Recorder {
            fail_with: Some(404),
            ..Recorder::default()
        };
        let stored = stored_review();
        let f = form("Weekback", "500", "2024-01-01", FeeStatus::Completed);

        let err = block_on(save_fees(&rec, "u1", &f, Some(&stored))).expect_err("should fail");
        assert!(matches!(err, FeeSaveError::Api(ref e) if e.kind == ApiErrorKind::NotFound));
        assert_eq!(rec.calls.borrow().len(), 1);
    }

    #[test]
    fn test_quick_update_is_status_only() {
        let rec = Recorder::default();
        block_on(update_fee_status(&rec, "u2", FeeStatus::Completed)).expect("should succeed");
        assert_eq!(
            *rec.calls.borrow(),
            vec![Call::Status("u2".to_string(), FeeStatus::Completed)]
        );
    }

    #[test]
    fn test_form_from_review_prefills_date_input() {
        let f = FeeForm::from_review(Some(&stored_review()));
        assert_eq!(f.fee_category.as_deref(), Some("Weekback"));
        assert_eq!(f.pending_amount.as_deref(), Some("500"));
        assert_eq!(f.due_date.as_deref(), Some("2024-01-01"));
        assert_eq!(f.fee_status, Some(FeeStatus::Pending));

        let blank = FeeForm::from_review(None);
        assert_eq!(blank.fee_category.as_deref(), Some(""));
        assert_eq!(blank.fee_status, Some(FeeStatus::Pending));
    }
}
