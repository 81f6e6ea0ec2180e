use crate::api::{ApiClient, ApiError, ApiResult};
use crate::models::{Review, ReviewStatus};
use crate::util::parse_calendar_day;

/// How long a row fades out before the delete request is sent.
pub(crate) const REVIEW_DELETE_FADE_MS: u64 = 500;

/// Where a user is in the review lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ReviewState {
    NoReview,
    Recorded(ReviewStatus),
}

impl ReviewState {
    pub fn of(review: Option<&Review>) -> Self {
        review.map_or(Self::NoReview, |r| Self::Recorded(r.review_status))
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NoReview => "No review",
            Self::Recorded(ReviewStatus::NotAssigned) => "Not Assigned",
            Self::Recorded(ReviewStatus::Assigned) => "Assigned",
            Self::Recorded(ReviewStatus::Completed) => "Completed",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ReviewForm {
    pub status: ReviewStatus,
    pub review_date: String,
}

impl ReviewForm {
    pub fn from_review(review: Option<&Review>) -> Self {
        match review {
            Some(r) => Self {
                status: r.review_status,
                review_date: crate::util::date_input_value(&r.review_date),
            },
            None => Self {
                status: ReviewStatus::Assigned,
                review_date: String::new(),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ReviewFormError {
    #[error("Review date must be a valid date")]
    InvalidDate,
    #[error("This user has no review to delete")]
    NothingToDelete,
    #[error("This user has no fee record to delete")]
    NoFeeRecord,
}

#[derive(Clone, Debug, thiserror::Error)]
pub(crate) enum ReviewSaveError {
    #[error(transparent)]
    Form(#[from] ReviewFormError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// A validated review write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ReviewCommand {
    /// `NoReview -> status`
    Create { status: ReviewStatus, review_date: String },
    /// `status -> status`; any status may move to any other.
    Edit { status: ReviewStatus, review_date: String },
}

pub(crate) fn plan_review_save(current: ReviewState, form: &ReviewForm) -> Result<ReviewCommand, ReviewFormError> {
    let review_date = parse_calendar_day(&form.review_date)
        .ok_or(ReviewFormError::InvalidDate)?
        .format("%Y-%m-%d")
        .to_string();

    Ok(match current {
        ReviewState::NoReview => ReviewCommand::Create {
            status: form.status,
            review_date,
        },
        ReviewState::Recorded(_) => ReviewCommand::Edit {
            status: form.status,
            review_date,
        },
    })
}

pub(crate) trait ReviewGateway {
    async fn create_review(&self, user_id: &str, status: ReviewStatus, review_date: &str) -> ApiResult<()>;
    async fn update_review(&self, user_id: &str, status: ReviewStatus, review_date: &str) -> ApiResult<()>;
    async fn delete_review(&self, user_id: &str) -> ApiResult<()>;
    async fn delete_fees(&self, user_id: &str) -> ApiResult<()>;
}

impl ReviewGateway for ApiClient {
    async fn create_review(&self, user_id: &str, status: ReviewStatus, review_date: &str) -> ApiResult<()> {
        ApiClient::create_review(self, user_id, status, review_date).await
    }

    async fn update_review(&self, user_id: &str, status: ReviewStatus, review_date: &str) -> ApiResult<()> {
        ApiClient::update_review(self, user_id, status, review_date).await
    }

    async fn delete_review(&self, user_id: &str) -> ApiResult<()> {
        ApiClient::delete_review(self, user_id).await
    }

    async fn delete_fees(&self, user_id: &str) -> ApiResult<()> {
        ApiClient::delete_fees(self, user_id).await
    }
}

pub(crate) async fn save_review<G: ReviewGateway>(
    gateway: &G,
    user_id: &str,
    current: ReviewState,
    form: &ReviewForm,
) -> Result<ReviewCommand, ReviewSaveError> {
    let command = plan_review_save(current, form)?;
    log::info!("review for {user_id}: {:?} -> {command:?}", current);

    match &command {
        ReviewCommand::Create { status, review_date } => {
            gateway.create_review(user_id, *status, review_date).await?;
        }
        ReviewCommand::Edit { status, review_date } => {
            gateway.update_review(user_id, *status, review_date).await?;
        }
    }

    Ok(command)
}

/// `* -> NoReview`. Fee fields are not part of this; see [`delete_fees`].
///
/// The caller is responsible for the confirmation prompt and the fade delay.
pub(crate) async fn delete_review<G: ReviewGateway>(
    gateway: &G,
    user_id: &str,
    current: ReviewState,
) -> Result<(), ReviewSaveError> {
    if current == ReviewState::NoReview {
        return Err(ReviewFormError::NothingToDelete.into());
    }
    gateway.delete_review(user_id).await?;
    Ok(())
}

/// Remove only the fee fields of a review.
pub(crate) async fn delete_fees<G: ReviewGateway>(
    gateway: &G,
    user_id: &str,
    review: Option<&Review>,
) -> Result<(), ReviewSaveError> {
    if !review.is_some_and(Review::has_fee_record) {
        return Err(ReviewFormError::NoFeeRecord.into());
    }
    gateway.delete_fees(user_id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FeeStatus;
    use futures::executor::block_on;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<String>>,
    }

    impl ReviewGateway for Recorder {
        async fn create_review(&self, user_id: &str, status: ReviewStatus, review_date: &str) -> ApiResult<()> {
            self.calls
                .borrow_mut()
                .push(format!("create {user_id} {status} {review_date}"));
            Ok(())
        }

        async fn update_review(&self, user_id: &str, status: ReviewStatus, review_date: &str) -> ApiResult<()> {
            self.calls
                .borrow_mut()
                .push(format!("update {user_id} {status} {review_date}"));
            Ok(())
        }

        async fn delete_review(&self, user_id: &str) -> ApiResult<()> {
            self.calls.borrow_mut().push(format!("delete {user_id}"));
            Ok(())
        }

        async fn delete_fees(&self, user_id: &str) -> ApiResult<()> {
            self.calls.borrow_mut().push(format!("delete-fees {user_id}"));
            Ok(())
        }
    }

    fn review(status: ReviewStatus) -> Review {
        Review {
            user_id: "u1".to_string(),
            review_status: status,
            review_date: "2024-03-01T00:00:00.000Z".to_string(),
            fee_category: None,
            pending_amount: None,
            due_date: None,
            fee_status: None,
        }
    }

    #[test]
    fn test_first_save_creates() {
        let rec = Recorder::default();
        let form = ReviewForm {
            status: ReviewStatus::NotAssigned,
            review_date: "2024-03-04".to_string(),
        };
        let cmd = block_on(save_review(&rec, "u1", ReviewState::NoReview, &form)).expect("should save");
        assert!(matches!(cmd, ReviewCommand::Create { .. }));
        assert_eq!(*rec.calls.borrow(), vec!["create u1 Not Assigned 2024-03-04"]);
    }

    #[test]
    fn test_any_status_can_move_to_any_other() {
        let rec = Recorder::default();
        let r = review(ReviewStatus::Completed);
        let form = ReviewForm {
            status: ReviewStatus::NotAssigned,
            review_date: "2024-03-09T10:00:00Z".to_string(),
        };
        block_on(save_review(&rec, "u1", ReviewState::of(Some(&r)), &form)).expect("should save");
        assert_eq!(*rec.calls.borrow(), vec!["update u1 Not Assigned 2024-03-09"]);
    }

    #[test]
    fn test_invalid_date_blocks_call() {
        let rec = Recorder::default();
        let form = ReviewForm {
            status: ReviewStatus::Assigned,
            review_date: String::new(),
        };
        let err = block_on(save_review(&rec, "u1", ReviewState::NoReview, &form)).expect_err("should fail");
        assert!(matches!(err, ReviewSaveError::Form(ReviewFormError::InvalidDate)));
        assert!(rec.calls.borrow().is_empty());
    }

    #[test]
    fn test_delete_review_requires_a_review() {
        let rec = Recorder::default();
        let err = block_on(delete_review(&rec, "u1", ReviewState::NoReview)).expect_err("should fail");
        assert!(matches!(err, ReviewSaveError::Form(ReviewFormError::NothingToDelete)));

        block_on(delete_review(&rec, "u1", ReviewState::Recorded(ReviewStatus::Assigned))).expect("should delete");
        assert_eq!(*rec.calls.borrow(), vec!["delete u1"]);
    }

    #[test]
    fn test_delete_fees_is_scoped_to_fee_record() {
        let rec = Recorder::default();
        let mut r = review(ReviewStatus::Assigned);

        let err = block_on(delete_fees(&rec, "u1", Some(&r))).expect_err("no fee record yet");
        assert!(matches!(err, ReviewSaveError::Form(ReviewFormError::NoFeeRecord)));

        r.fee_category = Some("Monthly".to_string());
        r.fee_status = Some(FeeStatus::Pending);
        block_on(delete_fees(&rec, "u1", Some(&r))).expect("should delete fees");
        assert_eq!(*rec.calls.borrow(), vec!["delete-fees u1"]);
    }

    #[test]
    fn test_review_form_prefill() {
        let r = review(ReviewStatus::Completed);
        let f = ReviewForm::from_review(Some(&r));
        assert_eq!(f.status, ReviewStatus::Completed);
        assert_eq!(f.review_date, "2024-03-01");
        assert_eq!(ReviewState::of(None).label(), "No review");
    }
}
