//! Opportunity service - the opportunities page
//!
//! Every request is scoped to the session's user id. Each successful write
//! is followed by a full reload of the list, so what the screen shows is
//! always the backend's latest answer.

use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::{
    FormError, OpportunityChanges, OpportunityForm, OpportunityUpdate, SessionIdentity,
    USERNAME_COOKIE, USER_ID_COOKIE,
};
use crate::ports::{CookieStore, OpportunityApi, Screen};
use crate::view::{self, OpportunityRow};

use super::messages::{
    ADD_FAILED, CLEAR_CONFIRM, CLEAR_FAILED, DELETE_FAILED, FILL_NAME_AND_VALUE, INVALID_VALUE,
    LOAD_FAILED, LOAD_ONE_FAILED, NOTHING_TO_UPDATE, UPDATE_FAILED,
};
use super::ActionOutcome;

/// Opportunity actions for one signed-in user
pub struct OpportunityService {
    api: Arc<dyn OpportunityApi>,
    session: SessionIdentity,
}

impl OpportunityService {
    pub fn new(api: Arc<dyn OpportunityApi>, session: SessionIdentity) -> Self {
        Self { api, session }
    }

    /// Read the session from the cookie store
    ///
    /// Fails with [`Error::Session`] when no `userID` cookie is present.
    pub fn from_cookies(api: Arc<dyn OpportunityApi>, cookies: &dyn CookieStore) -> Result<Self> {
        let session = SessionIdentity::from_cookie_values(
            cookies.get(USER_ID_COOKIE).as_deref(),
            cookies.get(USERNAME_COOKIE).as_deref(),
        )
        .ok_or_else(|| Error::session("Not logged in"))?;

        Ok(Self::new(api, session))
    }

    pub fn session(&self) -> &SessionIdentity {
        &self.session
    }

    /// Page load: greet the user, then show their opportunities
    pub async fn open_page(&self, screen: &dyn Screen) -> ActionOutcome {
        screen.set_username(self.session.display_name());
        self.load_opportunities(screen).await
    }

    /// Fetch and render the list
    ///
    /// A failed fetch leaves the screen as it was; the failure only goes to
    /// the log.
    pub async fn load_opportunities(&self, screen: &dyn Screen) -> ActionOutcome {
        match self.api.list_opportunities(&self.session.user_id).await {
            Ok(list) => {
                tracing::debug!(count = list.len(), "Loaded opportunities");
                screen.render_list(&view::render(Some(list.as_slice())));
                ActionOutcome::Completed
            }
            Err(e) => {
                tracing::error!(error = %e, "{}", LOAD_FAILED);
                ActionOutcome::Failed
            }
        }
    }

    pub async fn add_opportunity(&self, screen: &dyn Screen, form: &OpportunityForm) -> ActionOutcome {
        let opportunity = match form.validate() {
            Ok(opportunity) => opportunity,
            Err(e) => {
                tracing::warn!(reason = ?e, "Opportunity form refused");
                screen.alert(form_error_message(e));
                return ActionOutcome::Rejected;
            }
        };

        match self.api.add_opportunity(&self.session.user_id, &opportunity).await {
            Ok(inserted_id) => {
                tracing::debug!(id = ?inserted_id, "Opportunity added");
                screen.clear_opportunity_form();
                self.reload(screen).await;
                ActionOutcome::Completed
            }
            Err(e) => self.report_failure(screen, &e, ADD_FAILED),
        }
    }

    pub async fn delete_opportunity(&self, screen: &dyn Screen, id: &str) -> ActionOutcome {
        match self.api.delete_opportunity(&self.session.user_id, id).await {
            Ok(()) => {
                tracing::debug!(id, "Opportunity deleted");
                self.reload(screen).await;
                ActionOutcome::Completed
            }
            Err(e) => self.report_failure(screen, &e, DELETE_FAILED),
        }
    }

    /// Delete every opportunity of the user after confirmation
    pub async fn clear_all(&self, screen: &dyn Screen) -> ActionOutcome {
        if !screen.confirm(CLEAR_CONFIRM) {
            return ActionOutcome::Cancelled;
        }

        match self.api.clear_opportunities(&self.session.user_id).await {
            Ok(()) => {
                tracing::debug!("Opportunities cleared");
                self.reload(screen).await;
                ActionOutcome::Completed
            }
            Err(e) => self.report_failure(screen, &e, CLEAR_FAILED),
        }
    }

    pub async fn show_opportunity(&self, screen: &dyn Screen, id: &str) -> ActionOutcome {
        match self.api.get_opportunity(id).await {
            Ok(opportunity) => {
                screen.render_detail(&OpportunityRow::from_opportunity(&opportunity));
                ActionOutcome::Completed
            }
            Err(e) => self.report_failure(screen, &e, LOAD_ONE_FAILED),
        }
    }

    /// Change some fields of an existing opportunity
    ///
    /// The backend replaces the whole record, so the current one is fetched
    /// first and the changes applied on top.
    pub async fn update_opportunity(
        &self,
        screen: &dyn Screen,
        id: &str,
        changes: &OpportunityChanges,
    ) -> ActionOutcome {
        if changes.is_empty() {
            screen.alert(NOTHING_TO_UPDATE);
            return ActionOutcome::Rejected;
        }
        let changes = match changes.validate() {
            Ok(changes) => changes,
            Err(e) => {
                tracing::warn!(reason = ?e, "Opportunity changes refused");
                screen.alert(form_error_message(e));
                return ActionOutcome::Rejected;
            }
        };

        let current = match self.api.get_opportunity(id).await {
            Ok(current) => current,
            Err(e) => return self.report_failure(screen, &e, UPDATE_FAILED),
        };

        let update = OpportunityUpdate {
            id: current.id,
            name: changes.name.unwrap_or(current.name),
            value: changes.value.unwrap_or(current.value),
            status: changes.status.unwrap_or(current.status),
            user_id: current.user_id.unwrap_or_else(|| self.session.user_id.clone()),
        };

        match self.api.update_opportunity(&update).await {
            Ok(()) => {
                tracing::debug!(id = %update.id, "Opportunity updated");
                self.reload(screen).await;
                ActionOutcome::Completed
            }
            Err(e) => self.report_failure(screen, &e, UPDATE_FAILED),
        }
    }

    /// Reload after a write; the write's outcome stands either way
    async fn reload(&self, screen: &dyn Screen) {
        self.load_opportunities(screen).await;
    }

    fn report_failure(&self, screen: &dyn Screen, error: &Error, message: &str) -> ActionOutcome {
        tracing::debug!(error = %error, "{}", message);
        screen.alert(message);
        ActionOutcome::Failed
    }
}

fn form_error_message(error: FormError) -> &'static str {
    match error {
        FormError::MissingField => FILL_NAME_AND_VALUE,
        FormError::InvalidValue => INVALID_VALUE,
    }
}
