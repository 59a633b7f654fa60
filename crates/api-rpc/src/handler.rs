//! RPC Method Handlers
//!
//! One method per use case. Authenticated methods resolve the session token
//! to a live user first; a deleted user's token stops working immediately.

use std::path::PathBuf;
use std::sync::Arc;

use jsonrpsee::types::ErrorObjectOwned;
use tracing::info;

use uneventful_core::application::auth::magic_link::{self, RequestLinkOutcome};
use uneventful_core::application::checklist::evaluate_progress;
use uneventful_core::application::events as event_ops;
use uneventful_core::application::{SmsRateLimiter, TokenService};
use uneventful_core::config::{load_tasks_config, AdminRoster, SmsTemplates};
use uneventful_core::domain::{EventData, User};
use uneventful_core::error::AppError;
use uneventful_core::port::{
    EventRepository, IdProvider, SmsSender, SubscriptionRepository, TimeProvider, UserRepository,
};

use crate::error::to_rpc_error;
use crate::types::*;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    users: Arc<dyn UserRepository>,
    events: Arc<dyn EventRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    sms: Arc<dyn SmsSender>,
    tokens: Arc<TokenService>,
    limiter: Arc<SmsRateLimiter>,
    templates: Arc<SmsTemplates>,
    admins: Arc<AdminRoster>,
    ids: Arc<dyn IdProvider>,
    time: Arc<dyn TimeProvider>,
    tasks_path: PathBuf,
    start_time: std::time::Instant,
}

impl RpcHandler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<dyn UserRepository>,
        events: Arc<dyn EventRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        sms: Arc<dyn SmsSender>,
        tokens: Arc<TokenService>,
        limiter: Arc<SmsRateLimiter>,
        templates: Arc<SmsTemplates>,
        admins: Arc<AdminRoster>,
        ids: Arc<dyn IdProvider>,
        time: Arc<dyn TimeProvider>,
        tasks_path: PathBuf,
    ) -> Self {
        Self {
            users,
            events,
            subscriptions,
            sms,
            tokens,
            limiter,
            templates,
            admins,
            ids,
            time,
            tasks_path,
            start_time: std::time::Instant::now(),
        }
    }

    /// Resolve a session token to its live user.
    async fn authenticate(&self, session_token: &str) -> Result<User, ErrorObjectOwned> {
        let claims = self
            .tokens
            .verify_session_token(session_token)
            .map_err(to_rpc_error)?;

        self.users
            .find_by_id(&claims.user_id)
            .await
            .map_err(to_rpc_error)?
            .ok_or_else(|| {
                to_rpc_error(AppError::Unauthorized("User no longer exists".to_string()))
            })
    }

    fn profile(&self, user: &User) -> UserProfile {
        UserProfile::from_user(user, self.admins.is_admin(&user.phone))
    }

    /// auth.request.v1
    pub async fn request_link(
        &self,
        params: RequestLinkParams,
    ) -> Result<RequestLinkResult, ErrorObjectOwned> {
        let outcome = magic_link::request_link(
            self.users.as_ref(),
            &self.limiter,
            &self.tokens,
            self.sms.as_ref(),
            &self.templates,
            &params.phone,
        )
        .await
        .map_err(to_rpc_error)?;

        let status = match outcome {
            RequestLinkOutcome::LinkSent => "link_sent",
            RequestLinkOutcome::RegistrationRequired => "registration_required",
        };
        Ok(RequestLinkResult {
            status: status.to_string(),
        })
    }

    /// auth.register.v1
    pub async fn register(
        &self,
        params: RegisterParams,
    ) -> Result<RegisterResult, ErrorObjectOwned> {
        let user = magic_link::register(
            self.users.as_ref(),
            &self.limiter,
            &self.tokens,
            self.sms.as_ref(),
            &self.templates,
            self.ids.as_ref(),
            self.time.as_ref(),
            magic_link::RegisterRequest {
                phone: params.phone,
                first_name: params.first_name,
                last_name: params.last_name,
            },
        )
        .await
        .map_err(to_rpc_error)?;

        Ok(RegisterResult {
            status: "link_sent".to_string(),
            user: self.profile(&user),
        })
    }

    /// auth.verify.v1
    pub async fn verify(&self, params: VerifyParams) -> Result<VerifyResult, ErrorObjectOwned> {
        let session = magic_link::verify(self.users.as_ref(), &self.tokens, &params.token)
            .await
            .map_err(to_rpc_error)?;

        Ok(VerifyResult {
            user: self.profile(&session.user),
            session_token: session.session_token,
        })
    }

    /// auth.me.v1
    pub async fn me(&self, params: MeParams) -> Result<MeResult, ErrorObjectOwned> {
        let user = self.authenticate(&params.session_token).await?;
        Ok(MeResult {
            user: self.profile(&user),
        })
    }

    /// auth.update_profile.v1
    pub async fn update_profile(
        &self,
        params: UpdateProfileParams,
    ) -> Result<UpdateProfileResult, ErrorObjectOwned> {
        let user = self.authenticate(&params.session_token).await?;

        let first_name = params.first_name.trim();
        let last_name = params.last_name.trim();
        if first_name.is_empty() || last_name.is_empty() {
            return Err(to_rpc_error(AppError::Validation(
                "First name and last name are required".to_string(),
            )));
        }

        let updated = self
            .users
            .update_profile(&user.id, first_name, last_name, self.time.now_millis())
            .await
            .map_err(to_rpc_error)?;

        info!(user_id = %updated.id, "Profile updated");
        Ok(UpdateProfileResult {
            user: self.profile(&updated),
        })
    }

    /// events.create.v1
    pub async fn create_event(
        &self,
        params: EventCreateParams,
    ) -> Result<EventView, ErrorObjectOwned> {
        let user = self.authenticate(&params.session_token).await?;

        let event = event_ops::create_event(
            self.events.as_ref(),
            self.ids.as_ref(),
            self.time.as_ref(),
            &user.id,
            EventData::from_value(params.data),
        )
        .await
        .map_err(to_rpc_error)?;

        info!(user_id = %user.id, event_id = %event.id, "Event created");
        Ok(EventView::from_event(event))
    }

    /// events.list.v1
    pub async fn list_events(
        &self,
        params: EventListParams,
    ) -> Result<EventListResult, ErrorObjectOwned> {
        let user = self.authenticate(&params.session_token).await?;
        let events = self
            .events
            .find_by_user(&user.id)
            .await
            .map_err(to_rpc_error)?;

        Ok(EventListResult {
            events: events.into_iter().map(EventView::from_event).collect(),
        })
    }

    /// events.get.v1
    pub async fn get_event(&self, params: EventGetParams) -> Result<EventView, ErrorObjectOwned> {
        let user = self.authenticate(&params.session_token).await?;
        let event = event_ops::get_owned_event(self.events.as_ref(), &user.id, &params.event_id)
            .await
            .map_err(to_rpc_error)?;
        Ok(EventView::from_event(event))
    }

    /// events.update.v1
    pub async fn update_event(
        &self,
        params: EventUpdateParams,
    ) -> Result<EventView, ErrorObjectOwned> {
        let user = self.authenticate(&params.session_token).await?;

        event_ops::update_event_data(
            self.events.as_ref(),
            self.time.as_ref(),
            &user.id,
            &params.event_id,
            EventData::from_value(params.data),
        )
        .await
        .map_err(to_rpc_error)?;

        let event = event_ops::get_owned_event(self.events.as_ref(), &user.id, &params.event_id)
            .await
            .map_err(to_rpc_error)?;
        Ok(EventView::from_event(event))
    }

    /// events.set_tasks.v1
    pub async fn set_completed_tasks(
        &self,
        params: SetCompletedTasksParams,
    ) -> Result<EventView, ErrorObjectOwned> {
        let user = self.authenticate(&params.session_token).await?;

        event_ops::set_completed_tasks(
            self.events.as_ref(),
            self.time.as_ref(),
            &user.id,
            &params.event_id,
            params.completed_tasks,
        )
        .await
        .map_err(to_rpc_error)?;

        let event = event_ops::get_owned_event(self.events.as_ref(), &user.id, &params.event_id)
            .await
            .map_err(to_rpc_error)?;
        Ok(EventView::from_event(event))
    }

    /// events.subscribe.v1
    pub async fn subscribe(
        &self,
        params: SubscriptionParams,
    ) -> Result<SubscriptionResult, ErrorObjectOwned> {
        let user = self.authenticate(&params.session_token).await?;

        // Ownership check before touching the subscription table
        event_ops::get_owned_event(self.events.as_ref(), &user.id, &params.event_id)
            .await
            .map_err(to_rpc_error)?;

        let subscription = self
            .subscriptions
            .upsert(
                &self.ids.generate_id(),
                &user.id,
                &params.event_id,
                self.time.now_millis(),
            )
            .await
            .map_err(to_rpc_error)?;

        info!(user_id = %user.id, event_id = %params.event_id, "Reminder subscription enabled");
        Ok(SubscriptionResult {
            subscribed: true,
            subscription: Some(SubscriptionView::from_subscription(subscription)),
        })
    }

    /// events.unsubscribe.v1
    pub async fn unsubscribe(
        &self,
        params: SubscriptionParams,
    ) -> Result<SubscriptionResult, ErrorObjectOwned> {
        let user = self.authenticate(&params.session_token).await?;

        event_ops::get_owned_event(self.events.as_ref(), &user.id, &params.event_id)
            .await
            .map_err(to_rpc_error)?;

        self.subscriptions
            .delete(&user.id, &params.event_id)
            .await
            .map_err(to_rpc_error)?;

        info!(user_id = %user.id, event_id = %params.event_id, "Reminder subscription disabled");
        Ok(SubscriptionResult {
            subscribed: false,
            subscription: None,
        })
    }

    /// events.subscription.v1
    pub async fn subscription_status(
        &self,
        params: SubscriptionParams,
    ) -> Result<SubscriptionResult, ErrorObjectOwned> {
        let user = self.authenticate(&params.session_token).await?;

        event_ops::get_owned_event(self.events.as_ref(), &user.id, &params.event_id)
            .await
            .map_err(to_rpc_error)?;

        let subscription = self
            .subscriptions
            .find(&user.id, &params.event_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(SubscriptionResult {
            subscribed: subscription.is_some(),
            subscription: subscription.map(SubscriptionView::from_subscription),
        })
    }

    /// tasks.config.v1
    pub async fn tasks_config(
        &self,
        params: TasksConfigParams,
    ) -> Result<TasksConfigResult, ErrorObjectOwned> {
        self.authenticate(&params.session_token).await?;

        // Re-read on every call so checklist edits land without a restart
        let config = load_tasks_config(&self.tasks_path).map_err(to_rpc_error)?;
        Ok(TasksConfigResult { config })
    }

    /// tasks.progress.v1
    pub async fn tasks_progress(
        &self,
        params: TasksProgressParams,
    ) -> Result<TasksProgressResult, ErrorObjectOwned> {
        let user = self.authenticate(&params.session_token).await?;
        let event = event_ops::get_owned_event(self.events.as_ref(), &user.id, &params.event_id)
            .await
            .map_err(to_rpc_error)?;

        let config = load_tasks_config(&self.tasks_path).map_err(to_rpc_error)?;
        let progress = evaluate_progress(&config, &event.data, &event.completed_tasks);
        Ok(TasksProgressResult { progress })
    }

    /// health.check.v1
    pub async fn health(&self, _params: HealthParams) -> Result<HealthResult, ErrorObjectOwned> {
        Ok(HealthResult {
            status: "ok".to_string(),
            version: uneventful_core::VERSION.to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs() as i64,
        })
    }
}
