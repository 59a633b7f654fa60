//! JSON-RPC Server
//!
//! JSON-RPC 2.0 over TCP, bound to localhost only. A reverse proxy (or the
//! CLI) is expected to sit in front for anything public.

use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use std::sync::Arc;
use tracing::info;

use crate::handler::RpcHandler;
use crate::types::{
    EventCreateParams, EventGetParams, EventListParams, EventUpdateParams, HealthParams, MeParams,
    RegisterParams, RequestLinkParams, SetCompletedTasksParams, SubscriptionParams,
    TasksConfigParams, TasksProgressParams, UpdateProfileParams, VerifyParams,
};

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 2999;

/// RPC Server Configuration
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

macro_rules! register {
    ($module:expr, $handler:expr, $name:literal, $param_ty:ty, $method:ident) => {{
        let handler = $handler.clone();
        $module
            .register_async_method($name, move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: $param_ty = params.parse()?;
                    handler.$method(req).await
                }
            })
            .map_err(|e| e.to_string())?;
    }};
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, handler: Arc<RpcHandler>) -> Self {
        Self { config, handler }
    }

    /// Start the JSON-RPC server.
    ///
    /// Security: only binds to 127.0.0.1 (no external access).
    pub async fn start(self) -> Result<ServerHandle, String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server on TCP (localhost only)"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;

        let mut module = RpcModule::new(());
        let h = &self.handler;

        register!(module, h, "auth.request.v1", RequestLinkParams, request_link);
        register!(module, h, "auth.register.v1", RegisterParams, register);
        register!(module, h, "auth.verify.v1", VerifyParams, verify);
        register!(module, h, "auth.me.v1", MeParams, me);
        register!(
            module,
            h,
            "auth.update_profile.v1",
            UpdateProfileParams,
            update_profile
        );

        register!(module, h, "events.create.v1", EventCreateParams, create_event);
        register!(module, h, "events.list.v1", EventListParams, list_events);
        register!(module, h, "events.get.v1", EventGetParams, get_event);
        register!(module, h, "events.update.v1", EventUpdateParams, update_event);
        register!(
            module,
            h,
            "events.set_tasks.v1",
            SetCompletedTasksParams,
            set_completed_tasks
        );
        register!(module, h, "events.subscribe.v1", SubscriptionParams, subscribe);
        register!(
            module,
            h,
            "events.unsubscribe.v1",
            SubscriptionParams,
            unsubscribe
        );
        register!(
            module,
            h,
            "events.subscription.v1",
            SubscriptionParams,
            subscription_status
        );

        register!(module, h, "tasks.config.v1", TasksConfigParams, tasks_config);
        register!(
            module,
            h,
            "tasks.progress.v1",
            TasksProgressParams,
            tasks_progress
        );

        register!(module, h, "health.check.v1", HealthParams, health);

        info!("JSON-RPC server started successfully");

        let handle = server.start(module);
        Ok(handle)
    }
}
