use std::sync::{Arc, Mutex};

use chrono::Utc;
use teloxide::{dispatching::Dispatcher, dptree, prelude::*};
use tokio_util::sync::CancellationToken;

use scout_core::{
    config::Config,
    errors::Error,
    messaging::port::MessagingPort,
    ports::{Analyst, CommunityDirectory, ProjectDirectory, TweetSource},
    service::{ScoutService, ServicePorts},
    session::{BotIdentity, SessionHandle},
};

use crate::{handlers, TelegramCommunityDirectory, TelegramMessenger};

/// Non-Telegram backends; the Telegram-side ports are built here from the bot.
#[derive(Clone)]
pub struct Backends {
    pub tweets: Arc<dyn TweetSource>,
    pub analyst: Arc<dyn Analyst>,
    pub projects: Arc<dyn ProjectDirectory>,
}

pub struct AppState {
    pub service: ScoutService,
    pub shutdown: CancellationToken,
    fatal: Mutex<Option<Error>>,
}

impl AppState {
    pub fn new(service: ScoutService, shutdown: CancellationToken) -> Self {
        Self {
            service,
            shutdown,
            fatal: Mutex::new(None),
        }
    }

    /// Keeps the first fatal error; later ones are only logged by the caller.
    pub fn record_fatal(&self, e: Error) {
        if let Ok(mut slot) = self.fatal.lock() {
            slot.get_or_insert(e);
        }
    }

    fn take_fatal(&self) -> Option<Error> {
        self.fatal.lock().ok().and_then(|mut slot| slot.take())
    }
}

/// Verify the bot identity and open the session handle.
pub async fn open_session(bot: &Bot, cfg: &Config) -> Result<SessionHandle, Error> {
    let me = bot
        .get_me()
        .await
        .map_err(|e| Error::Session(format!("getMe failed: {e}")))?;

    let identity = BotIdentity {
        id: me.id.0,
        username: me.username().to_string(),
    };
    Ok(SessionHandle::open(
        cfg.credentials().session_name(),
        identity,
        Utc::now(),
    ))
}

pub async fn run_polling(cfg: Arc<Config>, backends: Backends) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.credentials().bot_token());
    let session = open_session(&bot, &cfg).await?;

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let communities: Arc<dyn CommunityDirectory> =
        Arc::new(TelegramCommunityDirectory::new(bot.clone()));

    let service = ScoutService::new(
        cfg.clone(),
        session,
        ServicePorts {
            messenger,
            tweets: backends.tweets,
            analyst: backends.analyst,
            projects: backends.projects,
            communities,
        },
    );

    let shutdown = CancellationToken::new();
    let state = Arc::new(AppState::new(service, shutdown.clone()));

    let handler = Update::filter_message().endpoint(handlers::handle_message);

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state.clone()])
        .build();

    // Ctrl-C cancels in-flight commands, then stops the dispatcher.
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("ctrl-c received, shutting down");
                shutdown.cancel();
            }
        });
    }
    {
        let shutdown = shutdown.clone();
        let token = dispatcher.shutdown_token();
        tokio::spawn(async move {
            shutdown.cancelled().await;
            match token.shutdown() {
                Ok(done) => done.await,
                Err(e) => tracing::warn!("dispatcher shutdown: {e}"),
            }
        });
    }

    tracing::info!(
        bot = %state.service.session().identity().username,
        "polling for updates"
    );
    dispatcher.dispatch().await;
    shutdown.cancel();

    let fatal = state.take_fatal();
    state.service.session().clone().close(Utc::now());

    match fatal {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
