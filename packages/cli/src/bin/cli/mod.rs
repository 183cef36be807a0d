pub mod auth;
pub mod tasks;

use std::sync::Arc;

use taskmaster_cli::output::render_notice;
use taskmaster_client::{ClientConfig, ClientResult, NoticeBoard, SessionManager, TaskClient};

/// Everything a command handler needs
pub struct App {
    pub config: ClientConfig,
    pub session: Arc<SessionManager>,
    pub client: TaskClient,
    pub notices: NoticeBoard,
}

impl App {
    /// Load configuration, apply `--api-url`, and restore the stored session
    pub async fn connect(api_url: Option<&str>) -> anyhow::Result<Self> {
        let mut config = ClientConfig::load().await?;
        if let Some(url) = api_url {
            config.set_api_url(url);
        }
        config.validate()?;

        let (session, client) = taskmaster_client::connect(&config).await?;
        let notices = NoticeBoard::from_config(&config);

        Ok(Self {
            config,
            session,
            client,
            notices,
        })
    }

    /// Print the outcome notice and hand the result back
    pub fn report<T>(&mut self, result: ClientResult<T>, success: &str) -> anyhow::Result<T> {
        self.notices.report(&result, success);

        match result {
            Ok(value) => {
                if let Some(notice) = self.notices.success() {
                    println!("{}", render_notice(notice));
                }
                Ok(value)
            }
            Err(e) => Err(e.into()),
        }
    }
}
