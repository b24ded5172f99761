use async_trait::async_trait;
use dars_core::config::PortalConfig;
use dars_timetable::{ExportFetcher, TimetableError};
use reqwest::{Client, Url};
use tracing::{debug, info};

use crate::error::{PortalError, Result};

/// Zip local-file header; every xlsx starts with it.
const XLSX_MAGIC: &[u8] = b"PK\x03\x04";

/// Logs into the portal and downloads the schedule export.
pub struct PortalFetcher {
    config: PortalConfig,
}

impl PortalFetcher {
    pub fn new(config: PortalConfig) -> Self {
        Self { config }
    }

    /// A client with its own cookie jar, so no session outlives one download.
    fn client(&self) -> Result<Client> {
        Ok(Client::builder()
            .cookie_store(true)
            .user_agent(&self.config.user_agent)
            .build()?)
    }

    /// Login, then download the export bytes.
    pub async fn download(&self) -> Result<Vec<u8>> {
        let cfg = &self.config;
        let client = self.client()?;

        // Opening the login page issues the pre-auth session cookie.
        let resp = client.get(&cfg.login_url).send().await?;
        if !resp.status().is_success() {
            return Err(PortalError::Login(format!(
                "login page returned {}",
                resp.status()
            )));
        }
        debug!(url = %cfg.login_url, "login page loaded");

        let form = [
            (cfg.login_field.as_str(), cfg.login.as_str()),
            (cfg.password_field.as_str(), cfg.password.as_str()),
        ];
        let resp = client.post(&cfg.login_url).form(&form).send().await?;
        if !resp.status().is_success() {
            return Err(PortalError::Login(format!(
                "credentials submit returned {}",
                resp.status()
            )));
        }
        let landed = resp.url().clone();
        let body = resp.text().await?;
        if still_on_login_form(&landed, &body, &cfg.login_url, &cfg.password_field) {
            return Err(PortalError::Login("credentials rejected".to_string()));
        }
        info!(landed = %landed, "portal login succeeded");

        let resp = client.get(&cfg.export_url).send().await?;
        if !resp.status().is_success() {
            return Err(PortalError::Download(format!(
                "export returned {}",
                resp.status()
            )));
        }
        let bytes = resp.bytes().await?;
        if bytes.is_empty() {
            return Err(PortalError::Download("export body is empty".to_string()));
        }
        if !looks_like_xlsx(&bytes) {
            return Err(PortalError::Download(
                "export is not a spreadsheet".to_string(),
            ));
        }
        info!(bytes = bytes.len(), "export downloaded");
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ExportFetcher for PortalFetcher {
    async fn fetch_raw(&self) -> dars_timetable::Result<Vec<u8>> {
        self.download()
            .await
            .map_err(|e| TimetableError::Fetch(e.to_string()))
    }
}

/// True when the portal answered the credential submit by showing the login form again.
fn still_on_login_form(landed: &Url, body: &str, login_url: &str, password_field: &str) -> bool {
    let same_host = Url::parse(login_url)
        .ok()
        .is_some_and(|login| login.host_str() == landed.host_str());
    same_host && body.contains(&format!("name=\"{password_field}\""))
}

fn looks_like_xlsx(bytes: &[u8]) -> bool {
    bytes.starts_with(XLSX_MAGIC)
}
