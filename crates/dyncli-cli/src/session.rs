//! Login/logout around commands that talk to the API.

use anyhow::{Context, Result};
use tracing::{debug, error};

use crate::client::DynectClient;
use crate::config::Settings;

pub async fn login(client: &DynectClient, settings: &Settings) -> Result<()> {
    let (username, password) = settings.credentials().map_err(|e| {
        error!(error = %e, "Missing required flags");
        anyhow::Error::msg(e)
    })?;

    client
        .login(&settings.account, username, password)
        .await
        .inspect_err(|e| error!(error = %e, "Dynect login failed"))
        .context("Dynect login failed")?;
    debug!(account = %settings.account, "Dynect login success");
    Ok(())
}

/// Log out, then hand back the command's result.
///
/// A failed command keeps its own error; a logout failure is only returned
/// when the command itself succeeded.
pub async fn finish<T>(client: &DynectClient, result: Result<T>) -> Result<T> {
    let logout = client.logout().await;
    match &logout {
        Ok(()) => debug!("Dynect logout successful"),
        Err(e) => error!(error = %e, "Dynect logout failed"),
    }
    let value = result?;
    logout.context("Dynect logout failed")?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{any, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn logged_in(server: &MockServer) -> DynectClient {
        Mock::given(method("POST"))
            .and(path("/REST/Session/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": {"token": "tok-123"}
            })))
            .mount(server)
            .await;

        let client = DynectClient::new(&format!("{}/REST/", server.uri())).unwrap();
        client.login("financialtimes", "ops", "secret").await.unwrap();
        client
    }

    async fn mount_logout(server: &MockServer, status: u16, body: serde_json::Value) {
        Mock::given(method("DELETE"))
            .and(path("/REST/Session/"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .expect(1)
            .mount(server)
            .await;
    }

    fn failed_logout() -> serde_json::Value {
        json!({
            "status": "failure",
            "data": {},
            "msgs": [{"INFO": "logout: Session expired", "SOURCE": "BLL", "LVL": "ERROR"}]
        })
    }

    #[tokio::test]
    async fn test_command_error_wins_over_logout_error() {
        let server = MockServer::start().await;
        let client = logged_in(&server).await;
        mount_logout(&server, 400, failed_logout()).await;

        let err = finish::<()>(&client, Err(anyhow::anyhow!("Failed to update GSLB region")))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to update GSLB region");
    }

    #[tokio::test]
    async fn test_logout_error_returned_after_successful_command() {
        let server = MockServer::start().await;
        let client = logged_in(&server).await;
        mount_logout(&server, 400, failed_logout()).await;

        let err = finish(&client, Ok(())).await.unwrap_err();

        assert_eq!(err.to_string(), "Dynect logout failed");
    }

    #[tokio::test]
    async fn test_failed_command_still_logs_out() {
        let server = MockServer::start().await;
        let client = logged_in(&server).await;
        mount_logout(&server, 200, json!({"status": "success", "data": {}})).await;

        let err = finish::<()>(&client, Err(anyhow::anyhow!("Could not get GSLB TTL")))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Could not get GSLB TTL");
        assert!(!client.is_logged_in());
    }

    #[tokio::test]
    async fn test_successful_command_returns_its_value() {
        let server = MockServer::start().await;
        let client = logged_in(&server).await;
        mount_logout(&server, 200, json!({"status": "success", "data": {}})).await;

        assert_eq!(finish(&client, Ok(3)).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_missing_password_fails_before_login_request() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = DynectClient::new(&format!("{}/REST/", server.uri())).unwrap();
        let settings = Settings {
            username: Some("ops".into()),
            password: None,
            account: "financialtimes".into(),
            log_level: "info".into(),
            api_url: format!("{}/REST/", server.uri()),
            zone: "ft.com".into(),
            fqdn: "prometheus.in.ft.com".into(),
            label_pattern: "eu-[0-9]+".into(),
            serve_mode: "obey".into(),
            wait: false,
            concurrency_limit: 1,
            update_timeout_secs: 20,
        };

        let err = login(&client, &settings).await.unwrap_err();

        assert_eq!(err.to_string(), "'password' flags are required");
        assert!(!client.is_logged_in());
    }
}
