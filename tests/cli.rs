mod cli {
    #![allow(non_snake_case)]

    use assert_cmd::prelude::*;
    use mockito::{Matcher, Server};
    use predicates::str::contains;
    use tempfile::TempDir;

    use std::fs;
    use std::io::Cursor;
    use std::process::Command;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    const NAME: &str = "arbflow";
    const TOKEN: &str = "tok-123";
    const DASHBOARD_PATH: &str = "/api/v1/analytics/dashboard";

    const READY_BODY: &str = r#"{
        "data": {
            "company_name": "Acme Corp",
            "summary": {"active_users": 1432, "page_views": 8500, "bounce_rate": "42%"},
            "post_level": [
                {"source": "google", "campaign": "brand", "users": 100, "views": 500},
                {"source": "facebook", "campaign": "retarget", "users": 40, "views": 90}
            ],
            "forecast": [
                {"source": "google", "campaign": "brand", "users": 110, "views": 520}
            ],
            "properties": [{"id": "p1", "name": "Main site"}, {"id": "p2", "name": "Shop"}],
            "active_property_id": "p1",
            "status": "ready"
        }
    }"#;

    const EMPTY_BODY: &str =
        r#"{"data": {"company_name": "Acme Corp", "post_level": [], "status": "ready"}}"#;

    const PENDING_BODY: &str =
        r#"{"data": {"company_name": "Acme Corp", "status": "pending_integration"}}"#;

    /// A command pointed at a scratch data directory and the given API
    fn arbflow(data_dir: &TempDir, api_url: &str) -> Result<Command, Box<dyn std::error::Error>> {
        let mut cmd = Command::cargo_bin(NAME)?;
        cmd.env("NO_COLOR", "1")
            .arg("--data-dir")
            .arg(data_dir.path())
            .arg("--api-url")
            .arg(api_url)
            .arg("--quiet");
        Ok(cmd)
    }

    fn login(data_dir: &TempDir, api_url: &str) -> TestResult {
        arbflow(data_dir, api_url)?
            .args(["login", "--token", TOKEN])
            .assert()
            .success()
            .stdout(contains("Session saved."));
        Ok(())
    }

    fn stored_state(data_dir: &TempDir) -> String {
        fs::read_to_string(data_dir.path().join("state.json")).unwrap_or_default()
    }

    #[test]
    fn test_output__when_no_subcommand() -> TestResult {
        let mut cmd = Command::cargo_bin(NAME)?;

        cmd.assert().failure().stderr(contains("Usage:"));
        Ok(())
    }

    #[test]
    fn test_completion__bash() -> TestResult {
        let mut cmd = Command::cargo_bin(NAME)?;

        cmd.args(["completion", "bash"])
            .assert()
            .success()
            .stdout(contains("_arbflow"));
        Ok(())
    }

    #[test]
    fn test_dashboard__without_session_exits_with_session_code() -> TestResult {
        let data_dir = TempDir::new()?;

        arbflow(&data_dir, "http://127.0.0.1:9")?
            .arg("dashboard")
            .assert()
            .code(2)
            .stderr(contains("arbflow login"));
        Ok(())
    }

    #[test]
    fn test_login__empty_token_is_rejected() -> TestResult {
        let data_dir = TempDir::new()?;

        arbflow(&data_dir, "http://127.0.0.1:9")?
            .args(["login", "--token", "   "])
            .assert()
            .code(1)
            .stderr(contains("Session token cannot be empty"));
        Ok(())
    }

    #[test]
    fn test_logout__removes_stored_session() -> TestResult {
        let data_dir = TempDir::new()?;
        login(&data_dir, "http://127.0.0.1:9")?;
        assert!(stored_state(&data_dir).contains(TOKEN));

        arbflow(&data_dir, "http://127.0.0.1:9")?
            .arg("logout")
            .assert()
            .success()
            .stdout(contains("Logged out."));

        assert!(!stored_state(&data_dir).contains(TOKEN));
        Ok(())
    }

    #[tokio::test]
    async fn test_dashboard__ready_snapshot() -> TestResult {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", DASHBOARD_PATH)
            .match_header("authorization", "Bearer tok-123")
            .with_status(200)
            .with_body(READY_BODY)
            .create_async()
            .await;
        let data_dir = TempDir::new()?;
        login(&data_dir, &server.url())?;

        arbflow(&data_dir, &server.url())?
            .arg("dashboard")
            .assert()
            .success()
            .stdout(contains("Acme Corp Workspace"))
            .stdout(contains("Active Users: 1432"))
            .stdout(contains("Bounce Rate: 42%"))
            .stdout(contains("(forecast)"));

        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_dashboard__json_output() -> TestResult {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", DASHBOARD_PATH)
            .with_status(200)
            .with_body(READY_BODY)
            .create_async()
            .await;
        let data_dir = TempDir::new()?;
        login(&data_dir, &server.url())?;

        let output = arbflow(&data_dir, &server.url())?
            .args(["dashboard", "--json"])
            .output()?;

        assert!(output.status.success());
        let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
        assert_eq!(json["company_name"], "Acme Corp");
        assert_eq!(json["post_level"].as_array().map(Vec::len), Some(2));
        Ok(())
    }

    #[tokio::test]
    async fn test_dashboard__property_is_sent_as_query() -> TestResult {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", DASHBOARD_PATH)
            .match_query(Matcher::UrlEncoded("property_id".into(), "p2".into()))
            .with_status(200)
            .with_body(READY_BODY)
            .create_async()
            .await;
        let data_dir = TempDir::new()?;
        login(&data_dir, &server.url())?;

        arbflow(&data_dir, &server.url())?
            .args(["dashboard", "--property", "p2"])
            .assert()
            .success()
            .stdout(contains(" * Shop (p2)"));

        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_dashboard__unauthorized_clears_session() -> TestResult {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", DASHBOARD_PATH)
            .with_status(401)
            .with_body(r#"{"detail": "Could not validate credentials"}"#)
            .expect(1)
            .create_async()
            .await;
        let data_dir = TempDir::new()?;
        login(&data_dir, &server.url())?;

        arbflow(&data_dir, &server.url())?
            .arg("dashboard")
            .assert()
            .code(2)
            .stderr(contains("arbflow login"));
        assert!(!stored_state(&data_dir).contains(TOKEN));

        // No session left, so the second run never reaches the server.
        arbflow(&data_dir, &server.url())?
            .arg("dashboard")
            .assert()
            .code(2);

        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_dashboard__server_error_detail_is_reported() -> TestResult {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", DASHBOARD_PATH)
            .with_status(500)
            .with_body(r#"{"detail": "warehouse offline"}"#)
            .create_async()
            .await;
        let data_dir = TempDir::new()?;
        login(&data_dir, &server.url())?;

        arbflow(&data_dir, &server.url())?
            .arg("dashboard")
            .assert()
            .code(1)
            .stderr(contains("warehouse offline"));
        assert!(stored_state(&data_dir).contains(TOKEN));
        Ok(())
    }

    #[tokio::test]
    async fn test_dashboard__pending_integration() -> TestResult {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", DASHBOARD_PATH)
            .with_status(200)
            .with_body(PENDING_BODY)
            .create_async()
            .await;
        let data_dir = TempDir::new()?;
        login(&data_dir, &server.url())?;

        arbflow(&data_dir, &server.url())?
            .arg("dashboard")
            .assert()
            .success()
            .stderr(contains("arbflow connect"));
        Ok(())
    }

    #[tokio::test]
    async fn test_export__csv_content() -> TestResult {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", DASHBOARD_PATH)
            .with_status(200)
            .with_body(READY_BODY)
            .create_async()
            .await;
        let data_dir = TempDir::new()?;
        let out_dir = TempDir::new()?;
        login(&data_dir, &server.url())?;

        arbflow(&data_dir, &server.url())?
            .args(["export", "csv", "--out"])
            .arg(out_dir.path())
            .assert()
            .success()
            .stdout(contains("Acme_Corp_Data.csv"));

        let content = fs::read_to_string(out_dir.path().join("Acme_Corp_Data.csv"))?;
        assert_eq!(
            content,
            "Source,Campaign,Users,Views\ngoogle,brand,100,500\nfacebook,retarget,40,90"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_export__nothing_to_export() -> TestResult {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", DASHBOARD_PATH)
            .with_status(200)
            .with_body(EMPTY_BODY)
            .create_async()
            .await;
        let data_dir = TempDir::new()?;
        let out_dir = TempDir::new()?;
        login(&data_dir, &server.url())?;

        arbflow(&data_dir, &server.url())?
            .args(["export", "report", "--out"])
            .arg(out_dir.path())
            .assert()
            .success()
            .stdout(contains("Nothing to export"));

        assert_eq!(fs::read_dir(out_dir.path())?.count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_export__report_with_logo() -> TestResult {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", DASHBOARD_PATH)
            .with_status(200)
            .with_body(READY_BODY)
            .create_async()
            .await;
        let data_dir = TempDir::new()?;
        let out_dir = TempDir::new()?;
        login(&data_dir, &server.url())?;

        let mut png = Vec::new();
        image::RgbImage::from_pixel(8, 4, image::Rgb([200, 30, 30]))
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)?;
        let logo_path = out_dir.path().join("logo.png");
        fs::write(&logo_path, &png)?;

        arbflow(&data_dir, &server.url())?
            .args(["logo", "set"])
            .arg(&logo_path)
            .assert()
            .success()
            .stdout(contains("Logo saved"));

        arbflow(&data_dir, &server.url())?
            .args(["export", "report", "--out"])
            .arg(out_dir.path())
            .assert()
            .success();

        let pdf = fs::read(out_dir.path().join("Acme_Corp_Performance_Report.pdf"))?;
        assert!(pdf.starts_with(b"%PDF-"));
        assert!(pdf.windows(15).any(|w| w == b"/Subtype /Image"));
        Ok(())
    }

    #[test]
    fn test_logo__missing_file_fails() -> TestResult {
        let data_dir = TempDir::new()?;

        arbflow(&data_dir, "http://127.0.0.1:9")?
            .args(["logo", "set", "does-not-exist.png"])
            .assert()
            .code(1)
            .stderr(contains("IO error"));
        Ok(())
    }

    #[test]
    fn test_logo__clear_without_logo_succeeds() -> TestResult {
        let data_dir = TempDir::new()?;

        arbflow(&data_dir, "http://127.0.0.1:9")?
            .args(["logo", "clear"])
            .assert()
            .success()
            .stdout(contains("Logo removed."));
        Ok(())
    }

    #[tokio::test]
    async fn test_connect__submits_key() -> TestResult {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/integrations/")
            .match_header("authorization", "Bearer tok-123")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "provider": "google_analytics",
                "property_id": "123"
            })))
            .with_status(200)
            .with_body(r#"{"id": 7, "provider": "google_analytics", "property_id": "123"}"#)
            .create_async()
            .await;
        let data_dir = TempDir::new()?;
        let key_dir = TempDir::new()?;
        let key_file = key_dir.path().join("key.json");
        fs::write(&key_file, r#"{"type": "service_account"}"#)?;
        login(&data_dir, &server.url())?;

        arbflow(&data_dir, &server.url())?
            .args(["connect", "--property-id", "123", "--key-file"])
            .arg(&key_file)
            .assert()
            .success()
            .stdout(contains("Connected google_analytics property 123."));

        mock.assert_async().await;
        Ok(())
    }

    #[test]
    fn test_connect__without_session() -> TestResult {
        let data_dir = TempDir::new()?;
        let key_dir = TempDir::new()?;
        let key_file = key_dir.path().join("key.json");
        fs::write(&key_file, r#"{"type": "service_account"}"#)?;

        arbflow(&data_dir, "http://127.0.0.1:9")?
            .args(["connect", "--property-id", "123", "--key-file"])
            .arg(&key_file)
            .assert()
            .code(2);
        Ok(())
    }

    #[test]
    fn test_config__invalid_api_url() -> TestResult {
        let data_dir = TempDir::new()?;

        arbflow(&data_dir, "ftp://example.test")?
            .arg("dashboard")
            .assert()
            .code(1)
            .stderr(contains("must start with http:// or https://"));
        Ok(())
    }
}
