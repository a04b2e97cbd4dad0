#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

static USER_COUNTER: AtomicU64 = AtomicU64::new(0);

pub const JWT_SECRET: &str = "integration-test-secret";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub data_dir: PathBuf,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let data_dir = std::env::temp_dir().join(format!("todo-api-it-{}-{}", std::process::id(), port));
        std::fs::create_dir_all(&data_dir).context("failed to create data dir")?;

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_todo-api-rust"));
        cmd.env("APP_ENV", "development")
            .env("TODO_API_HOST", "127.0.0.1")
            .env("TODO_API_PORT", port.to_string())
            .env("TODO_TODOS_FILE", data_dir.join("todos.json"))
            .env("TODO_USERS_FILE", data_dir.join("users.json"))
            .env("JWT_SECRET", JWT_SECRET)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self {
            port,
            base_url,
            data_dir,
            child,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn stored_todos(&self) -> Result<Vec<Value>> {
        let data = std::fs::read(self.data_dir.join("todos.json")).context("todos file missing")?;
        Ok(serde_json::from_slice(&data)?)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        let _ = std::fs::remove_dir_all(&self.data_dir);
    }
}

/// Spawn a server with its own port and data dir and wait until it answers.
///
/// The process is killed and its data removed when the returned value drops.
pub async fn start_server() -> Result<TestServer> {
    let server = TestServer::spawn()?;
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// A username no other test in this run will use
pub fn unique_username(prefix: &str) -> String {
    format!("{}-{}", prefix, USER_COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// Register a fresh user and return (username, token)
pub async fn signup(server: &TestServer, client: &reqwest::Client, prefix: &str) -> Result<(String, String)> {
    let username = unique_username(prefix);
    let creds = json!({ "username": username, "password": "correct-horse" });

    let res = client.post(server.url("/register")).json(&creds).send().await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());

    let res = client.post(server.url("/login")).json(&creds).send().await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
    let body = res.json::<Value>().await?;
    let token = body["data"]["token"]
        .as_str()
        .context("login response without token")?
        .to_string();

    Ok((username, token))
}
