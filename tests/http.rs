use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Stats {
    total: usize,
    completed: usize,
    completion_rate: f64,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    items: Vec<Value>,
    stats: Stats,
}

#[derive(Debug, Deserialize)]
struct MutationResponse {
    data: Value,
    warning: Option<String>,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl TestServer {
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::Once;
    use std::sync::atomic::{AtomicI32, Ordering};

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_dir() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("daftar_http_{}_{}", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/dashboard")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_daftar"))
        .env("PORT", port.to_string())
        .env("APP_DATA_DIR", unique_data_dir())
        .env("APP_SEED_SAMPLES", "false")
        .env("NOTIFICATION_POLL_SECS", "1")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn list(client: &Client, server: &TestServer, path: &str) -> ListResponse {
    client
        .get(server.url(path))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_family_task_create_and_toggle() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = list(&client, &server, "/api/family-tasks").await;

    let response = client
        .post(server.url("/api/family-tasks"))
        .json(&json!({
            "title": "خرید",
            "description": "",
            "assignedTo": "پدر",
            "dueDate": "1405/07/27",
            "category": "shopping"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created: MutationResponse = response.json().await.unwrap();
    assert!(created.warning.is_none());
    assert_eq!(created.data["completed"], json!(false));
    let id = created.data["id"].as_u64().unwrap();

    let after = list(&client, &server, "/api/family-tasks").await;
    assert_eq!(after.stats.total, before.stats.total + 1);
    assert!(after.items.iter().any(|item| item["id"].as_u64() == Some(id)));

    let toggled: MutationResponse = client
        .post(server.url(&format!("/api/family-tasks/{id}/toggle")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(toggled.data["completed"], json!(true));

    let stats = list(&client, &server, "/api/family-tasks").await.stats;
    assert_eq!(stats.completed, before.stats.completed + 1);
    assert!(stats.completion_rate > 0.0);
}

#[tokio::test]
async fn http_missing_record_is_not_found() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .delete(server.url("/api/library/books/999"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .post(server.url("/api/notifications/999/read"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_end_before_start_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = list(&client, &server, "/api/responsibility-tasks").await;
    let response = client
        .post(server.url("/api/responsibility-tasks"))
        .json(&json!({
            "title": "گزارش",
            "startDate": "1402/09/10",
            "startTime": "09:00",
            "endDate": "1402/09/05",
            "endTime": "18:00"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().await.unwrap().contains("endDate"));

    let after = list(&client, &server, "/api/responsibility-tasks").await;
    assert_eq!(after.stats.total, before.stats.total);
}

#[tokio::test]
async fn http_exercise_day_accepts_persian_names() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .put(server.url("/api/exercise/schedule/Saturday"))
        .json(&json!({ "exercises": ["اسکوات - 4×10", "  "] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let schedule: Value = client
        .get(server.url("/api/exercise/schedule"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(schedule["schedule"]["شنبه"], json!(["اسکوات - 4×10"]));

    let response = client
        .put(server.url("/api/exercise/schedule/someday"))
        .json(&json!({ "exercises": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_unread_count_follows_notifications() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    client
        .post(server.url("/api/notifications"))
        .json(&json!({ "title": "جلسه فوری", "status": "urgent" }))
        .send()
        .await
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let unread: Value = client
            .get(server.url("/api/notifications/unread-count"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        if unread["count"].as_u64().unwrap_or(0) >= 1 {
            break;
        }
        assert!(Instant::now() < deadline, "poller never reported the notification");
        sleep(Duration::from_millis(200)).await;
    }

    let urgent: Vec<Value> = client
        .get(server.url("/api/notifications?tab=urgent"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(urgent.iter().all(|note| note["status"] == json!("urgent")));
    assert!(!urgent.is_empty());
}

#[tokio::test]
async fn http_notification_list_replacement_rejects_repeated_ids() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let note = |id: u64, status: &str| {
        json!({
            "id": id,
            "title": "شیفت جدید",
            "message": "",
            "type": "info",
            "status": status,
            "createdAt": "1405/07/26"
        })
    };

    let response = client
        .put(server.url("/api/notifications"))
        .json(&json!([note(5, "unread"), note(5, "read")]))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = client
        .put(server.url("/api/notifications"))
        .json(&json!([note(5, "unread"), note(6, "read")]))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let replaced: MutationResponse = response.json().await.unwrap();
    assert_eq!(replaced.data, json!(2));

    let all: Vec<Value> = client
        .get(server.url("/api/notifications"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let ids: Vec<u64> = all.iter().filter_map(|note| note["id"].as_u64()).collect();
    assert_eq!(ids, vec![5, 6]);
}
