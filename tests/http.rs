use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct TierBody {
    level: u32,
    name: String,
    xp_threshold: u64,
}

#[derive(Debug, Deserialize)]
struct ProgressBody {
    xp: u64,
    tier: TierBody,
    percent: u8,
    xp_to_next: u64,
}

#[derive(Debug, Deserialize)]
struct XpBody {
    earned: u64,
    progress: ProgressBody,
    leveled_up_to: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct PendingBody {
    level: u32,
    tier: Option<TierBody>,
}

#[derive(Debug, Deserialize)]
struct AckBody {
    level: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChallengeBody {
    id: String,
    completed: bool,
    claimed: bool,
}

#[derive(Debug, Deserialize)]
struct ChallengesBody {
    days_remaining: u32,
    challenges: Vec<ChallengeBody>,
}

struct TestServer {
    base_url: String,
    child: Child,
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
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

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

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("xp_ladder_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/progress")).send().await {
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
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_xp_ladder"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = spawn_server().await;
    #[cfg(unix)]
    cleanup::register(server.child.id());

    let server = Arc::new(server);
    *guard = Some(Arc::clone(&server));
    server
}

async fn grant(client: &Client, base_url: &str, amount: u64) -> XpBody {
    client
        .post(format!("{base_url}/api/xp"))
        .json(&serde_json::json!({ "amount": amount }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_tiers_lists_standard_table() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let tiers: Vec<TierBody> = client
        .get(format!("{}/api/tiers", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(tiers.len(), 10);
    assert_eq!(tiers[0].name, "Awakening");
    assert_eq!(tiers[0].xp_threshold, 0);
    assert_eq!(tiers[9].name, "Legend");
    assert_eq!(tiers[9].level, 10);
}

#[tokio::test]
async fn http_activity_awards_xp() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before: ProgressBody = client
        .get(format!("{}/api/progress", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let response = client
        .post(format!("{}/api/activity", server.base_url))
        .json(&serde_json::json!({ "action": "journal_entry" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let body: XpBody = response.json().await.unwrap();

    assert_eq!(body.earned, 20);
    assert_eq!(body.progress.xp, before.xp + 20);
    assert!(body.progress.percent <= 100);

    let html = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains(&format!("{} XP", body.progress.xp)));
}

#[tokio::test]
async fn http_rejects_bad_input() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let unknown = client
        .post(format!("{}/api/activity", server.base_url))
        .json(&serde_json::json!({ "action": "levitate" }))
        .send()
        .await
        .unwrap();
    assert!(unknown.status().is_client_error());

    let negative = client
        .post(format!("{}/api/xp", server.base_url))
        .json(&serde_json::json!({ "amount": -5 }))
        .send()
        .await
        .unwrap();
    assert!(negative.status().is_client_error());

    let zero = client
        .post(format!("{}/api/xp", server.base_url))
        .json(&serde_json::json!({ "amount": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(zero.status(), StatusCode::BAD_REQUEST);

    let form = client
        .post(format!("{}/log/levitate", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(form.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_weekly_challenges() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let first: ChallengesBody = client
        .get(format!("{}/api/challenges", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first.challenges.len(), 3);
    assert!((1..=7).contains(&first.days_remaining));

    let again: ChallengesBody = client
        .get(format!("{}/api/challenges", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let ids: Vec<_> = first.challenges.iter().map(|c| c.id.as_str()).collect();
    let ids_again: Vec<_> = again.challenges.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ids_again);

    let open = first
        .challenges
        .iter()
        .find(|c| !c.completed && !c.claimed)
        .expect("a fresh week has unfinished challenges");
    let claim = client
        .post(format!("{}/api/challenges/{}/claim", server.base_url, open.id))
        .send()
        .await
        .unwrap();
    assert_eq!(claim.status(), StatusCode::CONFLICT);

    let missing = client
        .post(format!("{}/api/challenges/not_a_challenge/claim", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_level_up_fires_once_and_acknowledges() {
    let server = spawn_server().await;
    let client = Client::new();
    let base = server.base_url.as_str();

    let seeded = grant(&client, base, 250).await;
    assert_eq!(seeded.leveled_up_to, None);
    assert_eq!(seeded.progress.tier.level, 2);
    assert_eq!(seeded.progress.percent, 75);
    assert_eq!(seeded.progress.xp_to_next, 50);

    let pending: Option<PendingBody> = client
        .get(format!("{base}/api/level-up"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(pending.is_none());

    let crossed = grant(&client, base, 50).await;
    assert_eq!(crossed.leveled_up_to, Some(3));
    assert_eq!(crossed.progress.tier.name, "Apprentice");

    let pending: Option<PendingBody> = client
        .get(format!("{base}/api/level-up"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let pending = pending.expect("pending level up");
    assert_eq!(pending.level, 3);
    assert_eq!(pending.tier.map(|tier| tier.name).as_deref(), Some("Apprentice"));

    let ack: AckBody = client
        .post(format!("{base}/api/level-up/ack"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ack.level, Some(3));

    let ack_again: AckBody = client
        .post(format!("{base}/api/level-up/ack"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ack_again.level, None);
}
