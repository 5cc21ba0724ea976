use std::net::SocketAddr;

use ::common::config::ContestConfig;
use reqwest::Client;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use serde_json::{Value, json};
use tempfile::TempDir;

use scoreboard_server::config::{AppConfig, AuthConfig, CorsConfig, DatabaseConfig, ServerConfig};
use scoreboard_server::database::init_db;
use scoreboard_server::entity::{answer, submission, subtask, task, team, user};
use scoreboard_server::state::AppState;
use scoreboard_server::utils::jwt;

pub const JWT_SECRET: &str = "test-secret-for-integration-tests";

/// Base of the unix timestamps tests submit with.
pub const T0: i64 = 1_700_000_000;

pub mod routes {
    pub const TASKS: &str = "/api/v1/tasks";
    pub const STANDINGS: &str = "/api/v1/standings";
    pub const SUBMIT: &str = "/api/v1/submit";
    pub const SUBMISSIONS: &str = "/api/v1/submissions";
    pub const CLEAR_CACHE: &str = "/api/v1/admin/cache/clear";

    pub fn task(name: &str) -> String {
        format!("/api/v1/tasks/{name}")
    }

    pub fn submissions(query: &str) -> String {
        format!("/api/v1/submissions?{query}")
    }
}

/// A running test server backed by a fresh SQLite file.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    pub state: AppState,
    _dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("scoreboard.db").display()
        );

        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig::default(),
            },
            database: DatabaseConfig {
                url: db_url,
                // One connection keeps SQLite free of writer contention.
                max_connections: 1,
            },
            auth: AuthConfig {
                jwt_secret: JWT_SECRET.to_string(),
            },
            contest: ContestConfig::default(),
        };

        let db = init_db(&config.database)
            .await
            .expect("Failed to initialize test database");
        let state = AppState::new(db.clone(), config);

        let app = scoreboard_server::build_router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            state,
            _dir: dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    /// Submit `answer` to `task_name` at `T0 + offset`.
    pub async fn submit(
        &self,
        token: &str,
        task_name: &str,
        answer: &str,
        offset: i64,
    ) -> TestResponse {
        self.post_with_token(
            routes::SUBMIT,
            &json!({
                "task_name": task_name,
                "answer": answer,
                "timestamp": T0 + offset,
            }),
            token,
        )
        .await
    }

    /// Submit and assert the submission was accepted.
    pub async fn submit_ok(&self, token: &str, task_name: &str, answer: &str, offset: i64) -> Value {
        let res = self.submit(token, task_name, answer, offset).await;
        assert_eq!(res.status, 201, "submit failed: {}", res.text);
        res.body
    }

    pub fn token_for(&self, user: &user::Model) -> String {
        jwt::sign(user.id, &user.name, "contestant", JWT_SECRET).expect("Failed to sign token")
    }

    pub fn admin_token(&self, user: &user::Model) -> String {
        jwt::sign(user.id, &user.name, "admin", JWT_SECRET).expect("Failed to sign token")
    }

    pub async fn create_user(&self, name: &str) -> user::Model {
        user::ActiveModel {
            name: Set(name.to_string()),
            display_name: Set(format!("User {name}")),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("Failed to insert user")
    }

    pub async fn create_team(
        &self,
        name: &str,
        leader: &user::Model,
        members: &[&user::Model],
    ) -> team::Model {
        team::ActiveModel {
            name: Set(name.to_string()),
            display_name: Set(format!("Team {name}")),
            leader_id: Set(leader.id),
            member1_id: Set(members.first().map(|u| u.id)),
            member2_id: Set(members.get(1).map(|u| u.id)),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("Failed to insert team")
    }

    /// A user leading a fresh team of their own, with a contestant token.
    pub async fn create_solo_team(&self, name: &str) -> (user::Model, String) {
        let user = self.create_user(&format!("{name}-leader")).await;
        self.create_team(name, &user, &[]).await;
        let token = self.token_for(&user);
        (user, token)
    }

    pub async fn create_task(&self, name: &str, submission_limit: i32) -> task::Model {
        task::ActiveModel {
            name: Set(name.to_string()),
            display_name: Set(format!("Task {name}")),
            statement: Set(format!("Statement of {name}")),
            submission_limit: Set(submission_limit),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("Failed to insert task")
    }

    /// Create a subtask with the given `(answer, score)` pairs.
    pub async fn create_subtask(
        &self,
        task: &task::Model,
        name: &str,
        answers: &[(&str, i32)],
    ) -> subtask::Model {
        let subtask = subtask::ActiveModel {
            name: Set(name.to_string()),
            display_name: Set(format!("Subtask {name}")),
            statement: Set(format!("Statement of {name}")),
            task_id: Set(task.id),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("Failed to insert subtask");

        for (text, score) in answers {
            answer::ActiveModel {
                task_id: Set(task.id),
                subtask_id: Set(subtask.id),
                answer: Set(text.to_string()),
                score: Set(*score),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .expect("Failed to insert answer");
        }

        subtask
    }

    pub async fn submission_rows(&self) -> u64 {
        submission::Entity::find()
            .count(&self.db)
            .await
            .expect("Failed to count submissions")
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    pub fn code(&self) -> &str {
        self.body["code"].as_str().unwrap_or_default()
    }
}

/// The standings row of `team_name`.
pub fn standing<'a>(standings: &'a Value, team_name: &str) -> &'a Value {
    standings["standings_data"]
        .as_array()
        .expect("standings_data should be an array")
        .iter()
        .find(|row| row["team_name"] == team_name)
        .unwrap_or_else(|| panic!("team {team_name} missing from standings"))
}
