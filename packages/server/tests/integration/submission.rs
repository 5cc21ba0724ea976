use std::sync::Arc;

use serde_json::json;

use crate::common::{T0, TestApp, routes};

/// Task "A" with one subtask "A1" accepting "42" for 100 and "7" for 50.
async fn seed_task_a(app: &TestApp, limit: i32) {
    let task = app.create_task("A", limit).await;
    app.create_subtask(&task, "A1", &[("42", 100), ("7", 50)]).await;
}

mod scoring {
    use super::*;

    #[tokio::test]
    async fn matching_answer_reports_subtask_and_score() {
        let app = TestApp::spawn().await;
        seed_task_a(&app, 3).await;
        let (_, token) = app.create_solo_team("red").await;

        let res = app.submit(&token, "A", "42", 0).await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["is_scored"], true);
        assert_eq!(res.body["score"], 100);
        assert_eq!(res.body["subtask_name"], "A1");
        assert_eq!(res.body["subtask_display_name"], "Subtask A1");
        assert_eq!(res.body["subtask_max_score"], 100);
        assert_eq!(res.body["remaining_submissions"], 2);
    }

    #[tokio::test]
    async fn lower_scoring_answer_reports_its_own_score() {
        let app = TestApp::spawn().await;
        seed_task_a(&app, 3).await;
        let (_, token) = app.create_solo_team("red").await;

        let body = app.submit_ok(&token, "A", "7", 0).await;

        assert_eq!(body["is_scored"], true);
        assert_eq!(body["score"], 50);
        assert_eq!(body["subtask_max_score"], 100);
    }

    #[tokio::test]
    async fn unmatched_answer_scores_zero_without_subtask() {
        let app = TestApp::spawn().await;
        seed_task_a(&app, 3).await;
        let (_, token) = app.create_solo_team("red").await;

        let body = app.submit_ok(&token, "A", "43", 0).await;

        assert_eq!(body["is_scored"], false);
        assert_eq!(body["score"], 0);
        assert!(body.get("subtask_name").is_none());
        assert!(body.get("subtask_max_score").is_none());
        assert_eq!(body["remaining_submissions"], 2);
        assert_eq!(app.submission_rows().await, 1);
    }

    #[tokio::test]
    async fn matching_is_case_sensitive_and_exact() {
        let app = TestApp::spawn().await;
        let task = app.create_task("B", 5).await;
        app.create_subtask(&task, "B1", &[("Paris", 10)]).await;
        let (_, token) = app.create_solo_team("red").await;

        assert_eq!(app.submit_ok(&token, "B", "paris", 0).await["is_scored"], false);
        assert_eq!(app.submit_ok(&token, "B", "Paris ", 1).await["is_scored"], false);
        assert_eq!(app.submit_ok(&token, "B", "Paris", 2).await["score"], 10);
    }
}

mod limits {
    use super::*;

    #[tokio::test]
    async fn remaining_counts_down_to_zero_then_rejects() {
        let app = TestApp::spawn().await;
        seed_task_a(&app, 3).await;
        let (_, token) = app.create_solo_team("red").await;

        for k in 1..=3 {
            let body = app.submit_ok(&token, "A", "nope", k).await;
            assert_eq!(body["remaining_submissions"], 3 - k);
        }

        let res = app.submit(&token, "A", "42", 4).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "SUBMISSION_LIMIT_EXCEEDED");
        assert_eq!(app.submission_rows().await, 3);
    }

    #[tokio::test]
    async fn limit_is_shared_by_team_members() {
        let app = TestApp::spawn().await;
        seed_task_a(&app, 3).await;
        let leader = app.create_user("lead").await;
        let first = app.create_user("first").await;
        let second = app.create_user("second").await;
        app.create_team("red", &leader, &[&first, &second]).await;

        app.submit_ok(&app.token_for(&leader), "A", "1", 0).await;
        app.submit_ok(&app.token_for(&first), "A", "2", 1).await;
        let last = app.submit_ok(&app.token_for(&second), "A", "3", 2).await;
        assert_eq!(last["remaining_submissions"], 0);

        let res = app.submit(&app.token_for(&leader), "A", "42", 3).await;
        assert_eq!(res.code(), "SUBMISSION_LIMIT_EXCEEDED");
    }

    #[tokio::test]
    async fn limits_are_per_team_and_per_task() {
        let app = TestApp::spawn().await;
        seed_task_a(&app, 1).await;
        let task_b = app.create_task("B", 1).await;
        app.create_subtask(&task_b, "B1", &[("x", 1)]).await;
        let (_, red) = app.create_solo_team("red").await;
        let (_, blue) = app.create_solo_team("blue").await;

        app.submit_ok(&red, "A", "42", 0).await;
        app.submit_ok(&red, "B", "x", 1).await;
        app.submit_ok(&blue, "A", "42", 2).await;

        assert_eq!(app.submit(&red, "A", "7", 3).await.code(), "SUBMISSION_LIMIT_EXCEEDED");
    }

    #[tokio::test]
    async fn concurrent_submissions_never_exceed_the_limit() {
        let app = Arc::new(TestApp::spawn().await);
        seed_task_a(&app, 3).await;
        let (_, token) = app.create_solo_team("red").await;

        let mut handles = Vec::new();
        for i in 0..8 {
            let app = Arc::clone(&app);
            let token = token.clone();
            handles.push(tokio::spawn(async move {
                app.submit(&token, "A", "42", i).await.status
            }));
        }

        let mut accepted = 0;
        let mut rejected = 0;
        for handle in handles {
            match handle.await.unwrap() {
                201 => accepted += 1,
                400 => rejected += 1,
                other => panic!("unexpected status {other}"),
            }
        }

        assert_eq!(accepted, 3);
        assert_eq!(rejected, 5);
        assert_eq!(app.submission_rows().await, 3);
    }
}

mod rejections {
    use super::*;

    #[tokio::test]
    async fn user_without_team_is_rejected() {
        let app = TestApp::spawn().await;
        seed_task_a(&app, 3).await;
        let loner = app.create_user("loner").await;

        let res = app.submit(&app.token_for(&loner), "A", "42", 0).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "NO_TEAM");
        assert_eq!(app.submission_rows().await, 0);
    }

    #[tokio::test]
    async fn unknown_task_is_not_found() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_solo_team("red").await;

        let res = app.submit(&token, "Z", "42", 0).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let app = TestApp::spawn().await;
        seed_task_a(&app, 3).await;

        let res = app
            .post_without_token(
                routes::SUBMIT,
                &json!({"task_name": "A", "answer": "42", "timestamp": T0}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.code(), "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn forged_token_is_unauthorized() {
        let app = TestApp::spawn().await;
        seed_task_a(&app, 3).await;

        let res = app.submit("not-a-jwt", "A", "42", 0).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.code(), "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn malformed_bodies_are_validation_errors() {
        let app = TestApp::spawn().await;
        seed_task_a(&app, 3).await;
        let (_, token) = app.create_solo_team("red").await;

        let missing_field = app
            .post_with_token(routes::SUBMIT, &json!({"task_name": "A", "answer": "42"}), &token)
            .await;
        assert_eq!(missing_field.status, 400);
        assert_eq!(missing_field.code(), "VALIDATION_ERROR");

        assert_eq!(app.submission_rows().await, 0);
    }

    #[tokio::test]
    async fn blank_task_name_is_just_another_unknown_task() {
        let app = TestApp::spawn().await;
        seed_task_a(&app, 3).await;
        let (_, token) = app.create_solo_team("red").await;

        for name in ["", "  "] {
            let res = app.submit(&token, name, "42", 0).await;
            assert_eq!(res.status, 404, "{name:?}: {}", res.text);
            assert_eq!(res.code(), "NOT_FOUND");
        }
        assert_eq!(app.submission_rows().await, 0);
    }
}

mod abandoned_requests {
    use std::time::Duration;

    use chrono::DateTime;
    use scoreboard_server::cache::TeamTaskKey;
    use scoreboard_server::services::submission::{self, SubmitCommand};

    use super::*;
    use crate::common::standing;

    #[tokio::test]
    async fn dropped_submit_still_reaches_the_cache() {
        let app = TestApp::spawn().await;
        let task = app.create_task("A", 3).await;
        app.create_subtask(&task, "A1", &[("42", 100)]).await;
        let leader = app.create_user("red-leader").await;
        let team = app.create_team("red", &leader, &[]).await;

        // Warm the cache with "nothing submitted yet".
        let before = app.get_without_token(routes::STANDINGS).await;
        assert_eq!(standing(&before.body, "red")["scoring_data"][0]["has_submitted"], false);

        // A zero timeout polls the call once and then drops it, like a client
        // that hangs up right after sending.
        let command = SubmitCommand {
            user_id: leader.id,
            task_name: "A".into(),
            answer: "42".into(),
            submitted_at: DateTime::from_timestamp(T0, 0).unwrap(),
        };
        let dropped = tokio::time::timeout(Duration::ZERO, submission::submit(&app.state, command)).await;
        assert!(dropped.is_err());

        let key = TeamTaskKey::new(team.id, task.id);
        for _ in 0..200 {
            if app.state.cache.team_task_submitted.get(&key) == Some(true) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert_eq!(app.submission_rows().await, 1);
        let after = app.get_without_token(routes::STANDINGS).await;
        let row = standing(&after.body, "red");
        assert_eq!(row["scoring_data"][0]["has_submitted"], true);
        assert_eq!(row["scoring_data"][0]["score"], 100);
        assert_eq!(row["total_score"], 100);
    }
}
