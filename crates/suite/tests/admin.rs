//! Admin batch-management flows on `/admin/academic`.
//!
//! These pages carry no stable ids on their buttons and tabs, so elements
//! are addressed by normalized visible text. Every flow starts from a
//! seeded admin session: the page is behind ProtectedRoute and the flows
//! under test are the admin UI itself, not login.

use std::time::Duration;

use rly::auth::{self, AuthState};
use rly::wait::{self, BoxProbe, Poll, PollPolicy, probe};
use rly_suite::fixtures::TestEnv;

const DIALOG_TITLE: &str = "Create New Batch";

// Toast text fragments the frontend renders when a batch mutation fails.
const ERROR_HINTS: &[&str] = &["Failed to create batch", "already exists", "BadRequest", "Error"];

const OUTCOME_BUDGET: Duration = Duration::from_secs(20);

async fn open_admin_academic(env: &TestEnv) {
    let session = &env.session;

    // localStorage is origin-scoped: load the origin before seeding.
    session.goto("/").await.expect("navigate to homepage");
    auth::seed(session, &AuthState::admin())
        .await
        .expect("seed admin session");

    session
        .goto("/admin/academic")
        .await
        .expect("navigate to admin academic page");
    wait::wait_for(
        || async move { session.document_ready().await },
        env.config.policy(),
        "document ready",
    )
    .await
    .expect("admin academic page loads");
}

#[tokio::test]
async fn creates_a_new_batch_via_the_dialog() {
    TestEnv::run(async |env| {
        let session = &env.session;
        open_admin_academic(env).await;

        // The tab may already be active, in which case it is not rendered
        // as a separate clickable and the click is skipped.
        let _ = session.click_tab("Manage Batch Groups").await;

        session
            .click_button(&["Create New Batch", "Create Batch"])
            .await
            .expect("open the create batch dialog");
        session
            .wait_for_dialog(DIALOG_TITLE)
            .await
            .expect("create batch dialog appears");

        // Faculty code plus the two-digit year, as the admins name batches.
        let year = session
            .execute_json("return new Date().getFullYear();", Vec::new())
            .await
            .expect("read current year")
            .as_u64()
            .expect("year is a number");
        let batch_name = format!("{year} – SE");
        let batch_code = format!("SE{:02}", year % 100);

        session.fill("#name", &batch_name).await.expect("fill batch name");
        session.fill("#code", &batch_code).await.expect("fill batch code");

        session
            .click_dialog_button(&["Create", "Creating..."])
            .await
            .expect("submit the create batch dialog");
        session
            .wait_for_dialog_closed(DIALOG_TITLE)
            .await
            .expect("create batch dialog closes");

        // Some builds only show the new row after an explicit refresh.
        let _ = session.click_button(&["Refresh"]).await;

        // First satisfied branch wins; both only read the rendered page text.
        let code = batch_code.as_str();
        let probes: Vec<BoxProbe<'_, Option<String>>> = vec![
            probe(|| async move {
                Ok(if session.body_text().await?.contains(code) {
                    Poll::Ready(None)
                } else {
                    Poll::Pending
                })
            }),
            probe(|| async move {
                let text = session.body_text().await?;
                for hint in ERROR_HINTS {
                    if text.contains(hint) {
                        return Ok(Poll::Ready(Some(hint.to_string())));
                    }
                }
                Ok(Poll::Pending)
            }),
        ];

        let outcome = wait::wait_until_any(
            &probes,
            PollPolicy::new(OUTCOME_BUDGET, env.config.poll_interval),
            "new batch row or error toast",
        )
        .await;

        match outcome {
            Ok((_, None)) => {}
            Ok((_, Some(hint))) => {
                env.fail_with_snapshot(&format!("batch creation reported an error: {hint}"))
                    .await
            }
            Err(err) => {
                env.fail_with_snapshot(&format!(
                    "batch {batch_code} never appeared in the table: {err}"
                ))
                .await
            }
        }
    })
    .await;
}

#[tokio::test]
async fn scheduler_calendar_slot_opens_the_booking_dialog() {
    TestEnv::run(async |env| {
        let session = &env.session;
        open_admin_academic(env).await;

        session
            .click_tab("Academic Scheduler")
            .await
            .expect("open the academic scheduler tab");
        session
            .wait_for_element(".rbc-calendar")
            .await
            .expect("scheduler calendar renders");

        session
            .click(".rbc-month-view .rbc-date-cell")
            .await
            .expect("click a calendar date cell");

        let dialog = session.wait_for_text("Create New Academic Booking").await;
        if dialog.is_err() {
            env.fail_with_snapshot("clicking a calendar slot did not open the booking dialog")
                .await;
        }
    })
    .await;
}
