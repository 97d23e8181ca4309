//! Signup flow: fill the form, then race the success toast against the
//! known error messages.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rly::wait::{self, BoxProbe, Poll, PollPolicy, probe};
use rly_suite::fixtures::TestEnv;

const SUCCESS_TEXT: &str = "Registration successful! You can now log in.";

// Toast text fragments the frontend renders on failed registration.
// "[object Object]" shows up when an unserialized error object reaches the
// toast.
const ERROR_HINTS: &[&str] = &[
    "Registration failed",
    "Network error",
    "already exists",
    "Invalid",
    "Error",
    "[object Object]",
];

const OUTCOME_BUDGET: Duration = Duration::from_secs(20);

fn unique_email() -> String {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before unix epoch")
        .as_millis();
    format!("e2e.{ts}@example.com")
}

#[tokio::test]
async fn signs_up_a_new_user_successfully() {
    TestEnv::run(async |env| {
        let session = &env.session;

        session.goto("/signup").await.expect("navigate to signup page");
        wait::wait_for(
            || async move { session.document_ready().await },
            env.config.policy(),
            "document ready",
        )
        .await
        .expect("signup document loads");
        session
            .wait_for_text("Sign up")
            .await
            .expect("signup page renders");

        // Unique email so reruns never collide with an existing account.
        let email = unique_email();
        session.fill("#name", "E2E User").await.expect("fill name");
        session.fill("#email", &email).await.expect("fill email");
        session
            .fill("#password", "Qw3r!Ty9")
            .await
            .expect("fill password");
        session.submit_form().await.expect("submit signup form");

        // First satisfied branch wins; both only read the rendered page text.
        let probes: Vec<BoxProbe<'_, Option<String>>> = vec![
            probe(|| async move {
                Ok(if session.body_text().await?.contains(SUCCESS_TEXT) {
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
            "signup success or error toast",
        )
        .await;

        match outcome {
            Ok((_, None)) => {}
            Ok((_, Some(hint))) => {
                env.fail_with_snapshot(&format!("signup reported an error: {hint}"))
                    .await
            }
            Err(err) => {
                env.fail_with_snapshot(&format!("signup produced no visible outcome: {err}"))
                    .await
            }
        }
    })
    .await;
}
