//! Homepage navigation checks.

use rly_suite::fixtures::TestEnv;

#[tokio::test]
async fn homepage_loads_with_a_title() {
    TestEnv::run(async |env| {
        let session = &env.session;

        session.goto("/").await.expect("navigate to homepage");
        session
            .wait_for_element("body")
            .await
            .expect("homepage body renders");

        let title = session.title().await.expect("read page title");
        assert!(!title.is_empty(), "homepage should have a title");
    })
    .await;
}

#[tokio::test]
async fn protected_page_redirects_anonymous_visitors_to_login() {
    TestEnv::run(async |env| {
        let session = &env.session;

        // Load the origin first so the auth record can be cleared, then hit a
        // protected route with no session.
        session.goto("/").await.expect("navigate to homepage");
        rly::auth::clear(session).await.expect("clear auth record");

        session.goto("/admin").await.expect("navigate to admin page");

        let redirected = rly::wait_for(
            || async move { Ok(session.current_path().await? == "/login") },
            env.config.policy(),
            "redirect to /login",
        )
        .await;

        if redirected.is_err() {
            env.fail_with_snapshot("anonymous visit to /admin did not land on /login")
                .await;
        }
    })
    .await;
}
