use quiz_core::model::QuizId;

use super::test_harness::{setup_shell_harness, test_services};

#[tokio::test(flavor = "current_thread")]
async fn login_view_smoke_renders_disabled_start() {
    let services = test_services();
    let mut harness = setup_shell_harness(&services, services.flow());
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("QuizDev"), "missing title in {html}");
    assert!(html.contains("Enter your user id"), "missing input in {html}");
    assert!(html.contains("disabled"), "start should be disabled in {html}");
    assert!(!html.contains("Log out"), "no user yet in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn list_view_smoke_renders_assigned_cards() {
    let services = test_services();
    let mut flow = services.flow();
    flow.login("demo").await.expect("login");

    let mut harness = setup_shell_harness(&services, flow);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Your quizzes"), "missing heading in {html}");
    assert!(html.contains("Cargo Workspaces"), "missing assigned quiz in {html}");
    assert!(!html.contains("Error Handling"), "unassigned quiz shown in {html}");
    assert!(html.contains("Article included"), "missing article tag in {html}");
    assert!(html.contains("Assigned to you"), "missing assignment in {html}");
    assert!(html.contains("Log out"), "missing logout in {html}");
    assert!(html.contains("aria-busy"), "missing busy marker in {html}");
    assert!(!html.contains("shell-busy"), "idle shell marked busy in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn article_view_smoke_renders_start_button() {
    let services = test_services();
    let mut flow = services.flow();
    flow.login("carol").await.expect("login");
    flow.select_quiz(QuizId::new(1)).expect("select");

    let mut harness = setup_shell_harness(&services, flow);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Ownership and Borrowing"), "missing title in {html}");
    assert!(html.contains("Open article"), "missing open button in {html}");
    assert!(html.contains("Start quiz"), "missing start button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_explanation_after_submit() {
    let services = test_services();
    let mut flow = services.flow();
    flow.login("carol").await.expect("login");
    flow.select_quiz(QuizId::new(3)).expect("select");
    flow.select_option(1).expect("select option");
    flow.submit_answer().expect("submit");

    let mut harness = setup_shell_harness(&services, flow);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("1 / 2"), "missing position in {html}");
    assert!(html.contains("Correct!"), "missing verdict in {html}");
    assert!(html.contains("Score: 1 / 1"), "missing running score in {html}");
    assert!(html.contains("Next question"), "missing next button in {html}");
    assert!(html.contains("option-correct"), "missing option state in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn result_view_smoke_renders_breakdown() {
    let services = test_services();
    let mut flow = services.flow();
    flow.login("carol").await.expect("login");
    flow.select_quiz(QuizId::new(3)).expect("select");
    flow.select_option(1).expect("first option");
    flow.submit_answer().expect("first submit");
    flow.next_question().await.expect("next");
    flow.select_option(1).expect("second option");
    flow.submit_answer().expect("second submit");
    flow.next_question().await.expect("finish");

    let mut harness = setup_shell_harness(&services, flow);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("1 / 2"), "missing score in {html}");
    assert!(html.contains("50%"), "missing accuracy in {html}");
    assert!(html.contains("0:00"), "missing time in {html}");
    assert!(html.contains("Review mistakes"), "missing review toggle in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
    assert!(!html.contains("Reread article"), "quiz has no article in {html}");
    assert!(
        html.contains("Correct answer: True"),
        "missing correction in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn unknown_quiz_renders_not_found() {
    let services = test_services();
    let mut flow = services.flow();
    flow.login("carol").await.expect("login");
    flow.select_quiz(QuizId::new(99)).expect("select");

    let mut harness = setup_shell_harness(&services, flow);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Quiz not found"), "missing not-found in {html}");
    assert!(html.contains("Back to list"), "missing back button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn resume_without_stored_user_stays_on_login() {
    let services = test_services();
    let mut flow = services.flow();
    flow.resume().await.expect("resume");

    let mut harness = setup_shell_harness(&services, flow);
    harness.rebuild();
    assert!(harness.render().contains("Enter your user id"));
}
