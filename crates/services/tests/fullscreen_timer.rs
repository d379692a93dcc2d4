use std::sync::Arc;
use std::time::Duration;

use quiz_core::model::{QuestionRecord, QuizSettings, SessionPhase};
use quiz_core::time::fixed_clock;
use services::{QuizController, QuizEvent, RecordingPresenter, RenderEvent};
use storage::{InMemoryStore, SnapshotStore};
use tokio::sync::mpsc;
use tokio::time;

fn records() -> Vec<QuestionRecord> {
    vec![QuestionRecord {
        question: "Only question".into(),
        options: vec!["yes".into(), "no".into()],
        answer: "yes".into(),
    }]
}

#[tokio::test(start_paused = true)]
async fn time_outside_fullscreen_does_not_count() {
    let (tx, rx) = mpsc::unbounded_channel();
    let settings = QuizSettings::default();
    let snapshots = SnapshotStore::new(Arc::new(InMemoryStore::new()), settings.storage_key());
    let presenter = RecordingPresenter::new();
    let mut quiz = QuizController::new(
        settings,
        fixed_clock(),
        snapshots,
        Box::new(presenter.clone()),
        tx.clone(),
    );
    quiz.initialize(records()).await;

    let runner = tokio::spawn(async move {
        quiz.run(rx).await;
        quiz
    });

    tx.send(QuizEvent::Fullscreen(true)).unwrap();
    time::sleep(Duration::from_millis(3_500)).await;

    tx.send(QuizEvent::Fullscreen(false)).unwrap();
    time::sleep(Duration::from_secs(10)).await;

    tx.send(QuizEvent::Fullscreen(true)).unwrap();
    time::sleep(Duration::from_millis(2_500)).await;

    tx.send(QuizEvent::Shutdown).unwrap();
    let quiz = runner.await.expect("controller task");

    assert_eq!(quiz.session().unwrap().time_left(), 595);
    assert_eq!(quiz.phase(), SessionPhase::InProgress);
    assert!(!quiz.timer_running());
    assert!(
        presenter
            .events()
            .contains(&RenderEvent::FullscreenPrompt(true))
    );
}

#[tokio::test(start_paused = true)]
async fn countdown_runs_to_expiry_through_event_loop() {
    let (tx, rx) = mpsc::unbounded_channel();
    let settings = QuizSettings::default().with_time_limit(3).unwrap();
    let snapshots = SnapshotStore::new(Arc::new(InMemoryStore::new()), settings.storage_key());
    let presenter = RecordingPresenter::new();
    let mut quiz = QuizController::new(
        settings,
        fixed_clock(),
        snapshots,
        Box::new(presenter.clone()),
        tx.clone(),
    );
    quiz.initialize(records()).await;

    let runner = tokio::spawn(async move {
        quiz.run(rx).await;
        quiz
    });

    tx.send(QuizEvent::Fullscreen(true)).unwrap();
    time::sleep(Duration::from_secs(10)).await;
    tx.send(QuizEvent::Shutdown).unwrap();
    let quiz = runner.await.expect("controller task");

    assert_eq!(quiz.phase(), SessionPhase::Finished);
    assert_eq!(quiz.session().unwrap().time_left(), 0);
    assert_eq!(presenter.finished_screens().len(), 1);
    let countdown: Vec<_> = presenter
        .events()
        .into_iter()
        .filter_map(|event| match event {
            RenderEvent::TimeLeft(text) => Some(text),
            _ => None,
        })
        .collect();
    assert_eq!(
        countdown,
        vec!["Time left: 0:03", "Time left: 0:02", "Time left: 0:01", "Time left: 0:00"]
    );
}
