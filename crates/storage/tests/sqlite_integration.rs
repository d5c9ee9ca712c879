use chrono::Duration;
use readiness_core::ContentCatalog;
use readiness_core::model::{
    AssessmentId, AssessmentState, BusinessName, Industry, ReadinessLevel, Score, UserId,
};
use readiness_core::time::fixed_now;
use readiness_storage::repository::{
    AssessmentArea, AssessmentRepository, HistoryRepository, StorageError,
};
use readiness_storage::sqlite::SqliteRepository;

async fn connect(name: &str) -> SqliteRepository {
    let repo = SqliteRepository::connect(&format!("sqlite:file:{name}?mode=memory&cache=shared"))
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

fn build_state(catalog: &ContentCatalog, user: &str, name: &str) -> AssessmentState {
    AssessmentState::new(
        AssessmentId::generate(),
        UserId::new(user),
        BusinessName::new(name).unwrap(),
        Industry::Agriculture,
        catalog.section_count(),
        fixed_now(),
    )
}

fn answer_section(state: &mut AssessmentState, catalog: &ContentCatalog, index: usize, v: i64) {
    let section = catalog.section_at(index).unwrap();
    let scores = section
        .question_ids()
        .map(|q| (q.clone(), Score::new(v).unwrap()));
    state.record_scores(section, scores).unwrap();
}

#[tokio::test]
async fn sqlite_roundtrip_preserves_every_field() {
    let repo = connect("memdb_assessment_roundtrip").await;
    let catalog = ContentCatalog::reference().unwrap();

    let mut state = build_state(&catalog, "u1", "Shamba Fresh");
    answer_section(&mut state, &catalog, 0, 3);
    let section = catalog.section_at(1).unwrap();
    state
        .record_score(section, "2.3".into(), Score::new(5).unwrap())
        .unwrap();

    let area = repo.save(&state, fixed_now()).await.unwrap();
    assert_eq!(area, AssessmentArea::Active);

    let loaded = repo.load(state.id()).await.unwrap();
    assert_eq!(loaded, state);
    assert_eq!(loaded.section_scores().len(), 2);
    assert_eq!(loaded.total_score(), 20);
}

#[tokio::test]
async fn sqlite_moves_completed_assessment_and_updates_history() {
    let repo = connect("memdb_assessment_areas").await;
    let catalog = ContentCatalog::reference().unwrap();

    let mut state = build_state(&catalog, "u1", "Acme");
    repo.save(&state, fixed_now()).await.unwrap();
    assert_eq!(repo.locate(state.id()).await.unwrap(), AssessmentArea::Active);

    for index in 0..catalog.section_count() {
        answer_section(&mut state, &catalog, index, 5);
    }
    let saved_at = fixed_now() + Duration::minutes(5);
    let area = repo.save(&state, saved_at).await.unwrap();
    assert_eq!(area, AssessmentArea::Completed);
    assert_eq!(
        repo.locate(state.id()).await.unwrap(),
        AssessmentArea::Completed
    );

    let active_rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM active_assessments")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(active_rows, 0);

    let entry = repo.history_entry(state.id()).await.unwrap();
    assert_eq!(entry.area, AssessmentArea::Completed);
    assert_eq!(entry.total_score, 100);
    assert_eq!(entry.readiness_level, Some(ReadinessLevel::AiAdvanced));
    assert_eq!(entry.last_saved_at, saved_at);
    assert!((entry.completion_percentage - 100.0).abs() < f64::EPSILON);

    assert_eq!(repo.load(state.id()).await.unwrap(), state);
}

#[tokio::test]
async fn sqlite_history_orders_by_last_save_and_limits() {
    let repo = connect("memdb_assessment_history").await;
    let catalog = ContentCatalog::reference().unwrap();
    let user = UserId::new("owner");

    let first = build_state(&catalog, "owner", "First");
    let second = build_state(&catalog, "owner", "Second");
    let other = build_state(&catalog, "someone-else", "Other");

    repo.save(&first, fixed_now()).await.unwrap();
    repo.save(&second, fixed_now() + Duration::minutes(1))
        .await
        .unwrap();
    repo.save(&other, fixed_now() + Duration::minutes(2))
        .await
        .unwrap();
    // Touching `first` again moves it to the top.
    repo.save(&first, fixed_now() + Duration::minutes(3))
        .await
        .unwrap();

    let listed = repo.list_history(&user, 10).await.unwrap();
    let names: Vec<_> = listed.iter().map(|e| e.business_name.as_str()).collect();
    assert_eq!(names, vec!["First", "Second"]);
    assert!(listed.iter().all(|e| e.readiness_level.is_none()));

    let limited = repo.list_history(&user, 1).await.unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].assessment_id, first.id());
}

#[tokio::test]
async fn sqlite_unknown_assessment_is_not_found() {
    let repo = connect("memdb_assessment_missing").await;
    let id = AssessmentId::generate();
    assert!(matches!(repo.load(id).await, Err(StorageError::NotFound)));
    assert!(matches!(repo.locate(id).await, Err(StorageError::NotFound)));
    assert!(matches!(
        repo.history_entry(id).await,
        Err(StorageError::NotFound)
    ));
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = connect("memdb_assessment_migrate").await;
    repo.migrate().await.expect("second migrate");

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_migrations")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(applied, 1);
}
