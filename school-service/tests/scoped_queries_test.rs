//! Institution scoping against real tables. These tests need a running
//! PostgreSQL (point TEST_DATABASE_URL at it) and are ignored by
//! default, so the rest of the suite stays self-contained.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_request, InMemoryDirectory, TestApp};
use school_service::models::{
    Account, Course, GradingPeriod, GradingSubPeriod, Institution, Role, Student, Subject,
};
use school_service::services::{Database, InstitutionFilter};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

fn unique_email(tag: &str) -> String {
    format!("{}+{}@school.test", tag, Uuid::new_v4())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (TEST_DATABASE_URL)"]
async fn list_students_returns_only_rows_in_the_filtered_institution() {
    let pool = common::create_test_pool().await.unwrap();
    let db = Database::new(pool);

    let north = db
        .create_institution(&Institution::new("North Campus".to_string()))
        .await
        .unwrap();
    let south = db
        .create_institution(&Institution::new("South Campus".to_string()))
        .await
        .unwrap();
    let in_scope = db
        .create_student(&Student::new(north.institution_id, "Ada".to_string(), None))
        .await
        .unwrap();
    let out_of_scope = db
        .create_student(&Student::new(south.institution_id, "Ben".to_string(), None))
        .await
        .unwrap();

    let students = db
        .list_students(&InstitutionFilter::Only(north.institution_id))
        .await
        .unwrap();

    assert!(students
        .iter()
        .any(|s| s.student_id == in_scope.student_id));
    assert!(students
        .iter()
        .all(|s| s.institution_id == north.institution_id));
    assert!(!students
        .iter()
        .any(|s| s.student_id == out_of_scope.student_id));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (TEST_DATABASE_URL)"]
async fn grade_write_rejects_subject_from_another_institution() {
    let pool = common::create_test_pool().await.unwrap();
    let db = Database::new(pool.clone());

    let north = db
        .create_institution(&Institution::new("North Campus".to_string()))
        .await
        .unwrap();
    let south = db
        .create_institution(&Institution::new("South Campus".to_string()))
        .await
        .unwrap();
    let student = db
        .create_student(&Student::new(north.institution_id, "Ada".to_string(), None))
        .await
        .unwrap();

    // Subject belongs to the other institution, through its course.
    let foreign_course = db
        .create_course(&Course::new(south.institution_id, "Biology".to_string()))
        .await
        .unwrap();
    let foreign_subject = db
        .create_subject(&Subject::new(foreign_course.course_id, "Botany".to_string()))
        .await
        .unwrap();

    let period = db
        .create_grading_period(&GradingPeriod::new(
            north.institution_id,
            "Term 1".to_string(),
            100.0,
            0,
        ))
        .await
        .unwrap();
    let sub_period = db
        .create_grading_sub_period(&GradingSubPeriod::new(
            period.period_id,
            "Month 1".to_string(),
            100.0,
            0,
        ))
        .await
        .unwrap();

    let teacher = Account::new(
        "North Teacher".to_string(),
        unique_email("teacher"),
        "irrelevant-hash".to_string(),
        Role::Teacher,
        Some(north.institution_id),
    );
    let app = TestApp::spawn_with_pool(
        InMemoryDirectory::new()
            .with_account(teacher.clone())
            .with_grant(Role::Teacher, "grades", "create"),
        pool,
    );
    let token = app.token_for(&teacher);

    let response = app
        .router
        .oneshot(post_request(
            &format!("/students/{}/grades", student.student_id),
            Some(&token),
            json!({
                "subject_id": foreign_subject.subject_id,
                "sub_period_id": sub_period.sub_period_id,
                "score": 7.5,
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Subject not found");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (TEST_DATABASE_URL)"]
async fn grade_write_rejects_sub_period_from_another_institution() {
    let pool = common::create_test_pool().await.unwrap();
    let db = Database::new(pool.clone());

    let north = db
        .create_institution(&Institution::new("North Campus".to_string()))
        .await
        .unwrap();
    let south = db
        .create_institution(&Institution::new("South Campus".to_string()))
        .await
        .unwrap();
    let student = db
        .create_student(&Student::new(north.institution_id, "Ada".to_string(), None))
        .await
        .unwrap();
    let course = db
        .create_course(&Course::new(north.institution_id, "Biology".to_string()))
        .await
        .unwrap();
    let subject = db
        .create_subject(&Subject::new(course.course_id, "Botany".to_string()))
        .await
        .unwrap();

    // Grading window hangs off the other institution's period.
    let foreign_period = db
        .create_grading_period(&GradingPeriod::new(
            south.institution_id,
            "Term 1".to_string(),
            100.0,
            0,
        ))
        .await
        .unwrap();
    let foreign_sub_period = db
        .create_grading_sub_period(&GradingSubPeriod::new(
            foreign_period.period_id,
            "Month 1".to_string(),
            100.0,
            0,
        ))
        .await
        .unwrap();

    let teacher = Account::new(
        "North Teacher".to_string(),
        unique_email("teacher"),
        "irrelevant-hash".to_string(),
        Role::Teacher,
        Some(north.institution_id),
    );
    let app = TestApp::spawn_with_pool(
        InMemoryDirectory::new()
            .with_account(teacher.clone())
            .with_grant(Role::Teacher, "grades", "create"),
        pool,
    );
    let token = app.token_for(&teacher);

    let response = app
        .router
        .oneshot(post_request(
            &format!("/students/{}/grades", student.student_id),
            Some(&token),
            json!({
                "subject_id": subject.subject_id,
                "sub_period_id": foreign_sub_period.sub_period_id,
                "score": 7.5,
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Grading sub-period not found");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (TEST_DATABASE_URL)"]
async fn grade_write_accepts_subject_and_window_in_the_students_institution() {
    let pool = common::create_test_pool().await.unwrap();
    let db = Database::new(pool.clone());

    let north = db
        .create_institution(&Institution::new("North Campus".to_string()))
        .await
        .unwrap();
    let student = db
        .create_student(&Student::new(north.institution_id, "Ada".to_string(), None))
        .await
        .unwrap();
    let course = db
        .create_course(&Course::new(north.institution_id, "Biology".to_string()))
        .await
        .unwrap();
    let subject = db
        .create_subject(&Subject::new(course.course_id, "Botany".to_string()))
        .await
        .unwrap();
    let period = db
        .create_grading_period(&GradingPeriod::new(
            north.institution_id,
            "Term 1".to_string(),
            100.0,
            0,
        ))
        .await
        .unwrap();
    let sub_period = db
        .create_grading_sub_period(&GradingSubPeriod::new(
            period.period_id,
            "Month 1".to_string(),
            100.0,
            0,
        ))
        .await
        .unwrap();

    // recorded_by references accounts, so the grader lives in both the
    // directory and the accounts table.
    let teacher = Account::new(
        "North Teacher".to_string(),
        unique_email("teacher"),
        "irrelevant-hash".to_string(),
        Role::Teacher,
        Some(north.institution_id),
    );
    db.create_account(&teacher).await.unwrap();

    let app = TestApp::spawn_with_pool(
        InMemoryDirectory::new()
            .with_account(teacher.clone())
            .with_grant(Role::Teacher, "grades", "create"),
        pool,
    );
    let token = app.token_for(&teacher);

    let response = app
        .router
        .oneshot(post_request(
            &format!("/students/{}/grades", student.student_id),
            Some(&token),
            json!({
                "subject_id": subject.subject_id,
                "sub_period_id": sub_period.sub_period_id,
                "score": 7.5,
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["student_id"], student.student_id.to_string());
    assert_eq!(body["score"], 7.5);
}
