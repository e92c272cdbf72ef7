//! Database service: every read and mutation the handlers perform.
//!
//! Scoped queries take an [`InstitutionFilter`] and apply it before
//! touching rows; handlers never build SQL themselves.

use service_core::error::AppError;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::models::{
    Account, AccountInstitutionLink, Course, Grade, GradingPeriod, GradingSubPeriod, Institution,
    RoleGrant, Student, Subject,
};
use crate::services::filter::InstitutionFilter;
use crate::services::report::{GradeRow, PeriodWeight, SubPeriodWeight, WeightPlan};

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health.
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    // =========================================================================
    // Institutions
    // =========================================================================

    #[instrument(skip(self, institution), fields(institution_id = %institution.institution_id))]
    pub async fn create_institution(
        &self,
        institution: &Institution,
    ) -> Result<Institution, AppError> {
        let created = sqlx::query_as::<_, Institution>(
            r#"
            INSERT INTO institutions (institution_id, display_name, is_system_active, logo_path, created_utc)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING institution_id, display_name, is_system_active, logo_path, created_utc
            "#,
        )
        .bind(institution.institution_id)
        .bind(&institution.display_name)
        .bind(institution.is_system_active)
        .bind(&institution.logo_path)
        .bind(institution.created_utc)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create institution: {}", e)))?;

        info!(institution_id = %created.institution_id, "Institution created");
        Ok(created)
    }

    pub async fn list_institutions(
        &self,
        filter: &InstitutionFilter,
    ) -> Result<Vec<Institution>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT institution_id, display_name, is_system_active, logo_path, created_utc \
             FROM institutions WHERE ",
        );
        filter.push_predicate(&mut qb, "institution_id");
        qb.push(" ORDER BY display_name");

        let institutions = qb
            .build_query_as::<Institution>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to list institutions: {}", e))
            })?;

        Ok(institutions)
    }

    pub async fn find_institution(&self, id: Uuid) -> Result<Option<Institution>, AppError> {
        let institution = sqlx::query_as::<_, Institution>(
            r#"
            SELECT institution_id, display_name, is_system_active, logo_path, created_utc
            FROM institutions
            WHERE institution_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to load institution: {}", e)))?;

        Ok(institution)
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    #[instrument(skip(self, account), fields(account_id = %account.account_id))]
    pub async fn create_account(&self, account: &Account) -> Result<Account, AppError> {
        let created = insert_account(&mut *self.pool.acquire().await?, account).await?;
        info!(account_id = %created.account_id, role = %created.role_code, "Account created");
        Ok(created)
    }

    /// Create an account together with its student satellite row, in a
    /// single transaction. Either both rows exist afterwards or neither
    /// does.
    #[instrument(skip(self, account, student), fields(account_id = %account.account_id))]
    pub async fn create_student_account(
        &self,
        account: &Account,
        student: &Student,
    ) -> Result<(Account, Student), AppError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let created_account = insert_account(&mut tx, account).await?;
        let created_student = insert_student(&mut tx, student).await?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        info!(
            account_id = %created_account.account_id,
            student_id = %created_student.student_id,
            "Student account created"
        );
        Ok((created_account, created_student))
    }

    pub async fn list_accounts(
        &self,
        filter: &InstitutionFilter,
    ) -> Result<Vec<Account>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT account_id, display_name, email, password_hash, role_code, status_code, \
             primary_institution_id, created_utc, updated_utc FROM accounts WHERE ",
        );
        filter.push_predicate(&mut qb, "primary_institution_id");
        qb.push(" ORDER BY display_name");

        let accounts = qb
            .build_query_as::<Account>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to list accounts: {}", e))
            })?;

        Ok(accounts)
    }

    #[instrument(skip(self))]
    pub async fn grant_institution_link(
        &self,
        account_id: Uuid,
        institution_id: Uuid,
    ) -> Result<AccountInstitutionLink, AppError> {
        let link = sqlx::query_as::<_, AccountInstitutionLink>(
            r#"
            INSERT INTO account_institution_links (account_id, institution_id)
            VALUES ($1, $2)
            ON CONFLICT (account_id, institution_id)
                DO UPDATE SET account_id = EXCLUDED.account_id
            RETURNING account_id, institution_id, created_utc
            "#,
        )
        .bind(account_id)
        .bind(institution_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to grant link: {}", e)))?;

        info!(%account_id, %institution_id, "Institution access granted");
        Ok(link)
    }

    #[instrument(skip(self))]
    pub async fn revoke_institution_link(
        &self,
        account_id: Uuid,
        institution_id: Uuid,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM account_institution_links
            WHERE account_id = $1 AND institution_id = $2
            "#,
        )
        .bind(account_id)
        .bind(institution_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to revoke link: {}", e)))?;

        info!(%account_id, %institution_id, "Institution access revoked");
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Students
    // =========================================================================

    #[instrument(skip(self, student), fields(student_id = %student.student_id))]
    pub async fn create_student(&self, student: &Student) -> Result<Student, AppError> {
        let created = insert_student(&mut *self.pool.acquire().await?, student).await?;
        info!(student_id = %created.student_id, "Student created");
        Ok(created)
    }

    pub async fn list_students(
        &self,
        filter: &InstitutionFilter,
    ) -> Result<Vec<Student>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT student_id, account_id, institution_id, full_name, created_utc \
             FROM students WHERE ",
        );
        filter.push_predicate(&mut qb, "institution_id");
        qb.push(" ORDER BY full_name");

        let students = qb
            .build_query_as::<Student>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to list students: {}", e))
            })?;

        Ok(students)
    }

    /// Load one student, still subject to the caller's filter: a
    /// student outside the resolved scope is indistinguishable from a
    /// missing one.
    pub async fn find_student(
        &self,
        student_id: Uuid,
        filter: &InstitutionFilter,
    ) -> Result<Option<Student>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT student_id, account_id, institution_id, full_name, created_utc \
             FROM students WHERE ",
        );
        filter.push_predicate(&mut qb, "institution_id");
        qb.push(" AND student_id = ").push_bind(student_id);

        let student = qb
            .build_query_as::<Student>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to load student: {}", e))
            })?;

        Ok(student)
    }

    // =========================================================================
    // Courses and subjects
    // =========================================================================

    #[instrument(skip(self, course), fields(course_id = %course.course_id))]
    pub async fn create_course(&self, course: &Course) -> Result<Course, AppError> {
        let created = sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (course_id, institution_id, name, created_utc)
            VALUES ($1, $2, $3, $4)
            RETURNING course_id, institution_id, name, created_utc
            "#,
        )
        .bind(course.course_id)
        .bind(course.institution_id)
        .bind(&course.name)
        .bind(course.created_utc)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create course: {}", e)))?;

        info!(course_id = %created.course_id, "Course created");
        Ok(created)
    }

    pub async fn list_courses(&self, filter: &InstitutionFilter) -> Result<Vec<Course>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT course_id, institution_id, name, created_utc FROM courses WHERE ",
        );
        filter.push_predicate(&mut qb, "institution_id");
        qb.push(" ORDER BY name");

        let courses = qb
            .build_query_as::<Course>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to list courses: {}", e))
            })?;

        Ok(courses)
    }

    pub async fn find_course(
        &self,
        course_id: Uuid,
        filter: &InstitutionFilter,
    ) -> Result<Option<Course>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT course_id, institution_id, name, created_utc FROM courses WHERE ",
        );
        filter.push_predicate(&mut qb, "institution_id");
        qb.push(" AND course_id = ").push_bind(course_id);

        let course = qb
            .build_query_as::<Course>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to load course: {}", e)))?;

        Ok(course)
    }

    #[instrument(skip(self, subject), fields(subject_id = %subject.subject_id))]
    pub async fn create_subject(&self, subject: &Subject) -> Result<Subject, AppError> {
        let created = sqlx::query_as::<_, Subject>(
            r#"
            INSERT INTO subjects (subject_id, course_id, name, created_utc)
            VALUES ($1, $2, $3, $4)
            RETURNING subject_id, course_id, name, created_utc
            "#,
        )
        .bind(subject.subject_id)
        .bind(subject.course_id)
        .bind(&subject.name)
        .bind(subject.created_utc)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create subject: {}", e)))?;

        info!(subject_id = %created.subject_id, "Subject created");
        Ok(created)
    }

    /// Subjects have no institution column; they scope through their
    /// course.
    pub async fn list_subjects(
        &self,
        filter: &InstitutionFilter,
    ) -> Result<Vec<Subject>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT s.subject_id, s.course_id, s.name, s.created_utc \
             FROM subjects s JOIN courses c ON c.course_id = s.course_id WHERE ",
        );
        filter.push_predicate(&mut qb, "c.institution_id");
        qb.push(" ORDER BY s.name");

        let subjects = qb
            .build_query_as::<Subject>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to list subjects: {}", e))
            })?;

        Ok(subjects)
    }

    pub async fn find_subject(
        &self,
        subject_id: Uuid,
        filter: &InstitutionFilter,
    ) -> Result<Option<Subject>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT s.subject_id, s.course_id, s.name, s.created_utc \
             FROM subjects s JOIN courses c ON c.course_id = s.course_id WHERE ",
        );
        filter.push_predicate(&mut qb, "c.institution_id");
        qb.push(" AND s.subject_id = ").push_bind(subject_id);

        let subject = qb
            .build_query_as::<Subject>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to load subject: {}", e))
            })?;

        Ok(subject)
    }

    // =========================================================================
    // Grades and reports
    // =========================================================================

    #[instrument(skip(self, grade), fields(grade_id = %grade.grade_id))]
    pub async fn record_grade(&self, grade: &Grade) -> Result<Grade, AppError> {
        let created = sqlx::query_as::<_, Grade>(
            r#"
            INSERT INTO grades (grade_id, student_id, subject_id, sub_period_id, score, recorded_by, created_utc)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING grade_id, student_id, subject_id, sub_period_id, score, recorded_by, created_utc
            "#,
        )
        .bind(grade.grade_id)
        .bind(grade.student_id)
        .bind(grade.subject_id)
        .bind(grade.sub_period_id)
        .bind(grade.score)
        .bind(grade.recorded_by)
        .bind(grade.created_utc)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to record grade: {}", e)))?;

        info!(grade_id = %created.grade_id, student_id = %created.student_id, "Grade recorded");
        Ok(created)
    }

    pub async fn list_grades(&self, student_id: Uuid) -> Result<Vec<Grade>, AppError> {
        let grades = sqlx::query_as::<_, Grade>(
            r#"
            SELECT grade_id, student_id, subject_id, sub_period_id, score, recorded_by, created_utc
            FROM grades
            WHERE student_id = $1
            ORDER BY created_utc
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list grades: {}", e)))?;

        Ok(grades)
    }

    /// Flat grade rows for one student, joined up to subject names and
    /// grading windows, ready for report aggregation.
    pub async fn grade_rows_for_report(&self, student_id: Uuid) -> Result<Vec<GradeRow>, AppError> {
        let rows: Vec<(Uuid, String, Uuid, Uuid, f64)> = sqlx::query_as(
            r#"
            SELECT s.subject_id, s.name, p.period_id, sp.sub_period_id, g.score
            FROM grades g
            JOIN subjects s ON s.subject_id = g.subject_id
            JOIN grading_sub_periods sp ON sp.sub_period_id = g.sub_period_id
            JOIN grading_periods p ON p.period_id = sp.period_id
            WHERE g.student_id = $1
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to load grade rows: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(
                |(subject_id, subject_name, period_id, sub_period_id, score)| GradeRow {
                    subject_id,
                    subject_name,
                    period_id,
                    sub_period_id,
                    score,
                },
            )
            .collect())
    }

    /// The grading windows and weights configured for an institution.
    pub async fn weight_plan(&self, institution_id: Uuid) -> Result<WeightPlan, AppError> {
        let periods: Vec<(Uuid, String, f64)> = sqlx::query_as(
            r#"
            SELECT period_id, name, weight_percent
            FROM grading_periods
            WHERE institution_id = $1
            ORDER BY sort_order
            "#,
        )
        .bind(institution_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to load grading periods: {}", e))
        })?;

        let sub_periods: Vec<(Uuid, Uuid, String, f64)> = sqlx::query_as(
            r#"
            SELECT sp.sub_period_id, sp.period_id, sp.name, sp.weight_percent
            FROM grading_sub_periods sp
            JOIN grading_periods p ON p.period_id = sp.period_id
            WHERE p.institution_id = $1
            ORDER BY sp.sort_order
            "#,
        )
        .bind(institution_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to load grading sub-periods: {}", e))
        })?;

        let plan = WeightPlan {
            periods: periods
                .into_iter()
                .map(|(period_id, name, weight_percent)| PeriodWeight {
                    period_id,
                    name,
                    weight_percent,
                    sub_periods: sub_periods
                        .iter()
                        .filter(|(_, pid, _, _)| *pid == period_id)
                        .map(|(sub_period_id, _, name, weight_percent)| SubPeriodWeight {
                            sub_period_id: *sub_period_id,
                            name: name.clone(),
                            weight_percent: *weight_percent,
                        })
                        .collect(),
                })
                .collect(),
        };

        Ok(plan)
    }

    #[instrument(skip(self, period), fields(period_id = %period.period_id))]
    pub async fn create_grading_period(
        &self,
        period: &GradingPeriod,
    ) -> Result<GradingPeriod, AppError> {
        let created = sqlx::query_as::<_, GradingPeriod>(
            r#"
            INSERT INTO grading_periods (period_id, institution_id, name, weight_percent, sort_order)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING period_id, institution_id, name, weight_percent, sort_order
            "#,
        )
        .bind(period.period_id)
        .bind(period.institution_id)
        .bind(&period.name)
        .bind(period.weight_percent)
        .bind(period.sort_order)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to create grading period: {}", e))
        })?;

        info!(period_id = %created.period_id, "Grading period created");
        Ok(created)
    }

    pub async fn find_grading_period(
        &self,
        period_id: Uuid,
    ) -> Result<Option<GradingPeriod>, AppError> {
        let period = sqlx::query_as::<_, GradingPeriod>(
            r#"
            SELECT period_id, institution_id, name, weight_percent, sort_order
            FROM grading_periods
            WHERE period_id = $1
            "#,
        )
        .bind(period_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to load grading period: {}", e))
        })?;

        Ok(period)
    }

    /// Sub-periods scope through their parent period's institution,
    /// the same way subjects scope through their course.
    pub async fn find_grading_sub_period(
        &self,
        sub_period_id: Uuid,
        filter: &InstitutionFilter,
    ) -> Result<Option<GradingSubPeriod>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT sp.sub_period_id, sp.period_id, sp.name, sp.weight_percent, sp.sort_order \
             FROM grading_sub_periods sp JOIN grading_periods p ON p.period_id = sp.period_id \
             WHERE ",
        );
        filter.push_predicate(&mut qb, "p.institution_id");
        qb.push(" AND sp.sub_period_id = ").push_bind(sub_period_id);

        let sub_period = qb
            .build_query_as::<GradingSubPeriod>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to load grading sub-period: {}", e))
            })?;

        Ok(sub_period)
    }

    #[instrument(skip(self, sub_period), fields(sub_period_id = %sub_period.sub_period_id))]
    pub async fn create_grading_sub_period(
        &self,
        sub_period: &GradingSubPeriod,
    ) -> Result<GradingSubPeriod, AppError> {
        let created = sqlx::query_as::<_, GradingSubPeriod>(
            r#"
            INSERT INTO grading_sub_periods (sub_period_id, period_id, name, weight_percent, sort_order)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING sub_period_id, period_id, name, weight_percent, sort_order
            "#,
        )
        .bind(sub_period.sub_period_id)
        .bind(sub_period.period_id)
        .bind(&sub_period.name)
        .bind(sub_period.weight_percent)
        .bind(sub_period.sort_order)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to create grading sub-period: {}", e))
        })?;

        info!(sub_period_id = %created.sub_period_id, "Grading sub-period created");
        Ok(created)
    }

    // =========================================================================
    // Role grants
    // =========================================================================

    #[instrument(skip(self, grant), fields(grant_id = %grant.grant_id))]
    pub async fn create_role_grant(&self, grant: &RoleGrant) -> Result<RoleGrant, AppError> {
        let created = sqlx::query_as::<_, RoleGrant>(
            r#"
            INSERT INTO role_grants (grant_id, role_code, module, action)
            VALUES ($1, $2, $3, $4)
            RETURNING grant_id, role_code, module, action
            "#,
        )
        .bind(grant.grant_id)
        .bind(&grant.role_code)
        .bind(&grant.module)
        .bind(&grant.action)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!("Grant already exists"))
            }
            e => AppError::DatabaseError(anyhow::anyhow!("Failed to create role grant: {}", e)),
        })?;

        info!(
            role = %created.role_code,
            module = %created.module,
            action = %created.action,
            "Role grant created"
        );
        Ok(created)
    }

    pub async fn list_role_grants(&self) -> Result<Vec<RoleGrant>, AppError> {
        let grants = sqlx::query_as::<_, RoleGrant>(
            r#"
            SELECT grant_id, role_code, module, action
            FROM role_grants
            ORDER BY role_code, module, action
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list role grants: {}", e)))?;

        Ok(grants)
    }

    #[instrument(skip(self))]
    pub async fn delete_role_grant(&self, grant_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM role_grants WHERE grant_id = $1")
            .bind(grant_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete role grant: {}", e))
            })?;

        info!(%grant_id, "Role grant deleted");
        Ok(result.rows_affected() > 0)
    }
}

async fn insert_account(
    executor: &mut sqlx::PgConnection,
    account: &Account,
) -> Result<Account, AppError> {
    sqlx::query_as::<_, Account>(
        r#"
        INSERT INTO accounts (account_id, display_name, email, password_hash, role_code,
                              status_code, primary_institution_id, created_utc, updated_utc)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING account_id, display_name, email, password_hash, role_code, status_code,
                  primary_institution_id, created_utc, updated_utc
        "#,
    )
    .bind(account.account_id)
    .bind(&account.display_name)
    .bind(&account.email)
    .bind(&account.password_hash)
    .bind(&account.role_code)
    .bind(&account.status_code)
    .bind(account.primary_institution_id)
    .bind(account.created_utc)
    .bind(account.updated_utc)
    .fetch_one(executor)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            AppError::Conflict(anyhow::anyhow!("Email already registered"))
        }
        e => AppError::DatabaseError(anyhow::anyhow!("Failed to create account: {}", e)),
    })
}

async fn insert_student(
    executor: &mut sqlx::PgConnection,
    student: &Student,
) -> Result<Student, AppError> {
    sqlx::query_as::<_, Student>(
        r#"
        INSERT INTO students (student_id, account_id, institution_id, full_name, created_utc)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING student_id, account_id, institution_id, full_name, created_utc
        "#,
    )
    .bind(student.student_id)
    .bind(student.account_id)
    .bind(student.institution_id)
    .bind(&student.full_name)
    .bind(student.created_utc)
    .fetch_one(executor)
    .await
    .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create student: {}", e)))
}
