//! Report-card aggregation.
//!
//! Groups flat grade rows into nested per-subject averages following
//! the institution's period/sub-period weight configuration. Pure and
//! deterministic; weights are multiplied and summed exactly as given,
//! with no sum-to-100 enforcement. Windows with no scores are simply
//! absent from the output so the client can render a dash instead of
//! a misleading zero.

use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// One raw grade row, as queried for a student.
#[derive(Debug, Clone)]
pub struct GradeRow {
    pub subject_id: Uuid,
    pub subject_name: String,
    pub period_id: Uuid,
    pub sub_period_id: Uuid,
    pub score: f64,
}

/// Weight configuration for one sub-period.
#[derive(Debug, Clone)]
pub struct SubPeriodWeight {
    pub sub_period_id: Uuid,
    pub name: String,
    pub weight_percent: f64,
}

/// Weight configuration for one period and its sub-periods.
#[derive(Debug, Clone)]
pub struct PeriodWeight {
    pub period_id: Uuid,
    pub name: String,
    pub weight_percent: f64,
    pub sub_periods: Vec<SubPeriodWeight>,
}

/// The institution's grading windows, in display order.
#[derive(Debug, Clone, Default)]
pub struct WeightPlan {
    pub periods: Vec<PeriodWeight>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubPeriodReport {
    pub sub_period_id: Uuid,
    pub name: String,
    /// Arithmetic mean of the raw scores in this sub-period.
    pub average: f64,
    /// `average` scaled by the sub-period weight.
    pub weighted_average: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PeriodReport {
    pub period_id: Uuid,
    pub name: String,
    pub sub_periods: Vec<SubPeriodReport>,
    /// Mean of the present sub-period averages.
    pub average: f64,
    /// Weighted sum of the present sub-period averages.
    pub weighted_average: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectReport {
    pub subject_id: Uuid,
    pub subject_name: String,
    pub periods: Vec<PeriodReport>,
    /// Weighted sum of the present period weighted averages.
    pub weighted_average: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportCard {
    pub subjects: Vec<SubjectReport>,
    /// Mean of the subject weighted averages; None when there are no
    /// graded subjects at all.
    pub overall_average: Option<f64>,
}

/// Build a report card from flat grade rows and the weight plan.
pub fn build_report(rows: &[GradeRow], plan: &WeightPlan) -> ReportCard {
    // subject -> sub_period -> scores, keyed deterministically.
    let mut by_subject: BTreeMap<Uuid, (String, BTreeMap<Uuid, Vec<f64>>)> = BTreeMap::new();
    for row in rows {
        let entry = by_subject
            .entry(row.subject_id)
            .or_insert_with(|| (row.subject_name.clone(), BTreeMap::new()));
        entry.1.entry(row.sub_period_id).or_default().push(row.score);
    }

    let mut subjects: Vec<SubjectReport> = Vec::with_capacity(by_subject.len());
    for (subject_id, (subject_name, scores)) in &by_subject {
        let mut periods = Vec::new();
        let mut subject_weighted = 0.0_f64;

        for period in &plan.periods {
            let mut sub_reports = Vec::new();
            for sub in &period.sub_periods {
                let Some(raw) = scores.get(&sub.sub_period_id) else {
                    // No rows for this window: absent, not zero.
                    continue;
                };
                let average = raw.iter().sum::<f64>() / raw.len() as f64;
                sub_reports.push(SubPeriodReport {
                    sub_period_id: sub.sub_period_id,
                    name: sub.name.clone(),
                    average,
                    weighted_average: average * sub.weight_percent / 100.0,
                });
            }

            if sub_reports.is_empty() {
                continue;
            }

            let average =
                sub_reports.iter().map(|s| s.average).sum::<f64>() / sub_reports.len() as f64;
            let weighted_average = sub_reports.iter().map(|s| s.weighted_average).sum::<f64>();
            subject_weighted += weighted_average * period.weight_percent / 100.0;
            periods.push(PeriodReport {
                period_id: period.period_id,
                name: period.name.clone(),
                sub_periods: sub_reports,
                average,
                weighted_average,
            });
        }

        subjects.push(SubjectReport {
            subject_id: *subject_id,
            subject_name: subject_name.clone(),
            periods,
            weighted_average: subject_weighted,
        });
    }

    subjects.sort_by(|a, b| a.subject_name.cmp(&b.subject_name));

    let overall_average = if subjects.is_empty() {
        None
    } else {
        Some(subjects.iter().map(|s| s.weighted_average).sum::<f64>() / subjects.len() as f64)
    };

    ReportCard {
        subjects,
        overall_average,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_one_period(sub_weights: &[(Uuid, f64)], period_id: Uuid) -> WeightPlan {
        WeightPlan {
            periods: vec![PeriodWeight {
                period_id,
                name: "Period 1".to_string(),
                weight_percent: 100.0,
                sub_periods: sub_weights
                    .iter()
                    .enumerate()
                    .map(|(i, (id, w))| SubPeriodWeight {
                        sub_period_id: *id,
                        name: format!("Sub {}", i + 1),
                        weight_percent: *w,
                    })
                    .collect(),
            }],
        }
    }

    fn row(subject_id: Uuid, period_id: Uuid, sub_period_id: Uuid, score: f64) -> GradeRow {
        GradeRow {
            subject_id,
            subject_name: "Mathematics".to_string(),
            period_id,
            sub_period_id,
            score,
        }
    }

    #[test]
    fn test_single_sub_period_mean() {
        let subject = Uuid::new_v4();
        let period = Uuid::new_v4();
        let sub = Uuid::new_v4();
        let plan = plan_one_period(&[(sub, 100.0)], period);

        let rows = vec![row(subject, period, sub, 8.0), row(subject, period, sub, 6.0)];
        let card = build_report(&rows, &plan);

        let sp = &card.subjects[0].periods[0].sub_periods[0];
        assert!((sp.average - 7.0).abs() < 1e-9);
        assert!((card.subjects[0].periods[0].weighted_average - 7.0).abs() < 1e-9);
        assert_eq!(card.overall_average, Some(7.0));
    }

    #[test]
    fn test_two_half_weighted_sub_periods() {
        let subject = Uuid::new_v4();
        let period = Uuid::new_v4();
        let sub_a = Uuid::new_v4();
        let sub_b = Uuid::new_v4();
        let plan = plan_one_period(&[(sub_a, 50.0), (sub_b, 50.0)], period);

        let rows = vec![
            row(subject, period, sub_a, 8.0),
            row(subject, period, sub_b, 6.0),
        ];
        let card = build_report(&rows, &plan);

        let period_report = &card.subjects[0].periods[0];
        assert_eq!(period_report.sub_periods.len(), 2);
        assert!((period_report.sub_periods[0].average - 8.0).abs() < 1e-9);
        assert!((period_report.sub_periods[1].average - 6.0).abs() < 1e-9);
        assert!((period_report.weighted_average - 7.0).abs() < 1e-9);
        assert!((card.subjects[0].weighted_average - 7.0).abs() < 1e-9);
        assert_eq!(card.overall_average, Some(7.0));
    }

    #[test]
    fn test_empty_sub_period_is_absent_not_zero() {
        let subject = Uuid::new_v4();
        let period = Uuid::new_v4();
        let sub_a = Uuid::new_v4();
        let sub_b = Uuid::new_v4();
        let plan = plan_one_period(&[(sub_a, 50.0), (sub_b, 50.0)], period);

        let rows = vec![row(subject, period, sub_a, 9.0)];
        let card = build_report(&rows, &plan);

        let period_report = &card.subjects[0].periods[0];
        assert_eq!(period_report.sub_periods.len(), 1);
        assert_eq!(period_report.sub_periods[0].sub_period_id, sub_a);
        // The weighted sum uses only the weights it was given.
        assert!((period_report.weighted_average - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_period_with_no_rows_is_absent() {
        let subject = Uuid::new_v4();
        let period_a = Uuid::new_v4();
        let period_b = Uuid::new_v4();
        let sub_a = Uuid::new_v4();
        let sub_b = Uuid::new_v4();
        let plan = WeightPlan {
            periods: vec![
                PeriodWeight {
                    period_id: period_a,
                    name: "Period 1".to_string(),
                    weight_percent: 60.0,
                    sub_periods: vec![SubPeriodWeight {
                        sub_period_id: sub_a,
                        name: "Sub 1".to_string(),
                        weight_percent: 100.0,
                    }],
                },
                PeriodWeight {
                    period_id: period_b,
                    name: "Period 2".to_string(),
                    weight_percent: 40.0,
                    sub_periods: vec![SubPeriodWeight {
                        sub_period_id: sub_b,
                        name: "Sub 1".to_string(),
                        weight_percent: 100.0,
                    }],
                },
            ],
        };

        let rows = vec![row(subject, period_a, sub_a, 10.0)];
        let card = build_report(&rows, &plan);

        let subject_report = &card.subjects[0];
        assert_eq!(subject_report.periods.len(), 1);
        assert_eq!(subject_report.periods[0].period_id, period_a);
        assert!((subject_report.weighted_average - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_rows_at_all() {
        let card = build_report(&[], &WeightPlan::default());
        assert!(card.subjects.is_empty());
        assert_eq!(card.overall_average, None);
    }

    #[test]
    fn test_subjects_sorted_by_name() {
        let period = Uuid::new_v4();
        let sub = Uuid::new_v4();
        let plan = plan_one_period(&[(sub, 100.0)], period);

        let mut rows = vec![row(Uuid::new_v4(), period, sub, 5.0)];
        rows[0].subject_name = "Zoology".to_string();
        rows.push(GradeRow {
            subject_id: Uuid::new_v4(),
            subject_name: "Algebra".to_string(),
            period_id: period,
            sub_period_id: sub,
            score: 6.0,
        });

        let card = build_report(&rows, &plan);
        assert_eq!(card.subjects[0].subject_name, "Algebra");
        assert_eq!(card.subjects[1].subject_name, "Zoology");
    }
}
