//! Goal summaries, dashboard aggregates, trends, and benchmarks.

use std::collections::{BTreeMap, HashMap, HashSet};

use jiff::tz::TimeZone;
use serde::Serialize;
use uuid::Uuid;

use sdg_core::models::activity::{Activity, ActivityCategory};
use sdg_core::models::benchmark::BenchmarkInstitution;
use sdg_core::models::goal::{self, Goal, GoalNumber};
use sdg_core::models::impact::Impact;

/// Score statistics for one goal across all activities.
#[derive(Debug, Clone, Serialize)]
pub struct GoalSummary {
    pub goal: Goal,
    pub total_activities: usize,
    pub average_score: Option<f64>,
    pub max_score: Option<u8>,
    pub min_score: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopGoal {
    pub goal_number: GoalNumber,
    pub name: String,
    pub average_score: f64,
    pub total_impacts: usize,
}

/// Activity count and mean impact score for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStats {
    pub count: usize,
    /// Mean over every impact of the category's activities.
    pub average_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorActivity {
    pub author_id: Uuid,
    pub activity_count: usize,
}

/// Authors listed in `DashboardStats::top_authors`.
pub const TOP_AUTHORS: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_activities: usize,
    pub by_category: BTreeMap<String, CategoryStats>,
    pub auto_classified: usize,
    pub total_impacts: usize,
    /// Goals with at least one impact.
    pub active_goals: usize,
    pub top_goal: Option<TopGoal>,
    pub top_authors: Vec<AuthorActivity>,
}

/// Mean score and impact count for one goal in one calendar year (UTC).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub year: i16,
    pub goal_number: GoalNumber,
    pub goal_name: String,
    pub count: usize,
    pub average_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub start: i16,
    pub end: i16,
}

#[derive(Debug, Clone, Serialize)]
pub struct Trends {
    /// Ordered by year, then goal number.
    pub trends: Vec<TrendPoint>,
    pub date_range: YearRange,
}

/// First year of the trends window unless older impacts exist.
pub const TRENDS_START_YEAR: i16 = 2020;

/// One row of the benchmark table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenchmarkRow {
    pub name: String,
    pub total_sdg_score: u32,
    pub projects_count: u32,
    pub publications_count: u32,
    /// True for the row computed live from this tracker's data.
    pub is_home: bool,
}

pub fn goal_summary(number: GoalNumber, impacts: &[Impact]) -> GoalSummary {
    let scores: Vec<u8> = impacts
        .iter()
        .filter(|i| i.goal_number == number)
        .map(|i| i.score)
        .collect();
    let activities: HashSet<_> = impacts
        .iter()
        .filter(|i| i.goal_number == number)
        .map(|i| i.activity_id)
        .collect();

    GoalSummary {
        goal: goal::goal(number),
        total_activities: activities.len(),
        average_score: mean(&scores),
        max_score: scores.iter().copied().max(),
        min_score: scores.iter().copied().min(),
    }
}

pub fn dashboard_stats(activities: &[Activity], impacts: &[Impact]) -> DashboardStats {
    let category_of: HashMap<Uuid, ActivityCategory> =
        activities.iter().map(|a| (a.id, a.category)).collect();

    let mut counts: BTreeMap<ActivityCategory, usize> = BTreeMap::new();
    for activity in activities {
        *counts.entry(activity.category).or_insert(0) += 1;
    }
    let mut category_scores: HashMap<ActivityCategory, Vec<u8>> = HashMap::new();
    for impact in impacts {
        if let Some(category) = category_of.get(&impact.activity_id) {
            category_scores.entry(*category).or_default().push(impact.score);
        }
    }
    let by_category = counts
        .into_iter()
        .map(|(category, count)| {
            let average_score = category_scores.get(&category).and_then(|s| mean(s));
            (category.to_string(), CategoryStats { count, average_score })
        })
        .collect();

    let mut per_goal: BTreeMap<GoalNumber, Vec<u8>> = BTreeMap::new();
    for impact in impacts {
        per_goal.entry(impact.goal_number).or_default().push(impact.score);
    }

    // Highest average wins; BTreeMap order makes ties go to the lower goal number.
    let mut top_goal: Option<TopGoal> = None;
    for (number, scores) in &per_goal {
        let Some(average_score) = mean(scores) else {
            continue;
        };
        if top_goal
            .as_ref()
            .is_none_or(|top| average_score > top.average_score)
        {
            top_goal = Some(TopGoal {
                goal_number: *number,
                name: goal::goal(*number).name,
                average_score,
                total_impacts: scores.len(),
            });
        }
    }

    DashboardStats {
        total_activities: activities.len(),
        by_category,
        auto_classified: activities.iter().filter(|a| a.auto_classified).count(),
        total_impacts: impacts.len(),
        active_goals: per_goal.len(),
        top_goal,
        top_authors: top_authors(activities),
    }
}

fn top_authors(activities: &[Activity]) -> Vec<AuthorActivity> {
    let mut counts: HashMap<Uuid, usize> = HashMap::new();
    for activity in activities {
        *counts.entry(activity.author_id).or_insert(0) += 1;
    }
    let mut authors: Vec<AuthorActivity> = counts
        .into_iter()
        .map(|(author_id, activity_count)| AuthorActivity {
            author_id,
            activity_count,
        })
        .collect();
    authors.sort_by(|a, b| {
        b.activity_count
            .cmp(&a.activity_count)
            .then(a.author_id.cmp(&b.author_id))
    });
    authors.truncate(TOP_AUTHORS);
    authors
}

/// Per-year, per-goal score trends, optionally restricted to one goal.
pub fn trends(impacts: &[Impact], goal: Option<GoalNumber>, current_year: i16) -> Trends {
    let mut buckets: BTreeMap<(i16, GoalNumber), Vec<u8>> = BTreeMap::new();
    for impact in impacts
        .iter()
        .filter(|i| goal.is_none_or(|g| i.goal_number == g))
    {
        let year = impact.created_at.to_zoned(TimeZone::UTC).year();
        buckets
            .entry((year, impact.goal_number))
            .or_default()
            .push(impact.score);
    }

    let earliest = buckets.keys().map(|(year, _)| *year).min();
    let latest = buckets.keys().map(|(year, _)| *year).max();

    let trends = buckets
        .into_iter()
        .map(|((year, number), scores)| TrendPoint {
            year,
            goal_number: number,
            goal_name: goal::goal(number).name,
            count: scores.len(),
            average_score: mean(&scores).unwrap_or_default(),
        })
        .collect();

    Trends {
        trends,
        date_range: YearRange {
            start: earliest.map_or(TRENDS_START_YEAR, |y| y.min(TRENDS_START_YEAR)),
            end: latest.map_or(current_year, |y| y.max(current_year)),
        },
    }
}

/// The home institution's live figures followed by stored peers, by name.
///
/// The live SDG score is the number of goals with at least one impact.
/// Research activities count as publications.
pub fn benchmark_comparison(
    home_name: &str,
    activities: &[Activity],
    impacts: &[Impact],
    peers: &[BenchmarkInstitution],
) -> Vec<BenchmarkRow> {
    let count = |category: ActivityCategory| {
        activities.iter().filter(|a| a.category == category).count() as u32
    };
    let goals: HashSet<GoalNumber> = impacts.iter().map(|i| i.goal_number).collect();

    let mut rows = vec![BenchmarkRow {
        name: home_name.to_string(),
        total_sdg_score: goals.len() as u32,
        projects_count: count(ActivityCategory::Project),
        publications_count: count(ActivityCategory::Research),
        is_home: true,
    }];

    let mut peers: Vec<&BenchmarkInstitution> = peers.iter().collect();
    peers.sort_by_key(|p| p.name.to_lowercase());
    rows.extend(peers.into_iter().map(|p| BenchmarkRow {
        name: p.name.clone(),
        total_sdg_score: p.total_sdg_score,
        projects_count: p.projects_count,
        publications_count: p.publications_count,
        is_home: false,
    }));
    rows
}

fn mean(scores: &[u8]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let sum: u32 = scores.iter().map(|&s| s as u32).sum();
    Some(sum as f64 / scores.len() as f64)
}
