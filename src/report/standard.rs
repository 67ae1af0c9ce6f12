//! @ai:module:intent Compute standard report content from project records
//! @ai:module:layer domain
//! @ai:module:public_api compute, narrative_fields, StandardOptions
//! @ai:module:stateless true

use crate::projects::Project;
use crate::report::types::ReportType;
use crate::templates::ProjectData;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

const FINANCIAL_KEYS: [&str; 4] = ["total_budget", "total_spent", "budget", "spent"];

/// @ai:intent Caller switches for standard report content
#[derive(Debug, Clone, Copy)]
pub struct StandardOptions {
    /// Drop budget and spend figures from summary and detailed reports
    pub include_financial: bool,
}

impl Default for StandardOptions {
    fn default() -> Self {
        Self {
            include_financial: true,
        }
    }
}

/// @ai:intent Build the structured content for a report type
/// @ai:pre projects is non-empty
/// @ai:effects pure
pub fn compute(report_type: ReportType, projects: &[Project], options: StandardOptions) -> Map<String, Value> {
    let mut content = match report_type {
        ReportType::Summary => summary(projects),
        ReportType::Financial => financial(projects),
        ReportType::Performance => performance(projects),
        ReportType::Detailed => detailed(projects),
        ReportType::Timeline => timeline(projects),
    };

    if !options.include_financial && matches!(report_type, ReportType::Summary | ReportType::Detailed) {
        strip_financial(&mut content);
    }

    content.insert("report_type".to_string(), json!(report_type.as_str()));
    content.insert("total_projects".to_string(), json!(projects.len()));
    content
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn total_budget(projects: &[Project]) -> f64 {
    projects.iter().map(|p| p.budget).sum()
}

fn total_spent(projects: &[Project]) -> f64 {
    projects.iter().map(|p| p.spent).sum()
}

fn average_completion(projects: &[Project]) -> f64 {
    if projects.is_empty() {
        return 0.0;
    }
    round2(projects.iter().map(|p| p.completion_percentage).sum::<f64>() / projects.len() as f64)
}

fn status_breakdown(projects: &[Project]) -> Value {
    let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
    for project in projects {
        *counts.entry(project.status.as_str()).or_default() += 1;
    }
    json!(counts)
}

fn summary(projects: &[Project]) -> Map<String, Value> {
    let rows: Vec<Value> = projects
        .iter()
        .map(|p| {
            json!({
                "id": p.id,
                "name": p.name,
                "status": p.status,
                "completion_percentage": p.completion_percentage,
            })
        })
        .collect();

    let mut content = Map::new();
    content.insert("total_budget".into(), json!(total_budget(projects)));
    content.insert("total_spent".into(), json!(total_spent(projects)));
    content.insert("average_completion".into(), json!(average_completion(projects)));
    content.insert("status_breakdown".into(), status_breakdown(projects));
    content.insert("projects".into(), Value::Array(rows));
    content
}

fn financial(projects: &[Project]) -> Map<String, Value> {
    let budget = total_budget(projects);
    let spent = total_spent(projects);
    let utilization = if budget > 0.0 { round2(spent / budget * 100.0) } else { 0.0 };

    let rows: Vec<Value> = projects
        .iter()
        .map(|p| {
            json!({
                "id": p.id,
                "name": p.name,
                "budget": p.budget,
                "spent": p.spent,
                "remaining": p.remaining(),
                "utilization": round2(p.utilization()),
            })
        })
        .collect();

    let mut content = Map::new();
    content.insert("total_budget".into(), json!(budget));
    content.insert("total_spent".into(), json!(spent));
    content.insert("total_remaining".into(), json!(budget - spent));
    content.insert("budget_utilization".into(), json!(utilization));
    content.insert("projects".into(), Value::Array(rows));
    content
}

fn performance(projects: &[Project]) -> Map<String, Value> {
    let completed = projects.iter().filter(|p| p.is_completed()).count();

    let rows: Vec<Value> = projects
        .iter()
        .map(|p| {
            let utilization = p.utilization();
            let efficiency = if utilization > 0.0 {
                round2(p.completion_percentage / utilization)
            } else {
                0.0
            };
            json!({
                "id": p.id,
                "name": p.name,
                "status": p.status,
                "completion_percentage": p.completion_percentage,
                "budget_utilization": round2(utilization),
                "efficiency": efficiency,
            })
        })
        .collect();

    let mut content = Map::new();
    content.insert("average_completion".into(), json!(average_completion(projects)));
    content.insert("completed_projects".into(), json!(completed));
    let in_progress = projects.iter().filter(|p| p.is_in_progress()).count();
    content.insert("in_progress_projects".into(), json!(in_progress));
    content.insert("projects".into(), Value::Array(rows));
    content
}

fn detailed(projects: &[Project]) -> Map<String, Value> {
    let mut content = summary(projects);
    let team: u32 = projects.iter().map(|p| p.team_size).sum();
    content.insert("total_team_members".into(), json!(team));
    content.insert(
        "projects".into(),
        Value::Array(
            projects
                .iter()
                .map(|p| serde_json::to_value(p).unwrap_or(Value::Null))
                .collect(),
        ),
    );
    content
}

fn timeline(projects: &[Project]) -> Map<String, Value> {
    let rows: Vec<Value> = projects
        .iter()
        .map(|p| {
            json!({
                "id": p.id,
                "name": p.name,
                "start_date": p.start_date,
                "end_date": p.end_date,
                "duration_days": p.end_date.map(|end| (end - p.start_date).num_days()),
            })
        })
        .collect();

    let earliest_start = projects.iter().map(|p| p.start_date).min();
    let latest_end = projects.iter().filter_map(|p| p.end_date).max();

    let mut content = Map::new();
    content.insert("earliest_start".into(), json!(earliest_start));
    content.insert("latest_end".into(), json!(latest_end));
    content.insert("projects".into(), Value::Array(rows));
    content
}

fn strip_financial(content: &mut Map<String, Value>) {
    for key in FINANCIAL_KEYS {
        content.remove(key);
    }
    if let Some(Value::Array(rows)) = content.get_mut("projects") {
        for row in rows.iter_mut() {
            if let Value::Object(fields) = row {
                for key in FINANCIAL_KEYS {
                    fields.remove(key);
                }
            }
        }
    }
}

/// @ai:intent Format an amount as rupees with thousands separators
/// @ai:effects pure
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0 {
        format!("-₹{grouped}")
    } else {
        format!("₹{grouped}")
    }
}

/// @ai:intent Map selected projects onto the template field convention
/// @ai:effects pure
pub fn narrative_fields(report_type: ReportType, projects: &[Project]) -> ProjectData {
    let names = projects
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let months = match (
        projects.iter().map(|p| p.start_date).min(),
        projects.iter().filter_map(|p| p.end_date).max(),
    ) {
        (Some(start), Some(end)) if end > start => {
            format!("{} months", ((end - start).num_days() as f64 / 30.0).round() as i64)
        }
        _ => String::new(),
    };

    let budget = total_budget(projects);
    let spent = total_spent(projects);

    ProjectData::from_pairs([
        ("field1", if names.is_empty() { "Project".to_string() } else { names }),
        ("field2", "Business".to_string()),
        ("field4", months),
        ("field5", "Project Manager".to_string()),
        ("field8", format_currency(budget)),
        ("field9", format_currency(spent)),
        ("field10", format_currency(budget - spent)),
        ("field11", format!("{:.1}%", average_completion(projects))),
        (
            "field12",
            format!("Generate {} report for {} projects", report_type, projects.len()),
        ),
        ("field13", "Comprehensive project analysis".to_string()),
        ("field14", "Data accuracy and completeness".to_string()),
        ("field15", "Improved project management".to_string()),
    ])
    .with_format("business_plan")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projects::ProjectStore;
    use pretty_assertions::assert_eq;

    fn projects() -> Vec<Project> {
        ProjectStore::with_samples().all().to_vec()
    }

    #[test]
    fn test_summary_totals() {
        let content = compute(ReportType::Summary, &projects(), StandardOptions::default());
        assert_eq!(content["report_type"], "summary");
        assert_eq!(content["total_projects"], 3);
        assert_eq!(content["total_budget"], 160000.0);
        assert_eq!(content["total_spent"], 85500.0);
        assert_eq!(content["average_completion"], 65.0);
        assert_eq!(content["status_breakdown"]["In Progress"], 2);
        assert_eq!(content["status_breakdown"]["Completed"], 1);
        assert_eq!(content["projects"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_financial_utilization() {
        let content = compute(ReportType::Financial, &projects(), StandardOptions::default());
        assert_eq!(content["total_remaining"], 74500.0);
        let utilization = content["budget_utilization"].as_f64().unwrap();
        assert!((utilization - 53.44).abs() < 0.011, "{utilization}");
        assert_eq!(content["projects"][2]["utilization"], 95.0);
    }

    #[test]
    fn test_performance_counts() {
        let content = compute(ReportType::Performance, &projects(), StandardOptions::default());
        assert_eq!(content["completed_projects"], 1);
        assert_eq!(content["in_progress_projects"], 2);
        // 65% done on 64% of budget
        assert_eq!(content["projects"][0]["efficiency"], 1.02);
    }

    #[test]
    fn test_planned_project_is_neither_completed_nor_in_progress() {
        let mut sample = projects();
        sample[0].status = "Planned".to_string();
        let content = compute(ReportType::Performance, &sample, StandardOptions::default());
        assert_eq!(content["completed_projects"], 1);
        assert_eq!(content["in_progress_projects"], 1);
    }

    #[test]
    fn test_every_type_carries_type_and_count() {
        for report_type in ReportType::ALL {
            let content = compute(report_type, &projects()[..2], StandardOptions::default());
            assert_eq!(content["report_type"], report_type.as_str());
            assert_eq!(content["total_projects"], 2);
        }
    }

    #[test]
    fn test_timeline_span() {
        let content = compute(ReportType::Timeline, &projects(), StandardOptions::default());
        assert_eq!(content["earliest_start"], "2024-01-15");
        assert_eq!(content["latest_end"], "2024-12-15");
        assert_eq!(content["projects"][2]["duration_days"], 89);
    }

    #[test]
    fn test_exclude_financial() {
        let options = StandardOptions {
            include_financial: false,
        };
        let content = compute(ReportType::Detailed, &projects(), options);
        assert!(content.get("total_budget").is_none());
        let first = content["projects"][0].as_object().unwrap();
        assert!(first.get("budget").is_none());
        assert!(first.get("spent").is_none());
        assert_eq!(first["team_size"], 8);
        assert_eq!(content["total_team_members"], 25);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "₹0");
        assert_eq!(format_currency(999.4), "₹999");
        assert_eq!(format_currency(160000.0), "₹160,000");
        assert_eq!(format_currency(1234567.0), "₹1,234,567");
        assert_eq!(format_currency(-2500.0), "-₹2,500");
    }

    #[test]
    fn test_narrative_fields() {
        let data = narrative_fields(ReportType::Financial, &projects()[..1]);
        assert_eq!(data.field_text("field1"), "Website Redesign");
        assert_eq!(data.field_text("field8"), "₹50,000");
        assert_eq!(data.field_text("field11"), "65.0%");
        assert_eq!(data.field_text("field12"), "Generate financial report for 1 projects");
        assert_eq!(data.field_text("field4"), "6 months");
        assert_eq!(data.format.as_deref(), Some("business_plan"));
        assert_eq!(data.field_text("field3"), "");
    }
}
