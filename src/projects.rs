//! @ai:module:intent Read-only project catalog consumed by standard reports
//! @ai:module:layer infrastructure
//! @ai:module:public_api Project, ProjectStore

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// @ai:intent A stored business project record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub status: String,
    pub budget: f64,
    pub spent: f64,
    pub team_size: u32,
    pub completion_percentage: f64,
}

impl Project {
    pub fn remaining(&self) -> f64 {
        self.budget - self.spent
    }

    /// @ai:intent Percentage of the budget already spent, 0 for an empty budget
    /// @ai:effects pure
    pub fn utilization(&self) -> f64 {
        if self.budget > 0.0 {
            self.spent / self.budget * 100.0
        } else {
            0.0
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status.eq_ignore_ascii_case("completed") || self.completion_percentage >= 100.0
    }

    /// @ai:intent Actively worked on; planned or on-hold projects are not
    pub fn is_in_progress(&self) -> bool {
        self.status.eq_ignore_ascii_case("in progress") && !self.is_completed()
    }
}

/// @ai:intent In-memory project catalog
#[derive(Debug, Clone, Default)]
pub struct ProjectStore {
    projects: Vec<Project>,
}

impl ProjectStore {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    /// @ai:intent Catalog seeded with the demonstration projects
    /// @ai:effects pure
    pub fn with_samples() -> Self {
        Self::new(sample_projects())
    }

    pub fn all(&self) -> &[Project] {
        &self.projects
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn sample_projects() -> Vec<Project> {
    vec![
        Project {
            id: "proj_001".to_string(),
            name: "Website Redesign".to_string(),
            description: "Complete redesign of company website".to_string(),
            start_date: date(2024, 1, 15),
            end_date: Some(date(2024, 6, 30)),
            status: "In Progress".to_string(),
            budget: 50000.0,
            spent: 32000.0,
            team_size: 8,
            completion_percentage: 65.0,
        },
        Project {
            id: "proj_002".to_string(),
            name: "Mobile App Development".to_string(),
            description: "iOS and Android mobile application".to_string(),
            start_date: date(2024, 3, 1),
            end_date: Some(date(2024, 12, 15)),
            status: "In Progress".to_string(),
            budget: 80000.0,
            spent: 25000.0,
            team_size: 12,
            completion_percentage: 30.0,
        },
        Project {
            id: "proj_003".to_string(),
            name: "Database Migration".to_string(),
            description: "Migration to cloud database infrastructure".to_string(),
            start_date: date(2024, 2, 1),
            end_date: Some(date(2024, 4, 30)),
            status: "Completed".to_string(),
            budget: 30000.0,
            spent: 28500.0,
            team_size: 5,
            completion_percentage: 100.0,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_lookup() {
        let store = ProjectStore::with_samples();
        assert_eq!(store.all().len(), 3);
        assert_eq!(store.get("proj_002").map(|p| p.name.as_str()), Some("Mobile App Development"));
        assert!(store.get("proj_999").is_none());
    }

    #[test]
    fn test_utilization() {
        let store = ProjectStore::with_samples();
        let project = store.get("proj_001").unwrap();
        assert!((project.utilization() - 64.0).abs() < 1e-9);
        assert!((project.remaining() - 18000.0).abs() < 1e-9);
        assert!(store.get("proj_003").unwrap().is_completed());
    }

    #[test]
    fn test_in_progress_is_status_based() {
        let store = ProjectStore::with_samples();
        assert!(store.get("proj_001").unwrap().is_in_progress());
        assert!(!store.get("proj_003").unwrap().is_in_progress());

        let mut planned = store.get("proj_001").unwrap().clone();
        planned.status = "Planned".to_string();
        assert!(!planned.is_in_progress());
        assert!(!planned.is_completed());
    }
}
