use std::str::FromStr;

use chrono::{DateTime, Utc};
use qualis_common::datetime::format_datetime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionPlanStatus {
    Open,
    Closed,
}

impl ActionPlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
        }
    }
}

impl FromStr for ActionPlanStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "OPEN" => Ok(Self::Open),
            "CLOSED" => Ok(Self::Closed),
            _ => Err(format!("unknown action plan status: {value}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReviewStatus {
    Open,
    Reopened,
    Resolved,
    Closed,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Reopened => "REOPENED",
            Self::Resolved => "RESOLVED",
            Self::Closed => "CLOSED",
        }
    }
}

impl FromStr for ReviewStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "OPEN" => Ok(Self::Open),
            "REOPENED" => Ok(Self::Reopened),
            "RESOLVED" => Ok(Self::Resolved),
            "CLOSED" => Ok(Self::Closed),
            _ => Err(format!("unknown review status: {value}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub id: Uuid,
    pub key: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub login: String,
    pub name: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Review {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub status: ReviewStatus,
    pub assignee_login: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn is_open(&self) -> bool {
        self.status == ReviewStatus::Open
    }

    pub fn is_reopened(&self) -> bool {
        self.status == ReviewStatus::Reopened
    }

    /// Still needs work: open or reopened.
    pub fn is_unresolved(&self) -> bool {
        self.is_open() || self.is_reopened()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Progress {
    pub total: usize,
    pub open: usize,
    pub resolved: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionPlan {
    pub id: Uuid,
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    pub status: ActionPlanStatus,
    pub project_id: Uuid,
    pub user_login: String,
    pub deadline: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ActionPlan {
    pub fn is_open(&self) -> bool {
        self.status == ActionPlanStatus::Open
    }

    pub fn is_closed(&self) -> bool {
        self.status == ActionPlanStatus::Closed
    }

    /// Open with a deadline strictly before `now`.
    pub fn is_over_due_at(&self, now: DateTime<Utc>) -> bool {
        match self.deadline {
            Some(deadline) => self.is_open() && deadline < now,
            None => false,
        }
    }

    pub fn is_over_due(&self) -> bool {
        self.is_over_due_at(Utc::now())
    }

    pub fn open_reviews<'a>(&self, reviews: &'a [Review]) -> Vec<&'a Review> {
        reviews.iter().filter(|r| r.is_unresolved()).collect()
    }

    pub fn has_open_reviews(&self, reviews: &[Review]) -> bool {
        reviews.iter().any(Review::is_unresolved)
    }

    /// Tally of the plan's reviews: everything not open or reopened counts
    /// as resolved.
    pub fn progress(&self, reviews: &[Review]) -> Progress {
        let total = reviews.len();
        let open = self.open_reviews(reviews).len();
        Progress {
            total,
            open,
            resolved: total - open,
        }
    }

    /// Sparse API representation; absent or blank optional fields are left out.
    pub fn to_hash(&self) -> ActionPlanHash {
        ActionPlanHash {
            key: self.key.clone(),
            name: self.name.clone(),
            status: self.status,
            desc: self
                .description
                .as_ref()
                .filter(|d| !d.trim().is_empty())
                .cloned(),
            user_login: Some(self.user_login.clone()).filter(|l| !l.is_empty()),
            dead_line: self.deadline.as_ref().map(format_datetime),
            creation_date: self.created_at.as_ref().map(format_datetime),
            update_date: self.updated_at.as_ref().map(format_datetime),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActionPlanHash {
    pub key: String,
    pub name: String,
    pub status: ActionPlanStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_login: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dead_line: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn plan(status: ActionPlanStatus, deadline: Option<DateTime<Utc>>) -> ActionPlan {
        ActionPlan {
            id: Uuid::nil(),
            key: "ap-1".to_string(),
            name: "Sprint 12".to_string(),
            description: None,
            status,
            project_id: Uuid::nil(),
            user_login: "alice".to_string(),
            deadline,
            created_at: None,
            updated_at: None,
        }
    }

    fn review(status: ReviewStatus) -> Review {
        Review {
            id: Uuid::new_v4(),
            project_id: Uuid::nil(),
            title: "NPE in parser".to_string(),
            status,
            assignee_login: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn status_predicates() {
        assert!(plan(ActionPlanStatus::Open, None).is_open());
        assert!(!plan(ActionPlanStatus::Open, None).is_closed());
        assert!(plan(ActionPlanStatus::Closed, None).is_closed());
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [ActionPlanStatus::Open, ActionPlanStatus::Closed] {
            assert_eq!(status.as_str().parse::<ActionPlanStatus>(), Ok(status));
        }
        assert!("open".parse::<ActionPlanStatus>().is_err());
    }

    #[test]
    fn over_due_requires_open_and_past_deadline() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let past = now - Duration::days(1);
        let future = now + Duration::days(1);

        assert!(plan(ActionPlanStatus::Open, Some(past)).is_over_due_at(now));
        assert!(!plan(ActionPlanStatus::Open, Some(future)).is_over_due_at(now));
        assert!(!plan(ActionPlanStatus::Closed, Some(past)).is_over_due_at(now));
        assert!(!plan(ActionPlanStatus::Open, None).is_over_due_at(now));
    }

    #[test]
    fn deadline_equal_to_now_is_not_over_due() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert!(!plan(ActionPlanStatus::Open, Some(now)).is_over_due_at(now));
    }

    #[test]
    fn progress_counts_open_and_reopened_as_open() {
        let reviews = vec![
            review(ReviewStatus::Open),
            review(ReviewStatus::Reopened),
            review(ReviewStatus::Resolved),
            review(ReviewStatus::Closed),
            review(ReviewStatus::Closed),
        ];
        let p = plan(ActionPlanStatus::Open, None);
        assert_eq!(
            p.progress(&reviews),
            Progress {
                total: 5,
                open: 2,
                resolved: 3
            }
        );
        assert!(p.has_open_reviews(&reviews));
        assert_eq!(p.open_reviews(&reviews).len(), 2);
    }

    #[test]
    fn progress_of_empty_plan() {
        let p = plan(ActionPlanStatus::Open, None);
        assert_eq!(p.progress(&[]), Progress::default());
        assert!(!p.has_open_reviews(&[]));
    }

    #[test]
    fn to_hash_omits_absent_fields() {
        let json = serde_json::to_value(plan(ActionPlanStatus::Open, None).to_hash()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "key": "ap-1",
                "name": "Sprint 12",
                "status": "OPEN",
                "userLogin": "alice"
            })
        );
    }

    #[test]
    fn to_hash_skips_blank_description() {
        let mut p = plan(ActionPlanStatus::Open, None);
        p.description = Some("   ".to_string());
        assert_eq!(p.to_hash().desc, None);
        p.description = Some("Fix blockers".to_string());
        assert_eq!(p.to_hash().desc.as_deref(), Some("Fix blockers"));
    }

    #[test]
    fn to_hash_formats_dates() {
        let at = Utc.with_ymd_and_hms(2013, 5, 17, 14, 20, 0).unwrap();
        let mut p = plan(ActionPlanStatus::Closed, Some(at));
        p.created_at = Some(at);
        p.updated_at = Some(at);

        let json = serde_json::to_value(p.to_hash()).unwrap();
        assert_eq!(json["status"], "CLOSED");
        assert_eq!(json["deadLine"], "2013-05-17T14:20:00+0000");
        assert_eq!(json["creationDate"], "2013-05-17T14:20:00+0000");
        assert_eq!(json["updateDate"], "2013-05-17T14:20:00+0000");
    }
}
