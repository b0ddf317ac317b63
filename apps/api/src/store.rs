use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::bid::Bid;
use crate::models::designer::DesignerProfile;
use crate::models::job::Job;

/// In-memory marketplace registry: jobs, bids, designer profiles.
///
/// Bids are kept per job in placement order — the evaluation board relies on
/// that order as the stable tie-break for ranking. Data lives for the
/// process lifetime; summaries are never written back here.
pub struct MarketStore {
    jobs: RwLock<HashMap<Uuid, Job>>,
    bids: RwLock<HashMap<Uuid, Vec<Bid>>>,
    designers: RwLock<HashMap<Uuid, DesignerProfile>>,
}

impl MarketStore {
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
            bids: RwLock::new(HashMap::new()),
            designers: RwLock::new(HashMap::new()),
        }
    }

    pub fn register_designer(
        &self,
        name: String,
        headline: String,
        skills: Vec<String>,
        bio: String,
        budget_range: Option<String>,
        avatar_url: Option<String>,
    ) -> DesignerProfile {
        let profile = DesignerProfile {
            id: Uuid::new_v4(),
            name,
            headline,
            skills,
            bio,
            budget_range,
            avatar_url,
            created_at: Utc::now(),
        };
        self.designers
            .write()
            .expect("designer store lock poisoned")
            .insert(profile.id, profile.clone());
        profile
    }

    pub fn get_designer(&self, id: Uuid) -> Option<DesignerProfile> {
        self.designers
            .read()
            .expect("designer store lock poisoned")
            .get(&id)
            .cloned()
    }

    pub fn create_job(
        &self,
        client_id: Uuid,
        title: String,
        description: String,
        budget: String,
    ) -> Job {
        let job = Job {
            id: Uuid::new_v4(),
            client_id,
            title,
            description,
            budget,
            created_at: Utc::now(),
        };
        self.jobs
            .write()
            .expect("job store lock poisoned")
            .insert(job.id, job.clone());
        job
    }

    pub fn get_job(&self, id: Uuid) -> Option<Job> {
        self.jobs
            .read()
            .expect("job store lock poisoned")
            .get(&id)
            .cloned()
    }

    /// All jobs, newest first.
    pub fn list_jobs(&self) -> Vec<Job> {
        let mut jobs: Vec<Job> = self
            .jobs
            .read()
            .expect("job store lock poisoned")
            .values()
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        jobs
    }

    /// Places a bid. Enforces a non-negative amount and one bid per designer
    /// per job; the job and designer must already exist.
    pub fn place_bid(
        &self,
        job_id: Uuid,
        designer_id: Uuid,
        bid_amount: f64,
        cover_letter: String,
        experience_summary: String,
    ) -> Result<Bid, AppError> {
        if !bid_amount.is_finite() || bid_amount < 0.0 {
            return Err(AppError::Validation(
                "bid_amount must be a non-negative number".to_string(),
            ));
        }
        if self.get_job(job_id).is_none() {
            return Err(AppError::NotFound(format!("Job {job_id} not found")));
        }
        if self.get_designer(designer_id).is_none() {
            return Err(AppError::NotFound(format!(
                "Designer {designer_id} not found"
            )));
        }

        let mut bids = self.bids.write().expect("bid store lock poisoned");
        let job_bids = bids.entry(job_id).or_default();
        if job_bids.iter().any(|b| b.designer_id == designer_id) {
            return Err(AppError::Conflict(format!(
                "Designer {designer_id} has already bid on job {job_id}"
            )));
        }

        let bid = Bid {
            id: Uuid::new_v4(),
            job_id,
            designer_id,
            bid_amount,
            cover_letter,
            experience_summary,
            created_at: Utc::now(),
        };
        job_bids.push(bid.clone());
        Ok(bid)
    }

    /// A job's bids in placement order.
    pub fn bids_for_job(&self, job_id: Uuid) -> Vec<Bid> {
        self.bids
            .read()
            .expect("bid store lock poisoned")
            .get(&job_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for MarketStore {
    fn default() -> Self {
        Self::new()
    }
}
