//! In-memory store for tests and throwaway servers

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::MasteryStore;
use crate::error::{ApiError, Result};
use crate::models::{MasteryRecord, NewQuestion, Question, ReviewLog, StudySettings};

#[derive(Default)]
struct State {
    questions: BTreeMap<i64, Question>,
    last_question_id: i64,
    mastery: HashMap<(Uuid, i64), MasteryRecord>,
    reviews: Vec<ReviewLog>,
    settings: HashMap<Uuid, StudySettings>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|_| ApiError::Internal("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|_| ApiError::Internal("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl MasteryStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn get_mastery(&self, user_id: Uuid, question_id: i64) -> Result<Option<MasteryRecord>> {
        Ok(self.read()?.mastery.get(&(user_id, question_id)).cloned())
    }

    async fn upsert_mastery(&self, record: &MasteryRecord) -> Result<()> {
        self.write()?
            .mastery
            .insert((record.user_id, record.question_id), record.clone());
        Ok(())
    }

    async fn list_mastery_for_user(&self, user_id: Uuid) -> Result<Vec<MasteryRecord>> {
        let mut records: Vec<MasteryRecord> = self
            .read()?
            .mastery
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.question_id);
        Ok(records)
    }

    async fn insert_review(&self, review: &ReviewLog) -> Result<()> {
        self.write()?.reviews.push(review.clone());
        Ok(())
    }

    async fn count_reviews_for_user(&self, user_id: Uuid) -> Result<usize> {
        Ok(self
            .read()?
            .reviews
            .iter()
            .filter(|r| r.user_id == user_id)
            .count())
    }

    async fn create_question(&self, question: &NewQuestion) -> Result<Question> {
        let mut state = self.write()?;
        state.last_question_id += 1;
        let created = Question {
            id: state.last_question_id,
            subject: question.subject.clone(),
            prompt: question.prompt.clone(),
            created_at: Utc::now(),
        };
        state.questions.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_question(&self, question_id: i64) -> Result<Option<Question>> {
        Ok(self.read()?.questions.get(&question_id).cloned())
    }

    async fn list_question_ids(&self, subject: Option<&str>) -> Result<Vec<i64>> {
        Ok(self
            .read()?
            .questions
            .values()
            .filter(|q| subject.map_or(true, |s| q.subject == s))
            .map(|q| q.id)
            .collect())
    }

    async fn get_study_settings(&self, user_id: Uuid) -> Result<StudySettings> {
        Ok(self
            .read()?
            .settings
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn upsert_study_settings(&self, user_id: Uuid, settings: &StudySettings) -> Result<()> {
        self.write()?.settings.insert(user_id, settings.clone());
        Ok(())
    }
}
