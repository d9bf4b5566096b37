//! The persona template: one shared document, cached in memory and refreshed on a schedule.

use super::prompts::DEFAULT_PERSONA_PROMPT;
use crate::db::PromptsDb;
use crate::error::Result;
use crate::models::{PromptTemplate, PERSONA_PROMPT_ID};
use chrono::Utc;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};

#[derive(Clone)]
pub struct PersonaPrompt {
    db: PromptsDb,
    current: Arc<RwLock<String>>,
}

impl PersonaPrompt {
    pub fn new(db: PromptsDb) -> Self {
        let current = Self::load(&db);
        Self {
            db,
            current: Arc::new(RwLock::new(current)),
        }
    }

    /// Reads the template document, or the built-in default when there is none.
    fn load(db: &PromptsDb) -> String {
        if let Err(e) = db.reload() {
            warn!("Could not reload persona prompt, using default: {}", e);
            return DEFAULT_PERSONA_PROMPT.to_string();
        }

        match db.find_by_id(PERSONA_PROMPT_ID) {
            Some(template) if !template.text.trim().is_empty() => template.text,
            _ => {
                info!("No persona prompt document, using default.");
                DEFAULT_PERSONA_PROMPT.to_string()
            }
        }
    }

    pub fn current(&self) -> String {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Re-reads the document and returns the template now in use.
    pub fn refresh(&self) -> String {
        let text = Self::load(&self.db);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = text.clone();
        text
    }

    pub fn set(&self, text: &str) -> Result<PromptTemplate> {
        let template = PromptTemplate {
            id: PERSONA_PROMPT_ID.to_string(),
            text: text.trim().to_string(),
            updated_at: Utc::now(),
        };
        self.db.upsert(template.clone())?;
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = template.text.clone();
        info!("Persona prompt updated.");
        Ok(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_default_and_picks_up_changes() {
        let dir = tempfile::tempdir().unwrap();
        let db = PromptsDb::new_prompt_db(dir.path()).unwrap();
        let persona = PersonaPrompt::new(db.clone());
        assert_eq!(persona.current(), DEFAULT_PERSONA_PROMPT);

        db.upsert(PromptTemplate {
            id: PERSONA_PROMPT_ID.to_string(),
            text: "Bạn là một con mèo tiết kiệm.".to_string(),
            updated_at: Utc::now(),
        })
        .unwrap();
        assert_eq!(persona.refresh(), "Bạn là một con mèo tiết kiệm.");

        persona.set("  Persona mới  ").unwrap();
        assert_eq!(persona.current(), "Persona mới");
    }

    #[test]
    fn unreadable_document_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let db = PromptsDb::new_prompt_db(dir.path()).unwrap();
        std::fs::write(dir.path().join("prompts.json"), "not json").unwrap();

        let persona = PersonaPrompt::new(db);
        assert_eq!(persona.refresh(), DEFAULT_PERSONA_PROMPT);
    }
}
