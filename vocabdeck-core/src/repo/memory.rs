use crate::{Card, CardId, CoreError, Folder, FolderId};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
pub struct MemoryRepo {
    folders: RwLock<HashMap<FolderId, Folder>>,
    cards: RwLock<HashMap<CardId, Card>>,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

fn validate_text(word: &str, meaning: &str) -> Result<(), CoreError> {
    if word.trim().is_empty() {
        return Err(CoreError::Invalid("word must not be empty"));
    }
    if meaning.trim().is_empty() {
        return Err(CoreError::Invalid("meaning must not be empty"));
    }
    Ok(())
}

#[async_trait]
impl crate::repo::Repository for MemoryRepo {
    async fn create_folder(&self, name: &str) -> Result<Folder, CoreError> {
        if name.trim().is_empty() {
            return Err(CoreError::Invalid("folder name must not be empty"));
        }
        let folder = Folder::new(name);
        let mut m = self.folders.write();
        if m.values().any(|f| f.name.eq_ignore_ascii_case(name)) {
            return Err(CoreError::Conflict("folder name already exists"));
        }
        m.insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn get_folder(&self, id: FolderId) -> Result<Folder, CoreError> {
        self.folders
            .read()
            .get(&id)
            .cloned()
            .ok_or(CoreError::NotFound("folder"))
    }

    async fn list_folders(&self) -> Result<Vec<Folder>, CoreError> {
        Ok(self.folders.read().values().cloned().collect())
    }

    async fn delete_folder(&self, id: FolderId) -> Result<(), CoreError> {
        self.folders
            .write()
            .remove(&id)
            .ok_or(CoreError::NotFound("folder"))?;
        let mut cards = self.cards.write();
        for c in cards.values_mut() {
            if c.folder_id == Some(id) {
                c.folder_id = None;
            }
        }
        Ok(())
    }

    async fn add_card(
        &self,
        word: &str,
        meaning: &str,
        folder_id: Option<FolderId>,
        image_ref: Option<&str>,
    ) -> Result<Card, CoreError> {
        validate_text(word, meaning)?;
        if let Some(fid) = folder_id {
            if !self.folders.read().contains_key(&fid) {
                return Err(CoreError::NotFound("folder"));
            }
        }
        let mut card = Card::new(word, meaning);
        card.folder_id = folder_id;
        card.image_ref = image_ref.map(|s| s.to_string());
        self.cards.write().insert(card.id, card.clone());
        Ok(card)
    }

    async fn get_card(&self, id: CardId) -> Result<Card, CoreError> {
        self.cards
            .read()
            .get(&id)
            .cloned()
            .ok_or(CoreError::NotFound("card"))
    }

    async fn list_cards(&self, folder_id: Option<FolderId>) -> Result<Vec<Card>, CoreError> {
        let cards = self.cards.read();
        let mut v: Vec<Card> = cards.values().cloned().collect();
        if let Some(fid) = folder_id {
            v.retain(|c| c.folder_id == Some(fid));
        }
        Ok(v)
    }

    async fn update_card(&self, card: &Card) -> Result<Card, CoreError> {
        validate_text(&card.word, &card.meaning)?;
        let mut m = self.cards.write();
        if !m.contains_key(&card.id) {
            return Err(CoreError::NotFound("card"));
        }
        m.insert(card.id, card.clone());
        Ok(card.clone())
    }

    async fn delete_card(&self, id: CardId) -> Result<(), CoreError> {
        self.cards
            .write()
            .remove(&id)
            .ok_or(CoreError::NotFound("card"))?;
        Ok(())
    }

    async fn move_to_folder(
        &self,
        ids: &[CardId],
        folder_id: Option<FolderId>,
    ) -> Result<(), CoreError> {
        if let Some(fid) = folder_id {
            if !self.folders.read().contains_key(&fid) {
                return Err(CoreError::NotFound("folder"));
            }
        }
        let mut m = self.cards.write();
        for id in ids {
            let Some(card) = m.get_mut(id) else {
                return Err(CoreError::NotFound("card"));
            };
            card.folder_id = folder_id;
        }
        Ok(())
    }
}
