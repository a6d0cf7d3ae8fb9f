use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::task;
use vocabdeck_core::{repo::Repository, Card, CardId, CoreError, Folder, FolderId};

pub mod paths;

const FILE_VERSION: u32 = 1;

#[derive(Clone, Serialize, Deserialize)]
struct FileImage {
    version: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    folders: Vec<Folder>,
    cards: Vec<Card>,
}

#[derive(Default, Clone)]
struct State {
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    folders: HashMap<FolderId, Folder>,
    cards: HashMap<CardId, Card>,
}

impl State {
    fn new_empty() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            folders: HashMap::new(),
            cards: HashMap::new(),
        }
    }

    fn to_image(&self) -> FileImage {
        FileImage {
            version: FILE_VERSION,
            created_at: self.created_at,
            updated_at: self.updated_at,
            folders: self.folders.values().cloned().collect(),
            cards: self.cards.values().cloned().collect(),
        }
    }

    fn from_image(img: FileImage) -> Self {
        let mut folders = HashMap::new();
        for f in img.folders {
            folders.insert(f.id, f);
        }
        let mut cards = HashMap::new();
        for c in img.cards {
            cards.insert(c.id, c);
        }
        Self {
            created_at: img.created_at,
            updated_at: img.updated_at,
            folders,
            cards,
        }
    }
}

pub struct JsonStore {
    path: PathBuf,
    backups_dir: PathBuf,
    max_backups: usize,
    state: RwLock<State>,
}

impl JsonStore {
    pub async fn open_default() -> Result<Self, CoreError> {
        let (file, backups) = paths::default_store_file();
        Self::open_with(file, backups, 10).await
    }

    pub async fn open_with(
        path: PathBuf,
        backups_dir: PathBuf,
        max_backups: usize,
    ) -> Result<Self, CoreError> {
        ensure_parent_dirs(&path)?;
        ensure_dir(&backups_dir)?;
        let state = load_or_init(&path).await?;
        Ok(Self {
            path,
            backups_dir,
            max_backups: max_backups.max(1),
            state: RwLock::new(state),
        })
    }

    async fn save(&self) -> Result<(), CoreError> {
        let snapshot = {
            let mut s = self.state.write();
            s.updated_at = Utc::now();
            s.to_image()
        };
        let path = self.path.clone();
        let backups = self.backups_dir.clone();
        let keep = self.max_backups;

        tracing::debug!(path = %path.display(), cards = snapshot.cards.len(), "saving store");
        // Join error -> CoreError, inner io::Error -> CoreError
        task::spawn_blocking(move || write_with_backup(&path, &backups, keep, &snapshot))
            .await
            .map_err(|_| CoreError::Storage("io"))?
            .map_err(|_| CoreError::Storage("io"))?;
        Ok(())
    }
}

fn ensure_parent_dirs(path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    Ok(())
}

fn ensure_dir(path: &Path) -> Result<(), CoreError> {
    fs::create_dir_all(path).map_err(|_| CoreError::Storage("io"))
}

async fn load_or_init(path: &Path) -> Result<State, CoreError> {
    if path.exists() {
        let p = path.to_path_buf();
        let img: FileImage = task::spawn_blocking(move || {
            let mut f = fs::File::open(&p)?;
            let mut buf = String::new();
            f.read_to_string(&mut buf)?;
            let v = serde_json::from_str::<FileImage>(&buf)?;
            Ok::<FileImage, std::io::Error>(v)
        })
        .await
        .map_err(|_| CoreError::Storage("io"))
        .and_then(|r| r.map_err(|_| CoreError::Storage("io")))?;
        let mut st = State::from_image(img);
        st.updated_at = Utc::now();
        Ok(st)
    } else {
        let st = State::new_empty();
        let img = st.to_image();
        write_with_backup(path, &path.with_extension("backups"), 1, &img)
            .map_err(|_| CoreError::Storage("io"))?;
        Ok(st)
    }
}

fn write_with_backup(
    path: &Path,
    backups_dir: &Path,
    max_backups: usize,
    img: &FileImage,
) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::create_dir_all(backups_dir)?;

    let json = serde_json::to_vec_pretty(img).expect("serialize");
    let mut tmp = NamedTempFile::new_in(path.parent().unwrap_or_else(|| Path::new(".")))?;
    tmp.write_all(&json)?;
    tmp.flush()?;
    let _ = fs::remove_file(path);
    tmp.persist(path)?;

    // Backup rotation
    let ts = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let backup_name = format!("vocabdeck-{ts}.json");
    let backup_path = backups_dir.join(backup_name);
    let mut btmp = NamedTempFile::new_in(backups_dir)?;
    btmp.write_all(&json)?;
    btmp.flush()?;
    let _ = fs::remove_file(&backup_path);
    btmp.persist(&backup_path)?;

    rotate_backups(backups_dir, max_backups)?;

    Ok(())
}

fn rotate_backups(dir: &Path, keep: usize) -> Result<(), std::io::Error> {
    let mut entries: Vec<_> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    entries.sort_by_key(|e| e.metadata().and_then(|m| m.modified()).ok());
    if entries.len() > keep {
        for e in &entries[0..entries.len() - keep] {
            let _ = fs::remove_file(e.path());
        }
    }
    Ok(())
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
impl Repository for JsonStore {
    async fn create_folder(&self, name: &str) -> Result<Folder, CoreError> {
        if name.trim().is_empty() {
            return Err(CoreError::Invalid("folder name must not be empty"));
        }
        let folder = Folder::new(name);
        {
            let mut s = self.state.write();
            if s.folders.values().any(|f| f.name.eq_ignore_ascii_case(name)) {
                return Err(CoreError::Conflict("folder name already exists"));
            }
            s.folders.insert(folder.id, folder.clone());
        }
        self.save().await?;
        Ok(folder)
    }

    async fn get_folder(&self, id: FolderId) -> Result<Folder, CoreError> {
        let s = self.state.read();
        s.folders
            .get(&id)
            .cloned()
            .ok_or(CoreError::NotFound("folder"))
    }

    async fn list_folders(&self) -> Result<Vec<Folder>, CoreError> {
        let s = self.state.read();
        Ok(s.folders.values().cloned().collect())
    }

    async fn delete_folder(&self, id: FolderId) -> Result<(), CoreError> {
        {
            let mut s = self.state.write();
            if s.folders.remove(&id).is_none() {
                return Err(CoreError::NotFound("folder"));
            }
            for c in s.cards.values_mut() {
                if c.folder_id == Some(id) {
                    c.folder_id = None;
                }
            }
        }
        self.save().await
    }

    async fn add_card(
        &self,
        word: &str,
        meaning: &str,
        folder_id: Option<FolderId>,
        image_ref: Option<&str>,
    ) -> Result<Card, CoreError> {
        validate_text(word, meaning)?;
        let card = {
            let s = self.state.read();
            if let Some(fid) = folder_id {
                if !s.folders.contains_key(&fid) {
                    return Err(CoreError::NotFound("folder"));
                }
            }
            let mut c = Card::new(word, meaning);
            c.folder_id = folder_id;
            c.image_ref = image_ref.map(|s| s.to_string());
            c
        };
        {
            let mut s = self.state.write();
            s.cards.insert(card.id, card.clone());
        }
        self.save().await?;
        Ok(card)
    }

    async fn get_card(&self, id: CardId) -> Result<Card, CoreError> {
        let s = self.state.read();
        s.cards.get(&id).cloned().ok_or(CoreError::NotFound("card"))
    }

    async fn list_cards(&self, folder_id: Option<FolderId>) -> Result<Vec<Card>, CoreError> {
        let s = self.state.read();
        let mut v: Vec<Card> = s.cards.values().cloned().collect();
        if let Some(fid) = folder_id {
            v.retain(|c| c.folder_id == Some(fid));
        }
        Ok(v)
    }

    async fn update_card(&self, card: &Card) -> Result<Card, CoreError> {
        validate_text(&card.word, &card.meaning)?;
        {
            let mut s = self.state.write();
            if !s.cards.contains_key(&card.id) {
                return Err(CoreError::NotFound("card"));
            }
            s.cards.insert(card.id, card.clone());
        }
        self.save().await?;
        Ok(card.clone())
    }

    async fn delete_card(&self, id: CardId) -> Result<(), CoreError> {
        {
            let mut s = self.state.write();
            if s.cards.remove(&id).is_none() {
                return Err(CoreError::NotFound("card"));
            }
        }
        self.save().await
    }

    async fn move_to_folder(
        &self,
        ids: &[CardId],
        folder_id: Option<FolderId>,
    ) -> Result<(), CoreError> {
        {
            let mut s = self.state.write();
            if let Some(fid) = folder_id {
                if !s.folders.contains_key(&fid) {
                    return Err(CoreError::NotFound("folder"));
                }
            }
            for id in ids {
                let Some(card) = s.cards.get_mut(id) else {
                    return Err(CoreError::NotFound("card"));
                };
                card.folder_id = folder_id;
            }
        }
        self.save().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_store() -> (tempfile::TempDir, JsonStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open_with(
            dir.path().join("deck.json"),
            dir.path().join("backups"),
            3,
        )
        .await
        .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn cards_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.json");
        let backups = dir.path().join("backups");

        {
            let store = JsonStore::open_with(path.clone(), backups.clone(), 3)
                .await
                .unwrap();
            let f = store.create_folder("Spanish").await.unwrap();
            store
                .add_card("hola", "hello", Some(f.id), None)
                .await
                .unwrap();
        }

        let store = JsonStore::open_with(path, backups, 3).await.unwrap();
        let cards = store.list_cards(None).await.unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].word, "hola");
        assert_eq!(store.list_folders().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn scheduling_fields_round_trip() {
        let (_dir, store) = temp_store().await;
        let card = store.add_card("casa", "house", None, None).await.unwrap();

        let mut updated = card.clone();
        updated.strength = 3;
        updated.interval_days = 16;
        store.update_card(&updated).await.unwrap();

        let got = store.get_card(card.id).await.unwrap();
        assert_eq!(got.strength, 3);
        assert_eq!(got.interval_days, 16);
    }

    #[tokio::test]
    async fn backups_are_rotated() {
        let dir = tempfile::tempdir().unwrap();
        let backups = dir.path().join("backups");
        let store = JsonStore::open_with(dir.path().join("deck.json"), backups.clone(), 2)
            .await
            .unwrap();

        for i in 0..5 {
            store
                .add_card(format!("w{i}").as_str(), "m", None, None)
                .await
                .unwrap();
        }

        let count = fs::read_dir(&backups)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("json"))
            .count();
        assert!(count <= 2);
    }
}
