use crate::{Card, CardId, CoreError, Folder, FolderId};
use async_trait::async_trait;

pub mod memory;

#[async_trait]
pub trait Repository: Send + Sync {
    // Folders
    async fn create_folder(&self, name: &str) -> Result<Folder, CoreError>;
    async fn get_folder(&self, id: FolderId) -> Result<Folder, CoreError>;
    async fn list_folders(&self) -> Result<Vec<Folder>, CoreError>;
    /// Deleting a folder un-files its cards; the cards themselves survive.
    async fn delete_folder(&self, id: FolderId) -> Result<(), CoreError>;

    // Cards
    async fn add_card(
        &self,
        word: &str,
        meaning: &str,
        folder_id: Option<FolderId>,
        image_ref: Option<&str>,
    ) -> Result<Card, CoreError>;

    async fn get_card(&self, id: CardId) -> Result<Card, CoreError>;
    async fn list_cards(&self, folder_id: Option<FolderId>) -> Result<Vec<Card>, CoreError>;
    async fn update_card(&self, card: &Card) -> Result<Card, CoreError>;
    async fn delete_card(&self, id: CardId) -> Result<(), CoreError>;
    async fn move_to_folder(
        &self,
        ids: &[CardId],
        folder_id: Option<FolderId>,
    ) -> Result<(), CoreError>;
}
