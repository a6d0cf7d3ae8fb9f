use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[command(name = "vocabdeck", version, about = "AI vocabulary flashcards with spaced repetition")]
pub struct Cli {
    /// Store file path (defaults to the app data dir)
    #[arg(long)]
    pub store_path: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Folder operations
    #[command(subcommand)]
    Folder(FolderCmd),
    /// Card operations
    #[command(subcommand)]
    Card(CardCmd),
    /// List cards due for review
    Due {
        #[arg(long)]
        folder: Option<String>,
    },
    /// Interactive study session over the due set
    Study(StudyCmd),
    /// AI generation for card explanations and images
    #[command(subcommand)]
    Generate(GenerateCmd),
    /// Import cards
    #[command(subcommand)]
    Import(ImportCmd),
    /// Export the whole deck
    #[command(subcommand)]
    Export(ExportCmd),
}

#[derive(Debug, Subcommand, Clone)]
pub enum FolderCmd {
    Add { name: String },
    List,
    Rm { folder: String },
}

#[derive(Debug, Subcommand, Clone)]
pub enum CardCmd {
    Add(CardAdd),
    List {
        #[arg(long)]
        folder: Option<String>,
        /// Substring match on word, meaning, or explanations
        #[arg(long)]
        search: Option<String>,
    },
    Rm { card_id: String },
    Edit(CardEdit),
    /// Move cards into a folder (or unfile them)
    Move(CardMove),
}

#[derive(Debug, Args, Clone)]
pub struct CardAdd {
    #[arg(long)]
    pub word: String,
    #[arg(long)]
    pub meaning: String,
    #[arg(long)]
    pub folder: Option<String>,
    #[arg(long)]
    pub image: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct CardEdit {
    pub card_id: String,
    #[arg(long)]
    pub word: Option<String>,
    #[arg(long)]
    pub meaning: Option<String>,
    /// Learner's own explanation note
    #[arg(long)]
    pub note: Option<String>,
    #[arg(long)]
    pub clear_note: bool,
    #[arg(long)]
    pub clear_image: bool,
}

#[derive(Debug, Args, Clone)]
pub struct CardMove {
    pub card_ids: Vec<String>,
    /// Target folder; omit to unfile
    #[arg(long)]
    pub folder: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct StudyCmd {
    #[arg(long)]
    pub folder: Option<String>,
    /// Seed the shuffle for a reproducible session order
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum GenerateCmd {
    /// Generate an AI explanation for one card
    Explanation {
        card_id: String,
        #[arg(long)]
        hint: Option<String>,
    },
    /// Generate an illustrative image for one card
    Image { card_id: String },
    /// Generate explanations for every card missing one
    Batch {
        #[arg(long)]
        folder: Option<String>,
        #[arg(long)]
        hint: Option<String>,
    },
}

#[derive(Debug, Subcommand, Clone)]
pub enum ImportCmd {
    /// CSV with word,meaning[,folder] records
    Csv { path: PathBuf },
}

#[derive(Debug, Subcommand, Clone)]
pub enum ExportCmd {
    Json { path: PathBuf },
}
