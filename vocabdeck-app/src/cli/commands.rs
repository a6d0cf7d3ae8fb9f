use crate::cli::opts::*;

use anyhow::{anyhow, bail, Result};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;
use uuid::Uuid;
use vocabdeck_core::{
    filters::{filter_by_text, filter_due},
    Card, Folder, FolderId, Generator, Outcome, Repository, Session, SessionState,
};
use vocabdeck_gemini::GeminiClient;
use vocabdeck_json::JsonStore;

pub async fn run_cli(args: Cli) -> Result<()> {
    let repo = open_store(args.store_path).await?;
    match args.cmd {
        Command::Folder(cmd) => folder_cmd(repo, cmd).await,
        Command::Card(cmd) => card_cmd(repo, cmd).await,
        Command::Due { folder } => due_cmd(repo, folder).await,
        Command::Study(cmd) => study_cmd(repo, cmd).await,
        Command::Generate(cmd) => generate_cmd(repo, cmd).await,
        Command::Import(cmd) => import_cmd(repo, cmd).await,
        Command::Export(cmd) => export_cmd(repo, cmd).await,
    }
}

async fn open_store(path: Option<PathBuf>) -> Result<Arc<dyn Repository>> {
    let store = match path {
        Some(p) => {
            let backups = p
                .parent()
                .map(|d| d.join("backups"))
                .unwrap_or_else(|| PathBuf::from("backups"));
            JsonStore::open_with(p, backups, 10).await?
        }
        None => JsonStore::open_default().await?,
    };
    Ok(Arc::new(store))
}

async fn folder_cmd(repo: Arc<dyn Repository>, cmd: FolderCmd) -> Result<()> {
    match cmd {
        FolderCmd::Add { name } => {
            let f = repo.create_folder(&name).await?;
            println!("{}", f.id);
        }
        FolderCmd::List => {
            let mut v = repo.list_folders().await?;
            v.sort_by_key(|f| f.created_at);
            for f in v {
                let count = repo.list_cards(Some(f.id)).await?.len();
                println!("{}\t{}\t{} card(s)", f.id, f.name, count);
            }
        }
        FolderCmd::Rm { folder } => {
            let f = resolve_folder(&*repo, &folder).await?;
            repo.delete_folder(f.id).await?;
            println!("ok");
        }
    }
    Ok(())
}

async fn card_cmd(repo: Arc<dyn Repository>, cmd: CardCmd) -> Result<()> {
    match cmd {
        CardCmd::Add(a) => {
            let folder_id = match a.folder {
                Some(sel) => Some(resolve_folder(&*repo, &sel).await?.id),
                None => None,
            };
            let c = repo
                .add_card(&a.word, &a.meaning, folder_id, a.image.as_deref())
                .await?;
            println!("{}", c.id);
        }
        CardCmd::List { folder, search } => {
            let folder_id = match folder {
                Some(sel) => Some(resolve_folder(&*repo, &sel).await?.id),
                None => None,
            };
            let mut cards = repo.list_cards(folder_id).await?;
            if let Some(q) = search {
                cards = filter_by_text(&cards, &q);
            }
            cards.sort_by_key(|c| c.created_at);
            for c in cards {
                println!(
                    "{}\t{}\t{}\tstrength={}\tdue={}",
                    c.id,
                    c.word,
                    c.meaning,
                    c.strength,
                    c.next_review_at.date_naive()
                );
            }
        }
        CardCmd::Rm { card_id } => {
            let id = parse_uuid(&card_id)?;
            repo.delete_card(id).await?;
            println!("ok");
        }
        CardCmd::Edit(e) => {
            let id = parse_uuid(&e.card_id)?;
            let mut card = repo.get_card(id).await?;

            if let Some(w) = e.word {
                card.word = w;
            }
            if let Some(m) = e.meaning {
                card.meaning = m;
            }
            if e.clear_note {
                card.explanation = None;
            }
            if let Some(n) = e.note {
                card.explanation = Some(n);
            }
            if e.clear_image {
                card.image_ref = None;
            }

            let _ = repo.update_card(&card).await?;
            println!("ok");
        }
        CardCmd::Move(m) => {
            let ids = m
                .card_ids
                .iter()
                .map(|s| parse_uuid(s))
                .collect::<Result<Vec<_>>>()?;
            let folder_id = match m.folder {
                Some(sel) => Some(resolve_folder(&*repo, &sel).await?.id),
                None => None,
            };
            repo.move_to_folder(&ids, folder_id).await?;
            println!("ok");
        }
    }
    Ok(())
}

async fn due_cmd(repo: Arc<dyn Repository>, folder: Option<String>) -> Result<()> {
    let folder_id = match folder {
        Some(sel) => Some(resolve_folder(&*repo, &sel).await?.id),
        None => None,
    };
    let due = current_due(&*repo, folder_id).await?;
    for c in &due {
        println!("{}\t{}\tstrength={}", c.id, c.word, c.strength);
    }
    println!("{} card(s) due", due.len());
    Ok(())
}

async fn study_cmd(repo: Arc<dyn Repository>, cmd: StudyCmd) -> Result<()> {
    let folder_id = match cmd.folder {
        Some(sel) => Some(resolve_folder(&*repo, &sel).await?.id),
        None => None,
    };
    let mut rng = match cmd.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let due = current_due(&*repo, folder_id).await?;
    if due.is_empty() {
        println!("no cards due, come back tomorrow");
        return Ok(());
    }
    let mut session = Session::start(&due, &mut rng);

    while session.state() == SessionState::InProgress {
        let card = session
            .current()
            .cloned()
            .expect("in-progress session has a current card");

        println!("\n{} card(s) left in this session", session.remaining());
        println!("Q: {}", card.word);
        prompt_enter("[enter=show]")?;
        session.flip();
        println!("A: {}", card.meaning);
        if let Some(e) = &card.ai_explanation {
            println!("ai: {e}");
        }
        if let Some(e) = &card.explanation {
            println!("note: {e}");
        }

        println!("[r=remembered, f=forgot, q=quit]");
        let outcome = loop {
            let line = read_line("> ")?;
            match line.trim().to_lowercase().as_str() {
                "r" | "remembered" | "y" => break Outcome::Correct,
                "f" | "forgot" | "n" => break Outcome::Incorrect,
                "q" | "quit" => return Ok(()),
                _ => println!("enter r, f, or q"),
            }
        };

        let today = Utc::now().date_naive();
        if let Some(updated) = session.review(outcome, today) {
            repo.update_card(&updated).await?;
        }

        // Pick up cards added, removed, or rescheduled outside the session.
        let due_now = current_due(&*repo, folder_id).await?;
        if session.resync(&due_now, &mut rng) {
            tracing::debug!("due set changed externally, session restarted");
        }
    }

    println!("\nall done for now");
    Ok(())
}

async fn generate_cmd(repo: Arc<dyn Repository>, cmd: GenerateCmd) -> Result<()> {
    let gen = Arc::new(GeminiClient::from_env()?);
    match cmd {
        GenerateCmd::Explanation { card_id, hint } => {
            let id = parse_uuid(&card_id)?;
            let mut card = repo.get_card(id).await?;
            let text = gen
                .generate_explanation(&card.word, &card.meaning, hint.as_deref())
                .await?;
            card.ai_explanation = Some(text.clone());
            repo.update_card(&card).await?;
            println!("{text}");
        }
        GenerateCmd::Image { card_id } => {
            let id = parse_uuid(&card_id)?;
            let mut card = repo.get_card(id).await?;
            let image = gen.generate_image(&card.word, &card.meaning).await?;
            card.image_ref = Some(image);
            repo.update_card(&card).await?;
            println!("ok");
        }
        GenerateCmd::Batch { folder, hint } => {
            let folder_id = match folder {
                Some(sel) => Some(resolve_folder(&*repo, &sel).await?.id),
                None => None,
            };
            let cards: Vec<Card> = repo
                .list_cards(folder_id)
                .await?
                .into_iter()
                .filter(|c| c.ai_explanation.is_none())
                .collect();
            if cards.is_empty() {
                println!("nothing to generate");
                return Ok(());
            }

            // One task per card; each succeeds or fails on its own.
            let mut set: JoinSet<(Card, std::result::Result<String, vocabdeck_core::GenerationError>)> =
                JoinSet::new();
            for card in cards {
                let g = gen.clone();
                let hint = hint.clone();
                set.spawn(async move {
                    let r = g
                        .generate_explanation(&card.word, &card.meaning, hint.as_deref())
                        .await;
                    (card, r)
                });
            }

            let (mut ok, mut failed) = (0usize, 0usize);
            while let Some(joined) = set.join_next().await {
                let (mut card, result) = joined?;
                match result {
                    Ok(text) => {
                        card.ai_explanation = Some(text);
                        repo.update_card(&card).await?;
                        ok += 1;
                    }
                    Err(e) => {
                        tracing::warn!(word = %card.word, error = %e, "generation failed");
                        println!("failed: {} ({e})", card.word);
                        failed += 1;
                    }
                }
            }
            println!("generated {ok}, failed {failed}");
        }
    }
    Ok(())
}

async fn import_cmd(repo: Arc<dyn Repository>, cmd: ImportCmd) -> Result<()> {
    match cmd {
        ImportCmd::Csv { path } => {
            let mut rdr = csv::ReaderBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_path(&path)?;
            let mut count = 0usize;
            for rec in rdr.records() {
                let rec = rec?;
                let word = rec.get(0).unwrap_or("").trim();
                let meaning = rec.get(1).unwrap_or("").trim();
                if word.is_empty() || meaning.is_empty() {
                    continue;
                }
                let folder_name = rec.get(2).map(str::trim).filter(|s| !s.is_empty());
                let folder_id = match folder_name {
                    Some(name) => Some(ensure_folder_by_name(&*repo, name).await?.id),
                    None => None,
                };
                repo.add_card(word, meaning, folder_id, None).await?;
                count += 1;
            }
            println!("imported {count} card(s)");
        }
    }
    Ok(())
}

async fn export_cmd(repo: Arc<dyn Repository>, cmd: ExportCmd) -> Result<()> {
    match cmd {
        ExportCmd::Json { path } => {
            let folders = repo.list_folders().await?;
            let mut cards = repo.list_cards(None).await?;
            cards.sort_by_key(|c| c.created_at);
            let bundle = ExportBundle {
                version: 1,
                folders,
                cards,
            };
            let s = serde_json::to_string_pretty(&bundle)?;
            std::fs::write(&path, s)?;
            println!("wrote {}", path.display());
        }
    }
    Ok(())
}

// ===== Helpers =====

async fn current_due<R: Repository + ?Sized>(
    repo: &R,
    folder_id: Option<FolderId>,
) -> Result<Vec<Card>> {
    let cards = repo.list_cards(folder_id).await?;
    Ok(filter_due(&cards, Utc::now()))
}

fn parse_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|_| anyhow!("invalid uuid"))
}

async fn resolve_folder<R: Repository + ?Sized>(repo: &R, sel: &str) -> Result<Folder> {
    if let Ok(id) = Uuid::parse_str(sel) {
        if let Ok(f) = repo.get_folder(id).await {
            return Ok(f);
        }
    }
    let folders = repo.list_folders().await?;
    if let Some(f) = folders.into_iter().find(|f| f.name.eq_ignore_ascii_case(sel)) {
        return Ok(f);
    }
    bail!("folder not found: {}", sel)
}

async fn ensure_folder_by_name<R: Repository + ?Sized>(repo: &R, name: &str) -> Result<Folder> {
    let folders = repo.list_folders().await?;
    if let Some(f) = folders.into_iter().find(|f| f.name.eq_ignore_ascii_case(name)) {
        return Ok(f);
    }
    Ok(repo.create_folder(name).await?)
}

fn prompt_enter(label: &str) -> Result<()> {
    print!("{label}");
    stdout().flush().ok();
    let mut s = String::new();
    stdin().read_line(&mut s)?;
    Ok(())
}

fn read_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    stdout().flush().ok();
    let mut s = String::new();
    stdin().read_line(&mut s)?;
    Ok(s)
}

#[derive(serde::Serialize, serde::Deserialize)]
struct ExportBundle {
    version: u32,
    folders: Vec<Folder>,
    cards: Vec<Card>,
}
