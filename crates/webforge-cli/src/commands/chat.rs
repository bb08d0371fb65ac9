use anyhow::Result;
use webforge_application::{AppContext, ConversationService};
use webforge_core::conversation::{Artifact, TurnAuthor};

pub async fn create(context: &AppContext, owner: &str, name: Option<&str>) -> Result<()> {
    let doc = ConversationService::new(context)
        .create_conversation(owner, name)
        .await?;
    println!("✅ Created '{}'", doc.display_name);
    println!("{}", doc.id);
    Ok(())
}

pub async fn list(context: &AppContext, owner: &str) -> Result<()> {
    let summaries = ConversationService::new(context)
        .list_conversations(owner)
        .await?;

    if summaries.is_empty() {
        println!("No conversations for {}", owner);
        return Ok(());
    }
    for summary in summaries {
        println!("{}  {}", summary.id, summary.display_name);
    }
    Ok(())
}

pub async fn show(context: &AppContext, id: &str, json: bool) -> Result<()> {
    let doc = ConversationService::new(context).get_conversation(id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!("📄 {} ({})", doc.display_name, doc.id);
    println!("   created {}  updated {}", doc.created_at, doc.updated_at);
    for turn in &doc.turns {
        let label = match turn.author {
            TurnAuthor::User => "you",
            TurnAuthor::Assistant => "ai ",
        };
        println!("\n[{}] {}", label, turn.text);
    }
    print_artifact(&doc.artifact);
    Ok(())
}

pub async fn rename(context: &AppContext, id: &str, name: &str) -> Result<()> {
    let doc = ConversationService::new(context)
        .rename_conversation(id, name)
        .await?;
    println!("✅ Renamed to '{}'", doc.display_name);
    Ok(())
}

pub async fn delete(context: &AppContext, id: &str) -> Result<()> {
    ConversationService::new(context)
        .delete_conversation(id)
        .await?;
    println!("🗑️  Deleted {}", id);
    Ok(())
}

pub async fn send(
    context: &AppContext,
    owner: &str,
    id: &str,
    message: &str,
    json: bool,
) -> Result<()> {
    let response = ConversationService::new(context)
        .post_message(owner, id, message)
        .await?;

    if json {
        let value = serde_json::json!({
            "name": response.effective_name,
            "explanation": response.assistant_turn.text,
            "artifact": response.artifact,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("💬 {}", response.assistant_turn.text);
    println!("   (conversation: {})", response.effective_name);
    print_artifact(&response.artifact);
    Ok(())
}

fn print_artifact(artifact: &Artifact) {
    for (label, body) in [
        ("html", &artifact.markup),
        ("css", &artifact.styling),
        ("js", &artifact.logic),
    ] {
        if !body.trim().is_empty() {
            println!("\n--- {} ---\n{}", label, body);
        }
    }
}
