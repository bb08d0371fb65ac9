use anyhow::Result;
use webforge_application::{AppContext, ConversationService};

pub async fn run(context: &AppContext, input: &str, json: bool) -> Result<()> {
    let output = ConversationService::new(context).generate_once(input).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("💬 {}", output.explanation);
    for (label, body) in [
        ("html", &output.markup),
        ("css", &output.styling),
        ("js", &output.logic),
    ] {
        if let Some(body) = body.as_deref().filter(|b| !b.trim().is_empty()) {
            println!("\n--- {} ---\n{}", label, body);
        }
    }
    Ok(())
}
