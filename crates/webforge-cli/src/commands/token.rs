use anyhow::{Context, Result, bail};
use std::io::BufRead;
use webforge_application::{AppContext, TokenService};

pub async fn save(context: &AppContext, owner: &str, token: Option<String>) -> Result<()> {
    let token = match token {
        Some(token) => token,
        None => read_token_from_stdin()?,
    };

    TokenService::new(context).save_token(owner, token.trim()).await?;
    println!("✅ Token saved for {}", owner);
    Ok(())
}

pub async fn fetch(context: &AppContext, owner: &str, reveal: bool) -> Result<()> {
    match TokenService::new(context).fetch_token(owner).await? {
        Some(token) if reveal => println!("{}", token.expose()),
        Some(token) => println!("{}", mask(token.expose())),
        None => println!("No token on file for {}", owner),
    }
    Ok(())
}

fn read_token_from_stdin() -> Result<String> {
    eprintln!("Paste the token and press Enter:");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read token from stdin")?;
    if line.trim().is_empty() {
        bail!("No token given");
    }
    Ok(line)
}

/// Keeps the first and last four characters of long tokens.
fn mask(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 8), tail)
}
