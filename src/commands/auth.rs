use super::Context;
use anyhow::{bail, Result};
use std::io::{self, Write};

fn prompt(label: &str) -> io::Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn ask_if_missing(value: Option<String>, label: &str) -> Result<String> {
    let value = match value {
        Some(v) => v,
        None => prompt(label)?,
    };
    if value.is_empty() {
        bail!("{} is required", label);
    }
    Ok(value)
}

pub async fn login(mut ctx: Context, email: Option<String>, password: Option<String>) -> Result<()> {
    let email = ask_if_missing(email.or_else(|| ctx.config.email.clone()), "Email")?;
    let password = ask_if_missing(password, "Password")?;

    let credential = ctx.backend()?.login(&email, &password).await?;
    ctx.config.set_login(&email, &credential);
    ctx.config.backend_url = Some(ctx.backend_url.clone());
    ctx.config.save()?;

    println!("✓ Logged in as {}", email);
    Ok(())
}

pub async fn register(
    mut ctx: Context,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let email = ask_if_missing(email, "Email")?;
    let password = ask_if_missing(password, "Password")?;

    let credential = ctx.backend()?.register(&email, &password).await?;
    ctx.config.set_login(&email, &credential);
    ctx.config.backend_url = Some(ctx.backend_url.clone());
    ctx.config.save()?;

    println!("✓ Registered and logged in as {}", email);
    Ok(())
}

pub fn logout(mut ctx: Context) -> Result<()> {
    if ctx.config.token.is_none() {
        println!("Not logged in.");
        return Ok(());
    }
    ctx.config.clear_login();
    ctx.config.save()?;
    println!("✓ Logged out");
    Ok(())
}

pub fn status(ctx: &Context) -> Result<()> {
    println!("Backend: {}", ctx.backend_url);
    match (ctx.credential(), &ctx.config.email) {
        (Ok(_), Some(email)) => {
            let since = ctx
                .config
                .logged_in_at
                .map(|t| format!(" since {}", t.format("%Y-%m-%d %H:%M UTC")))
                .unwrap_or_default();
            println!("Logged in as {}{}", email, since);
        }
        (Ok(_), None) => println!("Using a token from the environment"),
        (Err(_), _) => println!("Not logged in. Run 'repofav login'."),
    }
    Ok(())
}
