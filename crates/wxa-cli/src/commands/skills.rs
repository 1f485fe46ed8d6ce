use clap::Args;
use std::path::PathBuf;
use tracing::debug;
use wxa_core::{Result, WxaError};
use wxa_skills_service::{Skill, SkillsClient};

#[derive(Args, Debug, Clone)]
pub(crate) struct CreateSkillArgs {
    /// Name of the skill
    #[arg(long)]
    name: String,

    /// Publicly reachable URL of the skill
    #[arg(long)]
    url: String,

    /// Contact email address for the skill
    #[arg(long)]
    contact: String,

    /// Public key PEM
    #[arg(long, conflicts_with = "public_key_file", required_unless_present = "public_key_file")]
    public_key: Option<String>,

    /// File holding the public key PEM
    #[arg(long)]
    public_key_file: Option<PathBuf>,

    /// Shared secret
    #[arg(long, conflicts_with = "secret_file", required_unless_present = "secret_file")]
    secret: Option<String>,

    /// File holding the shared secret
    #[arg(long)]
    secret_file: Option<PathBuf>,

    /// Supported language (repeatable)
    #[arg(long = "language", default_value = "en")]
    languages: Vec<String>,
}

impl CreateSkillArgs {
    /// The registration to send, with key material read from files if needed.
    fn into_skill(self) -> Result<Skill> {
        let public_key = read_value(self.public_key, self.public_key_file.as_ref(), "public key")?;
        let secret = read_value(self.secret, self.secret_file.as_ref(), "secret")?;
        Ok(Skill::registration(self.name, self.url, self.contact)
            .with_keys(public_key, secret.trim_end())
            .with_languages(self.languages))
    }
}

fn read_value(inline: Option<String>, file: Option<&PathBuf>, what: &str) -> Result<String> {
    let value = match (inline, file) {
        (Some(v), _) => v,
        (None, Some(path)) => std::fs::read_to_string(path).map_err(|e| {
            WxaError::Config(format!("cannot read {what} from {}: {e}", path.display()))
        })?,
        (None, None) => String::new(),
    };
    if value.trim().is_empty() {
        return Err(WxaError::Config(format!("{what} required")));
    }
    Ok(value)
}

pub(super) async fn cmd_list_skills(client: SkillsClient, json: bool) -> Result<()> {
    let skills = client.list_skills().await?;
    debug!(count = skills.len(), "listed skills");

    if json {
        println!("{}", serde_json::to_string_pretty(&skills)?);
        return Ok(());
    }

    if skills.is_empty() {
        println!("No skills registered for developer {}.", client.developer_id());
        return Ok(());
    }

    for skill in &skills {
        println!("{}", describe(skill));
    }
    Ok(())
}

pub(super) async fn cmd_create_skill(client: SkillsClient, args: CreateSkillArgs) -> Result<()> {
    let skill = client.create_skill(&args.into_skill()?).await?;
    println!(
        "✅ Skill {} created with URL {} (ID: {})",
        field(&skill.name),
        field(&skill.url),
        field(&skill.skill_id)
    );
    Ok(())
}

pub(super) async fn cmd_delete_skill(client: SkillsClient, id: &str, hard: bool) -> Result<()> {
    client.delete_skill(id, hard).await?;
    if hard {
        println!("🗑️  Skill {id} deleted");
    } else {
        println!("🗑️  Skill {id} soft deleted");
    }
    Ok(())
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

/// One line per skill, soft-deleted skills dimmed.
fn describe(skill: &Skill) -> String {
    let line = format!(
        "\x1b[1m{}\x1b[0m  ID: {}  URL: {}  Contact: {}",
        field(&skill.name),
        field(&skill.skill_id),
        field(&skill.url),
        field(&skill.contact_email),
    );
    if skill.is_deleted() {
        format!("\x1b[90m{line}  (SOFT DELETED)\x1b[0m")
    } else {
        line
    }
}
