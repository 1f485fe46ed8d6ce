//! Plays the assistant platform against a running skill: builds a message,
//! seals it with the skill's public key and secret, and shows what comes back.

use clap::Args;
use rand::RngCore;
use rand::rngs::OsRng;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

use wxa_config::{SenderKeys, WxaConfig};
use wxa_core::{
    Params, Result, SKILL_INTRO, SignedRequest, WebexAssistantHealthResponse,
    WebexAssistantMessage, WebexAssistantResponse, WxaError,
};

const CHALLENGE_BYTES: usize = 32;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// URL of the skill
    #[arg(long, default_value = "http://localhost:8080")]
    url: String,

    /// What the user says
    #[arg(long, default_value = "Hello World.")]
    text: String,

    /// Send the intro turn
    #[arg(long, conflicts_with = "health")]
    intro: bool,

    /// Send a health-check challenge instead of a message
    #[arg(long)]
    health: bool,

    /// Public key file (overrides the configured key)
    #[arg(long)]
    public_key_file: Option<PathBuf>,

    /// Secret file (overrides the configured secret)
    #[arg(long)]
    secret_file: Option<PathBuf>,
}

/// A fresh random challenge, hex encoded.
pub fn generate_challenge() -> String {
    let mut buf = [0u8; CHALLENGE_BYTES];
    OsRng.fill_bytes(&mut buf);
    hex::encode(buf)
}

pub fn build_message(text: &str, challenge: &str, intro: bool) -> WebexAssistantMessage {
    WebexAssistantMessage {
        text: text.to_string(),
        challenge: challenge.to_string(),
        params: Params {
            target_dialogue_state: intro.then(|| SKILL_INTRO.to_string()),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Encrypt `plaintext` for the skill and sign the envelope.
pub fn seal(plaintext: &str, keys: &SenderKeys) -> Result<SignedRequest> {
    let message = wxa_crypto::encrypt(&keys.public_key, plaintext)?;
    let signature = wxa_crypto::sign_base64(keys.secret.as_bytes(), &message);
    Ok(SignedRequest { signature, message })
}

/// POST a sealed message; returns the skill's response.
async fn send_message(
    http: &reqwest::Client,
    url: &str,
    keys: &SenderKeys,
    message: &WebexAssistantMessage,
) -> Result<WebexAssistantResponse> {
    let sealed = seal(&serde_json::to_string(message)?, keys)?;
    let resp = http
        .post(url)
        .json(&sealed)
        .send()
        .await
        .map_err(|e| WxaError::Http(e.to_string()))?;
    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| WxaError::Http(e.to_string()))?;
    debug!(%status, bytes = body.len(), "skill responded");

    if !status.is_success() {
        return Err(WxaError::Http(format!("skill returned {status}: {}", body.trim())));
    }
    Ok(serde_json::from_str(&body)?)
}

/// GET a sealed challenge; returns the health response.
async fn send_health_check(
    http: &reqwest::Client,
    url: &str,
    keys: &SenderKeys,
    challenge: &str,
) -> Result<WebexAssistantHealthResponse> {
    let sealed = seal(challenge, keys)?;
    let resp = http
        .get(url)
        .query(&[
            ("signature", sealed.signature.as_str()),
            ("challenge", sealed.message.as_str()),
        ])
        .send()
        .await
        .map_err(|e| WxaError::Http(e.to_string()))?;
    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| WxaError::Http(e.to_string()))?;

    if !status.is_success() {
        return Err(WxaError::Http(format!("skill returned {status}: {}", body.trim())));
    }
    Ok(serde_json::from_str(&body)?)
}

pub(super) async fn cmd_simulate(config: &WxaConfig, args: SimulateArgs) -> Result<()> {
    let mut skill = config.skill.clone();
    if let Some(path) = args.public_key_file {
        skill.public_key = None;
        skill.public_key_file = path;
    }
    if let Some(path) = args.secret_file {
        skill.secret = None;
        skill.secret_file = path;
    }
    let keys = SenderKeys::resolve(&skill)?;

    let http = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| WxaError::Http(e.to_string()))?;
    let challenge = generate_challenge();

    if args.health {
        println!("🩺 Health check → {}", args.url);
        let health = send_health_check(&http, &args.url, &keys, &challenge).await?;
        if health.challenge == challenge {
            println!("✅ Challenge echoed, status {}", health.status);
        } else {
            warn!("health check returned a different challenge");
            println!("❌ Challenge mismatch (status {})", health.status);
        }
        return Ok(());
    }

    let message = build_message(&args.text, &challenge, args.intro);
    println!("📨 Sending to {}", args.url);
    let response = send_message(&http, &args.url, &keys, &message).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    if response.challenge != challenge {
        println!("⚠️  Response challenge does not match the one sent");
    }
    Ok(())
}
