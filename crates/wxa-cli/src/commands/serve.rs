use std::sync::Arc;
use tracing::info;
use wxa_config::{SkillKeys, WxaConfig};
use wxa_core::Result;
use wxa_server::EchoSkill;

pub(super) async fn cmd_serve(mut config: WxaConfig, listen: Option<String>) -> Result<()> {
    if let Some(listen) = listen {
        config.server.listen = listen;
    }

    let keys = SkillKeys::resolve(&config.skill)?;
    info!(listen = %config.server.listen, "skill keys loaded");
    println!("🗣️  Echo skill listening on http://{}", config.server.listen);

    wxa_server::start_server(&config.server, keys, Arc::new(EchoSkill)).await
}
