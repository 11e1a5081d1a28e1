//! Photo analysis and assistant chat.
//!
//! The transcript is kept in the store between invocations, so successive
//! `chat` calls continue the same conversation. A new analysis starts a
//! fresh one around its result.

use std::path::PathBuf;

use clap::Args;
use snapcare_core::assistant::AssistantBackend;
use snapcare_core::capture::take_photo;
use snapcare_core::storage::kv::{load_json, save_json};
use snapcare_core::{Config, Conversation, CoreError, FileCamera, HttpBackend, SimulatedBackend};

use super::{open_store, CmdResult};

const CONVERSATION_KEY: &str = "conversation";

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Photo of the injury or condition
    image: PathBuf,
    /// Print the full result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
pub struct ChatArgs {
    /// Message for the assistant
    message: String,
    /// Answer from canned replies instead of the remote service
    #[arg(long)]
    offline: bool,
    /// Drop the stored transcript and start over
    #[arg(long)]
    reset: bool,
}

fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

pub fn analyze(args: AnalyzeArgs) -> CmdResult {
    let config = Config::load_or_default();
    let mut store = open_store()?;

    let photo = take_photo(&mut FileCamera::new(args.image))?;
    let backend = HttpBackend::from_config(&config.backend)?;
    println!("Analyzing {}...", photo.file_name());
    let result = runtime()?.block_on(backend.analyze(&photo))?;

    let mut conv = Conversation::new(&config.assistant.greeting);
    conv.attach_diagnosis(result.clone());
    save_json(&mut store, CONVERSATION_KEY, &conv)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.summary());
    }
    Ok(())
}

pub fn chat(args: ChatArgs) -> CmdResult {
    let config = Config::load_or_default();
    let mut store = open_store()?;

    let stored = if args.reset {
        None
    } else {
        load_json::<Conversation, _>(&store, CONVERSATION_KEY)?
    };
    let mut conv = stored.unwrap_or_else(|| Conversation::new(&config.assistant.greeting));

    let sent = if args.offline {
        let backend = SimulatedBackend::default().resume_at(conv.user_turns());
        send(&backend, &mut conv, &args.message)
    } else {
        let backend = HttpBackend::from_config(&config.backend)?;
        send(&backend, &mut conv, &args.message)
    };
    save_json(&mut store, CONVERSATION_KEY, &conv)?;

    println!("{}", sent?);
    Ok(())
}

fn send<B: AssistantBackend>(
    backend: &B,
    conv: &mut Conversation,
    message: &str,
) -> Result<String, CoreError> {
    runtime()?.block_on(async {
        let reply = conv.send(backend, message).await?;
        Ok::<_, CoreError>(reply.text.clone())
    })
}
