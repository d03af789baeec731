//! Subcommand handlers.

use gptweeter_ai::{ChatEngine, ImageClient, ImageOutput, ResponseFormat};
use gptweeter_common::GptweeterError;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

use crate::cli::ImageArgs;
use crate::tweets;

/// Read turns from stdin until EOF or `/quit`, printing each reply.
pub async fn chat(
    engine: &ChatEngine,
    model: Option<&str>,
    system: &str,
) -> Result<(), GptweeterError> {
    let mut session = engine.create_session(system, model)?;
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(format!("chatting with {} (/export, /quit)\n", session.model()).as_bytes())
        .await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "" => continue,
            "/quit" => break,
            "/export" => {
                let transcript = serde_json::to_string_pretty(&session.export())?;
                stdout.write_all(transcript.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
            }
            text => match session.chat(text).await {
                Ok(reply) => {
                    stdout.write_all(reply.as_bytes()).await?;
                    stdout.write_all(b"\n").await?;
                }
                Err(e) => {
                    warn!(error = %e, "chat turn failed");
                    stdout.write_all(format!("error: {e}\n").as_bytes()).await?;
                }
            },
        }
        stdout.flush().await?;
    }

    debug!(
        session = %session.id(),
        turns = session.message_count(),
        tokens = session.tracker().total_tokens(),
        "chat ended"
    );
    Ok(())
}

pub async fn tweets(
    engine: &ChatEngine,
    topic: Option<&str>,
    model: &str,
) -> Result<(), GptweeterError> {
    let feed = tweets::generate_feed(engine, topic, model).await;
    println!("{}", serde_json::to_string_pretty(&feed)?);
    Ok(())
}

pub async fn image(client: &ImageClient, args: &ImageArgs) -> Result<(), GptweeterError> {
    let mut request = client.request(args.prompt.as_str()).with_count(args.count);
    if let Some(backend) = args.backend {
        request = request.with_backend(backend);
    }
    if let Some(size) = args.size {
        request = request.with_size(size);
    }
    if args.b64 {
        request = request.with_format(ResponseFormat::B64Json);
    }

    if args.data_uri {
        println!("{}", client.generate_data_uri(&request).await?);
        return Ok(());
    }

    for output in client.generate(&request).await? {
        match output {
            ImageOutput::Url(url) => println!("{url}"),
            bytes @ ImageOutput::Bytes(_) => println!("{}", client.to_data_uri(&bytes).await?),
        }
    }
    Ok(())
}
