mod config;

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use stow_aws::AwsClients;
use stow_core::{
    ClientConfig, DeleteMessageRequest, ExtendedClient, MessageAttribute, ReceiveMessageRequest,
    SendMessageRequest, SqsEvent,
};

#[derive(Parser)]
#[command(name = "stow", about = "Queue client that offloads large message bodies to S3")]
struct Cli {
    /// Config file (defaults to ./stow.toml, then /etc/stow/stow.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Queue URL, overriding the config file
    #[arg(long, global = true, env = "STOW_QUEUE_URL")]
    queue_url: Option<String>,

    /// Bucket for offloaded bodies, overriding the config file
    #[arg(long, global = true, env = "STOW_BUCKET")]
    bucket: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a message, offloading the body if it is too large
    Send {
        /// Message body
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        body: Option<String>,

        /// Read the message body from a file
        #[arg(long)]
        file: Option<PathBuf>,

        /// String attribute as NAME=VALUE (repeatable)
        #[arg(long = "attribute", value_parser = parse_attribute)]
        attributes: Vec<(String, String)>,

        /// Delivery delay in seconds
        #[arg(long)]
        delay: Option<i32>,
    },

    /// Receive messages and print them as JSON
    Receive {
        /// Maximum number of messages (1-10)
        #[arg(long, default_value = "1")]
        max: i32,

        /// Long-poll wait time in seconds
        #[arg(long)]
        wait: Option<i32>,

        /// Attribute name to return (repeatable, "All" for every attribute)
        #[arg(long = "attribute")]
        attributes: Vec<String>,

        /// Delete each message after printing it
        #[arg(long)]
        delete: bool,
    },

    /// Delete a message and its offloaded body
    Delete {
        /// Receipt handle as returned by `receive`
        receipt_handle: String,
    },

    /// Delete only the offloaded body referenced by a receipt handle
    Cleanup {
        /// Receipt handle as returned by `receive`
        receipt_handle: String,
    },

    /// Restore offloaded bodies in a serverless event payload and print it
    ResolveEvent {
        /// Event JSON file
        path: PathBuf,
    },

    /// Delete the offloaded bodies referenced by a serverless event payload
    FinalizeEvent {
        /// Event JSON file
        path: PathBuf,
    },
}

fn parse_attribute(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got {raw:?}")),
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {message}");
    process::exit(1);
}

fn require_queue_url(config: &ClientConfig) -> String {
    match &config.queue.queue_url {
        Some(url) => url.clone(),
        None => fail("no queue URL configured (use --queue-url or [queue] queue_url)"),
    }
}

fn read_event(path: &PathBuf) -> SqsEvent {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => fail(format!("cannot read {}: {e}", path.display())),
    };
    match serde_json::from_str(&contents) {
        Ok(event) => event,
        Err(e) => fail(format!("cannot parse {}: {e}", path.display())),
    }
}

async fn cmd_send(
    client: &ExtendedClient,
    queue_url: String,
    body: String,
    attributes: Vec<(String, String)>,
    delay: Option<i32>,
) {
    let mut request = SendMessageRequest::new(queue_url, body);
    request.delay_seconds = delay;
    for (name, value) in attributes {
        request = request.with_attribute(name, MessageAttribute::string(value));
    }

    match client.send_message(request).await {
        Ok(output) => println!(
            "Sent message {}",
            output.message_id.as_deref().unwrap_or("(no id)")
        ),
        Err(e) => fail(e),
    }
}

async fn cmd_receive(
    client: &ExtendedClient,
    queue_url: String,
    max: i32,
    wait: Option<i32>,
    attributes: Vec<String>,
    delete: bool,
) {
    let mut request = ReceiveMessageRequest::new(queue_url.clone()).with_max_messages(max);
    request.wait_time_seconds = wait;
    request.attribute_names = attributes;

    let batch = match client.receive_message(request).await {
        Ok(batch) => batch,
        Err(e) => fail(e),
    };
    if batch.is_empty() {
        eprintln!("No messages available.");
        return;
    }

    let mut failed = 0;
    for outcome in batch.messages {
        let message = match outcome {
            Ok(message) => message,
            Err(e) => {
                eprintln!("Error: {e}");
                failed += 1;
                continue;
            }
        };

        match serde_json::to_string_pretty(&message) {
            Ok(json) => println!("{json}"),
            Err(e) => fail(e),
        }

        if delete {
            let request = DeleteMessageRequest::new(queue_url.clone(), message.receipt_handle);
            if let Err(e) = client.delete_message(request).await {
                eprintln!("Error: {e}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        process::exit(1);
    }
}

async fn cmd_delete(client: &ExtendedClient, queue_url: String, receipt_handle: String) {
    match client
        .delete_message(DeleteMessageRequest::new(queue_url, receipt_handle))
        .await
    {
        Ok(()) => println!("Deleted message"),
        Err(e) => fail(e),
    }
}

async fn cmd_cleanup(client: &ExtendedClient, receipt_handle: String) {
    match client.cleanup(&receipt_handle).await {
        Ok(()) => println!("Cleaned up offloaded body"),
        Err(e) => fail(e),
    }
}

async fn cmd_resolve_event(client: &ExtendedClient, path: PathBuf) {
    let event = read_event(&path);

    let mut records = Vec::with_capacity(event.records.len());
    for (index, outcome) in client
        .resolve_records(event.records)
        .await
        .into_iter()
        .enumerate()
    {
        match outcome {
            Ok(record) => records.push(record),
            Err(e) => fail(format!("record {index}: {e}")),
        }
    }

    match serde_json::to_string_pretty(&SqsEvent { records }) {
        Ok(json) => println!("{json}"),
        Err(e) => fail(e),
    }
}

async fn cmd_finalize_event(client: &ExtendedClient, path: PathBuf) {
    let event = read_event(&path);

    let outcomes = client.finalize_records(&event.records).await;
    let mut failed = 0;
    for (index, outcome) in outcomes.into_iter().enumerate() {
        if let Err(e) = outcome {
            eprintln!("Error: record {index}: {e}");
            failed += 1;
        }
    }

    if failed > 0 {
        process::exit(1);
    }
    println!(
        "Finalized {} record{}",
        event.records.len(),
        if event.records.len() == 1 { "" } else { "s" }
    );
}

#[tokio::main]
async fn main() {
    stow_core::telemetry::init_tracing();
    let cli = Cli::parse();

    let mut config = match config::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => fail(e),
    };
    if cli.queue_url.is_some() {
        config.queue.queue_url = cli.queue_url;
    }
    if cli.bucket.is_some() {
        config.offload.bucket_name = cli.bucket;
    }

    let aws = AwsClients::from_config(&config.aws).await;
    let client = ExtendedClient::from_config(
        Arc::new(aws.queue),
        Arc::new(aws.store),
        &config.offload,
    );

    match cli.command {
        Commands::Send {
            body,
            file,
            attributes,
            delay,
        } => {
            let body = match (body, file) {
                (Some(body), _) => body,
                (None, Some(path)) => match std::fs::read_to_string(&path) {
                    Ok(body) => body,
                    Err(e) => fail(format!("cannot read {}: {e}", path.display())),
                },
                (None, None) => fail("either --body or --file is required"),
            };
            cmd_send(&client, require_queue_url(&config), body, attributes, delay).await
        }
        Commands::Receive {
            max,
            wait,
            attributes,
            delete,
        } => {
            cmd_receive(
                &client,
                require_queue_url(&config),
                max,
                wait,
                attributes,
                delete,
            )
            .await
        }
        Commands::Delete { receipt_handle } => {
            cmd_delete(&client, require_queue_url(&config), receipt_handle).await
        }
        Commands::Cleanup { receipt_handle } => cmd_cleanup(&client, receipt_handle).await,
        Commands::ResolveEvent { path } => cmd_resolve_event(&client, path).await,
        Commands::FinalizeEvent { path } => cmd_finalize_event(&client, path).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_argument_parses_name_and_value() {
        assert_eq!(
            parse_attribute("tenant=acme").unwrap(),
            ("tenant".to_string(), "acme".to_string())
        );
        assert_eq!(
            parse_attribute("expr=a=b").unwrap(),
            ("expr".to_string(), "a=b".to_string())
        );
        assert!(parse_attribute("novalue").is_err());
        assert!(parse_attribute("=value").is_err());
    }

    #[test]
    fn cli_parses_send_with_attributes() {
        let cli = Cli::try_parse_from([
            "stow",
            "--queue-url",
            "https://queue",
            "send",
            "--body",
            "hello",
            "--attribute",
            "a=1",
            "--attribute",
            "b=2",
        ])
        .unwrap();
        assert_eq!(cli.queue_url.as_deref(), Some("https://queue"));
        match cli.command {
            Commands::Send {
                body, attributes, ..
            } => {
                assert_eq!(body.as_deref(), Some("hello"));
                assert_eq!(attributes.len(), 2);
            }
            _ => panic!("expected send"),
        }
    }

    #[test]
    fn cli_send_requires_a_body_source() {
        assert!(Cli::try_parse_from(["stow", "send"]).is_err());
        assert!(
            Cli::try_parse_from(["stow", "send", "--body", "x", "--file", "f"]).is_err()
        );
    }

    #[test]
    fn cli_parses_receive_defaults() {
        let cli = Cli::try_parse_from(["stow", "receive"]).unwrap();
        match cli.command {
            Commands::Receive {
                max,
                wait,
                attributes,
                delete,
            } => {
                assert_eq!(max, 1);
                assert_eq!(wait, None);
                assert!(attributes.is_empty());
                assert!(!delete);
            }
            _ => panic!("expected receive"),
        }
    }
}
