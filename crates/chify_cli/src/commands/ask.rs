//! Ask command - One question to the Rehab AI Guide.

use anyhow::Result;
use clap::Args;
use tracing::info;

use chify_chat::ChatWidget;

use super::{text_generator, Cli};

#[derive(Args)]
pub struct AskArgs {
    /// Question to ask
    #[arg(value_parser = non_blank)]
    prompt: String,

    /// Answer with canned replies instead of calling the API
    #[arg(long)]
    offline: bool,
}

pub async fn execute(args: &AskArgs, cli: &Cli) -> Result<()> {
    let config = cli.site_config()?;
    let mut widget = ChatWidget::new(text_generator(&config, args.offline)?);

    info!("Asking the Rehab AI Guide");
    match widget.send_and_wait(&args.prompt).await {
        Some(reply) => {
            println!("{}", reply.text);
            Ok(())
        }
        None => anyhow::bail!("Prompt was not sent"),
    }
}

fn non_blank(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        Err("prompt must not be blank".to_string())
    } else {
        Ok(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_blank_prompt_rejected_by_parser() {
        assert!(Cli::try_parse_from(["chify", "ask", "   "]).is_err());
        assert!(Cli::try_parse_from(["chify", "ask", "Is swimming good for my back?"]).is_ok());
    }

    #[tokio::test]
    async fn test_offline_answer() {
        let cli = Cli::try_parse_from(["chify", "ask", "--offline", "Hello"]).unwrap();
        let args = match &cli.command {
            crate::commands::Commands::Ask(args) => args,
            _ => unreachable!(),
        };
        assert!(execute(args, &cli).await.is_ok());
    }
}
