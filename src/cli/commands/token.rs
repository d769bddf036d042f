use anyhow::Context;
use clap::{Subcommand, ValueEnum};
use serde_json::json;

use crate::auth::{DecodeError, TokenCodec, TokenIssuer, TokenKind, TokenPair, TokenPayload};
use crate::cli::OutputFormat;
use crate::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Access,
    Refresh,
}

impl From<KindArg> for TokenKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Access => TokenKind::Access,
            KindArg::Refresh => TokenKind::Refresh,
        }
    }
}

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Mint an access/refresh pair for a subject")]
    Issue {
        #[arg(help = "Subject (user) id")]
        subject: String,
    },

    #[command(about = "Verify a token with the configured secrets and print its payload")]
    Inspect {
        #[arg(help = "Encoded token")]
        token: String,
        #[arg(long, value_enum, default_value = "access", help = "Verification context")]
        kind: KindArg,
    },
}

pub async fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("failed to load token secrets")?;
    let codec = TokenCodec::from_config(&config.security);

    match cmd {
        TokenCommands::Issue { subject } => {
            let pair = TokenIssuer::new(codec.into()).issue(&subject)?;
            println!("{}", render_pair(&pair, output_format));
            Ok(())
        }
        TokenCommands::Inspect { token, kind } => {
            let context = TokenKind::from(kind);
            match codec.decode(&token, context) {
                Ok(payload) => {
                    println!("{}", render_payload(&payload, output_format));
                    if payload.kind != context {
                        anyhow::bail!("token is a {} token, not {}", payload.kind, context);
                    }
                    Ok(())
                }
                Err(DecodeError::Expired) => anyhow::bail!("token rejected: expired"),
                Err(DecodeError::Malformed(reason)) => anyhow::bail!("token rejected: malformed ({})", reason),
            }
        }
    }
}

fn render_pair(pair: &TokenPair, output_format: OutputFormat) -> String {
    match output_format {
        OutputFormat::Json => json!(pair).to_string(),
        OutputFormat::Text => format!(
            "access  ({}s): {}\nrefresh ({}s): {}",
            pair.access_expires_in, pair.access_token, pair.refresh_expires_in, pair.refresh_token
        ),
    }
}

fn render_payload(payload: &TokenPayload, output_format: OutputFormat) -> String {
    match output_format {
        OutputFormat::Json => json!({
            "subjectId": payload.subject_id,
            "kind": payload.kind,
            "issuedAt": payload.issued_at,
            "expiresAt": payload.expires_at,
            "tokenId": payload.token_id,
        })
        .to_string(),
        OutputFormat::Text => format!(
            "subject:    {}\nkind:       {}\nissued at:  {}\nexpires at: {}\ntoken id:   {}",
            payload.subject_id,
            payload.kind,
            payload.issued_at.to_rfc3339(),
            payload.expires_at.to_rfc3339(),
            payload.token_id
        ),
    }
}
