use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{
    config::load_settings_from, load_settings, ActionContext, ActionOptions, ActionOutcome,
    HttpTransport, MemoryStore, TracingAuditSink, TracingNotifier,
};
use serde_json::Value;
use shared::{
    domain::{LinkId, LinkType, PostId},
    protocol::{Credentials, RegainAccountRequest, RegistrationInfo},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Args {
    /// Overrides `api_base_url` from settings.
    #[arg(long)]
    api_url: Option<String>,
    /// Settings file; defaults to `client.toml` plus `APP__*` variables.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Treat the session as authenticated for link removal and voting.
    #[arg(long)]
    logged_in: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    RegainAccount {
        #[arg(long)]
        new_password: String,
        #[arg(long)]
        reset_uid: String,
        #[arg(long)]
        secret_key: String,
    },
    VerifyRecaptcha {
        #[arg(long)]
        response: String,
    },
    CreateLink {
        #[arg(long)]
        post_id: String,
        #[arg(long)]
        url: String,
        #[arg(long = "type", default_value = "link")]
        link_type: String,
    },
    RemoveLink {
        #[arg(long)]
        id: Option<String>,
    },
    Upvote {
        #[arg(long)]
        id: String,
        #[arg(long)]
        post_id: String,
    },
    Downvote {
        #[arg(long)]
        id: String,
        #[arg(long)]
        post_id: String,
    },
    FetchLinks {
        #[arg(long)]
        post_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => load_settings_from(path)?,
        None => load_settings(),
    };
    if let Some(api_url) = args.api_url {
        settings.api_base_url = api_url;
    }

    let store = Arc::new(MemoryStore::new(args.logged_in));
    let actions = ActionContext::new(
        Arc::new(HttpTransport::new(settings.api_base_url.clone())),
        Arc::new(TracingNotifier),
        Arc::new(TracingAuditSink),
        store.clone(),
        store.clone(),
    )
    .with_options(ActionOptions::from_settings(&settings));

    let outcome = match args.command {
        Command::Login { username, password } => actions
            .login(&Credentials { username, password })
            .await
            .map(body_of),
        Command::Register {
            name,
            last_name,
            email,
            password,
        } => actions
            .register(&RegistrationInfo {
                password,
                name,
                last_name,
                email,
            })
            .await
            .map(body_of),
        Command::ForgotPassword { email } => actions
            .send_forgot_password_email(&email)
            .await
            .map(body_of),
        Command::RegainAccount {
            new_password,
            reset_uid,
            secret_key,
        } => actions
            .regain_account(&RegainAccountRequest {
                new_password,
                reset_uid,
                secret_key,
            })
            .await
            .map(body_of),
        Command::VerifyRecaptcha { response } => {
            actions.verify_recaptcha(&response).await.map(body_of)
        }
        Command::CreateLink {
            post_id,
            url,
            link_type,
        } => actions
            .create_related_link(
                &url,
                &PostId::new(post_id),
                LinkType::from(link_type.as_str()),
            )
            .await
            .map(body_of),
        Command::RemoveLink { id } => actions
            .remove_related_link(id.map(LinkId::new).as_ref())
            .await
            .map(body_of),
        Command::Upvote { id, post_id } => actions
            .upvote_related_link(&LinkId::new(id), &PostId::new(post_id))
            .await
            .map(body_of),
        Command::Downvote { id, post_id } => actions
            .downvote_related_link(&LinkId::new(id), &PostId::new(post_id))
            .await
            .map(body_of),
        Command::FetchLinks { post_id } => {
            let post_id = PostId::new(post_id);
            let outcome = actions.fetch_related_links(&post_id).await?;
            if let ActionOutcome::Completed(links) = &outcome {
                tracing::info!(
                    post_id = %post_id,
                    stored = store.related_links(&post_id).len(),
                    "console: related links loaded"
                );
                println!("{}", serde_json::to_string_pretty(links)?);
            }
            return report(outcome.rejection().map(ToString::to_string));
        }
    }?;

    match outcome {
        ActionOutcome::Completed(body) => {
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(())
        }
        ActionOutcome::Rejected(rejection) => report(Some(rejection.to_string())),
    }
}

fn body_of(outcome: ActionOutcome<client_core::ApiResponse>) -> ActionOutcome<Value> {
    match outcome {
        ActionOutcome::Completed(response) => ActionOutcome::Completed(response.body),
        ActionOutcome::Rejected(rejection) => ActionOutcome::Rejected(rejection),
    }
}

fn report(rejection: Option<String>) -> Result<()> {
    if let Some(reason) = rejection {
        anyhow::bail!("action rejected: {reason}");
    }
    Ok(())
}
