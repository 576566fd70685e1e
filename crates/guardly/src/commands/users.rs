//! User command handlers.

use guardly_api::panel::models::{CreateUserRequest, UpdateUserRequest};
use guardly_core::{Panel, User, UserStatus};
use tabled::Tabled;

use crate::cli::{GlobalOpts, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output::{self, format_bytes};

use super::util;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "STATUS")]
    status: &'static str,
    #[tabled(rename = "ONLINE")]
    online: &'static str,
    #[tabled(rename = "USED")]
    used: String,
    #[tabled(rename = "LIMIT")]
    limit: String,
    #[tabled(rename = "EXPIRY")]
    expiry: String,
}

fn user_row(user: &User) -> UserRow {
    UserRow {
        id: user.id,
        name: user.display_name.clone(),
        status: user.status.as_str(),
        online: if user.online { "yes" } else { "" },
        used: format_bytes(u64::try_from(user.traffic_used).unwrap_or(0)),
        limit: match user.traffic_limit {
            0 => "unlimited".into(),
            limit => format_bytes(u64::try_from(limit).unwrap_or(0)),
        },
        expiry: user.expiry.clone().unwrap_or_default(),
    }
}

fn user_detail(user: &User) -> String {
    let mut lines = vec![
        format!("ID:            {}", user.id),
        format!("Name:          {}", user.display_name),
        format!("Status:        {}", user.status.as_str()),
        format!("Online:        {}", if user.online { "yes" } else { "no" }),
        format!(
            "Traffic:       {} / {}",
            format_bytes(u64::try_from(user.traffic_used).unwrap_or(0)),
            match user.traffic_limit {
                0 => "unlimited".to_owned(),
                limit => format_bytes(u64::try_from(limit).unwrap_or(0)),
            }
        ),
        format!("Subscription:  {}", user.subscription_url),
    ];
    if let Some(ref email) = user.email {
        lines.push(format!("Email:         {email}"));
    }
    if let Some(ref protocol) = user.protocol {
        lines.push(format!("Protocol:      {protocol}"));
    }
    if let Some(ref expiry) = user.expiry {
        lines.push(format!("Expiry:        {expiry}"));
    }
    lines.join("\n")
}

pub async fn handle(panel: &Panel, args: UsersArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        UsersCommand::List { online, status } => {
            let mut users = panel.list_users().await?;
            if online {
                users.retain(|u| u.online);
            }
            if let Some(ref wanted) = status {
                let wanted = UserStatus::parse(Some(wanted));
                users.retain(|u| u.status == wanted);
            }
            let rendered =
                output::render_list(&global.output, &users, user_row, |u| u.id.to_string());
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        UsersCommand::Get { id } => {
            let user = panel.get_user(id).await?;
            let rendered =
                output::render_single(&global.output, &user, user_detail, |u| u.id.to_string());
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        UsersCommand::Create {
            username,
            email,
            protocol,
            inbound,
            expiry,
            traffic_limit,
        } => {
            let mut request = CreateUserRequest::new(username, inbound, expiry, traffic_limit);
            request.email = email;
            request.protocol = protocol;

            let user = panel.create_user(&request).await?;
            if !global.quiet {
                eprintln!("Created user {} (id {})", user.display_name, user.id);
            }
            let rendered =
                output::render_single(&global.output, &user, user_detail, |u| u.id.to_string());
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        UsersCommand::Update {
            id,
            email,
            expiry,
            traffic_limit,
            status,
        } => {
            let request = UpdateUserRequest {
                email,
                expiry,
                traffic_limit,
                status,
            };
            let user = panel.update_user(id, &request).await?;
            if !global.quiet {
                eprintln!("Updated user {}", user.id);
            }
            Ok(())
        }

        UsersCommand::Delete { id } => {
            if !util::confirm(&format!("Delete user {id}?"), global.yes)? {
                return Ok(());
            }
            panel.delete_user(id).await?;
            if !global.quiet {
                eprintln!("User {id} removed (or deactivated, depending on the panel)");
            }
            Ok(())
        }

        UsersCommand::Subscription { id, link } => {
            if link {
                let url = panel.subscription_link(id).await?;
                output::print_output(&url, global.quiet);
                return Ok(());
            }
            let links = panel.user_subscription(id).await?;
            let rendered = match global.output {
                crate::cli::OutputFormat::Plain => links
                    .values()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join("\n"),
                _ => serde_json::to_string_pretty(&links)
                    .map_err(|e| CliError::Internal { detail: e.to_string() })?,
            };
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        UsersCommand::Config { id } => {
            let config = panel.user_config(id).await?;
            let rendered = serde_json::to_string_pretty(&config)
                .map_err(|e| CliError::Internal { detail: e.to_string() })?;
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        UsersCommand::Stats { id } => {
            let stats = panel.user_stats(id).await?;
            let rendered = output::render_single(
                &global.output,
                &stats,
                |s| {
                    format!(
                        "Used:   {}\nLimit:  {}\nSeen:   {}",
                        format_bytes(u64::try_from(s.traffic_used()).unwrap_or(0)),
                        match s.traffic_limit() {
                            0 => "unlimited".to_owned(),
                            limit => format_bytes(u64::try_from(limit).unwrap_or(0)),
                        },
                        s.last_seen.as_deref().unwrap_or("never"),
                    )
                },
                |s| s.traffic_used().to_string(),
            );
            output::print_output(&rendered, global.quiet);
            Ok(())
        }
    }
}
