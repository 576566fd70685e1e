//! Billing command handlers (payments, tariffs, subscriptions).

use guardly_api::billing::types::{BillingSubscription, Payment, PaymentQuery, Tariff};
use guardly_core::Panel;
use tabled::Tabled;

use crate::cli::{
    GlobalOpts, PaymentsArgs, PaymentsCommand, SubscriptionsArgs, SubscriptionsCommand,
    TariffsArgs, TariffsCommand,
};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Payments ─────────────────────────────────────────────────────────

#[derive(Tabled)]
struct PaymentRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "USER")]
    user: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "CREATED")]
    created: String,
}

fn payment_row(payment: &Payment) -> PaymentRow {
    PaymentRow {
        id: payment.id,
        user: payment
            .username
            .clone()
            .or_else(|| payment.user_id.map(|id| format!("#{id}")))
            .unwrap_or_default(),
        amount: match payment.amount {
            Some(amount) => format!(
                "{amount:.2} {}",
                payment.currency.as_deref().unwrap_or_default()
            ),
            None => String::new(),
        },
        status: payment.status.clone().unwrap_or_default(),
        created: payment.created_at.clone().unwrap_or_default(),
    }
}

fn payment_detail(payment: &Payment) -> String {
    format!(
        "ID:         {}\nUser:       {}\nAmount:     {}\nStatus:     {}\nCreated:    {}\nConfirmed:  {}",
        payment.id,
        payment
            .username
            .clone()
            .or_else(|| payment.user_id.map(|id| format!("#{id}")))
            .unwrap_or_default(),
        payment
            .amount
            .map(|a| format!("{a:.2} {}", payment.currency.as_deref().unwrap_or_default()))
            .unwrap_or_default(),
        payment.status.as_deref().unwrap_or("unknown"),
        payment.created_at.as_deref().unwrap_or("-"),
        payment.confirmed_at.as_deref().unwrap_or("-"),
    )
}

pub async fn handle_payments(
    panel: &Panel,
    args: PaymentsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        PaymentsCommand::List {
            status,
            limit,
            offset,
        } => {
            let query = PaymentQuery {
                status,
                limit: Some(limit),
                offset: Some(offset),
            };
            let payments = panel.list_payments(&query).await?;
            let rendered =
                output::render_list(&global.output, &payments, payment_row, |p| p.id.to_string());
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        PaymentsCommand::Get { id } => {
            let payment = panel.get_payment(id).await?;
            let rendered = output::render_single(&global.output, &payment, payment_detail, |p| {
                p.id.to_string()
            });
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        PaymentsCommand::Confirm { id } => {
            if !util::confirm(&format!("Confirm payment {id}?"), global.yes)? {
                return Ok(());
            }
            let payment = panel.confirm_payment(id).await?;
            if !global.quiet {
                eprintln!(
                    "Payment {} is now {}",
                    payment.id,
                    payment.status.as_deref().unwrap_or("confirmed")
                );
            }
            Ok(())
        }
    }
}

// ── Tariffs ──────────────────────────────────────────────────────────

#[derive(Tabled)]
struct TariffRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "PRICE")]
    price: String,
    #[tabled(rename = "DAYS")]
    days: String,
    #[tabled(rename = "TRAFFIC")]
    traffic: String,
}

fn tariff_row(tariff: &Tariff) -> TariffRow {
    TariffRow {
        id: tariff.id,
        name: tariff.name.clone(),
        price: tariff
            .price
            .map(|p| format!("{p:.2} {}", tariff.currency.as_deref().unwrap_or_default()))
            .unwrap_or_default(),
        days: tariff
            .duration_days
            .map(|d| d.to_string())
            .unwrap_or_default(),
        traffic: match tariff.traffic_limit {
            Some(0) | None => "unlimited".into(),
            Some(limit) => output::format_bytes(u64::try_from(limit).unwrap_or(0)),
        },
    }
}

pub async fn handle_tariffs(
    panel: &Panel,
    args: TariffsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        TariffsCommand::List => {
            let tariffs = panel.list_tariffs().await?;
            let rendered =
                output::render_list(&global.output, &tariffs, tariff_row, |t| t.id.to_string());
            output::print_output(&rendered, global.quiet);
            Ok(())
        }
    }
}

// ── Subscriptions ────────────────────────────────────────────────────

#[derive(Tabled)]
struct SubscriptionRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "USER")]
    user: String,
    #[tabled(rename = "TARIFF")]
    tariff: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "EXPIRES")]
    expires: String,
}

fn subscription_row(sub: &BillingSubscription) -> SubscriptionRow {
    SubscriptionRow {
        id: sub.id,
        user: sub
            .username
            .clone()
            .or_else(|| sub.user_id.map(|id| format!("#{id}")))
            .unwrap_or_default(),
        tariff: sub.tariff_id.map(|id| id.to_string()).unwrap_or_default(),
        status: sub.status.clone().unwrap_or_default(),
        expires: sub.expires_at.clone().unwrap_or_default(),
    }
}

fn subscription_detail(sub: &BillingSubscription) -> String {
    format!(
        "ID:       {}\nUser:     {}\nTariff:   {}\nStatus:   {}\nStarts:   {}\nExpires:  {}",
        sub.id,
        sub.username
            .clone()
            .or_else(|| sub.user_id.map(|id| format!("#{id}")))
            .unwrap_or_default(),
        sub.tariff_id.map(|id| id.to_string()).unwrap_or_default(),
        sub.status.as_deref().unwrap_or("unknown"),
        sub.starts_at.as_deref().unwrap_or("-"),
        sub.expires_at.as_deref().unwrap_or("-"),
    )
}

pub async fn handle_subscriptions(
    panel: &Panel,
    args: SubscriptionsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SubscriptionsCommand::List { user, status } => {
            let subs = panel.list_subscriptions(user, status.as_deref()).await?;
            let rendered = output::render_list(&global.output, &subs, subscription_row, |s| {
                s.id.to_string()
            });
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        SubscriptionsCommand::Get { id } => {
            let sub = panel.get_subscription(id).await?;
            let rendered =
                output::render_single(&global.output, &sub, subscription_detail, |s| {
                    s.id.to_string()
                });
            output::print_output(&rendered, global.quiet);
            Ok(())
        }
    }
}
