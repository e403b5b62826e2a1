//! Email composition for order events and subscriber broadcasts. Sending is
//! best effort: failures are logged and never change the outcome of the
//! operation that triggered them.

use std::fmt::Write;

use crate::domain::order::Order;
use crate::domain::subscription::EmailSubscription;
use crate::domain::pricing::{format_cents, format_kg};
use crate::mailer::{Mailer, OutgoingEmail};
use crate::services::views::{fish_form_label, fulfillment_label, order_status_label};

fn order_summary(order: &Order, currency: &str) -> String {
    let mut text = String::new();

    for item in &order.items {
        let _ = writeln!(
            text,
            "- {} ({}): {} кг x {} {currency}/кг = {} {currency}",
            item.species,
            fish_form_label(item.form),
            format_kg(item.quantity_grams),
            format_cents(i64::from(item.price_cents)),
            format_cents(i64::from(item.line_total_cents)),
        );
    }

    let _ = writeln!(
        text,
        "\nСумма: {} {currency}",
        format_cents(i64::from(order.subtotal_cents))
    );
    if order.delivery_fee_cents > 0 {
        let _ = writeln!(
            text,
            "Доставка: {} {currency}",
            format_cents(i64::from(order.delivery_fee_cents))
        );
    }
    let _ = writeln!(
        text,
        "Итого: {} {currency}",
        format_cents(i64::from(order.total_cents))
    );

    let _ = writeln!(
        text,
        "\n{}: {} - {}",
        fulfillment_label(order.fulfillment_type),
        order.fulfillment_starts_at.format("%d.%m.%Y %H:%M"),
        order.fulfillment_ends_at.format("%H:%M"),
    );

    text
}

pub fn new_order_email(order: &Order, fisherman_email: &str, currency: &str) -> OutgoingEmail {
    let mut text = format!(
        "Новый заказ №{} от {} ({}, {}).\n\n",
        order.id, order.contact_name, order.contact_phone, order.contact_email
    );
    text.push_str(&order_summary(order, currency));

    if let Some(address) = &order.delivery_address {
        let _ = writeln!(text, "Адрес доставки: {address}");
    }
    if let Some(notes) = &order.notes {
        let _ = writeln!(text, "Комментарий: {notes}");
    }

    OutgoingEmail::new(fisherman_email, format!("Новый заказ №{}", order.id), text)
}

pub fn order_received_email(order: &Order, currency: &str) -> OutgoingEmail {
    let mut text = format!(
        "Здравствуйте, {}!\n\nМы получили ваш заказ №{}. Оплата при получении.\n\n",
        order.contact_name, order.id
    );
    text.push_str(&order_summary(order, currency));

    OutgoingEmail::new(
        order.contact_email.as_str(),
        format!("Заказ №{} принят", order.id),
        text,
    )
}

pub fn status_changed_email(order: &Order) -> OutgoingEmail {
    let text = format!(
        "Здравствуйте, {}!\n\nСтатус вашего заказа №{}: {}.",
        order.contact_name,
        order.id,
        order_status_label(order.status)
    );

    OutgoingEmail::new(
        order.contact_email.as_str(),
        format!("Заказ №{}: {}", order.id, order_status_label(order.status)),
        text,
    )
}

/// Broadcast message for one subscriber, ending with their unsubscribe link.
pub fn broadcast_email(
    subscription: &EmailSubscription,
    subject: &str,
    body: &str,
    public_url: &str,
) -> OutgoingEmail {
    let text = format!(
        "{body}\n\n--\nОтписаться от рассылки: {}/unsubscribe?token={}",
        public_url.trim_end_matches('/'),
        subscription.unsubscribe_token
    );

    OutgoingEmail::new(subscription.email.as_str(), subject, text)
}

/// Hand the email to the mailer, logging instead of failing.
pub fn send_best_effort(mailer: &dyn Mailer, email: OutgoingEmail) {
    let recipient = email.to.clone();
    if let Err(err) = mailer.dispatch(email) {
        log::error!("Failed to queue email to {recipient}: {err}");
    }
}
