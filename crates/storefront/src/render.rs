//! Message Rendering
//!
//! Texts and keyboards for every screen of the flow.

use shop_catalog::{Catalog, Product, StockLevel};
use shop_core::{Button, ChatId, Keyboard, MediaKind, Selection};

use crate::action::Action;
use crate::payment::PaymentMethod;

/// Shown when a product has no description resource
pub const DESCRIPTION_PLACEHOLDER: &str = "No description available yet.";

pub const HOME_LABEL: &str = "🏠 Home";

fn home_button() -> Button {
    Button::callback(HOME_LABEL, Action::Home.encode())
}

/// Category menu: one button per category plus home
pub fn main_menu(catalog: &Catalog, group_link: Option<&str>) -> (String, Keyboard) {
    let mut buttons: Vec<Button> = catalog
        .category_names()
        .map(|name| Button::callback(name, Action::Category(name.to_string()).encode()))
        .collect();
    buttons.push(home_button());

    let mut keyboard = Keyboard::single_column(buttons);
    if let Some(link) = group_link {
        keyboard = keyboard.row(vec![Button::url("👥 Join our group", link)]);
    }

    let text = if catalog.is_empty() {
        "🛒 Welcome! The shop is empty right now, please check back later.".to_string()
    } else {
        "🛒 Welcome! Choose a category:".to_string()
    };

    (text, keyboard)
}

/// Product list for a category; labels carry no prices
pub fn category_menu(category: &str, products: &[&str]) -> (String, Keyboard) {
    let mut buttons: Vec<Button> = products
        .iter()
        .map(|name| Button::callback(*name, Action::Product((*name).to_string()).encode()))
        .collect();
    buttons.push(home_button());

    let text = if products.is_empty() {
        format!("📂 {category}\n\nNo products here yet.")
    } else {
        format!("📂 {category}\n\nChoose a product:")
    };

    (text, Keyboard::single_column(buttons))
}

/// Product page with description, price and payment methods
pub fn product_view(selection: &Selection, product: &Product, description: Option<&str>) -> (String, Keyboard) {
    let description = description.unwrap_or(DESCRIPTION_PLACEHOLDER);
    let text = format!(
        "📦 {}\n\n{}\n\n💰 Price: {}\n\nChoose a payment method:",
        selection.product,
        description,
        product.price.normalize()
    );

    let mut buttons: Vec<Button> = PaymentMethod::ALL
        .iter()
        .map(|method| Button::callback(method.label(), Action::Payment(*method).encode()))
        .collect();
    buttons.push(home_button());

    (text, Keyboard::single_column(buttons))
}

/// Notice sent to the admin alongside a forwarded proof
pub fn proof_notice(buyer: ChatId, selection: &Selection, kind: MediaKind) -> (String, Keyboard) {
    let text = format!(
        "🧾 Payment proof ({kind}) from chat {buyer}\nProduct: {} ({})",
        selection.product, selection.category
    );
    let keyboard = Keyboard::single_column(vec![Button::callback(
        "✅ Approve",
        Action::Approve(buyer).encode(),
    )]);
    (text, keyboard)
}

pub const PROOF_RECEIVED: &str =
    "✅ Thanks! Your payment proof was sent for review. You'll receive your key once it's approved.";

pub const UNKNOWN_COMMAND: &str = "Unknown command. Send /start to browse the catalog or /help for help.";

pub const TEXT_HINT: &str = "Send /start to browse the catalog. To submit a payment, send a photo or document of your receipt.";

/// Message carrying a delivered key
pub fn key_delivery(product: &str, key: &str) -> String {
    format!("🎉 Your payment was approved!\n\n🔑 {product} key:\n{key}\n\nThank you for your purchase.")
}

pub fn help(group_link: Option<&str>) -> String {
    let mut text = String::from(
        "ℹ️ How it works\n\
         1. /start and pick a category and product\n\
         2. Choose a payment method and pay\n\
         3. Send a photo or document of your receipt\n\
         4. Your key arrives once an admin approves the payment",
    );
    if let Some(link) = group_link {
        text.push_str("\n\nCommunity: ");
        text.push_str(link);
    }
    text
}

/// Admin stock report (counts only, never keys)
pub fn stock_report(levels: &[StockLevel]) -> String {
    if levels.is_empty() {
        return "📊 Catalog is empty.".into();
    }

    let mut text = String::from("📊 Stock");
    let mut current: Option<&str> = None;
    for level in levels {
        if current != Some(level.category.as_str()) {
            text.push_str("\n\n");
            text.push_str(&level.category);
            current = Some(level.category.as_str());
        }
        text.push_str(&format!(
            "\n  • {}: {} left ({})",
            level.product,
            level.remaining,
            level.price.normalize()
        ));
    }
    text
}
