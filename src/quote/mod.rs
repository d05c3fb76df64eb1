//! Quote documents: plaintext summaries and `mailto:` compose links built
//! from already-parsed cart data.
//!
//! There is no mail backend; the mailto URL opens the user's own client
//! with the subject and body prefilled. Parsing rendered pages into
//! [`QuoteItem`]s is the host adapter's job, not this module's.

use chrono::Local;
use url::form_urlencoded;

/// One quoted line. Quantity and money fields are kept as display strings;
/// this module formats, it does not do arithmetic.
#[derive(Debug, Clone, Default)]
pub struct QuoteItem {
    pub title: String,
    pub quantity: String,
    pub unit_price: Option<String>,
    pub line_total: Option<String>,
}

impl QuoteItem {
    pub fn new(title: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            quantity: quantity.into(),
            unit_price: None,
            line_total: None,
        }
    }

    pub fn unit_price(mut self, price: impl Into<String>) -> Self {
        self.unit_price = Some(price.into());
        self
    }

    pub fn line_total(mut self, total: impl Into<String>) -> Self {
        self.line_total = Some(total.into());
        self
    }
}

/// A printable/emailable quote built from one cart or saved quote.
#[derive(Debug, Clone, Default)]
pub struct Quote {
    pub name: String,
    pub cart_id: Option<String>,
    pub link: Option<String>,
    pub items: Vec<QuoteItem>,
    pub grand_total: Option<String>,
}

impl Quote {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn cart_id(mut self, id: impl Into<String>) -> Self {
        self.cart_id = Some(id.into());
        self
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn item(mut self, item: QuoteItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn grand_total(mut self, total: impl Into<String>) -> Self {
        self.grand_total = Some(total.into());
        self
    }

    pub fn subject(&self) -> String {
        format!("Quote - {}", self.name)
    }

    /// Line-oriented plaintext body of the quote.
    pub fn body(&self) -> String {
        let mut lines = Vec::new();
        lines.push(format!("Quote: {}", self.name));
        if let Some(id) = &self.cart_id {
            lines.push(format!("Cart ID: {id}"));
        }
        if let Some(link) = &self.link {
            lines.push(format!("Link: {link}"));
        }
        lines.push(String::new());
        lines.push("Items:".to_string());
        lines.push("-".repeat(40));

        for item in &self.items {
            let mut line = format!("- {} | Qty: {}", item.title, item.quantity);
            if let Some(price) = &item.unit_price {
                line.push_str(&format!(" | Unit: {price}"));
            }
            if let Some(total) = &item.line_total {
                line.push_str(&format!(" | Line Total: {total}"));
            }
            lines.push(line);
        }

        lines.push("-".repeat(40));
        if let Some(total) = &self.grand_total {
            lines.push(format!("Grand Total: {total}"));
        }
        lines.push(String::new());
        lines.push(format!(
            "Generated: {}",
            Local::now().format("%Y-%m-%d %H:%M")
        ));

        lines.join("\n")
    }

    /// `mailto:` URL opening a prefilled compose window.
    ///
    /// An empty `to` leaves the recipient for the user to fill in. Spaces
    /// are encoded as %20 rather than '+': several mail clients take the
    /// query literally.
    pub fn mailto(&self, to: &str) -> String {
        let query: String = form_urlencoded::Serializer::new(String::new())
            .append_pair("subject", &self.subject())
            .append_pair("body", &self.body())
            .finish()
            .replace('+', "%20");
        let to: String = form_urlencoded::byte_serialize(to.as_bytes()).collect();
        format!("mailto:{to}?{query}")
    }
}

/// Strips everything but digits, decimal/group separators and sign from a
/// scraped money string ("$1,299.00 USD" → "1,299.00").
pub fn clean_money(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect()
}
