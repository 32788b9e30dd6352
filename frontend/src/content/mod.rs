pub mod loader;

use log::warn;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub const TITLE_SUFFIX: &str = "Professional Freight & Logistics";
const FALLBACK_DESCRIPTION: &str = "Professional freight & logistics solutions.";
const FALLBACK_TAGLINE: &str = "Reliable freight solutions nationwide";
pub const MAX_RATING: u8 = 5;

/// Company content loaded from `json/app.json`.
///
/// Every field defaults, so a partial or empty document still renders. A
/// field holding the wrong kind of value degrades to its default instead of
/// failing the whole document.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ContentDocument {
    #[serde(deserialize_with = "text")]
    pub name: String,
    #[serde(deserialize_with = "text")]
    pub tagline: String,
    #[serde(deserialize_with = "text")]
    pub about: String,
    #[serde(deserialize_with = "text")]
    pub mission: String,
    #[serde(deserialize_with = "text")]
    pub careers: String,
    #[serde(deserialize_with = "text")]
    pub dot_number: String,
    #[serde(deserialize_with = "text")]
    pub mc_number: String,
    #[serde(deserialize_with = "text")]
    pub business_scope: String,
    #[serde(deserialize_with = "null_as_default")]
    pub contact: Contact,
    #[serde(deserialize_with = "null_as_default")]
    pub services: Vec<Service>,
    #[serde(deserialize_with = "null_as_default")]
    pub why_choose_us: Vec<Differentiator>,
    #[serde(deserialize_with = "null_as_default")]
    pub testimonials: Vec<Testimonial>,
    pub appdev: Option<AppDev>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Contact {
    #[serde(deserialize_with = "text")]
    pub phone: String,
    #[serde(deserialize_with = "text")]
    pub email: String,
    #[serde(deserialize_with = "text")]
    pub address: String,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Service {
    #[serde(deserialize_with = "text")]
    pub name: String,
    #[serde(deserialize_with = "text")]
    pub description: String,
    #[serde(deserialize_with = "text")]
    pub icon: String,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Differentiator {
    #[serde(deserialize_with = "text")]
    pub title: String,
    #[serde(deserialize_with = "text")]
    pub description: String,
    #[serde(deserialize_with = "text")]
    pub icon: String,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Testimonial {
    #[serde(deserialize_with = "text")]
    pub author: String,
    #[serde(deserialize_with = "text")]
    pub company: String,
    #[serde(deserialize_with = "text")]
    pub quote: String,
    #[serde(deserialize_with = "rating")]
    pub rating: u8,
}

/// Developer credit shown in the footer.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppDev {
    #[serde(deserialize_with = "text")]
    pub name: String,
    #[serde(deserialize_with = "text")]
    pub url: String,
}

impl ContentDocument {
    pub fn page_title(&self) -> String {
        format!("{} | {}", self.name, TITLE_SUFFIX)
    }

    pub fn description(&self) -> &str {
        non_empty_or(&self.about, FALLBACK_DESCRIPTION)
    }

    pub fn social_description(&self) -> &str {
        non_empty_or(&self.tagline, FALLBACK_TAGLINE)
    }

    pub fn license_line(&self) -> String {
        format!("Licensed DOT: {} • MC: {}", self.dot_number, self.mc_number)
    }
}

impl Contact {
    /// `tel:` link with every non-digit stripped from the display number.
    pub fn tel_href(&self) -> String {
        let digits: String = self.phone.chars().filter(|c| c.is_ascii_digit()).collect();
        format!("tel:{}", digits)
    }

    pub fn mailto_href(&self) -> String {
        format!("mailto:{}", self.email)
    }
}

impl Testimonial {
    pub fn stars(&self) -> usize {
        usize::from(self.rating.min(MAX_RATING))
    }

    pub fn attribution(&self) -> String {
        format!("– {}, {}", self.author, self.company)
    }
}

impl AppDev {
    pub fn href(&self) -> String {
        format!("https://{}", self.url)
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

// Hand-edited content files carry DOT/MC numbers both quoted and bare, and
// leave `null` where copy is missing.
fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => {
            warn!("Ignoring non-text content value: {}", other);
            String::new()
        }
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Any number (or numeric string) floored and clamped to `0..=MAX_RATING`.
/// Anything else is a zero rating.
fn rating<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(value
        .filter(|v| v.is_finite())
        .map_or(0, |v| v.floor().clamp(0.0, f64::from(MAX_RATING)) as u8))
}
