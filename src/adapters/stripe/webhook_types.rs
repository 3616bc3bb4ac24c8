//! Stripe wire types: the signature header, the event envelope and the API
//! objects this service reads.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════════
// Signature Parsing
// ════════════════════════════════════════════════════════════════════════════════

/// Error parsing the Stripe-Signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureParseError {
    MissingHeader,
    /// Missing or malformed `t=` component.
    MissingTimestamp,
    MissingV1Signature,
    InvalidTimestamp,
    /// Signature is not valid hex.
    InvalidSignatureFormat,
}

impl std::fmt::Display for SignatureParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingHeader => write!(f, "Missing Stripe-Signature header"),
            Self::MissingTimestamp => write!(f, "Missing timestamp (t=) in signature"),
            Self::MissingV1Signature => write!(f, "Missing v1 signature in header"),
            Self::InvalidTimestamp => write!(f, "Invalid timestamp format"),
            Self::InvalidSignatureFormat => write!(f, "Invalid signature format (not valid hex)"),
        }
    }
}

impl std::error::Error for SignatureParseError {}

/// Parsed `t=<timestamp>,v1=<signature>[,v1=...]` header.
///
/// Stripe sends several `v1` entries while a signing secret is being rolled;
/// any one of them may match.
#[derive(Debug, Clone)]
pub struct SignatureHeader {
    pub timestamp: i64,
    pub v1_signatures: Vec<Vec<u8>>,
}

impl SignatureHeader {
    pub fn parse(header: &str) -> Result<Self, SignatureParseError> {
        if header.trim().is_empty() {
            return Err(SignatureParseError::MissingHeader);
        }

        let mut timestamp: Option<i64> = None;
        let mut v1_signatures = Vec::new();

        for part in header.split(',') {
            let (key, value) = part
                .split_once('=')
                .ok_or(SignatureParseError::MissingTimestamp)?;

            match key.trim() {
                "t" => {
                    timestamp = Some(
                        value
                            .trim()
                            .parse()
                            .map_err(|_| SignatureParseError::InvalidTimestamp)?,
                    );
                }
                "v1" => {
                    v1_signatures.push(
                        hex_decode(value).ok_or(SignatureParseError::InvalidSignatureFormat)?,
                    );
                }
                // v0 and future schemes are ignored
                _ => {}
            }
        }

        let timestamp = timestamp.ok_or(SignatureParseError::MissingTimestamp)?;
        if v1_signatures.is_empty() {
            return Err(SignatureParseError::MissingV1Signature);
        }

        Ok(Self {
            timestamp,
            v1_signatures,
        })
    }
}

/// Decode a hex string to bytes.
fn hex_decode(hex: &str) -> Option<Vec<u8>> {
    let hex = hex.trim();
    if hex.len() % 2 != 0 {
        return None;
    }

    (0..hex.len())
        .step_by(2)
        .map(|i| hex.get(i..i + 2).and_then(|pair| u8::from_str_radix(pair, 16).ok()))
        .collect()
}

pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

// ════════════════════════════════════════════════════════════════════════════════
// Event Envelope
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeWebhookEvent {
    /// `evt_...`
    pub id: String,

    #[serde(rename = "type")]
    pub event_type: String,

    pub created: i64,

    pub data: StripeEventData,

    #[serde(default)]
    pub livemode: bool,

    pub api_version: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    pub object: serde_json::Value,

    #[serde(default)]
    pub previous_attributes: Option<serde_json::Value>,
}

// ════════════════════════════════════════════════════════════════════════════════
// API Objects
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripePaymentIntent {
    /// `pi_...`
    pub id: String,

    pub amount: i64,

    pub currency: String,

    pub status: String,

    /// Present on intents returned by create; never in webhooks for other accounts.
    #[serde(default)]
    pub client_secret: Option<String>,

    #[serde(default)]
    pub last_payment_error: Option<StripeLastPaymentError>,

    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeLastPaymentError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeCharge {
    /// `ch_...`
    pub id: String,

    #[serde(default)]
    pub payment_intent: Option<String>,

    pub amount: i64,

    /// Cumulative across every refund on the charge.
    #[serde(default)]
    pub amount_refunded: i64,

    #[serde(default)]
    pub refunded: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeRefund {
    /// `re_...`
    pub id: String,
    pub amount: i64,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeSubscription {
    /// `sub_...`
    pub id: String,

    pub customer: String,

    pub status: String,

    pub current_period_end: i64,

    #[serde(default)]
    pub cancel_at_period_end: bool,

    #[serde(default)]
    pub items: StripeList<StripeSubscriptionItem>,
}

impl StripeSubscription {
    /// The first item's id; this service only creates single-item subscriptions.
    pub fn first_item_id(&self) -> Option<&str> {
        self.items.data.first().map(|item| item.id.as_str())
    }

    pub fn price_id(&self) -> Option<String> {
        self.items.data.first().map(|item| item.price.id.clone())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeSubscriptionItem {
    /// `si_...`
    pub id: String,
    pub price: StripePrice,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripePrice {
    /// `price_...`
    pub id: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripePaymentMethod {
    /// `pm_...`
    pub id: String,

    #[serde(default)]
    pub card: Option<StripeCard>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeCard {
    pub brand: String,
    pub last4: String,
    pub exp_month: u32,
    pub exp_year: u32,
}

/// Stripe `list` object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeList<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,

    #[serde(default)]
    pub has_more: bool,
}

impl<T> Default for StripeList<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            has_more: false,
        }
    }
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorBody {
    pub error: StripeApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeApiError {
    #[serde(rename = "type", default)]
    pub error_type: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub decline_code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
