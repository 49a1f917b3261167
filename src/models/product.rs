use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A catalog record as persisted in the store file.
///
/// Field names on the wire match the store file format, which is why they
/// are capitalised. Optional fields are written out as `null`. Keys the
/// record does not know about are kept in `extra` and written back as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Empty when the stored record carries a null or missing id; the store
    /// fills it from the map key on load.
    #[serde(default, deserialize_with = "nullable_id")]
    pub id: String,
    #[serde(rename = "Product_Name", default)]
    pub product_name: Option<String>,
    #[serde(rename = "Price", default, deserialize_with = "lenient")]
    pub price: Option<f64>,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
    #[serde(rename = "Quantity", default, deserialize_with = "lenient")]
    pub quantity: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    pub fn new(id: impl Into<String>, input: ProductInput) -> Self {
        Self {
            id: id.into(),
            product_name: input.product_name,
            price: input.price,
            description: input.description,
            quantity: input.quantity,
            extra: Map::new(),
        }
    }

    /// Overwrites every catalog field except the id. Unknown keys survive.
    pub fn replace(&mut self, input: ProductInput) {
        self.product_name = input.product_name;
        self.price = input.price;
        self.description = input.description;
        self.quantity = input.quantity;
    }

    /// Overwrites only the fields present in the patch.
    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.product_name {
            self.product_name = name;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
    }
}

// ── Request payloads ─────────────────────────────────────────────────────────

/// Body of create and full-update requests. A client-supplied `id` is
/// ignored along with any other unknown key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductInput {
    #[serde(rename = "Product_Name")]
    pub product_name: Option<String>,
    #[serde(rename = "Price", default, deserialize_with = "lenient")]
    pub price: Option<f64>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "Quantity", default, deserialize_with = "lenient")]
    pub quantity: Option<i64>,
}

/// Body of a partial update.
///
/// The outer `Option` records whether the key was sent at all; the inner one
/// is the new value, so `{"Price": null}` clears the price while omitting
/// `Price` leaves it alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductPatch {
    #[serde(rename = "Product_Name", default, deserialize_with = "present")]
    pub product_name: Option<Option<String>>,
    #[serde(rename = "Price", default, deserialize_with = "present_lenient")]
    pub price: Option<Option<f64>>,
    #[serde(rename = "Description", default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(rename = "Quantity", default, deserialize_with = "present_lenient")]
    pub quantity: Option<Option<i64>>,
}

// ── Field deserializers ──────────────────────────────────────────────────────

fn nullable_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn present_lenient<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Lenient,
{
    lenient(deserializer).map(Some)
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Lenient,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => T::coerce(&value).map(Some).ok_or_else(|| {
            de::Error::custom(format!("expected {}, got {}", T::EXPECTED, value))
        }),
    }
}

/// Numbers accepted the lax way: JSON numbers and numeric strings, and for
/// integers also floats with no fractional part (`5.0`, `"5.0"`).
trait Lenient: Sized {
    const EXPECTED: &'static str;

    fn coerce(value: &Value) -> Option<Self>;
}

impl Lenient for f64 {
    const EXPECTED: &'static str = "a number";

    fn coerce(value: &Value) -> Option<Self> {
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed.filter(|v| v.is_finite())
    }
}

impl Lenient for i64 {
    const EXPECTED: &'static str = "an integer";

    fn coerce(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(integral))
            }
            _ => None,
        }
    }
}

fn integral(v: f64) -> Option<i64> {
    let in_range = v >= i64::MIN as f64 && v < i64::MAX as f64;
    (v.is_finite() && v.fract() == 0.0 && in_range).then(|| v as i64)
}

// ── Query parameters ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ProductIdQuery {
    pub id: String,
}
