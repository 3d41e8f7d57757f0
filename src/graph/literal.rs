//! Literal labels and their value semantics
//!
//! A [`LiteralLabel`] carries the exact lexical form, language tag and
//! datatype of a literal; two labels are *equal* only when all three agree.
//! [`LiteralValue`] is the interpreted value used by `same_value_as`,
//! pattern matching and the store's literal indexes.

use super::error::{GraphError, GraphResult};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::Float;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! xsd_name {
    ($local:literal) => {
        concat!("http://www.w3.org/2001/XMLSchema#", $local)
    };
}

/// XML Schema datatype URIs understood by the value semantics
pub mod xsd {
    pub const NAMESPACE: &str = xsd_name!("");
    pub const STRING: &str = xsd_name!("string");
    pub const BOOLEAN: &str = xsd_name!("boolean");
    pub const DECIMAL: &str = xsd_name!("decimal");
    pub const INTEGER: &str = xsd_name!("integer");
    pub const NON_NEGATIVE_INTEGER: &str = xsd_name!("nonNegativeInteger");
    pub const POSITIVE_INTEGER: &str = xsd_name!("positiveInteger");
    pub const NON_POSITIVE_INTEGER: &str = xsd_name!("nonPositiveInteger");
    pub const NEGATIVE_INTEGER: &str = xsd_name!("negativeInteger");
    pub const LONG: &str = xsd_name!("long");
    pub const INT: &str = xsd_name!("int");
    pub const SHORT: &str = xsd_name!("short");
    pub const BYTE: &str = xsd_name!("byte");
    pub const UNSIGNED_LONG: &str = xsd_name!("unsignedLong");
    pub const UNSIGNED_INT: &str = xsd_name!("unsignedInt");
    pub const UNSIGNED_SHORT: &str = xsd_name!("unsignedShort");
    pub const UNSIGNED_BYTE: &str = xsd_name!("unsignedByte");
    pub const DOUBLE: &str = xsd_name!("double");
    pub const FLOAT: &str = xsd_name!("float");
}

/// `rdf:langString`, the implicit datatype of language-tagged literals
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

/// Label of a literal node: lexical form plus optional language or datatype
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "LiteralParts")]
pub struct LiteralLabel {
    lexical: String,
    language: Option<String>,
    datatype: Option<String>,
}

impl LiteralLabel {
    /// Plain literal with no language tag and no datatype
    pub fn plain(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            language: None,
            datatype: None,
        }
    }

    /// Language-tagged literal; the tag is kept exactly as given
    pub fn with_language(lexical: impl Into<String>, language: &str) -> GraphResult<Self> {
        if !is_valid_language_tag(language) {
            return Err(GraphError::invalid(format!("malformed language tag '{}'", language)));
        }
        Ok(Self {
            lexical: lexical.into(),
            language: Some(language.to_string()),
            datatype: None,
        })
    }

    /// Typed literal. The lexical form is not checked against the datatype;
    /// ill-formed values only lose value-based equality.
    pub fn typed(lexical: impl Into<String>, datatype: &str) -> GraphResult<Self> {
        super::node::check_uri(datatype)?;
        if datatype == RDF_LANG_STRING {
            return Err(GraphError::invalid("rdf:langString literal requires a language tag"));
        }
        Ok(Self {
            lexical: lexical.into(),
            language: None,
            datatype: Some(datatype.to_string()),
        })
    }

    pub fn lexical_form(&self) -> &str {
        &self.lexical
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Declared datatype URI (None for plain and language-tagged literals)
    pub fn datatype_uri(&self) -> Option<&str> {
        self.datatype.as_deref()
    }

    /// Interpreted value of this literal
    pub fn value(&self) -> LiteralValue {
        if let Some(lang) = &self.language {
            return LiteralValue::LangString {
                lexical: self.lexical.clone(),
                language: lang.to_ascii_lowercase(),
            };
        }
        let datatype = match &self.datatype {
            None => return LiteralValue::String(self.lexical.clone()),
            Some(dt) => dt.as_str(),
        };
        parse_value(&self.lexical, datatype).unwrap_or_else(|| LiteralValue::Other {
            lexical: self.lexical.clone(),
            datatype: datatype.to_string(),
        })
    }

    /// False when the datatype is known but the lexical form is not in its lexical space
    pub fn is_well_formed(&self) -> bool {
        match &self.datatype {
            Some(dt) if is_known_datatype(dt) => parse_value(&self.lexical, dt).is_some(),
            _ => true,
        }
    }

    /// Value equality: differing labels may still denote the same value
    pub fn same_value_as(&self, other: &LiteralLabel) -> bool {
        self == other || self.value() == other.value()
    }
}

/// Unchecked wire shape of [`LiteralLabel`]
#[derive(Deserialize)]
struct LiteralParts {
    lexical: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    datatype: Option<String>,
}

impl TryFrom<LiteralParts> for LiteralLabel {
    type Error = GraphError;

    fn try_from(parts: LiteralParts) -> GraphResult<Self> {
        match (parts.language, parts.datatype) {
            (None, None) => Ok(LiteralLabel::plain(parts.lexical)),
            (Some(language), None) => LiteralLabel::with_language(parts.lexical, &language),
            (None, Some(datatype)) => LiteralLabel::typed(parts.lexical, &datatype),
            (Some(_), Some(datatype)) => Err(GraphError::invalid(format!(
                "language-tagged literal cannot also carry datatype <{}>",
                datatype
            ))),
        }
    }
}

impl fmt::Display for LiteralLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"")?;
        for c in self.lexical.chars() {
            match c {
                '"' => write!(f, "\\\"")?,
                '\\' => write!(f, "\\\\")?,
                '\n' => write!(f, "\\n")?,
                '\r' => write!(f, "\\r")?,
                '\t' => write!(f, "\\t")?,
                c => write!(f, "{}", c)?,
            }
        }
        write!(f, "\"")?;
        if let Some(lang) = &self.language {
            write!(f, "@{}", lang)
        } else if let Some(dt) = &self.datatype {
            write!(f, "^^<{}>", dt)
        } else {
            Ok(())
        }
    }
}

/// Interpreted literal value; equal values mean `same_value_as`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LiteralValue {
    /// Plain literals and `xsd:string`
    String(String),
    /// Language-tagged string, tag lowercased
    LangString { lexical: String, language: String },
    /// Integer family and `xsd:decimal`, normalized so equal values share
    /// one representation
    Numeric(BigDecimal),
    /// `xsd:double` bits, with zero and NaN normalized
    Double(u64),
    /// `xsd:float` bits, with zero and NaN normalized
    Float(u32),
    Boolean(bool),
    /// Unknown datatype or ill-formed lexical form: identity on the label
    Other { lexical: String, datatype: String },
}

#[derive(Clone, Copy)]
struct IntegerRange {
    min: Option<i128>,
    max: Option<i128>,
}

impl IntegerRange {
    fn contains(&self, value: &BigInt) -> bool {
        self.min.map_or(true, |min| *value >= BigInt::from(min))
            && self.max.map_or(true, |max| *value <= BigInt::from(max))
    }
}

fn integer_range(datatype: &str) -> Option<IntegerRange> {
    let range = |min: Option<i128>, max: Option<i128>| Some(IntegerRange { min, max });
    match datatype {
        xsd::INTEGER => range(None, None),
        xsd::NON_NEGATIVE_INTEGER => range(Some(0), None),
        xsd::POSITIVE_INTEGER => range(Some(1), None),
        xsd::NON_POSITIVE_INTEGER => range(None, Some(0)),
        xsd::NEGATIVE_INTEGER => range(None, Some(-1)),
        xsd::LONG => range(Some(i64::MIN as i128), Some(i64::MAX as i128)),
        xsd::INT => range(Some(i32::MIN as i128), Some(i32::MAX as i128)),
        xsd::SHORT => range(Some(i16::MIN as i128), Some(i16::MAX as i128)),
        xsd::BYTE => range(Some(i8::MIN as i128), Some(i8::MAX as i128)),
        xsd::UNSIGNED_LONG => range(Some(0), Some(u64::MAX as i128)),
        xsd::UNSIGNED_INT => range(Some(0), Some(u32::MAX as i128)),
        xsd::UNSIGNED_SHORT => range(Some(0), Some(u16::MAX as i128)),
        xsd::UNSIGNED_BYTE => range(Some(0), Some(u8::MAX as i128)),
        _ => None,
    }
}

fn is_known_datatype(datatype: &str) -> bool {
    integer_range(datatype).is_some()
        || matches!(
            datatype,
            xsd::STRING | xsd::BOOLEAN | xsd::DECIMAL | xsd::DOUBLE | xsd::FLOAT
        )
}

fn parse_value(lexical: &str, datatype: &str) -> Option<LiteralValue> {
    let text = lexical.trim();
    if let Some(range) = integer_range(datatype) {
        if !is_decimal_lexical(text, false) {
            return None;
        }
        let value = BigInt::from_str(text).ok()?;
        return range
            .contains(&value)
            .then(|| LiteralValue::Numeric(BigDecimal::new(value, 0).normalized()));
    }
    match datatype {
        xsd::STRING => Some(LiteralValue::String(lexical.to_string())),
        xsd::DECIMAL if is_decimal_lexical(text, true) => parse_decimal(text).map(LiteralValue::Numeric),
        xsd::BOOLEAN => match text {
            "true" | "1" => Some(LiteralValue::Boolean(true)),
            "false" | "0" => Some(LiteralValue::Boolean(false)),
            _ => None,
        },
        xsd::DOUBLE => parse_floating::<f64>(text).map(|v| LiteralValue::Double(v.to_bits())),
        xsd::FLOAT => parse_floating::<f32>(text).map(|v| LiteralValue::Float(v.to_bits())),
        _ => None,
    }
}

/// Optional sign, digits, and (for decimals) an optional fraction; at least
/// one digit. Exponents and digit separators are outside the lexical space.
fn is_decimal_lexical(text: &str, allow_fraction: bool) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some(_) if !allow_fraction => return false,
        Some(parts) => parts,
        None => (unsigned, ""),
    };
    let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    !(int_part.is_empty() && frac_part.is_empty()) && digits(int_part) && digits(frac_part)
}

/// Normalized decimal from a checked lexical form; `.5` and `5.` get the
/// digit `BigDecimal` expects on each side of the point
fn parse_decimal(text: &str) -> Option<BigDecimal> {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let sign = &text[..text.len() - unsigned.len()];
    let parsed = match (unsigned.starts_with('.'), unsigned.ends_with('.')) {
        (false, false) => BigDecimal::from_str(text),
        (lead, trail) => BigDecimal::from_str(&format!(
            "{}{}{}{}",
            sign,
            if lead { "0" } else { "" },
            unsigned,
            if trail { "0" } else { "" }
        )),
    };
    parsed.ok().map(|d| d.normalized())
}

/// XSD floating-point value with zero and NaN normalized
fn parse_floating<T: Float + FromStr>(text: &str) -> Option<T> {
    let value = match text {
        "INF" | "+INF" => T::infinity(),
        "-INF" => T::neg_infinity(),
        "NaN" => T::nan(),
        // Rust also accepts "inf"/"nan" spellings which XSD does not
        _ if text.is_empty()
            || !text
                .bytes()
                .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E')) =>
        {
            return None
        }
        _ => text.parse::<T>().ok()?,
    };
    Some(if value.is_nan() {
        T::nan()
    } else if value.is_zero() {
        T::zero()
    } else {
        value
    })
}

fn is_valid_language_tag(tag: &str) -> bool {
    let mut parts = tag.split(['-', '_']);
    let primary = match parts.next() {
        Some(p) if !p.is_empty() => p,
        _ => return false,
    };
    primary.bytes().all(|b| b.is_ascii_alphabetic())
        && parts.all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_alphanumeric()))
}
