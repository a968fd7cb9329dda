use serde::{Deserialize, Serialize};

use crate::domain::AnalysisError;

/// Free-text description of the product or service to analyze.
///
/// Never empty or whitespace-only; the text itself is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductDescription(String);

impl ProductDescription {
    pub fn parse(text: impl Into<String>) -> Result<Self, AnalysisError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(AnalysisError::validation(
                "Product description cannot be empty",
            ));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProductDescription {
    type Error = AnalysisError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ProductDescription> for String {
    fn from(value: ProductDescription) -> Self {
        value.0
    }
}

impl AsRef<str> for ProductDescription {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_text_verbatim() {
        let description = ProductDescription::parse("  A CRM for dentists \n").unwrap();
        assert_eq!(description.as_str(), "  A CRM for dentists \n");
    }

    #[test]
    fn rejects_empty_and_whitespace() {
        for input in ["", "   ", "\n\t  \r\n"] {
            let err = ProductDescription::parse(input).unwrap_err();
            assert!(matches!(err, AnalysisError::Validation(_)), "{input:?}");
        }
    }

    #[test]
    fn deserialization_applies_the_same_guard() {
        let ok: ProductDescription = serde_json::from_str(r#""Invoice automation""#).unwrap();
        assert_eq!(ok.as_str(), "Invoice automation");
        assert!(serde_json::from_str::<ProductDescription>(r#""  ""#).is_err());
    }
}
