//! Knowledge sources known to the backend retrieval stage.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Retrieval source tag (matches the backend enum).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum KnowledgeSource {
    /// Distinguished marker: let the backend choose among every source.
    All,
    PropertyInfo,
    Zillow,
    Corelogic,
    Apartments,
    Labs,
    RentRoll,
    #[serde(alias = "offering_memo")]
    #[strum(to_string = "offering_memorandum", serialize = "offering_memo")]
    OfferingMemorandum,
    FinancialAnalysis,
    /// Results of the web search stage. Controlled by the web search toggle,
    /// never part of a source selection.
    WebSearch,
}

/// Sources pre-selected by the "default" preset.
pub const DEFAULT_KNOWLEDGE_SOURCES: [KnowledgeSource; 6] = [
    KnowledgeSource::Zillow,
    KnowledgeSource::Corelogic,
    KnowledgeSource::Labs,
    KnowledgeSource::RentRoll,
    KnowledgeSource::OfferingMemorandum,
    KnowledgeSource::FinancialAnalysis,
];

impl KnowledgeSource {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All Sources",
            Self::PropertyInfo => "Property Info",
            Self::Zillow => "Zillow",
            Self::Corelogic => "CoreLogic",
            Self::Apartments => "Apartments.com",
            Self::Labs => "Labs Internal",
            Self::RentRoll => "Rent Roll",
            Self::OfferingMemorandum => "Offering Memorandum",
            Self::FinancialAnalysis => "Financial Analysis",
            Self::WebSearch => "Web Search",
        }
    }

    /// Whether the operator may put this tag into a source selection.
    pub fn is_selectable(&self) -> bool {
        !matches!(self, Self::WebSearch)
    }

    /// Selectable tags in display order, `All` first.
    pub fn selectable() -> impl Iterator<Item = KnowledgeSource> {
        Self::iter().filter(KnowledgeSource::is_selectable)
    }
}

/// A knowledge source the backend used for a response, with the text it contributed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeSourceDetail {
    pub source_enum: KnowledgeSource,
    pub display_name: String,
    /// Polished text content from this source used in the response.
    pub text: String,
}

impl KnowledgeSourceDetail {
    pub fn is_web_search(&self) -> bool {
        self.source_enum == KnowledgeSource::WebSearch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_tags_round_trip_through_strings() {
        for source in KnowledgeSource::iter() {
            let tag = source.to_string();
            assert_eq!(KnowledgeSource::from_str(&tag).unwrap(), source);
            let json = serde_json::to_string(&source).unwrap();
            assert_eq!(json, format!("\"{tag}\""));
        }
    }

    #[test]
    fn test_offering_memo_alias() {
        assert_eq!(
            KnowledgeSource::from_str("offering_memo").unwrap(),
            KnowledgeSource::OfferingMemorandum
        );
        let parsed: KnowledgeSource = serde_json::from_str("\"offering_memo\"").unwrap();
        assert_eq!(parsed, KnowledgeSource::OfferingMemorandum);
        assert_eq!(parsed.as_ref(), "offering_memorandum");
    }

    #[test]
    fn test_web_search_is_not_selectable() {
        assert!(!KnowledgeSource::selectable().any(|s| s == KnowledgeSource::WebSearch));
        assert_eq!(KnowledgeSource::selectable().next(), Some(KnowledgeSource::All));
    }
}
