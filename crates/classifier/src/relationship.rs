//! Relationship inference from contact name and message history.

use serde::{Deserialize, Serialize};

use crate::keywords;
use crate::matching::{contains_any, count_hits, normalize};

/// Minimum tenant-authored messages before marker counting is meaningful.
const MIN_HISTORY: usize = 3;

/// Inferred relationship between the tenant and a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    Family,
    Professional,
    ClosePersonal,
    Friend,
    Acquaintance,
    Unknown,
}

impl Relationship {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relationship::Family => "family",
            Relationship::Professional => "professional",
            Relationship::ClosePersonal => "close_personal",
            Relationship::Friend => "friend",
            Relationship::Acquaintance => "acquaintance",
            Relationship::Unknown => "unknown",
        }
    }
}

/// Infer the relationship category for a contact.
///
/// A family or professional fragment in the contact's saved name is
/// authoritative and returns immediately. Otherwise the tenant's own
/// messages in this conversation are scanned for formal, casual, and
/// affection markers. The thresholds are fixed tunables, not learned:
/// affection > 2 wins, then formal > casual + 2, then casual > formal + 1.
pub fn infer_relationship<S: AsRef<str>>(
    contact_name: Option<&str>,
    tenant_messages: &[S],
) -> Relationship {
    let name = normalize(contact_name.unwrap_or(""));

    if contains_any(&name, keywords::FAMILY_NAMES) {
        return Relationship::Family;
    }
    if contains_any(&name, keywords::PROFESSIONAL_NAMES) {
        return Relationship::Professional;
    }

    if tenant_messages.len() < MIN_HISTORY {
        return Relationship::Unknown;
    }

    let all_text = tenant_messages
        .iter()
        .map(|m| normalize(m.as_ref()))
        .collect::<Vec<_>>()
        .join(" ");

    let formal = count_hits(&all_text, keywords::FORMAL_MARKERS);
    let casual = count_hits(&all_text, keywords::CASUAL_MARKERS);
    let affection = count_hits(&all_text, keywords::AFFECTION_MARKERS);

    if affection > 2 {
        Relationship::ClosePersonal
    } else if formal > casual + 2 {
        Relationship::Professional
    } else if casual > formal + 1 {
        Relationship::Friend
    } else {
        Relationship::Acquaintance
    }
}
