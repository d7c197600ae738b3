// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use serde::{Deserialize, Serialize};

pub const UNKNOWN_NAME: &str = "Unknown Company Name";
pub const UNKNOWN_SECTOR: &str = "Unknown Sector";
pub const UNKNOWN_INDUSTRY: &str = "Unknown Industry";
pub const UNKNOWN_WEBSITE: &str = "N/A";

/// Descriptive metadata shown on the cover sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub name: String,
    pub sector: String,
    pub industry: String,
    pub website: String,
}

impl CompanyInfo {
    /// The record used whenever the metadata provider cannot be used.
    pub fn placeholder() -> Self {
        Self {
            name: UNKNOWN_NAME.to_string(),
            sector: UNKNOWN_SECTOR.to_string(),
            industry: UNKNOWN_INDUSTRY.to_string(),
            website: UNKNOWN_WEBSITE.to_string(),
        }
    }

    /// Builds a record from optional provider fields, defaulting each one on its own.
    pub fn from_parts(
        name: Option<String>,
        sector: Option<String>,
        industry: Option<String>,
        website: Option<String>,
    ) -> Self {
        fn or_default(value: Option<String>, default: &str) -> String {
            value
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        }

        Self {
            name: or_default(name, UNKNOWN_NAME),
            sector: or_default(sector, UNKNOWN_SECTOR),
            industry: or_default(industry, UNKNOWN_INDUSTRY),
            website: or_default(website, UNKNOWN_WEBSITE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_defaults_missing_fields_individually() {
        let info = CompanyInfo::from_parts(
            Some("International Business Machines Corporation".to_string()),
            None,
            Some("  ".to_string()),
            Some("https://www.ibm.com".to_string()),
        );

        assert_eq!(info.name, "International Business Machines Corporation");
        assert_eq!(info.sector, UNKNOWN_SECTOR);
        assert_eq!(info.industry, UNKNOWN_INDUSTRY);
        assert_eq!(info.website, "https://www.ibm.com");
    }

    #[test]
    fn test_placeholder_matches_all_defaults() {
        assert_eq!(
            CompanyInfo::from_parts(None, None, None, None),
            CompanyInfo::placeholder()
        );
    }
}
