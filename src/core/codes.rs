//! Translation from the dashboard's canonical codes to World Bank codes.
//!
//! Lookups fail open: a code without an entry is sent upstream unchanged, so
//! codes that are already valid for the provider work without a table entry.

use anyhow::anyhow;
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeDomain {
    Indicator,
    Country,
}

impl Display for CodeDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                CodeDomain::Indicator => "indicator",
                CodeDomain::Country => "country",
            }
        )
    }
}

impl FromStr for CodeDomain {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "indicator" => Ok(CodeDomain::Indicator),
            "country" => Ok(CodeDomain::Country),
            _ => Err(anyhow!("Invalid code domain: {}", s)),
        }
    }
}

// IMF DataMapper indicator -> World Bank WDI series
static INDICATOR_CODES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("NGDP_RPCH", "NY.GDP.MKTP.KD.ZG"),
        ("NGDPD", "NY.GDP.MKTP.CD"),
        ("NGDPDPC", "NY.GDP.PCAP.CD"),
        ("PCPIPCH", "FP.CPI.TOTL.ZG"),
        ("LUR", "SL.UEM.TOTL.ZS"),
        ("GGXWDG_NGDP", "GC.DOD.TOTL.GD.ZS"),
        ("BCA_NGDPD", "BN.CAB.XOKA.GD.ZS"),
        ("LP", "SP.POP.TOTL"),
    ])
});

// ISO 3166 alpha-2 -> alpha-3
static COUNTRY_CODES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("KR", "KOR"),
        ("US", "USA"),
        ("JP", "JPN"),
        ("CN", "CHN"),
        ("DE", "DEU"),
        ("GB", "GBR"),
        ("FR", "FRA"),
        ("IT", "ITA"),
        ("CA", "CAN"),
        ("IN", "IND"),
        ("BR", "BRA"),
        ("RU", "RUS"),
        ("AU", "AUS"),
        ("MX", "MEX"),
        ("ES", "ESP"),
        ("ID", "IDN"),
        ("TR", "TUR"),
        ("SA", "SAU"),
        ("AR", "ARG"),
        ("ZA", "ZAF"),
    ])
});

fn table(domain: CodeDomain) -> &'static HashMap<&'static str, &'static str> {
    match domain {
        CodeDomain::Indicator => &INDICATOR_CODES,
        CodeDomain::Country => &COUNTRY_CODES,
    }
}

/// Resolves a canonical code to the provider's native code, passing unknown
/// codes through unchanged.
pub fn translate(domain: CodeDomain, code: &str) -> &str {
    table(domain).get(code).copied().unwrap_or(code)
}
