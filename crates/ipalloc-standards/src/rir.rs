//! Country membership of the five Regional Internet Registries.
//!
//! Lists follow each registry's published service region. A code appears in
//! at most one list.

use ipalloc_model::Rir;

pub const AFRINIC: &[&str] = &[
    "DZA", "AGO", "BEN", "BWA", "BFA", "BDI", "CMR", "CPV", "CAF", "COD", "TCD", "COM", "COG",
    "DJI", "EGY", "GNQ", "ERI", "ETH", "GAB", "GMB", "GHA", "GIN", "GNB", "CIV", "KEN", "LSO",
    "LBR", "LBY", "MDG", "MWI", "MLI", "MRT", "MUS", "MYT", "MAR", "MOZ", "NAM", "NER", "NGA",
    "REU", "RWA", "SHN", "STP", "SEN", "SYC", "SLE", "SOM", "ZAF", "SSD", "SDN", "SWZ", "TZA",
    "TGO", "TUN", "UGA", "ZMB", "ZWE", "ESH",
];

pub const APNIC: &[&str] = &[
    "AFG", "AUS", "BGD", "BTN", "BRN", "KHM", "CHN", "CXR", "CCK", "COK", "IOT", "FJI", "HKG",
    "IND", "IDN", "JPN", "KAZ", "PRK", "KOR", "KGZ", "LAO", "MAC", "MYS", "MDV", "MNG", "MMR",
    "NPL", "NCL", "NZL", "NIU", "NFK", "PAK", "PLW", "PNG", "PHL", "PCN", "SGP", "SLB", "LKA",
    "TWN", "TJK", "THA", "TLS", "TKL", "TON", "TUV", "VUT", "VNM", "WLF", "ASM", "GUM", "MNP",
    "KIR", "MHL", "FSM", "NRU", "PYF", "WSM",
];

pub const ARIN: &[&str] = &[
    "AIA", "ATA", "ATG", "BHS", "BRB", "BMU", "BVT", "CAN", "CYM", "DMA", "GRD", "GLP", "HMD",
    "JAM", "KNA", "LCA", "MAF", "BLM", "MTQ", "MSR", "PRI", "SPM", "VCT", "TCA", "USA", "UMI",
    "VGB", "VIR",
];

pub const LACNIC: &[&str] = &[
    "ABW", "ARG", "BLZ", "BOL", "BES", "BRA", "CHL", "COL", "CRI", "CUB", "CUW", "DOM", "ECU",
    "SLV", "FLK", "GUF", "GTM", "GUY", "HTI", "HND", "MEX", "NIC", "PAN", "PRY", "PER", "SGS",
    "SXM", "SUR", "TTO", "URY", "VEN",
];

pub const RIPE_NCC: &[&str] = &[
    "ALA", "ALB", "AND", "ARM", "AUT", "AZE", "BHR", "BLR", "BEL", "BIH", "BGR", "HRV", "CYP",
    "CZE", "DNK", "EST", "FRO", "FIN", "FRA", "GEO", "DEU", "GIB", "GRC", "GRL", "GGY", "VAT",
    "HUN", "ISL", "IRN", "IRQ", "IRL", "IMN", "ISR", "ITA", "JEY", "JOR", "KWT", "LVA", "LBN",
    "LIE", "LTU", "LUX", "MLT", "MDA", "MCO", "MNE", "NLD", "MKD", "NOR", "OMN", "PSE", "POL",
    "PRT", "QAT", "ROU", "RUS", "SMR", "SAU", "SRB", "SVK", "SVN", "ESP", "SJM", "SWE", "CHE",
    "SYR", "TUR", "UKR", "UZB", "ARE", "GBR", "YEM", "TKM", "XKX",
];

/// Default partition in registry order.
pub fn default_partition() -> [(Rir, &'static [&'static str]); 5] {
    [
        (Rir::Afrinic, AFRINIC),
        (Rir::Apnic, APNIC),
        (Rir::Arin, ARIN),
        (Rir::Lacnic, LACNIC),
        (Rir::RipeNcc, RIPE_NCC),
    ]
}
