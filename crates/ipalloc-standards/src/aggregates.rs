//! Codes used by statistical publishers for non-country rows.

/// World Bank regional, income and lending-group aggregates.
pub const WORLD_BANK_AGGREGATES: &[&str] = &[
    "AFE", "AFW", "ARB", "CEB", "CSS", "EAP", "EAR", "EAS", "ECA", "ECS", "EMU", "EUU", "FCS",
    "HIC", "HPC", "IBD", "IBT", "IDA", "IDB", "IDX", "INX", "LAC", "LCN", "LDC", "LIC", "LMC",
    "LMY", "LTE", "MEA", "MIC", "MNA", "NAC", "OED", "OSS", "PRE", "PSS", "PST", "SAS", "SSA",
    "SSF", "SST", "TEA", "TEC", "TLA", "TMN", "TSA", "TSS", "UMC", "WLD",
];

/// Legacy codes renamed to their current ISO code, `(old, new)`.
pub const CODE_RENAMES: &[(&str, &str)] = &[("CHI", "GGY")];
