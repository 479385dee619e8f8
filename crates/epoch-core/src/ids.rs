//! ID prefix constants.
//!
//! IDs are generated by the database as `<prefix>-<8 hex chars>`.

pub const PREFIX_COMPANY: &str = "cmp";
pub const PREFIX_SNAPSHOT: &str = "snp";
pub const PREFIX_MILESTONE: &str = "mst";
pub const PREFIX_SOURCE: &str = "src";
pub const PREFIX_COMMENTARY: &str = "cmt";
pub const PREFIX_DESIGN_ANALYSIS: &str = "dsg";

pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_COMPANY,
    PREFIX_SNAPSHOT,
    PREFIX_MILESTONE,
    PREFIX_SOURCE,
    PREFIX_COMMENTARY,
    PREFIX_DESIGN_ANALYSIS,
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn prefixes_are_unique_three_letter_codes() {
        let unique: HashSet<_> = ALL_PREFIXES.iter().collect();
        assert_eq!(unique.len(), ALL_PREFIXES.len());
        assert!(ALL_PREFIXES.iter().all(|p| p.len() == 3));
    }
}
