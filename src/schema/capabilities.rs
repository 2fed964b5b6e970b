//! Detection of optional question blocks per schema vintage.
//!
//! The vendor added and retired question blocks over the life of the panel.
//! Rather than scattering presence checks through the derivation stages, the
//! vintage is probed once up front and the resulting descriptor drives which
//! stages run their optional parts.

use crate::raw::RawTable;

/// Optional question blocks present in a response table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchemaCapabilities {
    /// Five-year inflation expectations (`Q1a` direction with `Q1apart2` magnitude)
    pub five_year_inflation: bool,
    /// Five-year inflation forecast bins (`Q9new2_bin*`), retired before `Q1a` was
    pub five_year_bins: bool,
    /// Financial risk appetite (`QRA1`)
    pub financial_risk: bool,
    /// Everyday risk appetite (`QRA2`)
    pub daily_risk: bool,
    /// Spouse or partner employment block (`HH2_*`)
    pub spouse_employment: bool,
    /// Repeat-interview updates to the spouse employment block (`DHH2_*`)
    pub spouse_employment_update: bool,
}

impl SchemaCapabilities {
    /// Probes a response table for the optional question blocks.
    ///
    /// The five-year inflation block counts as present only when both the
    /// direction and magnitude columns exist; a vintage shipping one without
    /// the other is treated as lacking the block.
    #[must_use]
    pub fn detect(raw: &RawTable) -> Self {
        let five_year_inflation = raw.has_column("Q1a") && raw.has_column("Q1apart2");
        Self {
            five_year_inflation,
            five_year_bins: five_year_inflation
                && !raw.columns_with_indexed_prefix("Q9new2_bin").is_empty(),
            financial_risk: raw.has_column("QRA1"),
            daily_risk: raw.has_column("QRA2"),
            spouse_employment: !raw.columns_with_indexed_prefix("HH2_").is_empty(),
            spouse_employment_update: !raw.columns_with_indexed_prefix("DHH2_").is_empty(),
        }
    }

    /// Names of the optional blocks this vintage lacks, for the run report
    #[must_use]
    pub fn missing_blocks(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.five_year_inflation {
            missing.push("Q1a five-year inflation");
        }
        if !self.five_year_bins {
            missing.push("Q9new2 five-year inflation bins");
        }
        if !self.financial_risk {
            missing.push("QRA1 financial risk appetite");
        }
        if !self.daily_risk {
            missing.push("QRA2 everyday risk appetite");
        }
        if !self.spouse_employment {
            missing.push("HH2 spouse employment");
        }
        if !self.spouse_employment_update {
            missing.push("DHH2 spouse employment updates");
        }
        missing
    }
}
