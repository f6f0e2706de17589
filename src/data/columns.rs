//! Column names of the video game sales dataset.

pub const NAME: &str = "Name";
pub const PLATFORM: &str = "Platform";
pub const YEAR: &str = "Year";
pub const GENRE: &str = "Genre";
pub const PUBLISHER: &str = "Publisher";

pub const NA_SALES: &str = "NA_Sales";
pub const EU_SALES: &str = "EU_Sales";
pub const JP_SALES: &str = "JP_Sales";
pub const OTHER_SALES: &str = "Other_Sales";
pub const GLOBAL_SALES: &str = "Global_Sales";

/// Derived during preprocessing from `Year`.
pub const DECADE: &str = "Decade";
/// Derived during preprocessing from the four regional columns.
pub const TOTAL_REGIONAL_SALES: &str = "Total_Regional_Sales";

/// Regional breakdown, summed into [`TOTAL_REGIONAL_SALES`].
pub const REGIONAL_SALES: [&str; 4] = [NA_SALES, EU_SALES, JP_SALES, OTHER_SALES];

/// Sales columns as they appear in the source.
pub const SALES: [&str; 5] = [NA_SALES, EU_SALES, JP_SALES, OTHER_SALES, GLOBAL_SALES];

/// Every column that must hold a finite, non-negative number after cleaning.
pub const SALES_LIKE: [&str; 6] = [
    NA_SALES,
    EU_SALES,
    JP_SALES,
    OTHER_SALES,
    GLOBAL_SALES,
    TOTAL_REGIONAL_SALES,
];

/// Columns that are labels, never numbers (e.g. the `2600` platform).
pub const CATEGORICAL: [&str; 4] = [NAME, PLATFORM, GENRE, PUBLISHER];
